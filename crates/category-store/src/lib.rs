//! Category-Store: SurrealDB Backend for MecaBot
//!
//! This crate provides the persistence layer for repair categories. The
//! classifier only ever reads from it (a case-insensitive exact lookup by
//! display name); the write operations exist for seeding and administration.
//!
//! ## Layer 0 - Data/Persistence
//!
//! Focus: name uniqueness (ignoring case) and a single-row lookup contract.
//!
//! ## Key Components
//!
//! - `CategoryStore`: Backend-agnostic async trait
//! - `SurrealCategoryStore`: SurrealDB implementation (mem, surrealkv, ws)
//! - `RepairCategory`: Schema mapping for the `repair_category` table
//! - `OfflineCategoryStore`: Fails every call with a stored connect error
//! - `fakes`: In-memory and always-failing stores for tests

mod error;
pub mod fakes;
mod handle;
mod migrations;
mod offline;
mod schema;
pub mod store;

pub use error::StoreError;
pub use handle::{CloudConfig, SurrealCategoryStore};
pub use offline::OfflineCategoryStore;
pub use schema::{name_key, RepairCategory};
pub use store::{CategoryStore, StoreResult};
