//! MecaBot Core Library
//!
//! Turns a free-text car repair problem description into a repair category
//! code and an estimated duration in minutes.
//!
//! ## Layer 2 - Classification
//!
//! The [`ClassificationResolver`] asks a language model first and, when the
//! model gives no usable answer, falls back to a literal lookup in the
//! category store. Its only terminal outcomes are a classification or
//! [`ClassificationResult::Unclassified`].

pub mod catalog;
pub mod domain;
pub mod metrics;
pub mod obs;
pub mod prompt;
pub mod resolver;
pub mod telemetry;

pub use catalog::{CatalogEntry, CategoryCatalog};
pub use domain::{
    CategoryCode, ClassificationResult, MecabotError, ProblemDescription, Result,
    ValidationError, MAX_DESCRIPTION_CHARS, MIN_DESCRIPTION_CHARS,
};
pub use metrics::{Metrics, MetricsSnapshot, METRICS};
pub use prompt::PromptTemplate;
pub use resolver::{ClassificationResolver, Resolution, ResolutionSource, StoreFaultPolicy};
pub use telemetry::init_tracing;

pub use category_store::{CategoryStore, RepairCategory, StoreError, SurrealCategoryStore};
pub use llm_gateway::{ClassifierGateway, GatewayConfig, GatewayError, OpenAiGateway};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
