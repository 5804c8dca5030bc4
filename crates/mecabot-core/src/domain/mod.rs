//! Domain models for MecaBot.
//!
//! - `CategoryCode`: snake_case category identifier
//! - `ClassificationResult`: the resolver's only return value
//! - `ProblemDescription`: validated customer input

pub mod classification;
pub mod code;
pub mod description;
pub mod error;

pub use classification::ClassificationResult;
pub use classification::ClassificationWire;
pub use code::CategoryCode;
pub use description::{ProblemDescription, MAX_DESCRIPTION_CHARS, MIN_DESCRIPTION_CHARS};
pub use error::{MecabotError, Result, ValidationError};
