//! Error types for category-store

use thiserror::Error;

/// Errors that can occur in the category persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Database query error
    #[error("Database query failed: {0}")]
    Query(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),

    /// A category with the same name (ignoring case) already exists
    #[error("Category already exists: {name}")]
    DuplicateName { name: String },

    /// Record rejected before reaching the backend
    #[error("Invalid category record: {0}")]
    InvalidRecord(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}
