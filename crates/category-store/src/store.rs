//! Storage trait for repair categories
//!
//! `CategoryStore` is the only seam the classifier depends on. It is async
//! and backend-agnostic; in-memory fakes live in the `fakes` module.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::schema::RepairCategory;

/// Result type for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persisted table of repair categories.
///
/// Guarantees:
/// - Names are unique ignoring case, so a lookup matches at most one row.
/// - `find_by_name_case_insensitive` is an exact comparison after
///   lower-casing both sides. It never trims, tokenizes or matches substrings.
/// - Backend failures are returned as `Err`, never reported as "not found".
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Look up a category by display name, ignoring case.
    async fn find_by_name_case_insensitive(
        &self,
        name: &str,
    ) -> StoreResult<Option<RepairCategory>>;

    /// Insert a new category. Returns `StoreError::DuplicateName` when a
    /// category with the same name (ignoring case) already exists.
    async fn save(&self, name: &str, avg_minutes: u32) -> StoreResult<RepairCategory>;

    /// List all categories ordered by name.
    async fn list(&self) -> StoreResult<Vec<RepairCategory>>;

    /// Remove a category by name, ignoring case. Returns whether a row was
    /// removed.
    async fn remove(&self, name: &str) -> StoreResult<bool>;
}

/// Reject names the table cannot hold before they reach a backend.
pub(crate) fn validate_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidRecord(
            "category name must not be blank".to_string(),
        ));
    }
    Ok(())
}
