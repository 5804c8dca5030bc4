//! Stand-in for a backend that could not be reached at start-up.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::schema::RepairCategory;
use crate::store::{CategoryStore, StoreResult};

/// Answers every call with the connection error that prevented opening the
/// real store, so callers handle it like any other store fault.
#[derive(Debug, Clone)]
pub struct OfflineCategoryStore {
    reason: String,
}

impl OfflineCategoryStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Wrap the error returned by a failed connection attempt.
    pub fn from_error(err: &StoreError) -> Self {
        Self::new(err.to_string())
    }

    fn unavailable(&self) -> StoreError {
        StoreError::Connection(self.reason.clone())
    }
}

#[async_trait]
impl CategoryStore for OfflineCategoryStore {
    async fn find_by_name_case_insensitive(
        &self,
        _name: &str,
    ) -> StoreResult<Option<RepairCategory>> {
        Err(self.unavailable())
    }

    async fn save(&self, _name: &str, _avg_minutes: u32) -> StoreResult<RepairCategory> {
        Err(self.unavailable())
    }

    async fn list(&self) -> StoreResult<Vec<RepairCategory>> {
        Err(self.unavailable())
    }

    async fn remove(&self, _name: &str) -> StoreResult<bool> {
        Err(self.unavailable())
    }
}
