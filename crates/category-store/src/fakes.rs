//! In-memory fakes for `CategoryStore` (testing only)
//!
//! - `MemoryCategoryStore` satisfies the full trait contract without a database.
//! - `FailingCategoryStore` fails every call, for exercising outage handling.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::schema::{name_key, RepairCategory};
use crate::store::{validate_name, CategoryStore, StoreResult};

// ---------------------------------------------------------------------------
// MemoryCategoryStore
// ---------------------------------------------------------------------------

/// In-memory category table backed by a `BTreeMap<name_key, RepairCategory>`.
///
/// Counts lookups so callers can assert whether the store was consulted.
#[derive(Debug, Default)]
pub struct MemoryCategoryStore {
    rows: Mutex<BTreeMap<String, RepairCategory>>,
    lookups: AtomicUsize,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `(name, avg_minutes)` rows.
    pub fn with_categories(rows: &[(&str, u32)]) -> Self {
        let store = Self::new();
        {
            let mut map = store.rows.lock().unwrap();
            for (name, minutes) in rows {
                map.insert(name_key(name), RepairCategory::new(name, *minutes));
            }
        }
        store
    }

    /// Number of `find_by_name_case_insensitive` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn find_by_name_case_insensitive(
        &self,
        name: &str,
    ) -> StoreResult<Option<RepairCategory>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(&name_key(name)).cloned())
    }

    async fn save(&self, name: &str, avg_minutes: u32) -> StoreResult<RepairCategory> {
        validate_name(name)?;
        let mut rows = self.rows.lock().unwrap();
        let key = name_key(name);
        if rows.contains_key(&key) {
            return Err(StoreError::DuplicateName {
                name: name.to_string(),
            });
        }
        let record = RepairCategory::new(name, avg_minutes);
        rows.insert(key, record.clone());
        Ok(record)
    }

    async fn list(&self) -> StoreResult<Vec<RepairCategory>> {
        let rows = self.rows.lock().unwrap();
        let mut records: Vec<RepairCategory> = rows.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    async fn remove(&self, name: &str) -> StoreResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.remove(&name_key(name)).is_some())
    }
}

// ---------------------------------------------------------------------------
// FailingCategoryStore
// ---------------------------------------------------------------------------

/// A store whose backend is permanently unreachable.
#[derive(Debug, Default)]
pub struct FailingCategoryStore {
    lookups: AtomicUsize,
}

impl FailingCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lookups attempted against the failing backend.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn outage() -> StoreError {
        StoreError::Connection("category store unavailable".to_string())
    }
}

#[async_trait]
impl CategoryStore for FailingCategoryStore {
    async fn find_by_name_case_insensitive(
        &self,
        _name: &str,
    ) -> StoreResult<Option<RepairCategory>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Err(Self::outage())
    }

    async fn save(&self, _name: &str, _avg_minutes: u32) -> StoreResult<RepairCategory> {
        Err(Self::outage())
    }

    async fn list(&self) -> StoreResult<Vec<RepairCategory>> {
        Err(Self::outage())
    }

    async fn remove(&self, _name: &str) -> StoreResult<bool> {
        Err(Self::outage())
    }
}
