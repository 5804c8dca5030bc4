//! Process-wide classification counters.
//!
//! Counters are bumped by the resolver. [`Metrics::flush`] emits them as a
//! single `info!` event, e.g. when the CLI exits.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Global counters used by every resolver in the process.
pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    classifications: AtomicU64,
    model_accepted: AtomicU64,
    store_hits: AtomicU64,
    unclassified: AtomicU64,
    store_faults: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub classifications: u64,
    pub model_accepted: u64,
    pub store_hits: u64,
    pub unclassified: u64,
    pub store_faults: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            classifications: AtomicU64::new(0),
            model_accepted: AtomicU64::new(0),
            store_hits: AtomicU64::new(0),
            unclassified: AtomicU64::new(0),
            store_faults: AtomicU64::new(0),
        }
    }

    pub fn inc_classifications(&self) {
        self.classifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_model_accepted(&self) {
        self.model_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_store_hits(&self) {
        self.store_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_unclassified(&self) {
        self.unclassified.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_store_faults(&self) {
        self.store_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            classifications: self.classifications.load(Ordering::Relaxed),
            model_accepted: self.model_accepted.load(Ordering::Relaxed),
            store_hits: self.store_hits.load(Ordering::Relaxed),
            unclassified: self.unclassified.load(Ordering::Relaxed),
            store_faults: self.store_faults.load(Ordering::Relaxed),
        }
    }

    /// Emit all counters as one `info!` event.
    pub fn flush(&self) {
        let s = self.snapshot();
        tracing::info!(
            metric = "flush",
            classifications = s.classifications,
            model_accepted = s.model_accepted,
            store_hits = s.store_hits,
            unclassified = s.unclassified,
            store_faults = s.store_faults,
        );
    }
}
