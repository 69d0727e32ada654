//! Lookup counters for registry observability

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the registry counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Total grantee lookups
    pub lookups: u64,

    /// Lookups that resolved to an identity
    pub hits: u64,

    /// Lookups with no matching identity
    pub misses: u64,

    /// Hits where another equally specific pattern also matched
    pub ambiguous: u64,

    /// Generations installed by `init`
    pub installs: u64,

    /// `init` calls rejected for malformed input
    pub rejected: u64,
}

impl RegistryStats {
    /// Calculates the lookup hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

/// Lock-free counters shared by all readers
#[derive(Debug, Default)]
pub(crate) struct RegistryMetrics {
    lookups: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    ambiguous: AtomicU64,
    installs: AtomicU64,
    rejected: AtomicU64,
}

impl RegistryMetrics {
    pub(crate) fn record_hit(&self, ambiguous: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
        if ambiguous {
            self.ambiguous.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_miss(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_install(&self) {
        self.installs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn stats(&self) -> RegistryStats {
        RegistryStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ambiguous: self.ambiguous.load(Ordering::Relaxed),
            installs: self.installs.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}
