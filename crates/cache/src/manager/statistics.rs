//! Cache statistics tracking and reporting

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time statistics of a cache manager
///
/// Operation counters are process-local and start at zero on every open.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// Mapped identifiers
    pub entries: usize,
    /// Highest storage id minted so far
    pub max_assigned_id: u64,
    /// Successful saves
    pub saves: u64,
    /// Failed saves, rejected identifiers included
    pub save_failures: u64,
    /// Load attempts
    pub loads: u64,
    /// Loads that returned a value
    pub load_hits: u64,
}

impl CacheStatistics {
    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.loads == 0 {
            0.0
        } else {
            (self.load_hits as f64 / self.loads as f64) * 100.0
        }
    }
}

/// Lock-free operation counters
#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    saves: AtomicU64,
    save_failures: AtomicU64,
    loads: AtomicU64,
    load_hits: AtomicU64,
}

impl StatCounters {
    pub(crate) fn record_save(&self, success: bool) {
        if success {
            self.saves.fetch_add(1, Ordering::Relaxed);
        } else {
            self.save_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_load(&self, hit: bool) {
        self.loads.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.load_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self, entries: usize, max_assigned_id: u64) -> CacheStatistics {
        CacheStatistics {
            entries,
            max_assigned_id,
            saves: self.saves.load(Ordering::Relaxed),
            save_failures: self.save_failures.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_hits: self.load_hits.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let counters = StatCounters::default();
        assert_eq!(counters.snapshot(0, 0).hit_rate(), 0.0);

        counters.record_load(true);
        counters.record_load(false);
        counters.record_load(true);
        counters.record_load(true);
        counters.record_save(true);
        counters.record_save(false);

        let stats = counters.snapshot(3, 3);
        assert_eq!(stats.loads, 4);
        assert_eq!(stats.load_hits, 3);
        assert_eq!(stats.saves, 1);
        assert_eq!(stats.save_failures, 1);
        assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
    }
}
