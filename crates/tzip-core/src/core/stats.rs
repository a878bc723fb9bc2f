use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

/// Byte totals accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsCounters {
    pub total_in: u64,
    pub total_out: u64,
}

impl StatsCounters {
    /// Space saved as a percentage of the input, `None` when nothing was read.
    pub fn compression_ratio(&self) -> Option<f64> {
        if self.total_in == 0 {
            return None;
        }
        let saved = self.total_in as f64 - self.total_out as f64;
        Some(100.0 * saved / self.total_in as f64)
    }
}

/// Running totals shared by all workers.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    counters: Mutex<StatsCounters>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one file's sizes to the totals.
    pub fn record(&self, input_bytes: u64, output_bytes: u64) {
        let mut counters = self.lock();
        counters.total_in = counters.total_in.saturating_add(input_bytes);
        counters.total_out = counters.total_out.saturating_add(output_bytes);
    }

    pub fn snapshot(&self) -> StatsCounters {
        *self.lock()
    }

    pub fn into_counters(self) -> StatsCounters {
        match self.counters.into_inner() {
            Ok(counters) => counters,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatsCounters> {
        match self.counters.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
