//! Process-wide run metrics for tzip.
//!
//! Catalog scans, workers and the archive writer bump named counters and
//! gauges (see [`tags`]). With the `telemetry` feature disabled every call
//! compiles to nothing and [`snapshot`] is always empty.

use std::collections::BTreeMap;

use serde::Serialize;

pub mod tags;
pub mod worker;

pub use worker::{DefaultWorkerTelemetry, WorkerTelemetry};

/// Metric values at the moment [`snapshot`] was called, keyed by tag name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TelemetrySnapshot {
    pub counters: BTreeMap<String, u64>,
    pub gauges: BTreeMap<String, u64>,
}

impl TelemetrySnapshot {
    /// Accumulated value of counter `name`, `None` if it was never bumped.
    pub fn counter(&self, name: &str) -> Option<u64> {
        self.counters.get(name).copied()
    }

    /// Last value set on gauge `name`.
    pub fn gauge(&self, name: &str) -> Option<u64> {
        self.gauges.get(name).copied()
    }
}

/// Adds `value` to counter `name`, saturating at `u64::MAX`.
///
/// `labels` describe the call site (`subsystem`, `op`) and are not stored.
#[inline]
pub fn increment_counter(name: &'static str, value: u64, labels: &[(&str, &str)]) {
    let _ = labels;
    #[cfg(feature = "telemetry")]
    metrics::with_registry(|registry| registry.add(name, value));
    #[cfg(not(feature = "telemetry"))]
    let _ = (name, value);
}

/// Overwrites gauge `name` with `value`.
#[inline]
pub fn set_gauge(name: &'static str, value: u64, labels: &[(&str, &str)]) {
    let _ = labels;
    #[cfg(feature = "telemetry")]
    metrics::with_registry(|registry| registry.set(name, value));
    #[cfg(not(feature = "telemetry"))]
    let _ = (name, value);
}

pub fn snapshot() -> TelemetrySnapshot {
    #[cfg(feature = "telemetry")]
    return metrics::with_registry(|registry| registry.snapshot());

    #[cfg(not(feature = "telemetry"))]
    {
        TelemetrySnapshot::default()
    }
}

/// Drops every recorded counter and gauge.
pub fn reset() {
    #[cfg(feature = "telemetry")]
    metrics::with_registry(|registry| *registry = metrics::Registry::default());
}

#[cfg(feature = "telemetry")]
mod metrics {
    use std::collections::BTreeMap;
    use std::sync::{Mutex, OnceLock};

    use super::TelemetrySnapshot;

    #[derive(Default)]
    pub(super) struct Registry {
        counters: BTreeMap<&'static str, u64>,
        gauges: BTreeMap<&'static str, u64>,
    }

    impl Registry {
        pub(super) fn add(&mut self, name: &'static str, value: u64) {
            let slot = self.counters.entry(name).or_default();
            *slot = slot.saturating_add(value);
        }

        pub(super) fn set(&mut self, name: &'static str, value: u64) {
            self.gauges.insert(name, value);
        }

        pub(super) fn snapshot(&self) -> TelemetrySnapshot {
            let owned = |map: &BTreeMap<&'static str, u64>| {
                map.iter()
                    .map(|(name, value)| ((*name).to_owned(), *value))
                    .collect()
            };
            TelemetrySnapshot {
                counters: owned(&self.counters),
                gauges: owned(&self.gauges),
            }
        }
    }

    /// Runs `f` with the global registry locked. A panic in another holder
    /// leaves plain integers behind, so a poisoned lock is reused as is.
    pub(super) fn with_registry<T>(f: impl FnOnce(&mut Registry) -> T) -> T {
        static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();
        let lock = REGISTRY.get_or_init(Mutex::default);
        let mut guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}
