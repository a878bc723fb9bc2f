/// Tracing target for catalog scans.
pub const TARGET_CATALOG: &str = "tzip.catalog";
/// Tracing target for worker loop events.
pub const TARGET_WORKER: &str = "tzip.worker";
/// Tracing target for archive serialization.
pub const TARGET_ARCHIVE: &str = "tzip.archive";
/// Tracing target for orchestration.
pub const TARGET_ORCHESTRATOR: &str = "tzip.orchestrator";

pub const METRIC_CATALOG_SCAN_COUNT: &str = "tzip.catalog.scan.count";
pub const METRIC_CATALOG_ENTRY_COUNT: &str = "tzip.catalog.entry.count";
pub const METRIC_CATALOG_SKIPPED_COUNT: &str = "tzip.catalog.skipped.count";

pub const METRIC_WORKER_TASK_CLAIMED_COUNT: &str = "tzip.worker.task.claimed.count";
pub const METRIC_WORKER_TASK_FINISHED_COUNT: &str = "tzip.worker.task.finished.count";
pub const METRIC_WORKER_TASK_FAILED_COUNT: &str = "tzip.worker.task.failed.count";
pub const METRIC_WORKER_INPUT_BYTES: &str = "tzip.worker.input.bytes";
pub const METRIC_WORKER_OUTPUT_BYTES: &str = "tzip.worker.output.bytes";

pub const METRIC_POOL_WORKER_COUNT: &str = "tzip.pool.worker.count";

pub const METRIC_ARCHIVE_RECORD_COUNT: &str = "tzip.archive.record.count";
pub const METRIC_ARCHIVE_BYTES_WRITTEN: &str = "tzip.archive.bytes_written";
