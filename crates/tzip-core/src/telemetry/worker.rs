use crate::TzipError;
use crate::telemetry;
use crate::telemetry::tags;

/// Telemetry contract for compression workers.
///
/// The worker loop calls these hooks around every catalog entry it claims.
/// Implementations must be cheap: they run on the worker thread, outside the
/// queue and stats locks.
pub trait WorkerTelemetry: Send + Sync {
    fn on_task_claimed(&self, worker_id: usize, index: usize);
    fn on_task_finished(&self, worker_id: usize, index: usize, input_bytes: u64, output_bytes: u64);
    fn on_task_failed(&self, worker_id: usize, index: usize, error: &TzipError);
}

/// Default telemetry implementation that reports worker counters and tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWorkerTelemetry;

impl WorkerTelemetry for DefaultWorkerTelemetry {
    fn on_task_claimed(&self, worker_id: usize, index: usize) {
        telemetry::increment_counter(
            tags::METRIC_WORKER_TASK_CLAIMED_COUNT,
            1,
            &[("subsystem", "worker"), ("op", "claim")],
        );
        tracing::trace!(target: tags::TARGET_WORKER, worker_id, index, "task claimed");
    }

    fn on_task_finished(&self, worker_id: usize, index: usize, input_bytes: u64, output_bytes: u64) {
        let labels = [("subsystem", "worker"), ("op", "finish")];
        telemetry::increment_counter(tags::METRIC_WORKER_TASK_FINISHED_COUNT, 1, &labels);
        telemetry::increment_counter(tags::METRIC_WORKER_INPUT_BYTES, input_bytes, &labels);
        telemetry::increment_counter(tags::METRIC_WORKER_OUTPUT_BYTES, output_bytes, &labels);
        tracing::debug!(
            target: tags::TARGET_WORKER,
            worker_id,
            index,
            input_bytes,
            output_bytes,
            "task finished"
        );
    }

    fn on_task_failed(&self, worker_id: usize, index: usize, error: &TzipError) {
        telemetry::increment_counter(
            tags::METRIC_WORKER_TASK_FAILED_COUNT,
            1,
            &[("subsystem", "worker"), ("op", "fail")],
        );
        tracing::error!(
            target: tags::TARGET_WORKER,
            worker_id,
            index,
            error = %error,
            "task failed"
        );
    }
}
