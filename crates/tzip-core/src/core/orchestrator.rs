use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use crate::compression::{Codec, ZlibCodec};
use crate::config::EngineConfig;
use crate::core::results::ResultsTable;
use crate::core::stats::{StatsAggregator, StatsCounters};
use crate::core::task_queue::TaskQueue;
use crate::core::worker::{WorkerContext, WorkerFailure, WorkerScratch, run_worker_loop};
use crate::format::pack_archive;
use crate::io::FileCatalog;
use crate::report::CompressionReport;
use crate::telemetry::{self, DefaultWorkerTelemetry, WorkerTelemetry, tags};
use crate::types::{CompressionResult, Result};
use crate::TzipError;

/// Results of the parallel phase, owned by the caller once every worker joined.
#[derive(Debug)]
pub struct CompressionOutcome {
    /// One result per catalog entry, in catalog order.
    pub results: Vec<CompressionResult>,
    pub stats: StatsCounters,
    pub workers: usize,
    /// Files compressed by each worker, indexed by worker id.
    pub worker_task_counts: Vec<usize>,
}

/// Drives a run: catalog scan, bounded worker pool, archive serialization.
pub struct Orchestrator {
    config: EngineConfig,
    telemetry: Arc<dyn WorkerTelemetry>,
}

impl Orchestrator {
    /// Creates an orchestrator using the default worker telemetry implementation.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_telemetry(config, Arc::new(DefaultWorkerTelemetry))
    }

    /// Creates an orchestrator with a custom telemetry backend.
    pub fn with_telemetry(config: EngineConfig, telemetry: Arc<dyn WorkerTelemetry>) -> Self {
        Self { config, telemetry }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compresses every matching file of `directory` into the configured archive.
    pub fn run(&self, directory: &Path) -> Result<CompressionReport> {
        let level = self.config.compression_level;
        self.run_with_codec(directory, || ZlibCodec::new(level))
    }

    /// Like [`run`](Self::run) but builds each worker's codec with `make_codec`.
    pub fn run_with_codec<C, F>(&self, directory: &Path, make_codec: F) -> Result<CompressionReport>
    where
        C: Codec,
        F: Fn() -> C,
    {
        let catalog = FileCatalog::scan(directory, &self.config.suffix)?;
        let outcome = self.compress_catalog(&catalog, make_codec)?;
        let records = pack_archive(&self.config.archive_path, outcome.results)?;

        let report = CompressionReport {
            directory: directory.to_path_buf(),
            archive_path: self.config.archive_path.clone(),
            files: records,
            workers: outcome.workers,
            stats: outcome.stats,
        };
        tracing::info!(
            target: tags::TARGET_ORCHESTRATOR,
            files = report.files,
            workers = report.workers,
            total_in = report.stats.total_in,
            total_out = report.stats.total_out,
            archive = %report.archive_path.display(),
            "run complete"
        );
        Ok(report)
    }

    /// Runs the worker pool over `catalog` and returns the filled results table.
    ///
    /// Pool size is `min(catalog.len(), worker_cap)`. Each worker gets its own
    /// scratch buffers and codec, built here before any thread starts. Nothing
    /// is returned until all workers have joined; if any worker failed, the
    /// error for the lowest catalog index wins.
    pub fn compress_catalog<C, F>(&self, catalog: &FileCatalog, make_codec: F) -> Result<CompressionOutcome>
    where
        C: Codec,
        F: Fn() -> C,
    {
        let pool_size = self.config.pool_size(catalog.len());
        let queue = TaskQueue::new(catalog.len());
        let stats = StatsAggregator::new();
        let results = ResultsTable::new(catalog.len());

        let scratches: Vec<WorkerScratch<C>> = (0..pool_size)
            .map(|_| WorkerScratch::new(self.config.buffer_capacity, make_codec()))
            .collect();

        telemetry::set_gauge(
            tags::METRIC_POOL_WORKER_COUNT,
            pool_size as u64,
            &[("subsystem", "pool"), ("op", "spawn")],
        );
        tracing::info!(
            target: tags::TARGET_ORCHESTRATOR,
            files = catalog.len(),
            workers = pool_size,
            "starting worker pool"
        );

        let ctx = WorkerContext {
            catalog,
            queue: &queue,
            stats: &stats,
            results: &results,
            telemetry: self.telemetry.as_ref(),
        };

        let mut worker_task_counts = vec![0usize; pool_size];
        let mut failures: Vec<WorkerFailure> = Vec::new();
        let mut spawn_error: Option<TzipError> = None;

        thread::scope(|scope| {
            let ctx = &ctx;
            let mut handles = Vec::with_capacity(pool_size);

            for (worker_id, mut scratch) in scratches.into_iter().enumerate() {
                let spawned = thread::Builder::new()
                    .name(format!("tzip-worker-{worker_id}"))
                    .spawn_scoped(scope, move || run_worker_loop(worker_id, &mut scratch, ctx));

                match spawned {
                    Ok(handle) => handles.push((worker_id, handle)),
                    Err(err) => {
                        ctx.queue.close();
                        spawn_error = Some(TzipError::Io(err).with_context(format!(
                            "failed to spawn worker {worker_id}"
                        )));
                        break;
                    }
                }
            }

            for (worker_id, handle) in handles {
                match handle.join() {
                    Ok(Ok(processed)) => worker_task_counts[worker_id] = processed,
                    Ok(Err(failure)) => failures.push(failure),
                    Err(payload) => failures.push(WorkerFailure {
                        index: usize::MAX,
                        error: TzipError::WorkerPanicked(panic_message(payload.as_ref())),
                    }),
                }
            }
        });

        if let Some(failure) = failures.into_iter().min_by_key(|failure| failure.index) {
            return Err(failure.error);
        }
        if let Some(error) = spawn_error {
            return Err(error);
        }

        Ok(CompressionOutcome {
            results: results.into_results()?,
            stats: stats.into_counters(),
            workers: pool_size,
            worker_task_counts,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
