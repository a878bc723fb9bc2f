use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use anyhow::anyhow;

use crate::compression::Codec;
use crate::core::results::ResultsTable;
use crate::core::stats::StatsAggregator;
use crate::core::task_queue::TaskQueue;
use crate::io::FileCatalog;
use crate::telemetry::WorkerTelemetry;
use crate::types::{CompressionResult, Result};
use crate::TzipError;

/// Buffers and codec state owned by one worker for the whole run.
///
/// Allocated once before the pool starts; every file the worker claims reuses
/// the same input buffer, output buffer and codec stream.
pub struct WorkerScratch<C> {
    capacity: usize,
    input: Vec<u8>,
    output: Vec<u8>,
    codec: C,
}

impl<C: Codec> WorkerScratch<C> {
    pub fn new(capacity: usize, codec: C) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            input: Vec::with_capacity(capacity),
            output: vec![0u8; capacity],
            codec,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reads `path` into the input buffer and compresses it into a fresh result.
    pub fn compress_file(&mut self, path: &Path) -> Result<CompressionResult> {
        let unreadable = |source: std::io::Error| TzipError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        };

        self.input.clear();
        let file = File::open(path).map_err(unreadable)?;
        // One byte past capacity is enough to detect an oversized file.
        file.take(self.capacity as u64 + 1)
            .read_to_end(&mut self.input)
            .map_err(unreadable)?;

        if self.input.len() > self.capacity {
            let size = fs::metadata(path)
                .map(|metadata| metadata.len())
                .unwrap_or(self.input.len() as u64);
            return Err(TzipError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                capacity: self.capacity,
            });
        }

        self.compress_input()
    }

    fn compress_input(&mut self) -> Result<CompressionResult> {
        self.codec.reset();
        let written = self.codec.compress(&self.input, &mut self.output)?;
        Ok(CompressionResult::new(
            self.output[..written].to_vec(),
            self.input.len() as u64,
        ))
    }
}

/// Shared state every worker of one run borrows.
pub(crate) struct WorkerContext<'a> {
    pub(crate) catalog: &'a FileCatalog,
    pub(crate) queue: &'a TaskQueue,
    pub(crate) stats: &'a StatsAggregator,
    pub(crate) results: &'a ResultsTable,
    pub(crate) telemetry: &'a dyn WorkerTelemetry,
}

/// A fatal error raised while processing one catalog index.
#[derive(Debug)]
pub(crate) struct WorkerFailure {
    pub(crate) index: usize,
    pub(crate) error: TzipError,
}

/// Claims and processes entries until the queue is exhausted.
///
/// Returns the number of files this worker compressed. On the first failure
/// the queue is closed so the other workers wind down after their current file.
pub(crate) fn run_worker_loop<C: Codec>(
    worker_id: usize,
    scratch: &mut WorkerScratch<C>,
    ctx: &WorkerContext<'_>,
) -> std::result::Result<usize, WorkerFailure> {
    let mut processed = 0usize;

    while let Some(index) = ctx.queue.claim_next() {
        ctx.telemetry.on_task_claimed(worker_id, index);

        match process_index(index, scratch, ctx) {
            Ok((input_bytes, output_bytes)) => {
                ctx.telemetry
                    .on_task_finished(worker_id, index, input_bytes, output_bytes);
                processed += 1;
            }
            Err(error) => {
                ctx.telemetry.on_task_failed(worker_id, index, &error);
                ctx.queue.close();
                return Err(WorkerFailure { index, error });
            }
        }
    }

    Ok(processed)
}

fn process_index<C: Codec>(
    index: usize,
    scratch: &mut WorkerScratch<C>,
    ctx: &WorkerContext<'_>,
) -> Result<(u64, u64)> {
    let path = ctx
        .catalog
        .path_of(index)
        .ok_or_else(|| anyhow!("claimed index {index} is outside the catalog"))?;

    let result = scratch.compress_file(&path)?;
    let input_bytes = result.original_len;
    let output_bytes = result.compressed_len() as u64;

    ctx.results.store(index, result)?;
    ctx.stats.record(input_bytes, output_bytes);
    Ok((input_bytes, output_bytes))
}
