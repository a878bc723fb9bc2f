pub mod compression;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod io;
pub mod report;
pub mod telemetry;
pub mod types;

pub use compression::{Codec, ZlibCodec, decompress};
pub use config::{DEFAULT_ARCHIVE_NAME, DEFAULT_BUFFER_CAPACITY, DEFAULT_SUFFIX, EngineConfig};
pub use crate::core::{
    CompressionOutcome, Orchestrator, ResultsTable, StatsAggregator, StatsCounters, TaskQueue,
    WorkerScratch,
};
pub use error::TzipError;
pub use format::{ArchiveReader, ArchiveWriter, pack_archive, unpack_archive, unpack_archive_file};
pub use io::FileCatalog;
pub use report::CompressionReport;
pub use telemetry::worker::{DefaultWorkerTelemetry, WorkerTelemetry};
pub use types::{CompressionLevel, CompressionResult, FileEntry, Result};
