use std::path::PathBuf;

use serde::Serialize;

use crate::types::CompressionLevel;

/// Archive file name used when none is configured.
pub const DEFAULT_ARCHIVE_NAME: &str = "text.tzip";
/// Per-worker input and output buffer capacity (1 MiB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024 * 1024;
/// Suffix a directory entry must carry to be catalogued.
pub const DEFAULT_SUFFIX: &str = ".txt";

/// Tunables for one compression run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    /// Upper bound on worker threads; the pool never exceeds the file count.
    pub worker_cap: usize,
    /// Largest file a worker accepts, and the codec's output ceiling.
    pub buffer_capacity: usize,
    pub compression_level: CompressionLevel,
    /// Case-sensitive file name suffix used by the catalog filter.
    pub suffix: String,
    pub archive_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_cap: num_cpus::get().max(1),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            compression_level: CompressionLevel::BEST,
            suffix: DEFAULT_SUFFIX.to_string(),
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_NAME),
        }
    }
}

impl EngineConfig {
    pub fn with_worker_cap(mut self, worker_cap: usize) -> Self {
        self.worker_cap = worker_cap.max(1);
        self
    }

    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity.max(1);
        self
    }

    pub fn with_compression_level(mut self, level: CompressionLevel) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_archive_path(mut self, archive_path: impl Into<PathBuf>) -> Self {
        self.archive_path = archive_path.into();
        self
    }

    /// Number of workers to spawn for `file_count` files.
    pub fn pool_size(&self, file_count: usize) -> usize {
        file_count.min(self.worker_cap.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_size_is_bounded_by_file_count_and_cap() {
        let config = EngineConfig::default().with_worker_cap(6);
        assert_eq!(config.pool_size(0), 0);
        assert_eq!(config.pool_size(3), 3);
        assert_eq!(config.pool_size(6), 6);
        assert_eq!(config.pool_size(50), 6);
    }

    #[test]
    fn zero_worker_cap_still_allows_one_worker() {
        let mut config = EngineConfig::default();
        config.worker_cap = 0;
        assert_eq!(config.pool_size(10), 1);
    }
}
