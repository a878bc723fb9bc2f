use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::StatsCounters;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionReport {
    pub directory: PathBuf,
    pub archive_path: PathBuf,
    /// Records written to the archive, one per catalogued file.
    pub files: usize,
    pub workers: usize,
    pub stats: StatsCounters,
}

impl CompressionReport {
    /// Percentage of input bytes saved, `None` when no input was processed.
    pub fn compression_ratio(&self) -> Option<f64> {
        self.stats.compression_ratio()
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.compression_ratio() {
            Some(ratio) => write!(f, "Compression rate: {ratio:.2}%"),
            None => f.write_str("Compression rate: n/a (no files processed)"),
        }
    }
}
