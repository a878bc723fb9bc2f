use std::cmp::Ordering;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::error::TzipError;

pub type Result<T> = std::result::Result<T, TzipError>;

/// A file discovered by the catalog.
///
/// Only the bare file name is kept; the full path is rebuilt against the
/// scanned directory when a worker picks the entry up. Names are raw OS
/// strings, so entries that are not valid UTF-8 are catalogued too.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    name: OsString,
}

impl FileEntry {
    pub fn new(name: impl Into<OsString>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// The name as raw bytes in the platform encoding; catalog order sorts on these.
    pub fn name_bytes(&self) -> &[u8] {
        self.name.as_encoded_bytes()
    }

    /// Joins this entry onto `base`.
    pub fn path_in(&self, base: &Path) -> PathBuf {
        base.join(&self.name)
    }
}

impl Ord for FileEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name_bytes().cmp(other.name_bytes())
    }
}

impl PartialOrd for FileEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name.to_string_lossy())
    }
}

impl Serialize for FileEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name.to_string_lossy())
    }
}

/// Output of compressing a single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    pub data: Vec<u8>,
    pub original_len: u64,
}

impl CompressionResult {
    pub fn new(data: Vec<u8>, original_len: u64) -> Self {
        Self { data, original_len }
    }

    pub fn compressed_len(&self) -> usize {
        self.data.len()
    }
}

/// Compression effort accepted by the codec, clamped to zlib's `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    pub const FASTEST: Self = Self(1);
    pub const BEST: Self = Self(9);

    pub fn new(level: u32) -> Self {
        Self(level.min(9))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::BEST
    }
}

impl From<CompressionLevel> for flate2::Compression {
    fn from(level: CompressionLevel) -> Self {
        flate2::Compression::new(level.0)
    }
}
