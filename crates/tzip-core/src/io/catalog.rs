use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use crate::telemetry;
use crate::telemetry::tags;
use crate::types::{FileEntry, Result};
use crate::TzipError;

/// Sorted list of the files a run will compress.
///
/// Entries are the immediate children of `root` whose names end with the
/// configured suffix, in byte-wise lexicographic order. Archive record order
/// is exactly this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCatalog {
    root: PathBuf,
    entries: Vec<FileEntry>,
}

impl FileCatalog {
    /// Scans `root` and keeps regular files whose names end with `suffix`.
    ///
    /// Names are matched on their raw bytes, so names that are not valid
    /// UTF-8 are kept. Subdirectories are skipped. Fails with
    /// [`TzipError::DirectoryUnavailable`] when the directory cannot be
    /// opened or listed.
    pub fn scan(root: &Path, suffix: &str) -> Result<Self> {
        let unavailable = |source: io::Error| TzipError::DirectoryUnavailable {
            path: root.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(root).map_err(unavailable)?;
        if !metadata.is_dir() {
            return Err(unavailable(io::Error::new(
                io::ErrorKind::NotADirectory,
                "catalog root is not a directory",
            )));
        }

        let mut entries = Vec::new();
        let mut skipped = 0u64;

        let walker = WalkDir::new(root)
            .max_depth(1)
            .skip_hidden(false)
            .follow_links(false)
            .parallelism(Parallelism::Serial);

        for entry in walker {
            let entry = entry.map_err(|err| unavailable(io::Error::other(err)))?;
            if entry.depth == 0 {
                continue;
            }

            let name = &entry.file_name;
            if !name.as_encoded_bytes().ends_with(suffix.as_bytes())
                || !is_regular_file(&entry.path(), entry.file_type())
            {
                skipped += 1;
                continue;
            }

            entries.push(FileEntry::new(name.as_os_str()));
        }

        entries.sort();

        telemetry::increment_counter(
            tags::METRIC_CATALOG_SCAN_COUNT,
            1,
            &[("subsystem", "catalog"), ("op", "scan")],
        );
        telemetry::increment_counter(
            tags::METRIC_CATALOG_ENTRY_COUNT,
            entries.len() as u64,
            &[("subsystem", "catalog"), ("op", "scan")],
        );
        telemetry::increment_counter(
            tags::METRIC_CATALOG_SKIPPED_COUNT,
            skipped,
            &[("subsystem", "catalog"), ("op", "scan")],
        );
        tracing::info!(
            target: tags::TARGET_CATALOG,
            root = %root.display(),
            matched = entries.len(),
            skipped,
            "catalog scanned"
        );

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    /// Builds a catalog from names supplied out-of-band, e.g. to unpack an archive.
    ///
    /// Names are sorted the same way a scan sorts them.
    pub fn from_names<I, S>(root: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut entries: Vec<FileEntry> = names.into_iter().map(FileEntry::new).collect();
        entries.sort();
        Self {
            root: root.into(),
            entries,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full path of the entry at `index`, if any.
    pub fn path_of(&self, index: usize) -> Option<PathBuf> {
        self.entries.get(index).map(|entry| entry.path_in(&self.root))
    }
}

fn is_regular_file(path: &Path, file_type: fs::FileType) -> bool {
    if file_type.is_file() {
        return true;
    }
    // Symlinks count when they resolve to a regular file.
    file_type.is_symlink()
        && fs::metadata(path)
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_names_sorts_bytewise() {
        let catalog = FileCatalog::from_names("/tmp", ["b.txt", "B.txt", "a.txt", "_.txt"]);
        let names: Vec<String> = catalog.entries().iter().map(FileEntry::to_string).collect();
        assert_eq!(names, ["B.txt", "_.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn path_of_joins_root() {
        let catalog = FileCatalog::from_names("/data", ["x.txt"]);
        assert_eq!(catalog.path_of(0), Some(PathBuf::from("/data/x.txt")));
        assert_eq!(catalog.path_of(1), None);
    }
}
