//! The tzip archive: one `[u32 LE length][payload]` record per catalog entry.
//!
//! There is no header, trailer or per-record metadata. Record `i` belongs to
//! catalog entry `i`, so reading an archive back requires the same catalog.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use crate::compression::decompress;
use crate::io::FileCatalog;
use crate::telemetry::tags;
use crate::types::CompressionResult;
use crate::{Result, TzipError};

pub mod reader;
pub mod writer;

pub use reader::ArchiveReader;
pub use writer::ArchiveWriter;

/// Size of the little-endian length prefix of every record.
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Writes `results` to a new archive at `path` in the order given.
///
/// Records go to a sibling `.partial` file that is renamed over `path` only
/// once every record is flushed, so a failed write never leaves a truncated
/// archive behind. Each result's buffer is dropped as soon as its record is
/// written. Returns the number of records written. Any I/O failure is
/// reported as [`TzipError::ArchiveWriteError`].
pub fn pack_archive(path: &Path, results: Vec<CompressionResult>) -> Result<usize> {
    let as_write_error = |source: io::Error| TzipError::ArchiveWriteError {
        path: path.to_path_buf(),
        source,
    };

    let partial = partial_path(path);
    let packed = write_records(&partial, results)
        .map_err(|error| match error {
            TzipError::Io(source) => as_write_error(source),
            other => other,
        })
        .and_then(|stats| {
            fs::rename(&partial, path).map_err(as_write_error)?;
            Ok(stats)
        });

    let (records, bytes) = match packed {
        Ok(stats) => stats,
        Err(error) => {
            discard_partial(&partial);
            return Err(error);
        }
    };

    tracing::info!(
        target: tags::TARGET_ARCHIVE,
        path = %path.display(),
        records,
        bytes,
        "archive written"
    );
    Ok(records)
}

fn write_records(partial: &Path, results: Vec<CompressionResult>) -> Result<(usize, u64)> {
    let mut writer = ArchiveWriter::new(BufWriter::new(File::create(partial)?));
    for result in results {
        writer.write_record(&result.data)?;
    }

    let stats = (writer.records_written(), writer.bytes_written());
    writer.finish()?.into_inner().map_err(|err| err.into_error())?.sync_all()?;
    Ok(stats)
}

/// Sibling path an archive is staged at before it is renamed into place.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("archive"));
    name.push(".partial");
    path.with_file_name(name)
}

fn discard_partial(partial: &Path) {
    match fs::remove_file(partial) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => tracing::warn!(
            target: tags::TARGET_ARCHIVE,
            path = %partial.display(),
            error = %err,
            "failed to remove partial archive"
        ),
    }
}

/// Restores the files of an archive into `dest`, naming records from `catalog`.
///
/// `capacity` bounds the inflated size of each record. Fails with
/// [`TzipError::InvalidArchive`] when the record count and catalog length differ.
pub fn unpack_archive<R: Read>(
    archive: R,
    catalog: &FileCatalog,
    dest: &Path,
    capacity: usize,
) -> Result<usize> {
    fs::create_dir_all(dest)?;
    let mut reader = ArchiveReader::new(archive);

    for entry in catalog.entries() {
        let record = reader
            .next_record()?
            .ok_or(TzipError::InvalidArchive("fewer records than catalog entries"))?;
        let data = decompress(&record, capacity)
            .map_err(|err| err.with_context(format!("while restoring {entry}")))?;
        fs::write(entry.path_in(dest), data)?;
    }

    if reader.next_record()?.is_some() {
        return Err(TzipError::InvalidArchive("more records than catalog entries"));
    }

    tracing::info!(
        target: tags::TARGET_ARCHIVE,
        dest = %dest.display(),
        records = reader.records_read(),
        "archive unpacked"
    );
    Ok(reader.records_read())
}

/// Opens the archive at `path` and unpacks it. See [`unpack_archive`].
pub fn unpack_archive_file(
    path: &Path,
    catalog: &FileCatalog,
    dest: &Path,
    capacity: usize,
) -> Result<usize> {
    let file = File::open(path)?;
    unpack_archive(BufReader::new(file), catalog, dest, capacity)
}
