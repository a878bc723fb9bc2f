use std::io::Write;

use crate::telemetry::{self, tags};
use crate::{Result, TzipError};

use super::LENGTH_FIELD_SIZE;

/// Appends length-prefixed records to an archive.
///
/// Records carry no metadata: each is a little-endian `u32` payload length
/// followed by the payload bytes. Callers are responsible for order.
#[derive(Debug)]
pub struct ArchiveWriter<W: Write> {
    writer: W,
    records_written: usize,
    bytes_written: u64,
}

impl<W: Write> ArchiveWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records_written: 0,
            bytes_written: 0,
        }
    }

    /// Writes one record.
    pub fn write_record(&mut self, payload: &[u8]) -> Result<()> {
        let len = u32::try_from(payload.len())
            .map_err(|_| TzipError::InvalidArchive("record exceeds 32-bit length field"))?;

        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(payload)?;
        self.records_written += 1;
        self.bytes_written += (LENGTH_FIELD_SIZE + payload.len()) as u64;

        telemetry::increment_counter(
            tags::METRIC_ARCHIVE_RECORD_COUNT,
            1,
            &[("subsystem", "archive"), ("op", "write_record")],
        );
        telemetry::increment_counter(
            tags::METRIC_ARCHIVE_BYTES_WRITTEN,
            (LENGTH_FIELD_SIZE + payload.len()) as u64,
            &[("subsystem", "archive"), ("op", "write_record")],
        );
        Ok(())
    }

    /// Returns the number of records already written.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Returns the number of archive bytes written, length fields included.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
