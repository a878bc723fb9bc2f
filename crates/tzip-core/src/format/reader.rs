use std::io::{ErrorKind, Read};

use crate::{Result, TzipError};

use super::LENGTH_FIELD_SIZE;

/// Streams length-prefixed records back out of an archive.
#[derive(Debug)]
pub struct ArchiveReader<R: Read> {
    reader: R,
    records_read: usize,
}

impl<R: Read> ArchiveReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            records_read: 0,
        }
    }

    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Reads the next record payload, or `None` at a clean end of archive.
    pub fn next_record(&mut self) -> Result<Option<Vec<u8>>> {
        let mut len_bytes = [0u8; LENGTH_FIELD_SIZE];
        let filled = read_up_to(&mut self.reader, &mut len_bytes)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < LENGTH_FIELD_SIZE {
            return Err(TzipError::InvalidArchive("truncated record length"));
        }

        let len = u32::from_le_bytes(len_bytes) as u64;
        // Read through `take` so a corrupt length cannot force a huge allocation.
        let mut payload = Vec::new();
        (&mut self.reader).take(len).read_to_end(&mut payload)?;
        if payload.len() as u64 != len {
            return Err(TzipError::InvalidArchive("truncated record payload"));
        }

        self.records_read += 1;
        Ok(Some(payload))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for ArchiveReader<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_records_until_clean_end() {
        let bytes = [2, 0, 0, 0, b'h', b'i', 0, 0, 0, 0];
        let mut reader = ArchiveReader::new(Cursor::new(bytes));
        assert_eq!(reader.next_record().expect("first"), Some(b"hi".to_vec()));
        assert_eq!(reader.next_record().expect("second"), Some(Vec::new()));
        assert_eq!(reader.next_record().expect("end"), None);
        assert_eq!(reader.records_read(), 2);
    }

    #[test]
    fn empty_archive_has_no_records() {
        let reader = ArchiveReader::new(Cursor::new(Vec::<u8>::new()));
        assert_eq!(reader.count(), 0);
    }

    #[test]
    fn truncated_length_is_rejected() {
        let mut reader = ArchiveReader::new(Cursor::new([5u8, 0]));
        assert!(matches!(
            reader.next_record(),
            Err(TzipError::InvalidArchive("truncated record length"))
        ));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let mut reader = ArchiveReader::new(Cursor::new([5u8, 0, 0, 0, b'a', b'b']));
        assert!(matches!(
            reader.next_record(),
            Err(TzipError::InvalidArchive("truncated record payload"))
        ));
    }
}
