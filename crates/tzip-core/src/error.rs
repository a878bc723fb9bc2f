use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TzipError {
    #[error("directory unavailable: {}: {source}", path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file unreadable: {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file too large: {} holds {size} bytes, buffer capacity is {capacity}", path.display())]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        capacity: usize,
    },
    #[error("codec failure: {0}")]
    CodecFailure(String),
    #[error("archive write error: {}: {source}", path.display())]
    ArchiveWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid archive: {0}")]
    InvalidArchive(&'static str),
    #[error("decode failure: {0}")]
    DecodeFailure(String),
    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<TzipError>,
    },
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl TzipError {
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
