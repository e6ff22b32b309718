use crate::types::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvCleanerError {
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Parse error in {file}: {message}", file = .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Could not write {file}: {source}", file = .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl CsvCleanerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CsvCleanerError::InputNotFound(_) => ErrorKind::InputNotFound,
            CsvCleanerError::Parse { .. } => ErrorKind::Parse,
            CsvCleanerError::Write { .. } => ErrorKind::Write,
            CsvCleanerError::IoError(_) => ErrorKind::Process,
            CsvCleanerError::ConfigError(_) => ErrorKind::Config,
            CsvCleanerError::EncodingError(_) => ErrorKind::Process,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        CsvCleanerError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CsvCleanerError::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CsvCleanerError>;
