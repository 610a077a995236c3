//! Transfer error taxonomy

use thiserror::Error;

pub type TransferResult<T> = Result<T, TransferError>;

/// Failures surfaced by the config, storage and transfer layers.
///
/// None of these are fatal to the process: the hooks turn every one of them
/// into a notification and a new attempt may start immediately.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upload failed: {status_text}")]
    UploadFailed { status_text: String },

    #[error("Download failed: {status_text}")]
    DownloadFailed { status_text: String },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferErrorKind {
    Configuration,
    UploadFailed,
    DownloadFailed,
    NotFound,
    Backend,
    Io,
}

impl TransferError {
    pub fn kind(&self) -> TransferErrorKind {
        match self {
            TransferError::Configuration(_) => TransferErrorKind::Configuration,
            TransferError::UploadFailed { .. } => TransferErrorKind::UploadFailed,
            TransferError::DownloadFailed { .. } => TransferErrorKind::DownloadFailed,
            TransferError::NotFound(_) => TransferErrorKind::NotFound,
            TransferError::Backend(_) => TransferErrorKind::Backend,
            TransferError::Io(_) => TransferErrorKind::Io,
        }
    }

    pub(crate) fn upload(status_text: impl Into<String>) -> Self {
        TransferError::UploadFailed {
            status_text: status_text.into(),
        }
    }

    pub(crate) fn download(status_text: impl Into<String>) -> Self {
        TransferError::DownloadFailed {
            status_text: status_text.into(),
        }
    }
}
