pub mod commands;
pub mod config;
pub mod error;
pub mod file_utils;
pub mod hooks;
pub mod storage;
pub mod transfer;

pub use config::{ConfigProvider, StorageConfig, DEFAULT_BUCKET};
pub use error::{TransferError, TransferErrorKind, TransferResult};
pub use hooks::{DownloadHook, LogNotifier, Notifier, TaskState, UploadHook, UploadOutcome};
pub use storage::{ClientFactory, ObjectMetadata, StorageClient, StoragePath};
pub use transfer::{
    DirectorySaver, FileSaver, ProgressCallback, TransferProgress, TransferService, UploadFile,
};

/// Install the log subscriber for the CLI. `log` records from the library are
/// forwarded through the subscriber's log bridge.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
