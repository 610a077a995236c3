//! Transfer module - uploads and downloads with progress tracking
//!
//! Provides transfer functionality for bucket objects with:
//! - Streamed upload bodies reporting a snapshot per chunk
//! - Streamed downloads handed to an injected [`FileSaver`]
//! - Delete and metadata lookup by storage path

mod progress;
mod saver;
mod service;
mod types;

pub use progress::{progress_stream, ProgressCallback, TransferProgress, UPLOAD_CHUNK_SIZE};
pub use saver::{DirectorySaver, FileSaver};
pub use service::TransferService;
pub use types::{UploadFile, DEFAULT_CONTENT_TYPE};
