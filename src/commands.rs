//! Command handlers behind the CLI
//!
//! These play the part of the upload dialog and resource cards: they
//! validate input, drive the hooks and shape results for display.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::TransferError;
use crate::file_utils::{display_type, format_file_size, validate_upload, ValidationError};
use crate::hooks::{DownloadHook, TaskState, UploadHook, UploadOutcome};
use crate::storage::{ObjectMetadata, StoragePath};
use crate::transfer::{TransferService, UploadFile};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Metadata shaped for display.
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub size: Option<u64>,
    pub size_display: Option<String>,
    pub mime_type: Option<String>,
    pub type_label: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl From<ObjectMetadata> for FileInfo {
    fn from(meta: ObjectMetadata) -> Self {
        let size = meta.size();
        let mime_type = meta.mime_type().map(str::to_string);
        Self {
            size_display: size.map(format_file_size),
            type_label: mime_type.as_deref().map(display_type),
            uploaded_at: meta.updated_at.or(meta.created_at),
            name: meta.name,
            size,
            mime_type,
        }
    }
}

/// Validate a local file and upload it under `<category>/<course>/<name>`.
pub async fn upload(
    hook: &UploadHook,
    file_path: &Path,
    category_id: &str,
    course_id: &str,
) -> CommandResult<UploadOutcome> {
    let file = UploadFile::from_path(file_path).await?;
    validate_upload(file.size(), &file.content_type)?;

    let path = StoragePath::for_course(category_id, course_id, &file.name);
    let reporter = report_progress(hook.state(), "upload");
    let result = hook.upload(file, path).await;
    join_reporter(reporter, "upload").await;

    Ok(result?)
}

/// Download `url`, saving it as `filename` or the URL's last path segment.
pub async fn download(hook: &DownloadHook, url: &str, filename: Option<&str>) -> CommandResult<String> {
    let filename = match filename {
        Some(name) => name.to_string(),
        None => filename_from_url(url),
    };

    let reporter = report_progress(hook.state(), "download");
    let result = hook.download(url, &filename).await;
    join_reporter(reporter, "download").await;

    result?;
    Ok(filename)
}

pub async fn delete(service: &TransferService, path: &str) -> CommandResult<()> {
    service.delete_object(&StoragePath::from(path)).await?;
    Ok(())
}

pub async fn stat(service: &TransferService, path: &str) -> CommandResult<FileInfo> {
    let meta = service.get_metadata(&StoragePath::from(path)).await?;
    Ok(meta.into())
}

pub fn public_url(service: &TransferService, path: &str) -> String {
    service.public_url(&StoragePath::from(path))
}

/// Log progress snapshots until the task settles.
fn report_progress<T>(mut state: watch::Receiver<TaskState<T>>, label: &'static str) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        while state.changed().await.is_ok() {
            let current = state.borrow_and_update().clone();
            if let Some(progress) = current.progress() {
                log::info!(
                    "{}: {}% ({} / {})",
                    label,
                    progress.percentage,
                    format_file_size(progress.loaded),
                    format_file_size(progress.total)
                );
            }
            if current.is_settled() {
                break;
            }
        }
    })
}

async fn join_reporter(reporter: JoinHandle<()>, label: &str) {
    if let Err(e) = reporter.await {
        log::warn!("{} progress reporter stopped: {}", label, e);
    }
}

fn filename_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    let segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    // Decoding can reintroduce separators; keep only the last name.
    let name = decoded.rsplit(['/', '\\']).next().unwrap_or_default();
    match name {
        "" | "." | ".." => "download".to_string(),
        name => name.to_string(),
    }
}
