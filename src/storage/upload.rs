//! Upload requests (simple, streaming)

use super::client::{status_text, StorageClient};
use super::types::StoragePath;
use crate::error::{TransferError, TransferResult};
use crate::transfer::{progress_stream, ProgressCallback, UploadFile};
use reqwest::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, StatusCode};

const CACHE_CONTROL_VALUE: &str = "max-age=3600";

/// Upload in a single request, overwriting any object at `path`.
pub async fn upload_bytes(
    client: &StorageClient,
    path: &StoragePath,
    file: &UploadFile,
) -> TransferResult<()> {
    let response = client
        .authorized(client.http().post(client.object_url(path)))
        .header(CONTENT_TYPE, &file.content_type)
        .header(CACHE_CONTROL, CACHE_CONTROL_VALUE)
        .header("x-upsert", "true")
        .body(file.data.clone())
        .send()
        .await
        .map_err(|e| TransferError::upload(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| status_text(status));
        return Err(TransferError::upload(message));
    }

    Ok(())
}

/// Upload with the body streamed in chunks, reporting progress per chunk.
///
/// Only a 200 response counts as success.
pub async fn upload_streaming(
    client: &StorageClient,
    path: &StoragePath,
    file: &UploadFile,
    on_progress: ProgressCallback,
) -> TransferResult<()> {
    let total = file.size();
    let body = Body::wrap_stream(progress_stream(file.data.clone(), on_progress));

    let response = client
        .authorized(client.http().post(client.object_url(path)))
        .header(CONTENT_TYPE, &file.content_type)
        .header(CONTENT_LENGTH, total)
        .header("x-upsert", "true")
        .body(body)
        .send()
        .await
        .map_err(|e| TransferError::upload(e.to_string()))?;

    if response.status() != StatusCode::OK {
        return Err(TransferError::upload(status_text(response.status())));
    }

    Ok(())
}
