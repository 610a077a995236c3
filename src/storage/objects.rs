//! Object removal

use super::client::{backend_error, StorageClient};
use super::types::{ObjectMetadata, StoragePath};
use crate::error::{TransferError, TransferResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RemoveRequest<'a> {
    prefixes: [&'a str; 1],
}

/// Delete a single object. An empty removal result means nothing was there.
pub async fn remove_object(client: &StorageClient, path: &StoragePath) -> TransferResult<()> {
    let response = client
        .authorized(client.http().delete(client.bucket_url(None)))
        .json(&RemoveRequest {
            prefixes: [path.as_str()],
        })
        .send()
        .await
        .map_err(|e| TransferError::Backend(format!("Delete request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(backend_error(response, "Delete failed").await);
    }

    let removed = response
        .json::<Vec<ObjectMetadata>>()
        .await
        .map_err(|e| TransferError::Backend(format!("Invalid delete response: {}", e)))?;

    if removed.is_empty() {
        return Err(TransferError::NotFound(path.to_string()));
    }

    Ok(())
}
