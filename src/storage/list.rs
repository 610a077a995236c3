//! Folder listing

use super::client::{backend_error, StorageClient};
use super::types::ObjectMetadata;
use crate::error::{TransferError, TransferResult};
use serde::Serialize;

/// Page size the storage SDK uses by default.
const LIST_LIMIT: u32 = 100;

#[derive(Debug, Serialize)]
struct SortBy<'a> {
    column: &'a str,
    order: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRequest<'a> {
    prefix: &'a str,
    search: &'a str,
    limit: u32,
    offset: u32,
    sort_by: SortBy<'a>,
}

/// List the entries of `folder` whose names match `search`.
pub async fn list_folder(
    client: &StorageClient,
    folder: &str,
    search: &str,
) -> TransferResult<Vec<ObjectMetadata>> {
    let body = ListRequest {
        prefix: folder,
        search,
        limit: LIST_LIMIT,
        offset: 0,
        sort_by: SortBy {
            column: "name",
            order: "asc",
        },
    };

    let response = client
        .authorized(client.http().post(client.bucket_url(Some("list"))))
        .json(&body)
        .send()
        .await
        .map_err(|e| TransferError::Backend(format!("List request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(backend_error(response, "List failed").await);
    }

    response
        .json::<Vec<ObjectMetadata>>()
        .await
        .map_err(|e| TransferError::Backend(format!("Invalid list response: {}", e)))
}
