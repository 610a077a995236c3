//! Transfer service - upload, download, delete and metadata lookup

use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::StatusCode;
use std::sync::Arc;

use super::progress::{ProgressCallback, TransferProgress};
use super::saver::FileSaver;
use super::types::UploadFile;
use crate::error::{TransferError, TransferResult};
use crate::storage::{self, ObjectMetadata, StorageClient, StoragePath};

/// Upper bound on the buffer reserved up front for a download (8 MB)
const MAX_PREALLOC: u64 = 8 * 1024 * 1024;

pub struct TransferService {
    client: StorageClient,
    saver: Arc<dyn FileSaver>,
}

impl TransferService {
    pub fn new(client: StorageClient, saver: Arc<dyn FileSaver>) -> Self {
        Self { client, saver }
    }

    pub fn client(&self) -> &StorageClient {
        &self.client
    }

    pub fn public_url(&self, path: &StoragePath) -> String {
        self.client.public_url(path)
    }

    /// Upload `file` to `path` (overwriting) and return its public URL.
    ///
    /// Without a callback the file goes up in one request; with one, the body
    /// is streamed and a snapshot is reported for every chunk sent.
    pub async fn upload(
        &self,
        file: &UploadFile,
        path: &StoragePath,
        on_progress: Option<ProgressCallback>,
    ) -> TransferResult<String> {
        log::info!(
            "Uploading {} ({} bytes, {}) to {}/{}",
            file.name,
            file.size(),
            file.content_type,
            self.client.bucket(),
            path
        );

        let result = match on_progress {
            Some(callback) => storage::upload_streaming(&self.client, path, file, callback).await,
            None => storage::upload_bytes(&self.client, path, file).await,
        };

        if let Err(e) = result {
            log::warn!("Upload of {} failed: {}", path, e);
            return Err(e);
        }

        let url = self.client.public_url(path);
        log::info!("Upload complete: {}", url);
        Ok(url)
    }

    /// Fetch `url` and hand the payload to the saver as `filename`.
    ///
    /// The saver is only invoked after a complete 200 response.
    pub async fn download(
        &self,
        url: &str,
        filename: &str,
        on_progress: Option<ProgressCallback>,
    ) -> TransferResult<()> {
        log::info!("Downloading {} as {}", url, filename);

        let data = self.fetch(url, on_progress).await.map_err(|e| {
            log::warn!("Download of {} failed: {}", url, e);
            e
        })?;

        self.saver.save(filename, data).await?;
        log::info!("Download complete: {}", filename);
        Ok(())
    }

    async fn fetch(&self, url: &str, on_progress: Option<ProgressCallback>) -> TransferResult<Bytes> {
        let response = self
            .client
            .http()
            .get(url)
            .send()
            .await
            .map_err(|e| TransferError::download(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(TransferError::download(storage::status_text(response.status())));
        }

        let total = response.content_length().unwrap_or(0);
        // Content-Length is only a hint until the bytes arrive.
        let mut buffer = Vec::with_capacity(total.min(MAX_PREALLOC) as usize);
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| TransferError::download(e.to_string()))?;
            buffer.extend_from_slice(&chunk);

            if let (Some(callback), Some(progress)) = (
                on_progress.as_ref(),
                TransferProgress::new(buffer.len() as u64, total),
            ) {
                callback(progress);
            }
        }

        Ok(Bytes::from(buffer))
    }

    pub async fn delete_object(&self, path: &StoragePath) -> TransferResult<()> {
        log::info!("Deleting {}/{}", self.client.bucket(), path);
        storage::remove_object(&self.client, path).await
    }

    /// Look up one object by listing its folder filtered by file name.
    pub async fn get_metadata(&self, path: &StoragePath) -> TransferResult<ObjectMetadata> {
        let (folder, filename) = path.split();
        let entries = storage::list_folder(&self.client, folder, filename).await?;
        entries
            .into_iter()
            .next()
            .ok_or_else(|| TransferError::NotFound(path.to_string()))
    }
}
