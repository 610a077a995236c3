//! Storage client creation and URL building

use super::types::{BackendErrorBody, StoragePath};
use crate::config::{ConfigProvider, StorageConfig};
use crate::error::{TransferError, TransferResult};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::sync::{Arc, OnceLock};

/// HTTP handle to the storage API, bound to one bucket.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    config: Arc<StorageConfig>,
}

impl StorageClient {
    pub fn new(config: StorageConfig) -> TransferResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TransferError::Backend(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// `{endpoint}/storage/v1/object/{bucket}/{path}`
    pub fn object_url(&self, path: &StoragePath) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.endpoint_url,
            self.config.bucket,
            encode_uri_path(path.as_str())
        )
    }

    /// Public URL of `path`. Depends only on bucket and path, never on content.
    pub fn public_url(&self, path: &StoragePath) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.endpoint_url,
            self.config.bucket,
            encode_uri_path(path.as_str())
        )
    }

    pub(crate) fn bucket_url(&self, operation: Option<&str>) -> String {
        match operation {
            Some(op) => format!(
                "{}/storage/v1/object/{}/{}",
                self.config.endpoint_url, op, self.config.bucket
            ),
            None => format!(
                "{}/storage/v1/object/{}",
                self.config.endpoint_url, self.config.bucket
            ),
        }
    }

    /// Attach the anonymous key the way the storage SDK does.
    pub(crate) fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.config.anon_key)
            .header("apikey", &self.config.anon_key)
    }
}

/// Builds one [`StorageClient`] on first use and hands out clones of it.
#[derive(Debug)]
pub struct ClientFactory {
    provider: ConfigProvider,
    client: OnceLock<StorageClient>,
}

impl ClientFactory {
    pub fn new(provider: ConfigProvider) -> Self {
        Self {
            provider,
            client: OnceLock::new(),
        }
    }

    pub fn get_client(&self) -> TransferResult<StorageClient> {
        if let Some(client) = self.client.get() {
            return Ok(client.clone());
        }
        let config = self.provider.get()?.clone();
        let client = StorageClient::new(config)?;
        Ok(self.client.get_or_init(|| client).clone())
    }
}

/// Encode URI path - encode each segment individually, keep / as separator
pub(crate) fn encode_uri_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Turn a non-success response into a backend error, reading its body.
pub(crate) async fn backend_error(response: Response, context: &str) -> TransferError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<BackendErrorBody>(&text).ok();

    let message = body
        .as_ref()
        .and_then(BackendErrorBody::describe)
        .unwrap_or_else(|| format!("{} {}", status.as_u16(), status_text(status)));

    let not_found = status == StatusCode::NOT_FOUND
        || body.as_ref().map(BackendErrorBody::is_not_found).unwrap_or(false);

    if not_found {
        TransferError::NotFound(format!("{}: {}", context, message))
    } else {
        TransferError::Backend(format!("{}: {}", context, message))
    }
}

/// HTTP reason phrase, empty for unregistered codes.
pub(crate) fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}
