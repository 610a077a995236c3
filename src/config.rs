//! Storage endpoint configuration
//!
//! Credentials are resolved once from a variable source and cached for the
//! lifetime of the provider. The provider is passed to whoever needs it, so
//! tests can swap the source for a fixed map.

use crate::error::{TransferError, TransferResult};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_BUCKET: &str = "course-resources";

pub const URL_VAR: &str = "SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const BUCKET_VAR: &str = "STORAGE_BUCKET";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint_url: String,
    pub anon_key: String,
    pub bucket: String,
}

impl StorageConfig {
    pub fn new(endpoint_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let endpoint_url: String = endpoint_url.into();
        Self {
            endpoint_url: endpoint_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

type VarSource = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves [`StorageConfig`] on first use and caches it.
pub struct ConfigProvider {
    source: VarSource,
    cached: OnceLock<StorageConfig>,
}

impl ConfigProvider {
    /// Provider reading from the process environment.
    pub fn from_env() -> Self {
        Self::with_source(|name| std::env::var(name).ok())
    }

    pub fn with_source<F>(source: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            source: Box::new(source),
            cached: OnceLock::new(),
        }
    }

    /// Provider that is already resolved.
    pub fn fixed(config: StorageConfig) -> Self {
        let provider = Self::with_source(|_| None);
        let _ = provider.cached.set(config);
        provider
    }

    /// Return the cached config, resolving it on the first call.
    pub fn get(&self) -> TransferResult<&StorageConfig> {
        if let Some(config) = self.cached.get() {
            return Ok(config);
        }
        let config = self.resolve()?;
        log::info!(
            "Storage config resolved: endpoint={} bucket={}",
            config.endpoint_url,
            config.bucket
        );
        Ok(self.cached.get_or_init(|| config))
    }

    fn resolve(&self) -> TransferResult<StorageConfig> {
        let read = |name: &str| (self.source)(name).filter(|value| !value.trim().is_empty());

        match (read(URL_VAR), read(ANON_KEY_VAR)) {
            (Some(url), Some(anon_key)) => {
                let config = StorageConfig::new(url, anon_key);
                Ok(match read(BUCKET_VAR) {
                    Some(bucket) => config.with_bucket(bucket),
                    None => config,
                })
            }
            _ => Err(TransferError::Configuration(format!(
                "Missing storage environment variables. Please set {} and {}.",
                URL_VAR, ANON_KEY_VAR
            ))),
        }
    }
}

impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProvider")
            .field("cached", &self.cached.get())
            .finish()
    }
}
