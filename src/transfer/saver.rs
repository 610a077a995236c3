//! Save target for downloaded payloads

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};

use crate::error::{TransferError, TransferResult};

/// Materializes a downloaded payload as a local file named by the caller.
#[async_trait]
pub trait FileSaver: Send + Sync {
    async fn save(&self, filename: &str, data: Bytes) -> TransferResult<()>;
}

/// Writes downloads into a directory, replacing files with the same name.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path inside the directory for `filename`. Names with separators,
    /// `.`/`..` or a root are rejected.
    pub fn destination(&self, filename: &str) -> TransferResult<PathBuf> {
        if filename.contains(['/', '\\']) {
            return Err(invalid_name(filename));
        }
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(filename)),
            _ => Err(invalid_name(filename)),
        }
    }
}

fn invalid_name(filename: &str) -> TransferError {
    TransferError::download(format!("Invalid file name: {:?}", filename))
}

#[async_trait]
impl FileSaver for DirectorySaver {
    async fn save(&self, filename: &str, data: Bytes) -> TransferResult<()> {
        let destination = self.destination(filename)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&destination, &data).await?;
        log::info!(
            "Saved {} bytes to {}",
            data.len(),
            destination.display()
        );
        Ok(())
    }
}
