//! Storage module - object storage REST operations scoped to one bucket
//!
//! This module is organized into submodules:
//! - `types`: Storage paths, object metadata and backend error bodies
//! - `client`: Client creation and URL building
//! - `list`: Folder listing (metadata lookup)
//! - `objects`: Object removal
//! - `upload`: Upload requests (simple, streaming)

mod client;
mod list;
mod objects;
mod types;
mod upload;

// Re-export types
pub use types::{ObjectInfo, ObjectMetadata, StoragePath};

// Re-export client creation
pub use client::{ClientFactory, StorageClient};
pub(crate) use client::status_text;

// Re-export operations
pub use list::list_folder;
pub use objects::remove_object;
pub use upload::{upload_bytes, upload_streaming};
