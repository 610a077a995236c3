//! Storage types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of an object inside the bucket, conventionally
/// `<categoryId>/<courseId>/<filename>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn new(path: impl Into<String>) -> Self {
        let path: String = path.into();
        Self(path.trim_start_matches('/').to_string())
    }

    pub fn for_course(category_id: &str, course_id: &str, filename: &str) -> Self {
        Self::new(format!("{}/{}/{}", category_id, course_id, filename))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into (folder, filename). The folder is empty for top-level keys.
    pub fn split(&self) -> (&str, &str) {
        match self.0.rsplit_once('/') {
            Some((folder, name)) => (folder, name),
            None => ("", self.0.as_str()),
        }
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoragePath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StoragePath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// One entry of a folder listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_accessed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<ObjectInfo>,
}

impl ObjectMetadata {
    pub fn size(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|m| m.size)
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.mimetype.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default, rename = "eTag")]
    pub e_tag: Option<String>,
    #[serde(default)]
    pub cache_control: Option<String>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Error body returned by the storage API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BackendErrorBody {
    #[serde(default)]
    pub status_code: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl BackendErrorBody {
    /// The API reports some statuses inside the body as a string.
    pub fn is_not_found(&self) -> bool {
        match &self.status_code {
            Some(serde_json::Value::String(code)) => code == "404",
            Some(serde_json::Value::Number(code)) => code.as_u64() == Some(404),
            _ => false,
        }
    }

    pub fn describe(&self) -> Option<String> {
        self.message.clone().or_else(|| self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_path_joins_segments() {
        let path = StoragePath::for_course("econ", "political-economy", "pe-1.pdf");
        assert_eq!(path.as_str(), "econ/political-economy/pe-1.pdf");
        assert_eq!(path.split(), ("econ/political-economy", "pe-1.pdf"));
    }

    #[test]
    fn top_level_path_has_empty_folder() {
        assert_eq!(StoragePath::from("readme.txt").split(), ("", "readme.txt"));
        assert_eq!(StoragePath::from("/readme.txt").as_str(), "readme.txt");
    }

    #[test]
    fn listing_entry_deserializes() {
        let raw = r#"{
            "name": "a.pdf",
            "id": "2f1c",
            "updated_at": "2024-03-01T10:00:00.000Z",
            "created_at": "2024-03-01T10:00:00.000Z",
            "last_accessed_at": null,
            "metadata": {
                "eTag": "\"abc\"",
                "size": 10,
                "mimetype": "application/pdf",
                "cacheControl": "max-age=3600",
                "lastModified": "2024-03-01T10:00:00.000Z",
                "contentLength": 10,
                "httpStatusCode": 200
            }
        }"#;
        let entry: ObjectMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.name, "a.pdf");
        assert_eq!(entry.size(), Some(10));
        assert_eq!(entry.mime_type(), Some("application/pdf"));
        assert!(entry.last_accessed_at.is_none());
    }

    #[test]
    fn backend_error_status_code_as_string() {
        let body: BackendErrorBody = serde_json::from_str(
            r#"{"statusCode":"404","error":"not_found","message":"Object not found"}"#,
        )
        .unwrap();
        assert!(body.is_not_found());
        assert_eq!(body.describe().as_deref(), Some("Object not found"));
    }
}
