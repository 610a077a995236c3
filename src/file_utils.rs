//! File display helpers and upload validation

use thiserror::Error;

/// Largest file the upload form accepts: 100 MB
pub const MAX_UPLOAD_SIZE: u64 = 100 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "video/mp4",
    "application/zip",
    "application/x-rar-compressed",
    "application/vnd.rar",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

// Checked in order; the first substring found wins.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("pdf", "pdf"),
    ("zip", "zip"),
    ("wordprocessingml", "docx"),
    ("msword", "doc"),
    ("spreadsheetml", "xlsx"),
    ("powerpoint", "pptx"),
    ("mp4", "mp4"),
    ("video", "mp4"),
    ("image", "img"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File size must not exceed {}", readable_limit(.limit))]
    TooLarge { size: u64, limit: u64 },

    #[error("Unsupported file type '{0}'. Only PDF, MP4, ZIP, RAR and DOCX are allowed")]
    UnsupportedType(String),
}

fn readable_limit(limit: &u64) -> String {
    format_file_size(*limit)
}

/// Reject files the upload form would not accept.
pub fn validate_upload(size: u64, mime_type: &str) -> Result<(), ValidationError> {
    if size > MAX_UPLOAD_SIZE {
        return Err(ValidationError::TooLarge {
            size,
            limit: MAX_UPLOAD_SIZE,
        });
    }
    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return Err(ValidationError::UnsupportedType(mime_type.to_string()));
    }
    Ok(())
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let bytes = bytes as f64;
    let exponent = ((bytes.ln() / 1024f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = (bytes / 1024f64.powi(exponent as i32) * 100.0).round() / 100.0;

    format!("{} {}", value, UNITS[exponent])
}

pub fn extension_from_mime_type(mime_type: &str) -> Option<&'static str> {
    let normalized = mime_type.to_lowercase();
    MIME_EXTENSIONS
        .iter()
        .find(|(needle, _)| normalized.contains(*needle))
        .map(|(_, ext)| *ext)
}

/// Short label for a MIME type, or the MIME string itself when unmapped.
pub fn display_type(mime_type: &str) -> String {
    extension_from_mime_type(mime_type)
        .map(str::to_string)
        .unwrap_or_else(|| mime_type.to_string())
}

pub fn extension_from_filename(filename: &str) -> Option<String> {
    let clean = filename.split('?').next().unwrap_or_default();
    let (_, ext) = clean.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}
