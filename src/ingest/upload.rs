//! Upload intake policy.
//!
//! Validates an incoming upload's declared facts (size, media type) and
//! turns it into a `NewContent` ready for the store. The policy mirrors
//! what a front-end upload handler enforces, without any HTTP attached.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ContentKind, NewContent};

/// Media types accepted by default
pub const DEFAULT_ALLOWED_MEDIA_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "video/mp4",
    "video/mov",
];

/// Default upload size ceiling (50 MiB)
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Errors raised when an upload is rejected
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported media type: {0}. Only images and videos are allowed")]
    UnsupportedMediaType(String),

    #[error("File too large: {actual} bytes (limit {limit})")]
    TooLarge { actual: u64, limit: u64 },

    #[error("Upload has no filename")]
    EmptyFilename,
}

/// Declared facts about an incoming file
#[derive(Debug, Clone)]
pub struct Upload {
    pub owner_id: String,
    pub filename: String,
    pub media_type: String,
    pub size_bytes: u64,
}

/// Intake rules applied to every upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// Maximum accepted size in bytes
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,

    /// Media types that pass the filter
    #[serde(default = "default_allowed_media_types")]
    pub allowed_media_types: Vec<String>,

    /// Base URL under which stored originals are addressed
    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,
}

fn default_max_size_bytes() -> u64 {
    DEFAULT_MAX_SIZE_BYTES
}

fn default_allowed_media_types() -> Vec<String> {
    DEFAULT_ALLOWED_MEDIA_TYPES
        .iter()
        .map(|t| t.to_string())
        .collect()
}

fn default_media_base_url() -> String {
    "https://example.com".to_string()
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_size_bytes(),
            allowed_media_types: default_allowed_media_types(),
            media_base_url: default_media_base_url(),
        }
    }
}

impl UploadPolicy {
    /// Validate an upload and build the `NewContent` for the store.
    ///
    /// The media kind is derived once here, from the declared media type;
    /// it never changes afterwards.
    pub fn accept(&self, upload: Upload) -> Result<NewContent, UploadError> {
        if upload.filename.trim().is_empty() {
            return Err(UploadError::EmptyFilename);
        }

        if upload.size_bytes > self.max_size_bytes {
            return Err(UploadError::TooLarge {
                actual: upload.size_bytes,
                limit: self.max_size_bytes,
            });
        }

        if !self
            .allowed_media_types
            .iter()
            .any(|t| t == &upload.media_type)
        {
            return Err(UploadError::UnsupportedMediaType(upload.media_type));
        }

        let kind = ContentKind::from_media_type(&upload.media_type)
            .ok_or(UploadError::UnsupportedMediaType(upload.media_type))?;

        let original_location = format!(
            "{}/uploads/{}-{}",
            self.media_base_url,
            Utc::now().timestamp_millis(),
            upload.filename
        );

        Ok(NewContent {
            owner_id: upload.owner_id,
            filename: upload.filename,
            original_location,
            kind,
        })
    }
}

/// Map a file extension to its declared media type, for callers that only
/// have a path (the CLI).
pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/mov"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: &str, media_type: &str, size_bytes: u64) -> Upload {
        Upload {
            owner_id: "user-1".to_string(),
            filename: filename.to_string(),
            media_type: media_type.to_string(),
            size_bytes,
        }
    }

    #[test]
    fn test_accepts_image_upload() {
        let policy = UploadPolicy::default();

        let new = policy.accept(upload("sunset.jpg", "image/jpeg", 1024)).unwrap();

        assert_eq!(new.kind, ContentKind::Image);
        assert_eq!(new.filename, "sunset.jpg");
        assert!(new.original_location.starts_with("https://example.com/uploads/"));
        assert!(new.original_location.ends_with("-sunset.jpg"));
    }

    #[test]
    fn test_accepts_video_upload() {
        let policy = UploadPolicy::default();

        let new = policy.accept(upload("clip.mp4", "video/mp4", 1024)).unwrap();
        assert_eq!(new.kind, ContentKind::Video);
    }

    #[test]
    fn test_rejects_unsupported_media_type() {
        let policy = UploadPolicy::default();

        let err = policy
            .accept(upload("notes.pdf", "application/pdf", 1024))
            .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_rejects_oversized_upload() {
        let policy = UploadPolicy {
            max_size_bytes: 100,
            ..Default::default()
        };

        let err = policy
            .accept(upload("big.mp4", "video/mp4", 101))
            .unwrap_err();
        assert!(matches!(
            err,
            UploadError::TooLarge {
                actual: 101,
                limit: 100
            }
        ));
    }

    #[test]
    fn test_rejects_empty_filename() {
        let policy = UploadPolicy::default();

        let err = policy.accept(upload("  ", "image/png", 1)).unwrap_err();
        assert!(matches!(err, UploadError::EmptyFilename));
    }

    #[test]
    fn test_media_type_for_extension() {
        assert_eq!(media_type_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(media_type_for_extension("png"), Some("image/png"));
        assert_eq!(media_type_for_extension("mov"), Some("video/mov"));
        assert_eq!(media_type_for_extension("pdf"), None);
    }
}
