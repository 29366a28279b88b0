//! Media CDN abstraction.
//!
//! File bytes never touch local disk: they are handed to a `MediaStore`, which
//! returns where the CDN put them. The drive service only records the
//! resulting path and URLs.

pub mod imagekit;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

pub use imagekit::ImageKitClient;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media upload failed: {0}")]
    UploadFailed(String),

    #[error("media API returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type MediaResult<T> = Result<T, MediaError>;

/// A file ready to be pushed to the CDN.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    /// Stored file name on the CDN.
    pub file_name: String,
    /// CDN folder, e.g. `/user_123`.
    pub folder: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Where the CDN stored an uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedMedia {
    pub file_id: String,
    pub file_path: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
}

/// Short-lived credentials that let a browser upload directly to the CDN,
/// together with the public account details its SDK is initialised with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthParameters {
    pub token: String,
    pub expire: i64,
    pub signature: String,
    pub public_key: String,
    pub url_endpoint: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, upload: MediaUpload) -> MediaResult<UploadedMedia>;

    fn authentication_parameters(&self) -> AuthParameters;
}
