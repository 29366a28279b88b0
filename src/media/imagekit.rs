//! ImageKit implementation of `MediaStore`.
//!
//! Uploads go through the server-side upload API using HTTP basic auth with
//! the private key. Browser uploads instead use `authentication_parameters`,
//! signed with the same key.

use super::{AuthParameters, MediaError, MediaResult, MediaStore, MediaUpload, UploadedMedia};
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use tracing::debug;
use uuid::Uuid;

/// Lifetime of client upload signatures.
const SIGNATURE_TTL_SECS: i64 = 60 * 30;

#[derive(Clone)]
pub struct ImageKitConfig {
    pub public_key: String,
    pub private_key: String,
    pub url_endpoint: String,
    pub upload_url: String,
}

impl std::fmt::Debug for ImageKitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageKitConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("url_endpoint", &self.url_endpoint)
            .field("upload_url", &self.upload_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct ImageKitClient {
    http: reqwest::Client,
    config: ImageKitConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_id: String,
    file_path: String,
    url: String,
    thumbnail_url: Option<String>,
}

impl ImageKitClient {
    pub fn new(config: ImageKitConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ImageKitConfig {
        &self.config
    }

    /// Parameters for a given token and expiry, so signing is deterministic.
    pub fn sign(&self, token: &str, expire: i64) -> AuthParameters {
        AuthParameters {
            token: token.to_string(),
            expire,
            signature: sign_token(&self.config.private_key, token, expire),
            public_key: self.config.public_key.clone(),
            url_endpoint: self.config.url_endpoint.clone(),
        }
    }
}

/// `hex(HMAC-SHA1(private_key, token || expire))`
fn sign_token(private_key: &str, token: &str, expire: i64) -> String {
    let mut mac = Hmac::<Sha1>::new_from_slice(private_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(token.as_bytes());
    mac.update(expire.to_string().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[async_trait]
impl MediaStore for ImageKitClient {
    async fn upload(&self, upload: MediaUpload) -> MediaResult<UploadedMedia> {
        let file_part = Part::bytes(upload.data.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|err| MediaError::UploadFailed(err.to_string()))?;

        let form = Form::new()
            .part("file", file_part)
            .text("fileName", upload.file_name.clone())
            .text("folder", upload.folder.clone())
            .text("useUniqueFileName", "false");

        debug!(
            "uploading {} to ImageKit folder {}",
            upload.file_name, upload.folder
        );

        let response = self
            .http
            .post(&self.config.upload_url)
            .basic_auth(&self.config.private_key, Some(""))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: UploadResponse = response.json().await?;
        Ok(UploadedMedia {
            file_id: body.file_id,
            file_path: body.file_path,
            url: body.url,
            thumbnail_url: body.thumbnail_url.filter(|url| !url.is_empty()),
        })
    }

    fn authentication_parameters(&self) -> AuthParameters {
        let token = Uuid::new_v4().to_string();
        let expire = Utc::now().timestamp() + SIGNATURE_TTL_SECS;
        self.sign(&token, expire)
    }
}
