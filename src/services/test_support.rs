//! Shared fixtures for service tests.

use crate::{
    db,
    media::{AuthParameters, MediaError, MediaResult, MediaStore, MediaUpload, UploadedMedia},
    models::upload::UploadItem,
    services::{DriveService, UploadPolicy},
};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorded {
    requests: Vec<MediaUpload>,
    uploads: Vec<UploadedMedia>,
}

/// A `MediaStore` that remembers every call and can fail on chosen names.
#[derive(Clone, Default)]
pub struct RecordingMediaStore {
    recorded: Arc<Mutex<Recorded>>,
    fail_suffix: Option<String>,
}

impl RecordingMediaStore {
    pub fn failing_on(suffix: &str) -> Self {
        Self {
            fail_suffix: Some(suffix.to_string()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<MediaUpload> {
        self.recorded.lock().unwrap().requests.clone()
    }

    pub fn uploads(&self) -> Vec<UploadedMedia> {
        self.recorded.lock().unwrap().uploads.clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(&self, upload: MediaUpload) -> MediaResult<UploadedMedia> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.requests.push(upload.clone());

        if let Some(suffix) = &self.fail_suffix {
            if upload.file_name.ends_with(suffix.as_str()) {
                return Err(MediaError::Rejected {
                    status: 500,
                    body: "boom".into(),
                });
            }
        }

        let file_path = format!("{}/{}", upload.folder, upload.file_name);
        let media = UploadedMedia {
            file_id: format!("file_{}", recorded.uploads.len()),
            url: format!("https://cdn.test{}", file_path),
            thumbnail_url: Some(format!("https://cdn.test/tr:n-thumb{}", file_path)),
            file_path,
        };
        recorded.uploads.push(media.clone());
        Ok(media)
    }

    fn authentication_parameters(&self) -> AuthParameters {
        AuthParameters {
            token: "token".into(),
            expire: 0,
            signature: "signature".into(),
            public_key: "public".into(),
            url_endpoint: "https://cdn.test".into(),
        }
    }
}

pub fn png(relative_path: &str) -> UploadItem {
    UploadItem::new(
        relative_path,
        "image/png",
        Bytes::from_static(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
    )
}

/// In-memory database with the schema applied. A single connection keeps
/// every query on the same in-memory database.
pub async fn service(media: RecordingMediaStore) -> (DriveService, RecordingMediaStore) {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    let drive = DriveService::new(
        Arc::new(pool),
        Arc::new(media.clone()),
        UploadPolicy::default(),
    );
    (drive, media)
}
