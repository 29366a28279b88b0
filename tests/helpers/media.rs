use async_trait::async_trait;
use drive_store::media::{
    AuthParameters, MediaError, MediaResult, MediaStore, MediaUpload, UploadedMedia,
};
use std::sync::{Arc, Mutex};

/// Records every upload instead of calling the CDN.
#[derive(Clone, Default)]
pub struct MockMediaStore {
    calls: Arc<Mutex<Vec<MediaUpload>>>,
    fail_suffix: Option<String>,
}

impl MockMediaStore {
    /// Fail any upload whose stored name ends with `suffix`.
    pub fn failing_on(suffix: &str) -> Self {
        Self {
            fail_suffix: Some(suffix.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<MediaUpload> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn upload(&self, upload: MediaUpload) -> MediaResult<UploadedMedia> {
        self.calls.lock().unwrap().push(upload.clone());

        if let Some(suffix) = &self.fail_suffix {
            if upload.file_name.ends_with(suffix.as_str()) {
                return Err(MediaError::UploadFailed("simulated outage".into()));
            }
        }

        let file_path = format!("{}/{}", upload.folder, upload.file_name);
        Ok(UploadedMedia {
            file_id: upload.file_name.clone(),
            url: format!("https://ik.test/demo{}", file_path),
            thumbnail_url: Some(format!("https://ik.test/demo/tr:n-ik_ml_thumbnail{}", file_path)),
            file_path,
        })
    }

    fn authentication_parameters(&self) -> AuthParameters {
        AuthParameters {
            token: "test-token".into(),
            expire: 1_700_000_000,
            signature: "test-signature".into(),
            public_key: "public_test".into(),
            url_endpoint: "https://ik.test/demo".into(),
        }
    }
}
