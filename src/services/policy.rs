//! Size and type ceilings applied to uploads before anything leaves the server.

use super::drive_service::DriveError;
use crate::models::upload::UploadItem;

pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;

/// Only images and videos are accepted, each with its own byte ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_image_bytes: u64,
    pub max_video_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_video_bytes: DEFAULT_MAX_VIDEO_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Byte ceiling for a MIME type, `None` when the type is not accepted.
    pub fn limit_for(&self, content_type: &str) -> Option<u64> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.starts_with("image/") {
            Some(self.max_image_bytes)
        } else if essence.starts_with("video/") {
            Some(self.max_video_bytes)
        } else {
            None
        }
    }

    /// The largest ceiling of any accepted type.
    pub fn max_item_bytes(&self) -> u64 {
        self.max_image_bytes.max(self.max_video_bytes)
    }

    pub fn check(&self, item: &UploadItem) -> Result<(), DriveError> {
        let limit =
            self.limit_for(&item.content_type)
                .ok_or_else(|| DriveError::UnsupportedType {
                    name: item.relative_path.clone(),
                    content_type: item.content_type.clone(),
                })?;

        if item.size > limit {
            return Err(DriveError::TooLarge {
                name: item.relative_path.clone(),
                size: item.size,
                limit,
            });
        }
        Ok(())
    }
}
