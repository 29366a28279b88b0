//! Upload pipeline: validate, push to the CDN, then rebuild the folder tree.
//!
//! Items are handled independently. A rejected or failed item is reported in
//! the `UploadReport` and the rest of the batch carries on.

use super::drive_service::{DriveError, DriveResult, DriveService, insert_entry, validate_name};
use crate::{
    media::{MediaUpload, UploadedMedia},
    models::{
        entry::{FileContent, NewEntry, StorageEntry},
        upload::{RelativePath, UploadItem, UploadMode},
    },
};
use sqlx::{Acquire, SqliteConnection};
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Result for one item of an upload batch, in request order.
#[derive(Debug)]
pub struct ItemResult {
    pub relative_path: String,
    pub result: DriveResult<StorageEntry>,
}

#[derive(Debug, Default)]
pub struct UploadReport {
    pub items: Vec<ItemResult>,
}

impl UploadReport {
    pub fn uploaded(&self) -> impl Iterator<Item = &StorageEntry> {
        self.items.iter().filter_map(|i| i.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &DriveError> {
        self.items.iter().filter_map(|i| i.result.as_ref().err())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// An item that passed validation and reached the CDN.
struct Stored {
    index: usize,
    path: RelativePath,
    content_type: String,
    size: u64,
    media: UploadedMedia,
}

/// Maps cumulative folder paths (`/a`, `/a/b`) to the folders created for
/// them during one request.
type FolderMap = HashMap<String, Uuid>;

impl DriveService {
    /// Upload a batch of files beneath `parent_id` (the root when `None`).
    ///
    /// In `UploadMode::Tree` every directory segment of an item's relative
    /// path becomes a folder row, created once per request and reused by the
    /// following items. Type and size are checked before any CDN call. All
    /// rows are written in one transaction; each item runs in its own
    /// savepoint so a failed insert only drops that item.
    pub async fn upload(
        &self,
        user_id: &str,
        parent_id: Option<Uuid>,
        items: Vec<UploadItem>,
        mode: UploadMode,
    ) -> DriveResult<UploadReport> {
        if items.is_empty() {
            return Err(DriveError::NoFiles);
        }
        self.ensure_parent(user_id, parent_id).await?;

        info!(
            "starting upload of {} item(s) for {} under {:?}",
            items.len(),
            user_id,
            parent_id
        );

        let mut results: Vec<Option<DriveResult<StorageEntry>>> =
            items.iter().map(|_| None).collect();
        let names = items
            .iter()
            .map(|i| i.relative_path.clone())
            .collect::<Vec<_>>();

        let mut accepted = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            match self.validate_item(&item, mode) {
                Ok(path) => accepted.push((index, path, item)),
                Err(err) => {
                    warn!("rejected upload item {}: {}", item.relative_path, err);
                    results[index] = Some(Err(err));
                }
            }
        }

        let mut stored = Vec::new();
        for (index, path, item) in accepted {
            let upload = MediaUpload {
                file_name: format!("{}_{}", Uuid::new_v4(), path.leaf),
                folder: format!("/{}", user_id),
                content_type: item.content_type.clone(),
                data: item.data,
            };
            match self.media.upload(upload).await {
                Ok(media) => stored.push(Stored {
                    index,
                    path,
                    content_type: item.content_type,
                    size: item.size,
                    media,
                }),
                Err(err) => {
                    error!("media upload failed for {}: {}", item.relative_path, err);
                    results[index] = Some(Err(DriveError::Media(err)));
                }
            }
        }

        if !stored.is_empty() {
            let mut tx = self.db.begin().await?;
            let mut folders = FolderMap::new();

            for item in stored {
                let mut created = Vec::new();
                let mut savepoint = tx.begin().await?;
                let outcome = persist_item(
                    &mut *savepoint,
                    &mut folders,
                    &mut created,
                    user_id,
                    parent_id,
                    &item,
                )
                .await;

                let outcome = match outcome {
                    Ok(entry) => savepoint.commit().await.map(|_| entry),
                    Err(err) => {
                        if let Err(rollback_err) = savepoint.rollback().await {
                            warn!("savepoint rollback failed: {}", rollback_err);
                        }
                        Err(err)
                    }
                };

                results[item.index] = Some(match outcome {
                    Ok(entry) => Ok(entry),
                    Err(err) => {
                        error!(
                            "could not record {} (stored at {}): {}",
                            item.path.leaf, item.media.file_path, err
                        );
                        for key in created {
                            folders.remove(&key);
                        }
                        Err(DriveError::Sqlx(err))
                    }
                });
            }

            tx.commit().await?;
        }

        let items = names
            .into_iter()
            .zip(results)
            // every index was filled by one of the three stages above
            .filter_map(|(relative_path, result)| {
                result.map(|result| ItemResult {
                    relative_path,
                    result,
                })
            })
            .collect::<Vec<_>>();

        let report = UploadReport { items };
        info!(
            "upload for {} finished: {} stored, {} failed",
            user_id,
            report.uploaded().count(),
            report.failures().count()
        );
        Ok(report)
    }

    /// Every segment that becomes a row name must pass the same rules as
    /// `create_folder`.
    fn validate_item(&self, item: &UploadItem, mode: UploadMode) -> DriveResult<RelativePath> {
        let path = RelativePath::parse(&item.relative_path, mode).map_err(DriveError::InvalidPath)?;
        for segment in path.folders.iter().chain([&path.leaf]) {
            validate_name(segment).map_err(|err| DriveError::InvalidPath(err.to_string()))?;
        }
        self.policy.check(item)?;
        Ok(path)
    }
}

/// Resolve (or create) the folders of `item` and insert its file row.
///
/// Keys of folders created here are pushed to `created` so the caller can
/// forget them if the savepoint is rolled back.
async fn persist_item(
    conn: &mut SqliteConnection,
    folders: &mut FolderMap,
    created: &mut Vec<String>,
    user_id: &str,
    root: Option<Uuid>,
    item: &Stored,
) -> sqlx::Result<StorageEntry> {
    let mut parent = root;

    for (key, name) in item.path.folder_keys() {
        let folder_id = match folders.get(&key) {
            Some(id) => *id,
            None => {
                let folder = insert_entry(&mut *conn, NewEntry::folder(user_id, name, parent)).await?;
                folders.insert(key.clone(), folder.id);
                created.push(key);
                folder.id
            }
        };
        parent = Some(folder_id);
    }

    let content = FileContent {
        path: item.media.file_path.clone(),
        size: item.size as i64,
        mime_type: item.content_type.clone(),
        file_url: item.media.url.clone(),
        thumbnail_url: item.media.thumbnail_url.clone(),
    };
    insert_entry(
        &mut *conn,
        NewEntry::file(user_id, item.path.leaf.clone(), parent, content),
    )
    .await
}
