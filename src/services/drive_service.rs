//! src/services/drive_service.rs
//!
//! DriveService — the file/folder tree of every user, stored as rows of the
//! `entries` table with a self-referential `parent_id`. Bytes live on the
//! media CDN; this service only keeps metadata and the star/trash flags.
//! Every statement is scoped by the caller's user id.

use crate::{
    media::{MediaError, MediaStore},
    models::{
        entry::{NewEntry, StorageEntry},
        navigation::{Crumb, FolderTrail},
        view::FileView,
    },
    services::policy::UploadPolicy,
};
use chrono::Utc;
use sqlx::{Executor, SqlitePool, sqlite::Sqlite};
use std::{collections::HashSet, sync::Arc};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("entry `{0}` not found")]
    EntryNotFound(Uuid),
    #[error("parent folder `{0}` not found")]
    ParentNotFound(Uuid),
    #[error("`{0}` is not a folder")]
    ParentNotFolder(Uuid),
    #[error("entry `{0}` must be moved to the trash before it can be deleted")]
    NotInTrash(Uuid),
    #[error("name `{name}` invalid: {reason}")]
    InvalidName { name: String, reason: String },
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("no files uploaded")]
    NoFiles,
    #[error("`{name}` is {size} bytes, above the {limit} byte limit")]
    TooLarge { name: String, size: u64, limit: u64 },
    #[error("`{name}` has unsupported type `{content_type}`")]
    UnsupportedType { name: String, content_type: String },
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type DriveResult<T> = Result<T, DriveError>;

/// Outcome of emptying a user's trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyTrashOutcome {
    /// Entries that were flagged as trash.
    pub trashed: u64,
    /// Rows removed, including the contents of trashed folders.
    pub removed: u64,
}

/// DriveService provides the tree operations behind the dashboard:
/// - list one folder level, optionally filtered to a tab
/// - create folders and rebuild folder trees from uploads
/// - toggle the star and trash flags
/// - permanently delete trashed entries
#[derive(Clone)]
pub struct DriveService {
    /// Shared SQLite connection pool used for metadata operations.
    pub db: Arc<SqlitePool>,

    /// CDN that receives uploaded bytes.
    pub media: Arc<dyn MediaStore>,

    /// Type and size ceilings for uploads.
    pub policy: UploadPolicy,
}

impl DriveService {
    pub fn new(db: Arc<SqlitePool>, media: Arc<dyn MediaStore>, policy: UploadPolicy) -> Self {
        Self { db, media, policy }
    }

    /// Fetch an entry owned by `user_id`.
    ///
    /// Entries of other users are reported as missing.
    pub async fn fetch_entry(&self, user_id: &str, id: Uuid) -> DriveResult<StorageEntry> {
        sqlx::query_as::<_, StorageEntry>("SELECT * FROM entries WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&*self.db)
            .await?
            .ok_or(DriveError::EntryNotFound(id))
    }

    /// A parent must exist, belong to the same user and be a folder.
    pub(crate) async fn ensure_parent(
        &self,
        user_id: &str,
        parent_id: Option<Uuid>,
    ) -> DriveResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };

        let parent = self
            .fetch_entry(user_id, parent_id)
            .await
            .map_err(|err| match err {
                DriveError::EntryNotFound(id) => DriveError::ParentNotFound(id),
                other => other,
            })?;

        if !parent.is_folder {
            return Err(DriveError::ParentNotFolder(parent_id));
        }
        Ok(())
    }

    /// List a single folder level; `None` lists the root.
    ///
    /// Folders come first, then entries in creation order.
    pub async fn list_entries(
        &self,
        user_id: &str,
        parent_id: Option<Uuid>,
        view: Option<FileView>,
    ) -> DriveResult<Vec<StorageEntry>> {
        let entries = match parent_id {
            Some(parent_id) => {
                sqlx::query_as::<_, StorageEntry>(
                    "SELECT * FROM entries WHERE user_id = ? AND parent_id = ?
                     ORDER BY is_folder DESC, created_at ASC",
                )
                .bind(user_id)
                .bind(parent_id)
                .fetch_all(&*self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, StorageEntry>(
                    "SELECT * FROM entries WHERE user_id = ? AND parent_id IS NULL
                     ORDER BY is_folder DESC, created_at ASC",
                )
                .bind(user_id)
                .fetch_all(&*self.db)
                .await?
            }
        };

        debug!(
            "listed {} entries for {} under {:?}",
            entries.len(),
            user_id,
            parent_id
        );

        Ok(match view {
            Some(view) => view.apply(entries),
            None => entries,
        })
    }

    /// Ancestors of `id` from the root down, ending with the entry itself.
    ///
    /// Stops early at a missing parent or a repeated id.
    pub async fn entry_path(&self, user_id: &str, id: Uuid) -> DriveResult<FolderTrail> {
        let mut current = self.fetch_entry(user_id, id).await?;
        let mut seen = HashSet::from([current.id]);
        let mut crumbs = vec![Crumb {
            id: current.id,
            name: current.name.clone(),
        }];

        while let Some(parent_id) = current.parent_id {
            if !seen.insert(parent_id) {
                warn!("parent cycle detected at {} for {}", parent_id, user_id);
                break;
            }
            current = match self.fetch_entry(user_id, parent_id).await {
                Ok(parent) => parent,
                Err(DriveError::EntryNotFound(_)) => {
                    warn!("entry {} has a dangling parent {}", current.id, parent_id);
                    break;
                }
                Err(err) => return Err(err),
            };
            crumbs.push(Crumb {
                id: current.id,
                name: current.name.clone(),
            });
        }

        crumbs.reverse();
        Ok(FolderTrail::from_crumbs(crumbs))
    }

    /// Create an empty folder.
    pub async fn create_folder(
        &self,
        user_id: &str,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> DriveResult<StorageEntry> {
        let name = validate_name(name)?;
        self.ensure_parent(user_id, parent_id).await?;

        let folder = insert_entry(&*self.db, NewEntry::folder(user_id, name, parent_id)).await?;
        info!("created folder {} ({}) for {}", folder.name, folder.id, user_id);
        Ok(folder)
    }

    /// Flip the starred flag.
    pub async fn toggle_star(&self, user_id: &str, id: Uuid) -> DriveResult<StorageEntry> {
        sqlx::query_as::<_, StorageEntry>(
            "UPDATE entries SET is_starred = NOT is_starred, updated_at = ?
             WHERE id = ? AND user_id = ?
             RETURNING *",
        )
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&*self.db)
        .await?
        .ok_or(DriveError::EntryNotFound(id))
    }

    /// Flip the trash flag. Moving to the trash and restoring are the same call.
    pub async fn toggle_trash(&self, user_id: &str, id: Uuid) -> DriveResult<StorageEntry> {
        sqlx::query_as::<_, StorageEntry>(
            "UPDATE entries SET is_trash = NOT is_trash, updated_at = ?
             WHERE id = ? AND user_id = ?
             RETURNING *",
        )
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&*self.db)
        .await?
        .ok_or(DriveError::EntryNotFound(id))
    }

    /// Permanently remove a trashed entry.
    ///
    /// A folder takes its whole subtree with it, trashed or not. Returns the
    /// removed entry and the number of rows deleted.
    pub async fn delete_entry(&self, user_id: &str, id: Uuid) -> DriveResult<(StorageEntry, u64)> {
        let entry = self.fetch_entry(user_id, id).await?;
        if !entry.is_trash {
            return Err(DriveError::NotInTrash(id));
        }

        let result = sqlx::query(
            "WITH RECURSIVE doomed(id) AS (
                 SELECT id FROM entries WHERE id = ? AND user_id = ?
                 UNION
                 SELECT e.id FROM entries e JOIN doomed d ON e.parent_id = d.id
                 WHERE e.user_id = ?
             )
             DELETE FROM entries WHERE id IN (SELECT id FROM doomed)",
        )
        .bind(id)
        .bind(user_id)
        .bind(user_id)
        .execute(&*self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DriveError::EntryNotFound(id));
        }

        info!(
            "deleted {:?} {} ({} rows) for {}",
            entry.kind(),
            id,
            result.rows_affected(),
            user_id
        );
        Ok((entry, result.rows_affected()))
    }

    /// Every trashed entry of the user, at any depth.
    pub async fn list_trash(&self, user_id: &str) -> DriveResult<Vec<StorageEntry>> {
        let rows = sqlx::query_as::<_, StorageEntry>(
            "SELECT * FROM entries WHERE user_id = ? AND is_trash = 1
             ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    /// Permanently remove every trashed entry and the contents of trashed
    /// folders. Nothing is deleted when the trash is already empty.
    pub async fn empty_trash(&self, user_id: &str) -> DriveResult<EmptyTrashOutcome> {
        let trashed: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM entries WHERE user_id = ? AND is_trash = 1")
                .bind(user_id)
                .fetch_one(&*self.db)
                .await?;

        if trashed == 0 {
            debug!("trash already empty for {}", user_id);
            return Ok(EmptyTrashOutcome {
                trashed: 0,
                removed: 0,
            });
        }

        let result = sqlx::query(
            "WITH RECURSIVE doomed(id) AS (
                 SELECT id FROM entries WHERE user_id = ? AND is_trash = 1
                 UNION
                 SELECT e.id FROM entries e JOIN doomed d ON e.parent_id = d.id
                 WHERE e.user_id = ?
             )
             DELETE FROM entries WHERE id IN (SELECT id FROM doomed)",
        )
        .bind(user_id)
        .bind(user_id)
        .execute(&*self.db)
        .await?;

        info!(
            "emptied trash for {}: {} trashed, {} rows removed",
            user_id,
            trashed,
            result.rows_affected()
        );
        Ok(EmptyTrashOutcome {
            trashed: trashed as u64,
            removed: result.rows_affected(),
        })
    }
}

/// Insert a new row and return it as stored.
pub(crate) async fn insert_entry<'e, E>(executor: E, new: NewEntry) -> sqlx::Result<StorageEntry>
where
    E: Executor<'e, Database = Sqlite>,
{
    let entry = new.into_entry();
    sqlx::query(
        "INSERT INTO entries (
             id, name, path, size, type, file_url, thumbnail_url, user_id,
             parent_id, is_folder, is_starred, is_trash, created_at, updated_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(entry.id)
    .bind(&entry.name)
    .bind(&entry.path)
    .bind(entry.size)
    .bind(&entry.mime_type)
    .bind(&entry.file_url)
    .bind(&entry.thumbnail_url)
    .bind(&entry.user_id)
    .bind(entry.parent_id)
    .bind(entry.is_folder)
    .bind(entry.is_starred)
    .bind(entry.is_trash)
    .bind(entry.created_at)
    .bind(entry.updated_at)
    .execute(executor)
    .await?;
    Ok(entry)
}

/// Folder names are trimmed and must be a single non-empty path segment.
pub(crate) fn validate_name(name: &str) -> DriveResult<&str> {
    let trimmed = name.trim();
    let invalid = |reason: &str| DriveError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    };

    if trimmed.is_empty() {
        return Err(invalid("cannot be empty"));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(invalid("must be at most 255 bytes"));
    }
    if trimmed.contains(['/', '\\']) {
        return Err(invalid("cannot contain path separators"));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(invalid("is reserved"));
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(invalid("cannot contain control characters"));
    }
    Ok(trimmed)
}
