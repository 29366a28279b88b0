//! Represents a file or folder owned by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// MIME type recorded for folder rows.
pub const FOLDER_TYPE: &str = "folder";

/// A single node of a user's drive: either a folder or an uploaded file.
///
/// Rows link to their containing folder through `parent_id`; `None` means the
/// entry sits at the user's root. Folders never carry CDN data (`path`,
/// `file_url`, `thumbnail_url` are empty and `size` is zero).
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageEntry {
    /// Opaque identifier.
    pub id: Uuid,

    /// Display name (leaf file name or folder name).
    pub name: String,

    /// CDN-relative storage path, empty for folders.
    pub path: String,

    /// Size in bytes, zero for folders.
    pub size: i64,

    /// MIME type, or `"folder"`.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub mime_type: String,

    /// Public CDN URL, empty for folders.
    pub file_url: String,

    /// CDN thumbnail URL when the CDN produced one.
    pub thumbnail_url: Option<String>,

    /// Owning user; every query is scoped by it.
    pub user_id: String,

    /// Containing folder, `None` at the root.
    pub parent_id: Option<Uuid>,

    pub is_folder: bool,
    pub is_starred: bool,
    pub is_trash: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether an entry is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

/// Soft-delete state of an entry. Starring is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Trashed,
}

impl StorageEntry {
    pub fn kind(&self) -> EntryKind {
        if self.is_folder {
            EntryKind::Folder
        } else {
            EntryKind::File
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.is_trash {
            Lifecycle::Trashed
        } else {
            Lifecycle::Active
        }
    }
}

/// CDN data for a file row.
#[derive(Debug, Clone, PartialEq)]
pub struct FileContent {
    pub path: String,
    pub size: i64,
    pub mime_type: String,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
}

/// What a new row holds. A folder has no content, so it cannot be given a
/// CDN path.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryContent {
    Folder,
    File(FileContent),
}

/// Insert payload for the `entries` table.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub name: String,
    pub user_id: String,
    pub parent_id: Option<Uuid>,
    pub content: EntryContent,
}

impl NewEntry {
    pub fn folder(user_id: &str, name: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self {
            name: name.into(),
            user_id: user_id.to_string(),
            parent_id,
            content: EntryContent::Folder,
        }
    }

    pub fn file(
        user_id: &str,
        name: impl Into<String>,
        parent_id: Option<Uuid>,
        content: FileContent,
    ) -> Self {
        Self {
            name: name.into(),
            user_id: user_id.to_string(),
            parent_id,
            content: EntryContent::File(content),
        }
    }

    /// Materialize the row as it will be stored, with a fresh id and timestamps.
    pub fn into_entry(self) -> StorageEntry {
        let now = Utc::now();
        let (is_folder, path, size, mime_type, file_url, thumbnail_url) = match self.content {
            EntryContent::Folder => (
                true,
                String::new(),
                0,
                FOLDER_TYPE.to_string(),
                String::new(),
                None,
            ),
            EntryContent::File(file) => (
                false,
                file.path,
                file.size,
                file.mime_type,
                file.file_url,
                file.thumbnail_url,
            ),
        };

        StorageEntry {
            id: Uuid::new_v4(),
            name: self.name,
            path,
            size,
            mime_type,
            file_url,
            thumbnail_url,
            user_id: self.user_id,
            parent_id: self.parent_id,
            is_folder,
            is_starred: false,
            is_trash: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_rows_carry_no_cdn_data() {
        let parent = Uuid::new_v4();
        let entry = NewEntry::folder("user_1", "photos", Some(parent)).into_entry();

        assert_eq!(entry.kind(), EntryKind::Folder);
        assert_eq!(entry.mime_type, FOLDER_TYPE);
        assert!(entry.path.is_empty());
        assert!(entry.file_url.is_empty());
        assert_eq!(entry.size, 0);
        assert_eq!(entry.thumbnail_url, None);
        assert_eq!(entry.parent_id, Some(parent));
    }

    #[test]
    fn new_entries_start_active_and_unstarred() {
        let entry = NewEntry::file(
            "user_1",
            "cat.png",
            None,
            FileContent {
                path: "/user_1/abc_cat.png".into(),
                size: 42,
                mime_type: "image/png".into(),
                file_url: "https://ik.example/user_1/abc_cat.png".into(),
                thumbnail_url: Some("https://ik.example/tr/abc_cat.png".into()),
            },
        )
        .into_entry();

        assert_eq!(entry.kind(), EntryKind::File);
        assert_eq!(entry.lifecycle(), Lifecycle::Active);
        assert!(!entry.is_starred);
        assert_eq!(entry.created_at, entry.updated_at);
    }

    #[test]
    fn serializes_with_dashboard_field_names() {
        let entry = NewEntry::folder("user_1", "docs", None).into_entry();
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["type"], "folder");
        assert_eq!(json["isFolder"], true);
        assert_eq!(json["parentId"], serde_json::Value::Null);
        assert!(json.get("fileUrl").is_some());
        assert!(json.get("mime_type").is_none());
    }
}
