//! Incoming upload items and relative-path handling for folder drops.

use bytes::Bytes;

/// How the relative path of an upload item is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    /// Only the leaf name is kept; everything lands in the target folder.
    Flat,
    /// Directory segments are recreated as folders beneath the target folder.
    Tree,
}

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadItem {
    /// Path as sent by the client, e.g. `holiday/day1/beach.png`.
    pub relative_path: String,
    pub content_type: String,
    /// Total byte count seen on the wire. May exceed `data.len()` when the
    /// reader stopped buffering an oversized part.
    pub size: u64,
    pub data: Bytes,
}

impl UploadItem {
    pub fn new(relative_path: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            relative_path: relative_path.into(),
            content_type: content_type.into(),
            size: data.len() as u64,
            data,
        }
    }
}

/// A relative path split into folder segments and a leaf file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativePath {
    pub folders: Vec<String>,
    pub leaf: String,
}

impl RelativePath {
    /// Split `raw` on `/` (or `\`), dropping empty segments. `.` and `..` are
    /// rejected so a client cannot climb out of the upload root.
    pub fn parse(raw: &str, mode: UploadMode) -> Result<Self, String> {
        let mut segments = raw
            .split(['/', '\\'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if segments.iter().any(|s| *s == "." || *s == "..") {
            return Err(format!("path `{}` contains relative segments", raw));
        }

        let leaf = segments
            .pop()
            .ok_or_else(|| format!("path `{}` has no file name", raw))?
            .to_string();

        let folders = match mode {
            UploadMode::Flat => Vec::new(),
            UploadMode::Tree => segments.into_iter().map(str::to_string).collect(),
        };

        Ok(Self { folders, leaf })
    }

    /// Cumulative keys for each folder segment: `/a`, `/a/b`, ...
    pub fn folder_keys(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        self.folders.iter().scan(String::new(), |acc, name| {
            acc.push('/');
            acc.push_str(name);
            Some((acc.clone(), name.as_str()))
        })
    }
}
