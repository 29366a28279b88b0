//! Dashboard tabs over a single folder level.

use super::entry::StorageEntry;
use serde::{Deserialize, Serialize};

/// The three tabs of the dashboard. `Starred` hides trashed entries even when
/// they are starred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileView {
    #[default]
    All,
    Starred,
    Trash,
}

impl FileView {
    pub fn matches(self, entry: &StorageEntry) -> bool {
        match self {
            FileView::All => !entry.is_trash,
            FileView::Starred => entry.is_starred && !entry.is_trash,
            FileView::Trash => entry.is_trash,
        }
    }

    /// Keep only the entries visible in this tab, preserving order.
    pub fn apply(self, entries: Vec<StorageEntry>) -> Vec<StorageEntry> {
        entries.into_iter().filter(|e| self.matches(e)).collect()
    }
}

/// Badge counts shown next to each tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewCounts {
    pub all: usize,
    pub starred: usize,
    pub trash: usize,
}

impl ViewCounts {
    pub fn from_entries(entries: &[StorageEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut counts, entry| {
            if FileView::All.matches(entry) {
                counts.all += 1;
            }
            if FileView::Starred.matches(entry) {
                counts.starred += 1;
            }
            if FileView::Trash.matches(entry) {
                counts.trash += 1;
            }
            counts
        })
    }
}
