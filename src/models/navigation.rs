//! Breadcrumb trail for folder navigation.
//!
//! The trail is caller-side state: it records the folders entered since the
//! root and never talks to the database. `DriveService::entry_path` rebuilds
//! the same chain from stored parent links when a caller needs to validate it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One visited folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderTrail {
    crumbs: Vec<Crumb>,
}

impl FolderTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_crumbs(crumbs: Vec<Crumb>) -> Self {
        Self { crumbs }
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    /// Folder whose contents are displayed, `None` at the root.
    pub fn current_parent(&self) -> Option<Uuid> {
        self.crumbs.last().map(|c| c.id)
    }

    pub fn enter(&mut self, id: Uuid, name: impl Into<String>) {
        self.crumbs.push(Crumb {
            id,
            name: name.into(),
        });
    }

    /// Step out of the current folder. Returns the folder that was left.
    pub fn up(&mut self) -> Option<Crumb> {
        self.crumbs.pop()
    }

    /// Jump to the crumb at `index`, dropping everything after it. Indexes past
    /// the end leave the trail untouched.
    pub fn navigate_to(&mut self, index: usize) {
        if index < self.crumbs.len() {
            self.crumbs.truncate(index + 1);
        }
    }

    pub fn home(&mut self) {
        self.crumbs.clear();
    }
}
