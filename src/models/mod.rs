//! Core data models for the drive service.
//!
//! Files and folders share a single `StorageEntry` row type that maps to the
//! `entries` table via `sqlx::FromRow` and serializes as camelCase JSON for
//! the dashboard.

pub mod entry;
pub mod navigation;
pub mod upload;
pub mod view;
