//! HTTP handlers. Each one authenticates the caller through `AuthUser` and
//! delegates to `DriveService`.

pub mod entry_handlers;
pub mod folder_handlers;
pub mod health_handlers;
pub mod media_handlers;
pub mod upload_handlers;

use crate::errors::AppError;
use uuid::Uuid;

/// Normalize a client-supplied parent id. Empty strings and the literals
/// `null` / `undefined` (as sent by JavaScript clients) mean the root.
pub(crate) fn parse_parent_id(raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("null") | Some("undefined") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("invalid parentId `{}`", value))),
    }
}

pub(crate) fn parse_entry_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::bad_request("File ID is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn javascript_nullish_parent_ids_mean_root() {
        for raw in [None, Some(""), Some("null"), Some("undefined"), Some("  ")] {
            assert_eq!(parse_parent_id(raw).unwrap(), None);
        }
    }

    #[test]
    fn parses_or_rejects_parent_ids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_parent_id(Some(&id.to_string())).unwrap(), Some(id));
        assert!(parse_parent_id(Some("not-a-uuid")).is_err());
        assert!(parse_entry_id("").is_err());
    }
}
