//! Listing, navigation, star/trash toggles and permanent deletion.

use super::{parse_entry_id, parse_parent_id};
use crate::{
    auth::AuthUser,
    errors::AppError,
    models::{
        entry::Lifecycle,
        view::{FileView, ViewCounts},
    },
    services::DriveService,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

/// Query params accepted by `GET /api/files`.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub view: Option<String>,
}

fn parse_view(raw: Option<&str>) -> Result<Option<FileView>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some("all") => Ok(Some(FileView::All)),
        Some("starred") => Ok(Some(FileView::Starred)),
        Some("trash") => Ok(Some(FileView::Trash)),
        Some(other) => Err(AppError::bad_request(format!("unknown view `{}`", other))),
    }
}

/// `GET /api/files?parentId=&view=` — one folder level of the caller's drive.
///
/// `counts` always describes the whole level so tab badges stay correct when
/// a view filter is applied.
pub async fn list_entries(
    State(drive): State<DriveService>,
    user: AuthUser,
    Query(q): Query<ListEntriesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let parent_id = parse_parent_id(q.parent_id.as_deref())?;
    let view = parse_view(q.view.as_deref())?;

    let entries = drive.list_entries(&user.user_id, parent_id, None).await?;
    let counts = ViewCounts::from_entries(&entries);
    let files = match view {
        Some(view) => view.apply(entries),
        None => entries,
    };

    Ok(Json(json!({ "files": files, "counts": counts })))
}

/// `GET /api/files/{id}/path` — breadcrumb from the root to the entry.
pub async fn entry_path(
    State(drive): State<DriveService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_entry_id(&id)?;
    let trail = drive.entry_path(&user.user_id, id).await?;
    Ok(Json(json!({
        "path": trail.crumbs(),
        "currentFolder": trail.current_parent(),
    })))
}

/// `PATCH /api/files/{id}/star`
pub async fn toggle_star(
    State(drive): State<DriveService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_entry_id(&id)?;
    let entry = drive.toggle_star(&user.user_id, id).await?;
    let message = if entry.is_starred {
        "File starred"
    } else {
        "File unstarred"
    };
    Ok(Json(json!({ "message": message, "file": entry })))
}

/// `PATCH /api/files/{id}/trash` — moves to the trash or restores.
pub async fn toggle_trash(
    State(drive): State<DriveService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_entry_id(&id)?;
    let entry = drive.toggle_trash(&user.user_id, id).await?;
    let message = match entry.lifecycle() {
        Lifecycle::Trashed => "Moved to trash",
        Lifecycle::Active => "Restored from trash",
    };
    Ok(Json(json!({ "message": message, "file": entry })))
}

/// `DELETE /api/files/{id}/delete` — permanent; the entry must be trashed.
pub async fn delete_entry(
    State(drive): State<DriveService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_entry_id(&id)?;
    let (_, removed) = drive.delete_entry(&user.user_id, id).await?;
    Ok(Json(json!({
        "message": "File deleted successfully",
        "deleted": removed,
    })))
}

/// `GET /api/files/empty-trash` — every trashed entry of the caller.
pub async fn list_trash(
    State(drive): State<DriveService>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let files = drive.list_trash(&user.user_id).await?;
    Ok(Json(json!({ "files": files })))
}

/// `DELETE /api/files/empty-trash`
pub async fn empty_trash(
    State(drive): State<DriveService>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let outcome = drive.empty_trash(&user.user_id).await?;
    let message = if outcome.trashed == 0 {
        "Trash is already empty".to_string()
    } else {
        format!("Emptied trash. Deleted {} file(s).", outcome.trashed)
    };
    Ok(Json(json!({
        "message": message,
        "deleted": outcome.trashed,
        "removed": outcome.removed,
    })))
}
