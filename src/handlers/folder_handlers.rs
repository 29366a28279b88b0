use super::parse_parent_id;
use crate::{auth::AuthUser, errors::AppError, services::DriveService};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

/// Body of `POST /api/folders/create`.
#[derive(Debug, Deserialize)]
pub struct CreateFolderReq {
    pub name: Option<String>,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
}

/// `POST /api/folders/create`
pub async fn create_folder(
    State(drive): State<DriveService>,
    user: AuthUser,
    Json(payload): Json<CreateFolderReq>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Folder name is required"))?;
    let parent_id = parse_parent_id(payload.parent_id.as_deref())?;

    let folder = drive.create_folder(&user.user_id, &name, parent_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "folder": folder })),
    ))
}
