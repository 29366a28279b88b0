//! Multipart upload endpoints.
//!
//! File parts are read chunk by chunk. Once a part grows past the ceiling of
//! its media type the buffer is dropped and only the byte count is kept, so
//! oversized files are rejected without being held in memory or forwarded.

use super::parse_parent_id;
use crate::{
    auth::AuthUser,
    errors::AppError,
    models::upload::{UploadItem, UploadMode},
    services::{DriveService, UploadPolicy, UploadReport},
};
use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::BytesMut;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// `POST /api/files/upload` — `file` / `files` parts stored flat under `parentId`.
pub async fn upload_files(
    State(drive): State<DriveService>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    upload(drive, user, multipart, UploadMode::Flat).await
}

/// `POST /api/upload` — folder drop. Each part's file name is its relative
/// path (`holiday/day1/beach.png`) and the folders are recreated.
pub async fn upload_tree(
    State(drive): State<DriveService>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    upload(drive, user, multipart, UploadMode::Tree).await
}

async fn upload(
    drive: DriveService,
    user: AuthUser,
    multipart: Multipart,
    mode: UploadMode,
) -> Result<Response, AppError> {
    let (parent_raw, items) = read_form(multipart, &drive.policy).await?;
    let parent_id = parse_parent_id(parent_raw.as_deref())?;

    let report = drive.upload(&user.user_id, parent_id, items, mode).await?;
    Ok(report_response(&report, mode))
}

const FORM_ERROR: &str = "Failed to parse uploaded files. File may be too large.";

/// Parser details are logged, never returned.
fn form_error(err: impl std::fmt::Display) -> AppError {
    warn!("rejecting malformed multipart body: {}", err);
    AppError::bad_request(FORM_ERROR)
}

/// Collect the `parentId` field and every file part.
async fn read_form(
    mut multipart: Multipart,
    policy: &UploadPolicy,
) -> Result<(Option<String>, Vec<UploadItem>), AppError> {
    let mut parent = None;
    let mut items = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "parentId" => parent = Some(field.text().await.map_err(form_error)?),
            "file" | "files" | "files[]" => items.push(read_file(field, policy).await?),
            other => debug!("ignoring multipart field `{}`", other),
        }
    }

    Ok((parent, items))
}

async fn read_file(mut field: Field<'_>, policy: &UploadPolicy) -> Result<UploadItem, AppError> {
    let relative_path = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .map(str::to_string)
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
        .unwrap_or_else(|| {
            mime_guess::from_path(&relative_path)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        });
    let limit = policy.limit_for(&content_type).unwrap_or(0);

    let mut size = 0u64;
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(form_error)? {
        size += chunk.len() as u64;
        if size <= limit {
            buffer.extend_from_slice(&chunk);
        } else if !buffer.is_empty() {
            buffer = BytesMut::new();
        }
    }

    debug!(
        "received part {} ({}, {} bytes)",
        relative_path, content_type, size
    );

    Ok(UploadItem {
        relative_path,
        content_type,
        size,
        data: buffer.freeze(),
    })
}

/// 200 when every item was stored, 207 when some were, otherwise the status
/// of the first failure.
fn report_response(report: &UploadReport, mode: UploadMode) -> Response {
    let total = report.items.len();
    let mut first_failure = None;

    let results = report
        .items
        .iter()
        .map(|item| match &item.result {
            Ok(entry) => json!({
                "name": item.relative_path,
                "status": "uploaded",
                "file": entry,
            }),
            Err(err) => {
                let err = AppError::from(err);
                let value = json!({
                    "name": item.relative_path,
                    "status": "failed",
                    "error": err.message,
                    "code": err.status.as_u16(),
                });
                first_failure.get_or_insert(err.status);
                value
            }
        })
        .collect::<Vec<Value>>();

    let files = report.uploaded().collect::<Vec<_>>();
    let (status, message) = match first_failure {
        None => (
            StatusCode::OK,
            match mode {
                UploadMode::Tree => "Folder + Files uploaded successfully".to_string(),
                UploadMode::Flat => "Files uploaded successfully".to_string(),
            },
        ),
        Some(_) if !files.is_empty() => (
            StatusCode::MULTI_STATUS,
            format!("Uploaded {} of {} file(s)", files.len(), total),
        ),
        Some(status) => (status, "Upload failed".to_string()),
    };

    (
        status,
        Json(json!({
            "message": message,
            "files": files,
            "results": results,
        })),
    )
        .into_response()
}
