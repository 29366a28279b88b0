use crate::{auth::AuthUser, services::DriveService};
use axum::{Json, extract::State, response::IntoResponse};

/// `GET /api/imagekit-auth` — signed parameters for direct browser uploads.
pub async fn imagekit_auth(State(drive): State<DriveService>, _user: AuthUser) -> impl IntoResponse {
    Json(drive.media.authentication_parameters())
}
