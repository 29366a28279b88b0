use crate::{auth::AuthError, services::DriveError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// Shortcut for 401 Unauthorized
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Unauthorized bodies keep an empty `files` array so list views can
        // render without a special case.
        let body = if self.status == StatusCode::UNAUTHORIZED {
            json!({
                "error": self.message,
                "status": self.status.as_u16(),
                "files": [],
            })
        } else {
            json!({
                "error": self.message,
                "status": self.status.as_u16(),
            })
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        error!("unhandled error: {:#}", err);
        AppError::internal("Internal server error")
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        warn!("authentication failed: {}", err);
        AppError::unauthorized()
    }
}

impl From<&DriveError> for AppError {
    /// Upstream and database details stay in the server log.
    fn from(err: &DriveError) -> Self {
        match err {
            DriveError::EntryNotFound(_) | DriveError::ParentNotFound(_) => {
                AppError::new(StatusCode::NOT_FOUND, err.to_string())
            }
            DriveError::ParentNotFolder(_)
            | DriveError::InvalidName { .. }
            | DriveError::InvalidPath(_)
            | DriveError::NoFiles => AppError::bad_request(err.to_string()),
            DriveError::NotInTrash(_) => AppError::new(StatusCode::CONFLICT, err.to_string()),
            DriveError::TooLarge { .. } => {
                AppError::new(StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
            }
            DriveError::UnsupportedType { .. } => {
                AppError::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, err.to_string())
            }
            DriveError::Media(inner) => {
                error!("media API failure: {}", inner);
                AppError::new(StatusCode::BAD_GATEWAY, "Media upload failed")
            }
            DriveError::Sqlx(inner) => {
                error!("database failure: {}", inner);
                AppError::internal("Database operation failed")
            }
        }
    }
}

impl From<DriveError> for AppError {
    fn from(err: DriveError) -> Self {
        AppError::from(&err)
    }
}
