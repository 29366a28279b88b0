//! Defines routes for the drive API.
//!
//! ## Structure
//! - **Listing & navigation**
//!   - `GET    /api/files?parentId=&view=` — one folder level
//!   - `GET    /api/files/{id}/path` — breadcrumb to an entry
//!
//! - **Flags & deletion**
//!   - `PATCH  /api/files/{id}/star` — toggle starred
//!   - `PATCH  /api/files/{id}/trash` — move to / restore from trash
//!   - `DELETE /api/files/{id}/delete` — permanent delete of a trashed entry
//!   - `GET    /api/files/empty-trash` — list trash
//!   - `DELETE /api/files/empty-trash` — purge trash
//!
//! - **Creation**
//!   - `POST   /api/folders/create` — new folder
//!   - `POST   /api/files/upload` — flat multipart upload
//!   - `POST   /api/upload` — folder-aware multipart upload
//!   - `GET    /api/imagekit-auth` — client upload signature

use crate::{
    handlers::{
        entry_handlers::{
            delete_entry, empty_trash, entry_path, list_entries, list_trash, toggle_star,
            toggle_trash,
        },
        folder_handlers::create_folder,
        health_handlers::{healthz, readyz},
        media_handlers::imagekit_auth,
        upload_handlers::{upload_files, upload_tree},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

/// Build and return the router for all drive routes.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/api/files", get(list_entries))
        .route("/api/files/empty-trash", get(list_trash).delete(empty_trash))
        .route("/api/files/upload", post(upload_files))
        .route("/api/files/{id}/path", get(entry_path))
        .route("/api/files/{id}/star", patch(toggle_star))
        .route("/api/files/{id}/trash", patch(toggle_trash))
        .route("/api/files/{id}/delete", delete(delete_entry))
        .route("/api/folders/create", post(create_folder))
        .route("/api/upload", post(upload_tree))
        .route("/api/imagekit-auth", get(imagekit_auth))
}

/// The complete application: routes, state, request tracing and the
/// request body ceiling.
pub fn app(state: AppState, max_request_bytes: usize) -> Router {
    routes()
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
