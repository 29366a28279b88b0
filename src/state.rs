//! Shared state handed to every handler.

use crate::{auth::Authenticator, services::DriveService};
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub drive: DriveService,
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(drive: DriveService, auth: Arc<Authenticator>) -> Self {
        Self { drive, auth }
    }
}

impl FromRef<AppState> for DriveService {
    fn from_ref(state: &AppState) -> Self {
        state.drive.clone()
    }
}

impl FromRef<AppState> for Arc<Authenticator> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
