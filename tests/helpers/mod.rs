#![allow(dead_code)]

pub mod media;

use axum_test::TestServer;
use drive_store::{
    auth::{AuthKey, Authenticator},
    db,
    routes::routes::app,
    services::{DriveService, UploadPolicy},
    state::AppState,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use media::MockMediaStore;
use serde::Serialize;
use std::sync::Arc;

pub const TEST_SECRET: &str = "drive-test-secret";

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub media: MockMediaStore,
    pub drive: DriveService,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup a test application with an isolated in-memory database.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(MockMediaStore::default()).await
}

pub async fn setup_test_app_with(media: MockMediaStore) -> TestApp {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let drive = DriveService::new(
        Arc::new(pool),
        Arc::new(media.clone()),
        UploadPolicy::default(),
    );
    let auth = Authenticator::new(&AuthKey::Secret(TEST_SECRET.into()), None)
        .expect("Failed to build authenticator");

    let router = app(AppState::new(drive.clone(), Arc::new(auth)), 512 * 1024 * 1024);
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        media,
        drive,
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    sub: &'a str,
    exp: i64,
}

/// A session token for `user_id`, valid for an hour.
pub fn token_for(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id,
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", token_for(user_id))
}

/// Create a folder over HTTP and return its id.
pub async fn create_folder(
    client: &TestServer,
    user: &str,
    name: &str,
    parent_id: Option<&str>,
) -> String {
    let response = client
        .post("/api/folders/create")
        .add_header("Authorization", bearer(user))
        .json(&serde_json::json!({ "name": name, "parentId": parent_id }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());

    let body: serde_json::Value = response.json();
    body["folder"]["id"]
        .as_str()
        .expect("Expected folder id")
        .to_string()
}

/// List one level and return the `files` array.
pub async fn list(client: &TestServer, user: &str, parent_id: Option<&str>) -> Vec<serde_json::Value> {
    let url = match parent_id {
        Some(id) => format!("/api/files?parentId={}", id),
        None => "/api/files".to_string(),
    };
    let response = client.get(&url).add_header("Authorization", bearer(user)).await;
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let body: serde_json::Value = response.json();
    body["files"].as_array().cloned().unwrap_or_default()
}
