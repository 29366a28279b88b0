mod helpers;

use helpers::{bearer, create_folder, list, setup_test_app};
use serde_json::Value;

#[tokio::test]
async fn test_unauthenticated_requests_get_an_empty_files_array() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/api/files").await;
    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["files"], serde_json::json!([]));
    assert_eq!(body["error"], "Unauthorized");

    let response = client
        .get("/api/files")
        .add_header("Authorization", "Bearer not-a-token")
        .await;
    assert_eq!(response.status_code(), 401);

    let response = client
        .post("/api/folders/create")
        .json(&serde_json::json!({ "name": "x" }))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/api/files")
        .add_header("Cookie", format!("__session={}", helpers::token_for("alice")))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_listing_returns_exactly_one_level() {
    let app = setup_test_app().await;
    let client = app.client();

    let docs = create_folder(client, "alice", "docs", None).await;
    let inner = create_folder(client, "alice", "inner", Some(&docs)).await;
    create_folder(client, "alice", "deeper", Some(&inner)).await;

    let root = list(client, "alice", None).await;
    assert_eq!(root.len(), 1);
    assert_eq!(root[0]["id"], docs.as_str());
    assert_eq!(root[0]["parentId"], Value::Null);
    assert_eq!(root[0]["isFolder"], true);
    assert_eq!(root[0]["type"], "folder");

    let level = list(client, "alice", Some(&docs)).await;
    assert_eq!(level.len(), 1);
    assert_eq!(level[0]["id"], inner.as_str());
    assert_eq!(level[0]["parentId"], docs.as_str());

    // JavaScript clients send the literal string when no folder is open
    let response = client
        .get("/api/files?parentId=null")
        .add_header("Authorization", bearer("alice"))
        .await;
    let body: Value = response.json();
    assert_eq!(body["files"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_parent_id_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/api/files?parentId=../../etc")
        .add_header("Authorization", bearer("alice"))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_create_folder_validation() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post("/api/folders/create")
        .add_header("Authorization", bearer("alice"))
        .json(&serde_json::json!({ "name": "   " }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Folder name is required");

    let response = client
        .post("/api/folders/create")
        .add_header("Authorization", bearer("alice"))
        .json(&serde_json::json!({ "name": "a/b" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = client
        .post("/api/folders/create")
        .add_header("Authorization", bearer("alice"))
        .json(&serde_json::json!({
            "name": "orphan",
            "parentId": uuid::Uuid::new_v4().to_string(),
        }))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_star_toggle_twice_restores_state() {
    let app = setup_test_app().await;
    let client = app.client();
    let id = create_folder(client, "alice", "photos", None).await;

    let first = client
        .patch(&format!("/api/files/{}/star", id))
        .add_header("Authorization", bearer("alice"))
        .await;
    assert_eq!(first.status_code(), 200);
    let body: Value = first.json();
    assert_eq!(body["file"]["isStarred"], true);

    let second = client
        .patch(&format!("/api/files/{}/star", id))
        .add_header("Authorization", bearer("alice"))
        .await;
    let body: Value = second.json();
    assert_eq!(body["file"]["isStarred"], false);
}

#[tokio::test]
async fn test_trash_toggle_and_views() {
    let app = setup_test_app().await;
    let client = app.client();
    let keep = create_folder(client, "alice", "keep", None).await;
    let junk = create_folder(client, "alice", "junk", None).await;

    client
        .patch(&format!("/api/files/{}/star", keep))
        .add_header("Authorization", bearer("alice"))
        .await;
    client
        .patch(&format!("/api/files/{}/star", junk))
        .add_header("Authorization", bearer("alice"))
        .await;
    let trashed = client
        .patch(&format!("/api/files/{}/trash", junk))
        .add_header("Authorization", bearer("alice"))
        .await;
    let body: Value = trashed.json();
    assert_eq!(body["file"]["isTrash"], true);
    assert_eq!(body["message"], "Moved to trash");

    let response = client
        .get("/api/files?view=starred")
        .add_header("Authorization", bearer("alice"))
        .await;
    let body: Value = response.json();
    let starred = body["files"].as_array().unwrap();
    assert_eq!(starred.len(), 1);
    assert_eq!(starred[0]["id"], keep.as_str());
    assert_eq!(body["counts"]["all"], 1);
    assert_eq!(body["counts"]["starred"], 1);
    assert_eq!(body["counts"]["trash"], 1);

    let restored = client
        .patch(&format!("/api/files/{}/trash", junk))
        .add_header("Authorization", bearer("alice"))
        .await;
    let body: Value = restored.json();
    assert_eq!(body["file"]["isTrash"], false);
    assert_eq!(body["message"], "Restored from trash");
}

#[tokio::test]
async fn test_entry_path_returns_breadcrumbs() {
    let app = setup_test_app().await;
    let client = app.client();
    let a = create_folder(client, "alice", "a", None).await;
    let b = create_folder(client, "alice", "b", Some(&a)).await;

    let response = client
        .get(&format!("/api/files/{}/path", b))
        .add_header("Authorization", bearer("alice"))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let path = body["path"].as_array().unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(path[0]["name"], "a");
    assert_eq!(path[1]["id"], b.as_str());
    assert_eq!(body["currentFolder"], b.as_str());
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .patch(&format!("/api/files/{}/star", uuid::Uuid::new_v4()))
        .add_header("Authorization", bearer("alice"))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = client
        .patch("/api/files/not-a-uuid/trash")
        .add_header("Authorization", bearer("alice"))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_imagekit_auth_requires_a_session() {
    let app = setup_test_app().await;
    let client = app.client();

    assert_eq!(client.get("/api/imagekit-auth").await.status_code(), 401);

    let response = client
        .get("/api/imagekit-auth")
        .add_header("Authorization", bearer("alice"))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["token"], "test-token");
    assert_eq!(body["expire"], 1_700_000_000);
    assert_eq!(body["signature"], "test-signature");
    assert_eq!(body["publicKey"], "public_test");
    assert_eq!(body["urlEndpoint"], "https://ik.test/demo");
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/healthz").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");

    let response = client.get("/readyz").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["checks"]["database"]["ok"], true);
    assert_eq!(body["checks"]["schema"]["ok"], true);
}
