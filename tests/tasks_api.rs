//! End-to-end tests for the task API.
//!
//! Each test builds the full router (middleware included) over its own
//! shared-cache in-memory SQLite database and drives it with
//! `tower::ServiceExt::oneshot`, asserting on the exact wire contract:
//! status codes, error messages, and field serialization.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use taskboard_server::config::Config;
use taskboard_server::db::sqlite::SqliteStore;
use taskboard_server::routes;
use taskboard_server::state::AppState;

/// Build the application over a private in-memory database.
///
/// `db_name` must be unique per test: shared-cache memory databases are
/// keyed by name within the process.
async fn test_app(db_name: &str) -> Router {
    let url = format!("sqlite:file:{db_name}?mode=memory&cache=shared");
    let store = SqliteStore::connect(&url).await.expect("open test database");
    let config = Config {
        bind_address: "127.0.0.1:0".to_owned(),
        database_url: url,
        log_level: "info".to_owned(),
        log_json: false,
        cors_allowed_origins: None,
        enable_swagger: false,
    };
    routes::build(Arc::new(AppState {
        config: Arc::new(config),
        store: Arc::new(store),
    }))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, json)
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let request = match body {
        Some(v) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn sample_task() -> Value {
    json!({
        "title": "Test Task",
        "description": "Testing POST endpoint",
        "status": "To Do",
        "dueDate": "2024-12-31T23:59:59.000Z"
    })
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, task) = send(app, Method::POST, "/api/tasks", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    task
}

// ── List ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_empty_array_initially() {
    let app = test_app("list_empty").await;
    let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_orders_by_creation_newest_first() {
    let app = test_app("list_order").await;
    let mut ids = Vec::new();
    for i in 1..=3 {
        let task = create(
            &app,
            json!({
                "title": format!("Task {i}"),
                "status": "To Do",
                "dueDate": "2025-01-01T12:00:00.000Z"
            }),
        )
        .await;
        ids.push(task["id"].as_i64().unwrap());
        // created_at must strictly increase between tasks.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);
}

// ── Create ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_full_entity() {
    let app = test_app("create_full").await;
    let task = create(&app, sample_task()).await;

    assert!(task["id"].is_i64());
    assert_eq!(task["title"], "Test Task");
    assert_eq!(task["description"], "Testing POST endpoint");
    assert_eq!(task["status"], "To Do");
    assert_eq!(task["dueDate"], "2024-12-31T23:59:59.000Z");
    assert!(task["createdAt"].is_string());
    assert!(task["updatedAt"].is_string());
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = test_app("create_roundtrip").await;
    let created = create(&app, sample_task()).await;
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, Method::GET, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], created["title"]);
    assert_eq!(fetched["description"], created["description"]);
    assert_eq!(fetched["status"], created["status"]);
    assert_eq!(fetched["dueDate"], created["dueDate"]);
}

#[tokio::test]
async fn create_assigns_unique_ids() {
    let app = test_app("create_unique").await;
    let mut seen = std::collections::HashSet::new();
    for _ in 0..5 {
        let task = create(&app, sample_task()).await;
        assert!(seen.insert(task["id"].as_i64().unwrap()));
    }
}

#[tokio::test]
async fn create_rejects_missing_required_fields() {
    let app = test_app("create_missing").await;
    let incomplete = json!({
        "description": "Missing title",
        "status": "To Do",
        "dueDate": "2024-12-31T23:59:59.000Z"
    });
    let (status, body) = send(&app, Method::POST, "/api/tasks", Some(incomplete)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required fields: title, status, and dueDate are required."
    );
}

#[tokio::test]
async fn create_treats_empty_strings_as_missing() {
    let app = test_app("create_empty_str").await;
    let blank_title = json!({
        "title": "",
        "status": "To Do",
        "dueDate": "2024-12-31T23:59:59.000Z"
    });
    let (status, body) = send(&app, Method::POST, "/api/tasks", Some(blank_title)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required fields: title, status, and dueDate are required."
    );
}

#[tokio::test]
async fn create_rejects_non_iso_due_date() {
    let app = test_app("create_bad_date").await;
    let mut body = sample_task();
    body["dueDate"] = json!("31st December 2024");
    let (status, body) = send(&app, Method::POST, "/api/tasks", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid date format for dueDate. Use ISO 8601 format (YYYY-MM-DDTHH:mm:ss.sssZ)."
    );
}

#[tokio::test]
async fn create_allows_omitted_description() {
    let app = test_app("create_no_desc").await;
    let task = create(
        &app,
        json!({
            "title": "No description",
            "status": "To Do",
            "dueDate": "2024-12-31T23:59:59.000Z"
        }),
    )
    .await;
    assert_eq!(task["description"], Value::Null);
}

#[tokio::test]
async fn create_accepts_any_non_empty_status() {
    // No enumerated status set: arbitrary strings pass validation.
    let app = test_app("create_any_status").await;
    let mut body = sample_task();
    body["status"] = json!("Blocked on coffee");
    let task = create(&app, body).await;
    assert_eq!(task["status"], "Blocked on coffee");
}

// ── Get by id ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_rejects_non_numeric_id() {
    let app = test_app("get_bad_id").await;
    let (status, body) = send(&app, Method::GET, "/api/tasks/not-a-number", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid task ID provided.");
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let app = test_app("get_404").await;
    let (status, body) = send(&app, Method::GET, "/api/tasks/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found.");
}

// ── Update status ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn patch_updates_status_and_refreshes_updated_at() {
    let app = test_app("patch_status").await;
    let created = create(&app, sample_task()).await;
    let id = created["id"].as_i64().unwrap();

    // Millisecond wire precision: make sure the clock has moved.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/api/tasks/{id}/status"),
        Some(json!({ "status": "Done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Done");
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
    // Everything else is untouched.
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_eq!(updated["title"], created["title"]);
    assert_eq!(updated["dueDate"], created["dueDate"]);
}

#[tokio::test]
async fn patch_unknown_id_is_404() {
    let app = test_app("patch_404").await;
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/tasks/9999/status",
        Some(json!({ "status": "Done" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found.");
}

#[tokio::test]
async fn patch_without_status_is_400() {
    let app = test_app("patch_missing").await;
    let created = create(&app, sample_task()).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/tasks/{id}/status"),
        Some(json!({ "title": "wrong field" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: status is required.");
}

#[tokio::test]
async fn patch_with_no_body_is_400() {
    let app = test_app("patch_no_body").await;
    let created = create(&app, sample_task()).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/tasks/{id}/status"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: status is required.");
}

#[tokio::test]
async fn patch_rejects_non_numeric_id() {
    let app = test_app("patch_bad_id").await;
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/tasks/abc/status",
        Some(json!({ "status": "Done" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid task ID provided.");
}

// ── Delete ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_returns_204_with_empty_body() {
    let app = test_app("delete_ok").await;
    let created = create(&app, sample_task()).await;
    let id = created["id"].as_i64().unwrap();

    let (status, bytes) = send_raw(&app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(bytes.is_empty());

    // The row is gone.
    let (status, _) = send(&app, Method::GET, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_twice_is_404_the_second_time() {
    let app = test_app("delete_twice").await;
    let created = create(&app, sample_task()).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send_raw(&app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found.");
}

#[tokio::test]
async fn delete_unknown_id_is_404() {
    let app = test_app("delete_404").await;
    let (status, body) = send(&app, Method::DELETE, "/api/tasks/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found.");
}

#[tokio::test]
async fn delete_rejects_non_numeric_id() {
    let app = test_app("delete_bad_id").await;
    let (status, body) = send(&app, Method::DELETE, "/api/tasks/nope", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid task ID provided.");
}

// ── Health ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_up() {
    let app = test_app("health").await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "UP" }));
}
