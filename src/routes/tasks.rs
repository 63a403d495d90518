//! Task CRUD endpoints.
//!
//! Each handler follows the same shape: validate the raw input, delegate to
//! the [`TaskStore`] gateway, and map the outcome to a status code and JSON
//! body. Validation always runs before any storage call, and every error
//! message below is part of the wire contract.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::info;
use utoipa::OpenApi;

use crate::db::{NewTask, TaskStore};
use crate::error::ServerError;
use crate::schemas::task::{CreateTaskRequest, TaskResponse, UpdateTaskStatusRequest};
use crate::state::AppState;

const MSG_MISSING_FIELDS: &str =
    "Missing required fields: title, status, and dueDate are required.";
const MSG_INVALID_DATE: &str =
    "Invalid date format for dueDate. Use ISO 8601 format (YYYY-MM-DDTHH:mm:ss.sssZ).";
const MSG_INVALID_ID: &str = "Invalid task ID provided.";
const MSG_MISSING_STATUS: &str = "Missing required field: status is required.";

#[derive(OpenApi)]
#[openapi(
    paths(create_task, list_tasks, get_task, update_task_status, delete_task),
    components(schemas(CreateTaskRequest, UpdateTaskStatusRequest, TaskResponse))
)]
pub struct TasksApi;

/// Register task routes (nested under `/api`).
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", get(get_task).delete(delete_task))
        .route("/tasks/{id}/status", patch(update_task_status))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Missing fields or invalid dueDate"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateTaskRequest>>,
) -> Result<(StatusCode, Json<TaskResponse>), ServerError> {
    // A missing or non-JSON body behaves like an empty object, so it takes
    // the missing-fields path below instead of a framework rejection.
    let body = body.map(|Json(b)| b).unwrap_or_default();

    // Absent, null, and empty-string fields all count as missing.
    let (title, status, due_date_raw) = match (
        non_empty(&body.title),
        non_empty(&body.status),
        non_empty(&body.due_date),
    ) {
        (Some(t), Some(s), Some(d)) => (t, s, d),
        _ => return Err(ServerError::BadRequest(MSG_MISSING_FIELDS.to_owned())),
    };

    let due_date = parse_due_date(due_date_raw)
        .ok_or_else(|| ServerError::BadRequest(MSG_INVALID_DATE.to_owned()))?;

    let record = state
        .store
        .insert_task(NewTask {
            title: title.to_owned(),
            description: body.description.clone(),
            status: status.to_owned(),
            due_date,
        })
        .await
        .map_err(|e| ServerError::from_store(e, "Failed to create task."))?;

    info!(task_id = record.id, "task created");
    Ok((StatusCode::CREATED, Json(record.to_response())))
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    responses(
        (status = 200, description = "All tasks, most recently created first", body = [TaskResponse]),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskResponse>>, ServerError> {
    let records = state
        .store
        .list_tasks()
        .await
        .map_err(|e| ServerError::from_store(e, "Failed to retrieve tasks."))?;
    Ok(Json(records.iter().map(|r| r.to_response()).collect()))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task retrieved", body = TaskResponse),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ServerError> {
    let id = parse_task_id(&id)?;
    let record = state
        .store
        .get_task(id)
        .await
        .map_err(|e| ServerError::from_store(e, "Failed to retrieve task."))?
        .ok_or(ServerError::NotFound)?;
    Ok(Json(record.to_response()))
}

#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/status",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task id")),
    request_body = UpdateTaskStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = TaskResponse),
        (status = 400, description = "Invalid id or missing status"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn update_task_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<UpdateTaskStatusRequest>>,
) -> Result<Json<TaskResponse>, ServerError> {
    let id = parse_task_id(&id)?;
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let status = non_empty(&body.status)
        .ok_or_else(|| ServerError::BadRequest(MSG_MISSING_STATUS.to_owned()))?;

    let record = state
        .store
        .update_task_status(id, status)
        .await
        .map_err(|e| ServerError::from_store(e, "Failed to update task status."))?;

    info!(task_id = id, status = %record.status, "task status updated");
    Ok(Json(record.to_response()))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_task_id(&id)?;
    state
        .store
        .delete_task(id)
        .await
        .map_err(|e| ServerError::from_store(e, "Failed to delete task."))?;

    info!(task_id = id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ── validation helpers ───────────────────────────────────────────────────────

/// A field counts as present only when it is a non-empty string.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// The path segment must be a whole base-10 integer; anything else (including
/// trailing junk like `"12abc"`) is rejected.
fn parse_task_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse::<i64>()
        .map_err(|_| ServerError::BadRequest(MSG_INVALID_ID.to_owned()))
}

/// Accept the ISO-8601 shapes: RFC 3339 with offset, naive date-time, and
/// bare date (midnight UTC).
fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn task_id_accepts_integers() {
        assert_eq!(parse_task_id("42").unwrap(), 42);
        assert_eq!(parse_task_id("-1").unwrap(), -1);
    }

    #[test]
    fn task_id_rejects_non_integers() {
        for raw in ["not-a-number", "12abc", "1.5", "", " 3"] {
            assert!(parse_task_id(raw).is_err(), "expected rejection: {raw:?}");
        }
    }

    #[test]
    fn due_date_accepts_iso_shapes() {
        assert!(parse_due_date("2024-12-31T23:59:59.000Z").is_some());
        assert!(parse_due_date("2024-12-31T23:59:59+02:00").is_some());
        assert!(parse_due_date("2024-12-31T23:59:59").is_some());
        assert!(parse_due_date("2024-12-31").is_some());
    }

    #[test]
    fn due_date_rejects_prose_dates() {
        assert!(parse_due_date("31st December 2024").is_none());
        assert!(parse_due_date("tomorrow").is_none());
        assert!(parse_due_date("").is_none());
    }

    #[test]
    fn empty_strings_count_as_missing() {
        assert!(non_empty(&None).is_none());
        assert!(non_empty(&Some(String::new())).is_none());
        assert_eq!(non_empty(&Some("To Do".into())), Some("To Do"));
    }
}
