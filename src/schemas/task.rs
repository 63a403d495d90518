//! Request and response bodies for the task endpoints.
//!
//! Inbound bodies are deliberately loose: every field is optional at the
//! serde level so that an absent field, an explicit `null`, and an empty
//! string all reach the validation layer instead of being rejected by the
//! deserializer with a framework-shaped error body.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::TaskRecord;

/// Body of `POST /api/tasks`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}

/// Body of `PATCH /api/tasks/{id}/status`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateTaskStatusRequest {
    pub status: Option<String>,
}

/// Wire representation of a task. Timestamps are ISO-8601 with millisecond
/// precision and a `Z` suffix, e.g. `"2024-12-31T23:59:59.000Z"`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl TaskRecord {
    pub fn to_response(&self) -> TaskResponse {
        TaskResponse {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
            due_date: self.due_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            created_at: self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: self.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
