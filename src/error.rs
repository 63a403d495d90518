//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! **Security note:** Internal errors are logged with full detail but only
//! a generic, operation-specific message is returned to the caller so that
//! file paths, SQL, or other implementation details never leak to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;

/// All errors that can occur in the request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid or malformed request.
    /// The message is part of the wire contract and is returned verbatim.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The caller referenced a task that does not exist.
    #[error("task not found")]
    NotFound,

    /// An unexpected storage or runtime failure. `client_message` is the
    /// generic text shown to the caller; `source` carries the real cause
    /// for the server logs.
    #[error("{client_message}")]
    Internal {
        client_message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ServerError {
    /// Translate a gateway outcome: `NotFound` keeps its identity, anything
    /// else becomes a 500 with the given client-facing message.
    pub fn from_store(e: StoreError, client_message: &'static str) -> Self {
        match e {
            StoreError::NotFound => ServerError::NotFound,
            StoreError::Database(source) => ServerError::Internal {
                client_message,
                source: source.into(),
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match self {
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ServerError::NotFound => {
                (StatusCode::NOT_FOUND, "Task not found.".to_owned())
            }
            ServerError::Internal {
                client_message,
                source,
            } => {
                error!(error = ?source, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, client_message.to_owned())
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}
