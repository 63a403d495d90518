//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::db::sqlite::SqliteStore;

/// State shared across all HTTP handlers.
///
/// Constructed once in `main` after the database is open; handlers hold it
/// behind an `Arc` and never mutate it.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Task persistence gateway.
    pub store: Arc<SqliteStore>,
}
