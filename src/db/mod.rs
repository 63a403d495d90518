//! Persistence gateway for the `tasks` table.
//!
//! [`TaskStore`] defines the interface the handlers depend on. The default
//! implementation is [`sqlite::SqliteStore`]. To swap to another database
//! (Postgres, MySQL, …), implement [`TaskStore`] for your new type and
//! change the concrete type in [`crate::state::AppState`].
//!
//! All trait methods use `impl Future` in their signatures (stable since Rust
//! 1.75) so no extra `async-trait` crate is required.

pub mod sqlite;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A single row in the `tasks` table.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    /// Storage-assigned, immutable after creation.
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: DateTime<Utc>,
    /// Set once at insert, never mutated.
    pub created_at: DateTime<Utc>,
    /// Set at insert, refreshed on every successful status update.
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a task. `created_at`/`updated_at`/`id` are
/// assigned by the store, not the caller.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: DateTime<Utc>,
}

/// Gateway failures, with "row does not exist" kept distinguishable from
/// every other storage error so handlers can map it to 404.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced task id has no row.
    #[error("task not found")]
    NotFound,

    /// Any other storage failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Trait for persisting tasks.
///
/// Implement this trait to swap SQLite for another database backend without
/// touching any handler code.
pub trait TaskStore: Send + Sync + 'static {
    /// Insert a new task and return the full stored row, including the
    /// generated id and timestamps.
    fn insert_task(
        &self,
        task: NewTask,
    ) -> impl std::future::Future<Output = Result<TaskRecord, StoreError>> + Send;

    /// All tasks, most recently created first.
    fn list_tasks(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<TaskRecord>, StoreError>> + Send;

    /// Retrieve a single task by id; `None` when absent.
    fn get_task(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<TaskRecord>, StoreError>> + Send;

    /// Set `status` and refresh `updated_at`, returning the updated row.
    /// Fails with [`StoreError::NotFound`] when the id has no row.
    fn update_task_status(
        &self,
        id: i64,
        status: &str,
    ) -> impl std::future::Future<Output = Result<TaskRecord, StoreError>> + Send;

    /// Hard-delete a task. Fails with [`StoreError::NotFound`] when the id
    /// has no row.
    fn delete_task(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
