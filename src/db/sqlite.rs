//! SQLite implementation of [`TaskStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature. Migrations are run automatically
//! on startup via [`SqliteStore::connect`].
//!
//! # Migrations path
//!
//! `sqlx::migrate!("./migrations")` resolves the path **at compile time**
//! relative to `CARGO_MANIFEST_DIR` (the crate root), so the directory is
//! embedded into the binary. The database file location is determined at
//! runtime by the `TASKBOARD_DATABASE_URL` environment variable and is
//! **not** related to the current working directory at runtime.
//!
//! # Queries
//!
//! The `sqlx::query` (runtime-verified) form is used deliberately so that no
//! `DATABASE_URL` environment variable is needed at compile time.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tracing::warn;

use super::{NewTask, StoreError, TaskRecord, TaskStore};

/// Raw row shape shared by every SELECT in this module.
type TaskRow = (i64, String, Option<String>, String, String, String, String);

/// SQLite-backed task store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending
    /// migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g.
    /// `"sqlite://taskboard.db"` or `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

impl TaskStore for SqliteStore {
    async fn insert_task(&self, task: NewTask) -> Result<TaskRecord, StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, status, due_date, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(task.due_date.to_rfc3339())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(TaskRecord {
            id: result.last_insert_rowid(),
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_tasks(&self) -> Result<Vec<TaskRecord>, StoreError> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, title, description, status, due_date, created_at, updated_at \
             FROM tasks ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn get_task(&self, id: i64) -> Result<Option<TaskRecord>, StoreError> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, title, description, status, due_date, created_at, updated_at \
             FROM tasks WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(from_row))
    }

    async fn update_task_status(&self, id: i64, status: &str) -> Result<TaskRecord, StoreError> {
        let updated_at = Utc::now();
        let result = sqlx::query("UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status)
            .bind(updated_at.to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        // Single-row UPDATE followed by a read of the same id; the row was
        // just written, so absence here means it was deleted concurrently.
        self.get_task(id).await?.ok_or(StoreError::NotFound)
    }

    async fn delete_task(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn from_row(
    (id, title, description, status, due_date, created_at, updated_at): TaskRow,
) -> TaskRecord {
    TaskRecord {
        id,
        title,
        description,
        status,
        due_date: parse_stored_ts(&due_date, "due_date"),
        created_at: parse_stored_ts(&created_at, "created_at"),
        updated_at: parse_stored_ts(&updated_at, "updated_at"),
    }
}

/// Stored timestamps are always written by this module as RFC 3339, so a
/// parse failure means outside interference with the database file.
fn parse_stored_ts(raw: &str, column: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>().unwrap_or_else(|e| {
        warn!(raw = %raw, column = %column, error = %e, "failed to parse stored timestamp; using now");
        Utc::now()
    })
}
