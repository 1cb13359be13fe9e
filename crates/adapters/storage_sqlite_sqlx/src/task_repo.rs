//! `SQLite` implementation of [`TaskRepository`].

use sqlx::SqlitePool;

use fieldops_app::ports::TaskRepository;
use fieldops_domain::error::FieldOpsError;
use fieldops_domain::task::Task;

use crate::codec::encode_ts;
use crate::error::StorageError;

/// `SQLite`-backed task repository.
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, FieldOpsError> {
        sqlx::query(
            "INSERT INTO tasks (id, title, description, assigned_to, job_id, user_id, automation_run_id, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.assigned_to)
        .bind(&task.job_id)
        .bind(&task.user_id)
        .bind(task.automation_run_id.to_string())
        .bind(task.status.as_str())
        .bind(encode_ts(task.created_at))
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(task)
    }
}
