//! Task repository port — where `create_task` actions write.

use std::future::Future;
use std::sync::Arc;

use fieldops_domain::error::FieldOpsError;
use fieldops_domain::task::Task;

/// Persists [`Task`]s created by automations.
pub trait TaskRepository {
    /// Insert a new task.
    fn create(&self, task: Task) -> impl Future<Output = Result<Task, FieldOpsError>> + Send;
}

impl<T: TaskRepository + Send + Sync> TaskRepository for Arc<T> {
    fn create(&self, task: Task) -> impl Future<Output = Result<Task, FieldOpsError>> + Send {
        (**self).create(task)
    }
}
