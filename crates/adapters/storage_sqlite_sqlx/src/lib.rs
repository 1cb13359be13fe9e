//! # fieldops-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the storage port traits defined in `fieldops-app::ports`
//!   (`AutomationRepository`, `RunLedger`, `TaskRepository`)
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `fieldops-app` (for port traits) and `fieldops-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod automation_repo;
mod codec;
mod error;
mod pool;
mod run_ledger;
mod task_repo;

pub use automation_repo::SqliteAutomationRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use run_ledger::SqliteRunLedger;
pub use task_repo::SqliteTaskRepository;
