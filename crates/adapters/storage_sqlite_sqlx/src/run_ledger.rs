//! `SQLite` implementation of [`RunLedger`].
//!
//! Closing is a conditional `UPDATE … WHERE status = 'running'`, so a run
//! can only ever leave the running state once, even under races.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use fieldops_app::ports::RunLedger;
use fieldops_domain::error::FieldOpsError;
use fieldops_domain::id::{AutomationId, RunId};
use fieldops_domain::run::{Run, RunOutcome, RunStatus};
use fieldops_domain::time;
use fieldops_domain::trigger_data::TriggerData;

use crate::codec::{decode_count, decode_err, decode_id, decode_msg, decode_ts, encode_ts};
use crate::error::StorageError;

const SELECT_RUN: &str = "SELECT id, automation_id, trigger_data, status, actions_executed, error_message, started_at, completed_at FROM automation_runs";

struct Wrapper(Run);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let automation_id: String = row.try_get("automation_id")?;
        let trigger_data: String = row.try_get("trigger_data")?;
        let status: String = row.try_get("status")?;
        let actions_executed: i64 = row.try_get("actions_executed")?;
        let error_message: Option<String> = row.try_get("error_message")?;
        let started_at: String = row.try_get("started_at")?;
        let completed_at: Option<String> = row.try_get("completed_at")?;

        Ok(Self(Run {
            id: decode_id(&id)?,
            automation_id: decode_id(&automation_id)?,
            trigger_data: serde_json::from_str::<TriggerData>(&trigger_data).map_err(decode_err)?,
            status: status.parse::<RunStatus>().map_err(decode_msg)?,
            actions_executed: decode_count(actions_executed)?,
            error_message,
            started_at: decode_ts(&started_at)?,
            completed_at: completed_at.as_deref().map(decode_ts).transpose()?,
        }))
    }
}

/// `SQLite`-backed run ledger.
pub struct SqliteRunLedger {
    pool: SqlitePool,
}

impl SqliteRunLedger {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RunLedger for SqliteRunLedger {
    async fn open(
        &self,
        automation_id: AutomationId,
        trigger_data: TriggerData,
    ) -> Result<Run, FieldOpsError> {
        let run = Run::start(automation_id, trigger_data, time::now());
        let payload = serde_json::to_string(&run.trigger_data).map_err(StorageError::from)?;

        sqlx::query(
            "INSERT INTO automation_runs (id, automation_id, trigger_data, status, actions_executed, started_at) VALUES (?, ?, ?, ?, 0, ?)",
        )
        .bind(run.id.to_string())
        .bind(automation_id.to_string())
        .bind(payload)
        .bind(run.status.as_str())
        .bind(encode_ts(run.started_at))
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(run)
    }

    async fn close(&self, run_id: RunId, outcome: RunOutcome) -> Result<bool, FieldOpsError> {
        let result = sqlx::query(
            "UPDATE automation_runs SET status = ?, actions_executed = ?, error_message = ?, completed_at = ? WHERE id = ? AND status = ?",
        )
        .bind(outcome.status().as_str())
        .bind(i64::from(outcome.actions_executed()))
        .bind(outcome.error_message())
        .bind(encode_ts(time::now()))
        .bind(run_id.to_string())
        .bind(RunStatus::Running.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn get(&self, run_id: RunId) -> Result<Option<Run>, FieldOpsError> {
        let row: Option<Wrapper> = sqlx::query_as(&format!("{SELECT_RUN} WHERE id = ?"))
            .bind(run_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|w| w.0))
    }

    async fn list_for_automation(
        &self,
        automation_id: AutomationId,
        limit: usize,
    ) -> Result<Vec<Run>, FieldOpsError> {
        let rows: Vec<Wrapper> = sqlx::query_as(&format!(
            "{SELECT_RUN} WHERE automation_id = ? ORDER BY started_at DESC, rowid DESC LIMIT ?"
        ))
        .bind(automation_id.to_string())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn fail_interrupted(&self, error_message: &str) -> Result<u64, FieldOpsError> {
        let result = sqlx::query(
            "UPDATE automation_runs SET status = ?, error_message = ?, completed_at = ? WHERE status = ?",
        )
        .bind(RunStatus::Failed.as_str())
        .bind(error_message)
        .bind(encode_ts(time::now()))
        .bind(RunStatus::Running.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        let closed = result.rows_affected();
        if closed > 0 {
            tracing::warn!(closed, "failed runs interrupted by a restart");
        }
        Ok(closed)
    }
}
