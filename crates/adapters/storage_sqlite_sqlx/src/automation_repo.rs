//! `SQLite` implementation of [`AutomationRepository`].
//!
//! Automations and their actions live in two tables. Actions are always
//! read back ordered by `sequence_order`, ties broken by insertion order
//! (`rowid`).

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use fieldops_app::ports::AutomationRepository;
use fieldops_domain::automation::{Action, Automation, AutomationStatus};
use fieldops_domain::error::{FieldOpsError, NotFoundError};
use fieldops_domain::id::AutomationId;
use fieldops_domain::time::Timestamp;

use crate::codec::{decode_count, decode_err, decode_id, decode_msg, decode_ts, encode_ts};
use crate::error::StorageError;

const SELECT_AUTOMATION: &str =
    "SELECT id, name, status, run_count, success_count, last_run_at FROM automations";

const SELECT_ACTION: &str = "SELECT id, automation_id, sequence_order, action_type, action_config, delay_minutes FROM automation_actions";

struct Wrapper(Automation);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let status: String = row.try_get("status")?;
        let run_count: i64 = row.try_get("run_count")?;
        let success_count: i64 = row.try_get("success_count")?;
        let last_run_at: Option<String> = row.try_get("last_run_at")?;

        Ok(Self(Automation {
            id: decode_id(&id)?,
            name,
            status: status.parse::<AutomationStatus>().map_err(decode_msg)?,
            actions: Vec::new(),
            run_count: decode_count(run_count)?,
            success_count: decode_count(success_count)?,
            last_run_at: last_run_at.as_deref().map(decode_ts).transpose()?,
        }))
    }
}

struct ActionRow(Action);

impl<'r> FromRow<'r, SqliteRow> for ActionRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let automation_id: String = row.try_get("automation_id")?;
        let sequence_order: i32 = row.try_get("sequence_order")?;
        let action_type: String = row.try_get("action_type")?;
        let action_config: String = row.try_get("action_config")?;
        let delay_minutes: i64 = row.try_get("delay_minutes")?;

        Ok(Self(Action {
            id: decode_id(&id)?,
            automation_id: decode_id(&automation_id)?,
            sequence_order,
            action_type,
            action_config: serde_json::from_str(&action_config).map_err(decode_err)?,
            delay_minutes: decode_count(delay_minutes)?,
        }))
    }
}

/// `SQLite`-backed automation repository.
pub struct SqliteAutomationRepository {
    pool: SqlitePool,
}

impl SqliteAutomationRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn actions_of(&self, id: AutomationId) -> Result<Vec<Action>, StorageError> {
        let rows: Vec<ActionRow> = sqlx::query_as(&format!(
            "{SELECT_ACTION} WHERE automation_id = ? ORDER BY sequence_order, rowid"
        ))
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn with_actions(&self, row: Option<Wrapper>) -> Result<Option<Automation>, StorageError> {
        let Some(Wrapper(mut automation)) = row else {
            return Ok(None);
        };
        automation.actions = self.actions_of(automation.id).await?;
        Ok(Some(automation))
    }
}

impl AutomationRepository for SqliteAutomationRepository {
    async fn create(&self, automation: Automation) -> Result<Automation, FieldOpsError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        sqlx::query(
            "INSERT INTO automations (id, name, status, run_count, success_count, last_run_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(automation.id.to_string())
        .bind(&automation.name)
        .bind(automation.status.as_str())
        .bind(i64::try_from(automation.run_count).unwrap_or(i64::MAX))
        .bind(i64::try_from(automation.success_count).unwrap_or(i64::MAX))
        .bind(automation.last_run_at.map(encode_ts))
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from)?;

        for action in &automation.actions {
            let config = serde_json::to_string(&action.action_config).map_err(StorageError::from)?;
            sqlx::query(
                "INSERT INTO automation_actions (id, automation_id, sequence_order, action_type, action_config, delay_minutes) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(action.id.to_string())
            .bind(automation.id.to_string())
            .bind(action.sequence_order)
            .bind(&action.action_type)
            .bind(config)
            .bind(i64::from(action.delay_minutes))
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(automation)
    }

    async fn get_by_id(&self, id: AutomationId) -> Result<Option<Automation>, FieldOpsError> {
        let row: Option<Wrapper> = sqlx::query_as(&format!("{SELECT_AUTOMATION} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(self.with_actions(row).await?)
    }

    async fn get_all(&self) -> Result<Vec<Automation>, FieldOpsError> {
        let rows: Vec<Wrapper> = sqlx::query_as(&format!("{SELECT_AUTOMATION} ORDER BY name, rowid"))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let actions: Vec<ActionRow> = sqlx::query_as(&format!(
            "{SELECT_ACTION} ORDER BY automation_id, sequence_order, rowid"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;

        let mut by_automation: HashMap<AutomationId, Vec<Action>> = HashMap::new();
        for ActionRow(action) in actions {
            by_automation
                .entry(action.automation_id)
                .or_default()
                .push(action);
        }

        Ok(rows
            .into_iter()
            .map(|Wrapper(mut automation)| {
                automation.actions = by_automation.remove(&automation.id).unwrap_or_default();
                automation
            })
            .collect())
    }

    async fn get_active(&self, id: AutomationId) -> Result<Option<Automation>, FieldOpsError> {
        let row: Option<Wrapper> =
            sqlx::query_as(&format!("{SELECT_AUTOMATION} WHERE id = ? AND status = ?"))
                .bind(id.to_string())
                .bind(AutomationStatus::Active.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(self.with_actions(row).await?)
    }

    async fn record_run(
        &self,
        id: AutomationId,
        succeeded: bool,
        at: Timestamp,
    ) -> Result<(), FieldOpsError> {
        let result = sqlx::query(
            "UPDATE automations SET run_count = run_count + 1, success_count = success_count + ?, last_run_at = ? WHERE id = ?",
        )
        .bind(i64::from(succeeded))
        .bind(encode_ts(at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError {
                entity: "Automation",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
