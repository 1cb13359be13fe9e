//! `POST /api/execute-automation` — the execution entry point.
//!
//! Unlike the rest of the API this endpoint keeps the wire contract of the
//! calling services: camelCase fields, a plain-text 404 and a 500 with
//! `{ "error": … }` for anything the engine could not even start.

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use fieldops_app::dispatch::ActionDispatcher;
use fieldops_app::engine::ExecutionResult;
use fieldops_app::ports::{AutomationRepository, RunLedger};
use fieldops_domain::error::FieldOpsError;
use fieldops_domain::id::AutomationId;
use fieldops_domain::trigger_data::TriggerData;

use crate::error::ErrorBody;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub automation_id: String,
    #[serde(default)]
    pub trigger_data: TriggerData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub success: bool,
    pub run_id: String,
    pub actions_executed: u32,
    pub error: Option<String>,
}

impl From<ExecutionResult> for ExecuteResponse {
    fn from(result: ExecutionResult) -> Self {
        Self {
            success: result.success,
            run_id: result.run_id.to_string(),
            actions_executed: result.actions_executed,
            error: result.error,
        }
    }
}

/// Possible responses from the execute endpoint.
pub enum ExecuteOutcome {
    /// The run happened, whether or not every action succeeded.
    Ran(Json<ExecuteResponse>),
    /// Unknown or inactive automation; no run was recorded.
    NotFound(String),
    /// Malformed request or an engine failure outside of any action.
    Error(String),
}

impl IntoResponse for ExecuteOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Ran(json) => json.into_response(),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            Self::Error(message) => ErrorBody::response(StatusCode::INTERNAL_SERVER_ERROR, message),
        }
    }
}

/// `POST /api/execute-automation` — run one automation for one trigger event.
pub async fn execute<AR, RL, D>(
    State(state): State<AppState<AR, RL, D>>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> ExecuteOutcome
where
    AR: AutomationRepository + Send + Sync + 'static,
    RL: RunLedger + Send + Sync + 'static,
    D: ActionDispatcher + Send + Sync + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "malformed execute request");
            return ExecuteOutcome::Error(rejection.body_text());
        }
    };

    let Ok(automation_id) = AutomationId::from_str(&request.automation_id) else {
        return ExecuteOutcome::NotFound(format!(
            "Automation {} not found",
            request.automation_id
        ));
    };

    // The run is detached from the request so a client hanging up mid-delay
    // cannot leave it stuck in `running`.
    let orchestrator = Arc::clone(&state.orchestrator);
    let trigger_data = request.trigger_data;
    let run = tokio::spawn(async move { orchestrator.execute(automation_id, trigger_data).await });

    match run.await {
        Ok(Ok(result)) => ExecuteOutcome::Ran(Json(result.into())),
        Ok(Err(FieldOpsError::NotFound(err))) => ExecuteOutcome::NotFound(err.to_string()),
        Ok(Err(err)) => {
            tracing::error!(%automation_id, error = %err, "execution failed before completion");
            ExecuteOutcome::Error(err.to_string())
        }
        Err(err) => {
            tracing::error!(%automation_id, error = %err, "execution task aborted");
            ExecuteOutcome::Error(err.to_string())
        }
    }
}
