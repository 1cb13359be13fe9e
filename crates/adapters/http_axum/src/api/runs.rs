//! JSON REST handlers for the run history.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use fieldops_app::dispatch::ActionDispatcher;
use fieldops_app::ports::{AutomationRepository, RunLedger};
use fieldops_domain::error::{FieldOpsError, ValidationError};
use fieldops_domain::id::RunId;
use fieldops_domain::run::Run;

use crate::api::automations::parse_automation_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the run list.
#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Run>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Run>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/automations/{id}/runs?limit=N` — newest-first run history.
pub async fn list<AR, RL, D>(
    State(state): State<AppState<AR, RL, D>>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    AR: AutomationRepository + Send + Sync + 'static,
    RL: RunLedger + Send + Sync + 'static,
    D: ActionDispatcher + Send + Sync + 'static,
{
    let automation_id = parse_automation_id(&id)?;
    let runs = state
        .run_service
        .list_runs(automation_id, query.limit)
        .await?;
    Ok(ListResponse::Ok(Json(runs)))
}

/// `GET /api/runs/{id}` — a single run.
pub async fn get<AR, RL, D>(
    State(state): State<AppState<AR, RL, D>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    AR: AutomationRepository + Send + Sync + 'static,
    RL: RunLedger + Send + Sync + 'static,
    D: ActionDispatcher + Send + Sync + 'static,
{
    let run_id = RunId::from_str(&id).map_err(|_| {
        ApiError::from(FieldOpsError::Validation(ValidationError::InvalidId(id)))
    })?;
    let run = state.run_service.get_run(run_id).await?;
    Ok(GetResponse::Ok(Json(run)))
}
