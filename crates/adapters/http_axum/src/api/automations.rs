//! JSON REST handlers for authoring and inspecting automations.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use fieldops_app::dispatch::ActionDispatcher;
use fieldops_app::ports::{AutomationRepository, RunLedger};
use fieldops_domain::automation::{Action, ActionType, Automation, AutomationStatus};
use fieldops_domain::error::{FieldOpsError, ValidationError};
use fieldops_domain::id::AutomationId;

use crate::error::ApiError;
use crate::state::AppState;

/// One step in a create request.
#[derive(Deserialize)]
pub struct ActionRequest {
    pub sequence_order: i32,
    pub action_type: String,
    #[serde(default = "empty_object")]
    pub action_config: serde_json::Value,
    #[serde(default)]
    pub delay_minutes: u32,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Request body for creating an automation.
#[derive(Deserialize)]
pub struct CreateAutomationRequest {
    pub name: String,
    pub status: Option<AutomationStatus>,
    #[serde(default)]
    pub actions: Vec<ActionRequest>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Automation>>),
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
    Ok(Json<Automation>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Automation>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

pub(crate) fn parse_automation_id(raw: &str) -> Result<AutomationId, ApiError> {
    AutomationId::from_str(raw).map_err(|_| {
        ApiError::from(FieldOpsError::Validation(ValidationError::InvalidId(
            raw.to_string(),
        )))
    })
}

/// `GET /api/automations` — list all automations.
pub async fn list<AR, RL, D>(
    State(state): State<AppState<AR, RL, D>>,
) -> Result<ListResponse, ApiError>
where
    AR: AutomationRepository + Send + Sync + 'static,
    RL: RunLedger + Send + Sync + 'static,
    D: ActionDispatcher + Send + Sync + 'static,
{
    let automations = state.automation_service.list_automations().await?;
    Ok(ListResponse::Ok(Json(automations)))
}

/// `GET /api/automations/{id}` — get automation by ID.
pub async fn get<AR, RL, D>(
    State(state): State<AppState<AR, RL, D>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    AR: AutomationRepository + Send + Sync + 'static,
    RL: RunLedger + Send + Sync + 'static,
    D: ActionDispatcher + Send + Sync + 'static,
{
    let automation_id = parse_automation_id(&id)?;
    let automation = state
        .automation_service
        .get_automation(automation_id)
        .await?;
    Ok(GetResponse::Ok(Json(automation)))
}

/// `POST /api/automations` — create a new automation.
pub async fn create<AR, RL, D>(
    State(state): State<AppState<AR, RL, D>>,
    Json(req): Json<CreateAutomationRequest>,
) -> Result<CreateResponse, ApiError>
where
    AR: AutomationRepository + Send + Sync + 'static,
    RL: RunLedger + Send + Sync + 'static,
    D: ActionDispatcher + Send + Sync + 'static,
{
    let mut builder = Automation::builder().name(req.name);

    if let Some(status) = req.status {
        builder = builder.status(status);
    }

    for a in req.actions {
        let action_type = ActionType::from_str(&a.action_type).map_err(FieldOpsError::from)?;
        let action = Action::new(
            AutomationId::default(),
            a.sequence_order,
            action_type,
            a.action_config,
        )
        .with_delay_minutes(a.delay_minutes);
        builder = builder.action(action);
    }

    let automation = builder.build()?;
    let created = state
        .automation_service
        .create_automation(automation)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}
