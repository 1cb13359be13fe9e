//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod automations;
#[allow(clippy::missing_errors_doc)]
pub mod execute;
#[allow(clippy::missing_errors_doc)]
pub mod runs;

use axum::Router;
use axum::routing::{get, post};

use fieldops_app::dispatch::ActionDispatcher;
use fieldops_app::ports::{AutomationRepository, RunLedger};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<AR, RL, D>() -> Router<AppState<AR, RL, D>>
where
    AR: AutomationRepository + Send + Sync + 'static,
    RL: RunLedger + Send + Sync + 'static,
    D: ActionDispatcher + Send + Sync + 'static,
{
    Router::new()
        // Execution
        .route("/execute-automation", post(execute::execute::<AR, RL, D>))
        // Automations
        .route(
            "/automations",
            get(automations::list::<AR, RL, D>).post(automations::create::<AR, RL, D>),
        )
        .route("/automations/{id}", get(automations::get::<AR, RL, D>))
        .route("/automations/{id}/runs", get(runs::list::<AR, RL, D>))
        // Runs
        .route("/runs/{id}", get(runs::get::<AR, RL, D>))
}
