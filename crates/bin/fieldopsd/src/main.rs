//! # fieldopsd — field operations automation daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Fail runs left `running` by a previous process
//! - Construct repositories and outbound provider clients (adapters)
//! - Construct the dispatcher, orchestrator and services
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use fieldops_adapter_http_axum::state::AppState;
use fieldops_adapter_storage_sqlite_sqlx::{
    Config as StorageConfig, SqliteAutomationRepository, SqliteRunLedger, SqliteTaskRepository,
};
use fieldops_adapter_twilio_reqwest::{TwilioClient, TwilioConfig};
use fieldops_adapter_webhook_reqwest::ReqwestWebhookClient;
use fieldops_app::config::EngineConfig;
use fieldops_app::dispatch::Dispatcher;
use fieldops_app::email_log::LoggingEmailTransport;
use fieldops_app::engine::{ExecutionOrchestrator, INTERRUPTED_MESSAGE};
use fieldops_app::ports::RunLedger;
use fieldops_app::services::automation_service::AutomationService;
use fieldops_app::services::run_service::RunService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to open database")?;
    let pool = db.pool().clone();

    // Repositories
    let automation_repo = Arc::new(SqliteAutomationRepository::new(pool.clone()));
    let run_ledger = Arc::new(SqliteRunLedger::new(pool.clone()));
    let task_repo = SqliteTaskRepository::new(pool);

    let swept = run_ledger
        .fail_interrupted(INTERRUPTED_MESSAGE)
        .await
        .context("failed to sweep interrupted runs")?;
    if swept > 0 {
        tracing::warn!(count = swept, "failed runs interrupted by previous shutdown");
    }

    // Outbound providers
    let telephony = &config.telephony;
    if telephony.account_sid.is_empty() || telephony.auth_token.is_empty() {
        tracing::warn!("telephony credentials not configured, sms and calls will be rejected");
    }
    let twilio = TwilioClient::new(
        TwilioConfig::new(&telephony.account_sid, &telephony.auth_token)
            .with_base_url(&telephony.base_url),
    )
    .context("failed to build telephony client")?;
    let webhook = ReqwestWebhookClient::new(config.webhook_timeout())
        .context("failed to build webhook client")?;

    // Engine
    let dispatcher = Dispatcher::new(
        EngineConfig::new(&telephony.from_number, &telephony.announcement_url),
        twilio.clone(),
        twilio,
        LoggingEmailTransport,
        webhook,
        task_repo,
    );
    let orchestrator =
        ExecutionOrchestrator::new(Arc::clone(&automation_repo), Arc::clone(&run_ledger), dispatcher);

    // HTTP
    let state = AppState::new(
        orchestrator,
        AutomationService::new(automation_repo),
        RunService::new(run_ledger),
    );
    let app = fieldops_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "fieldopsd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("fieldopsd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
