//! # fieldops-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AutomationRepository` — load active automations, record run counters
//!   - `RunLedger` — open/close/query run audit records
//!   - `TaskRepository` — persist tasks created by automations
//!   - `SmsProvider`, `VoiceProvider`, `EmailTransport`, `WebhookClient` —
//!     outbound side effects
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ExecutionOrchestrator` — run one automation against one trigger event
//!   - `AutomationService` — author and inspect automations
//!   - `RunService` — inspect run history
//! - Provide the **action dispatcher**: one handler per action type, each
//!   validating its own configuration before touching a provider
//! - Provide in-process infrastructure that doesn't need IO (logging email transport)
//!
//! ## Dependency rule
//! Depends on `fieldops-domain` only (plus `tokio::time` for delays).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod config;
pub mod dispatch;
pub mod email_log;
pub mod engine;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
