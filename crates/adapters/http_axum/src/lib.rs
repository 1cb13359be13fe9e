//! # fieldops-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **execution entry point** (`POST /api/execute-automation`):
//!   decode `{automationId, triggerData}`, run the automation, encode the
//!   run summary
//! - Serve the **run history** (`/api/runs/{id}`, `/api/automations/{id}/runs`)
//! - Serve the **automation authoring API** (`/api/automations`)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `fieldops-app` (for port traits and services) and `fieldops-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
