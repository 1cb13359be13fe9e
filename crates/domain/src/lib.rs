//! # fieldops-domain
//!
//! Pure domain model for the fieldops automation engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Automations** (named, ordered sequences of actions with run counters)
//! - Define **Actions** (tagged steps: `send_sms`, `send_email`, `make_call`,
//!   `create_task`, `webhook`) with their per-step delay
//! - Define **Runs** (one audited execution attempt and its state machine)
//! - Define **Tasks** (rows written by the `create_task` action)
//! - Define **Trigger data** and the `{Name}` template **interpolator**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod interpolate;
pub mod run;
pub mod task;
pub mod trigger_data;
