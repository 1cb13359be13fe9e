//! # fieldops-adapter-twilio-reqwest
//!
//! Twilio REST API adapter using [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement `SmsProvider` (Messages resource) and `VoiceProvider`
//!   (Calls resource) from `fieldops-app::ports`
//! - Authenticate with the account SID and auth token (HTTP basic auth)
//! - Surface the provider's error body on rejected requests
//!
//! ## Dependency rule
//! Depends on `fieldops-app` for the port traits only.

mod client;
mod config;

pub use client::{TwilioClient, TwilioError};
pub use config::{DEFAULT_BASE_URL, TwilioConfig};
