//! Engine configuration handed to the dispatcher at construction time.

/// Tenant-level settings the action handlers need besides their own
/// per-action config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Sending number used for `send_sms` and `make_call`.
    pub from_number: Option<String>,
    /// Announcement flow the callee hears on `make_call`.
    pub announcement_url: String,
}

impl EngineConfig {
    #[must_use]
    pub fn new(from_number: impl Into<String>, announcement_url: impl Into<String>) -> Self {
        Self {
            from_number: Some(from_number.into()).filter(|n: &String| !n.is_empty()),
            announcement_url: announcement_url.into(),
        }
    }
}
