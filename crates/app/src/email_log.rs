//! Email transport that writes messages to the log instead of sending them.
//!
//! Used until a real mail provider is wired in; the run still records the
//! action as executed.

use std::future::Future;

use crate::ports::{EmailMessage, EmailTransport, ProviderError};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEmailTransport;

impl EmailTransport for LoggingEmailTransport {
    fn send_email(
        &self,
        message: EmailMessage,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body_len = message.body.len(),
            "email logged, not delivered"
        );
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_accept_every_message() {
        let transport = LoggingEmailTransport;
        let result = transport
            .send_email(EmailMessage {
                to: "ops@example.test".to_string(),
                subject: "Job 42 done".to_string(),
                body: "All good".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }
}
