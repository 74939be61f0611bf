//! Mail adapter that writes account emails to the log instead of SMTP.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{EmailMessage, EmailSender, EmailSenderError};

/// Logs each message; the link is only emitted at debug level since it
/// carries a live token.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEmailSender;

impl LoggingEmailSender {
    fn body(message: &EmailMessage) -> String {
        format!(
            "Hello {},\n\n{}:\n{}\n",
            message.name,
            message.kind.subject(),
            message.link
        )
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailSenderError> {
        if message.recipient.trim().is_empty() {
            return Err(EmailSenderError::delivery(
                message.recipient.clone(),
                "recipient address is empty",
            ));
        }
        info!(
            recipient = %message.recipient,
            subject = message.kind.subject(),
            "account email dispatched"
        );
        debug!(body = %Self::body(message), "account email body");
        Ok(())
    }
}
