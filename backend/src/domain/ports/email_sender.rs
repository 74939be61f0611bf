//! Port for outbound account emails.
//!
//! Delivery is best effort: callers log failures and carry on.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by mail adapters.
    pub enum EmailSenderError {
        Delivery { recipient: String, message: String } =>
            "email to {recipient} could not be delivered: {message}",
    }
}

/// Which account email is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    /// Confirms ownership of a newly registered address.
    Verification,
    /// Carries a password reset link.
    PasswordReset,
    /// Sent once an address has been verified.
    Welcome,
}

impl EmailKind {
    pub fn subject(self) -> &'static str {
        match self {
            Self::Verification => "Verify your email address",
            Self::PasswordReset => "Reset your password",
            Self::Welcome => "Welcome aboard",
        }
    }
}

/// A rendered account email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub kind: EmailKind,
    pub recipient: String,
    pub name: String,
    /// Call-to-action link; for token emails it embeds the token.
    pub link: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailSenderError>;
}

/// Records every message instead of delivering it.
#[derive(Debug, Default)]
pub struct FixtureEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl FixtureEmailSender {
    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl EmailSender for FixtureEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailSenderError> {
        let mut guard = self
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        guard.push(message.clone());
        Ok(())
    }
}
