//! Mail adapters.

mod logging_sender;

pub use logging_sender::LoggingEmailSender;
