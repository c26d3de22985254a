pub mod smtp;
pub mod twilio;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NotificationError;
use crate::types::Attachment;

/// Options for delivering one rendered email.
#[derive(Debug, Clone, PartialEq)]
pub struct SendEmailOptions {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Overrides the transport's configured default sender address.
    pub from: Option<String>,
    pub attachments: Vec<Attachment>,
}

/// Options for delivering one rendered SMS.
#[derive(Debug, Clone, PartialEq)]
pub struct SendSmsOptions {
    pub to: String,
    pub body: String,
    /// Overrides the transport's configured default number.
    pub from: Option<String>,
}

/// Result of one transport send.
#[derive(Debug, Clone, PartialEq)]
pub struct SendOutcome {
    /// Provider-assigned message identifier, when the provider returned
    /// one representable as text; absent otherwise, never coerced.
    pub message_id: Option<String>,
    /// Raw provider status text.
    pub provider_response: String,
}

/// Capability to deliver one rendered email through an external relay.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, options: SendEmailOptions) -> Result<SendOutcome, NotificationError>;

    /// Name of this transport implementation for logging/registry lookup.
    fn name(&self) -> &'static str;
}

/// Capability to deliver one rendered SMS through an external gateway.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send(&self, options: SendSmsOptions) -> Result<SendOutcome, NotificationError>;

    /// Name of this transport implementation for logging/registry lookup.
    fn name(&self) -> &'static str;
}

/// Type alias for a shareable email transport instance
pub type DynEmailTransport = Arc<dyn EmailTransport>;

/// Type alias for a shareable SMS transport instance
pub type DynSmsTransport = Arc<dyn SmsTransport>;

pub use smtp::SmtpEmailTransport;
pub use twilio::TwilioSmsTransport;
