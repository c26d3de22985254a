use std::sync::Arc;

use courier_config::{EmailSettings, SmsSettings};

use crate::error::NotificationError;
use crate::transport::{DynEmailTransport, DynSmsTransport, SmtpEmailTransport, TwilioSmsTransport};

/// Email transport implementations known to the registry.
pub const EMAIL_TRANSPORTS: &[&str] = &["smtp"];

/// SMS transport implementations known to the registry.
pub const SMS_TRANSPORTS: &[&str] = &["twilio"];

/// Resolves the configured email transport name to a concrete instance.
///
/// Unknown names fail here, at wiring time, never during a send.
pub fn email_transport(settings: &EmailSettings) -> Result<DynEmailTransport, NotificationError> {
    match settings.transport.as_str() {
        "smtp" => Ok(Arc::new(SmtpEmailTransport::new(settings)?)),
        other => Err(NotificationError::configuration(format!(
            "Unknown email transport '{other}' (expected one of {EMAIL_TRANSPORTS:?})"
        ))),
    }
}

/// Resolves the configured SMS transport name to a concrete instance.
///
/// Unknown names fail here, at wiring time, never during a send.
pub fn sms_transport(settings: &SmsSettings) -> Result<DynSmsTransport, NotificationError> {
    match settings.transport.as_str() {
        "twilio" => Ok(Arc::new(TwilioSmsTransport::new(settings))),
        other => Err(NotificationError::configuration(format!(
            "Unknown SMS transport '{other}' (expected one of {SMS_TRANSPORTS:?})"
        ))),
    }
}
