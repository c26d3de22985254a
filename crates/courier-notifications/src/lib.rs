pub mod bulk;
pub mod error;
pub mod registry;
pub mod renderer;
pub mod resolver;
pub mod service;
pub mod transport;
pub mod types;

pub use bulk::{MAX_BULK_ROWS, admit};
pub use error::NotificationError;
pub use registry::{EMAIL_TRANSPORTS, SMS_TRANSPORTS, email_transport, sms_transport};
pub use renderer::{
    DEFAULT_SUBJECT, DynTemplateRenderer, PlaceholderRenderer, RenderedEmail, RenderedSms,
    TemplateRenderer,
};
pub use resolver::{DynTemplateResolver, StoreTemplateResolver, TemplateResolver};
pub use service::{
    NOTIFICATIONS_BASE_PATH, NotificationService, SenderDefaults, TEMPLATES_BASE_PATH,
};
pub use transport::{
    DynEmailTransport, DynSmsTransport, EmailTransport, SendEmailOptions, SendOutcome,
    SendSmsOptions, SmsTransport, SmtpEmailTransport, TwilioSmsTransport,
};
pub use types::*;
