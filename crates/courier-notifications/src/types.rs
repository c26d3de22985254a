use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied key/value map used to fill template placeholders.
///
/// Insertion order is preserved so attachment extraction follows the
/// caller's encounter order.
pub type Personalisation = IndexMap<String, Value>;

/// How an attachment reaches the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendingMethod {
    /// Forwarded to the relay as a real attachment.
    Attach,
    /// Referenced by URL in the body; never forwarded to the relay.
    Link,
}

/// A decoded file extracted from personalisation during rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    /// Raw bytes, decoded from the caller's base64 payload.
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
    pub sending_method: SendingMethod,
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Request to send one templated email.
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailRequest {
    pub email_address: String,
    pub template_id: String,
    #[serde(default)]
    pub personalisation: Option<Personalisation>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    /// Id of the sender whose email address becomes the "from"; the
    /// configured default applies when omitted.
    #[serde(default)]
    pub email_reply_to_id: Option<String>,
}

/// Request to send one templated SMS.
#[derive(Debug, Clone, Deserialize)]
pub struct SendSmsRequest {
    pub phone_number: String,
    pub template_id: String,
    #[serde(default)]
    pub personalisation: Option<Personalisation>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    /// Id of the sender whose sms_sender becomes the "from"; the configured
    /// default applies when omitted.
    #[serde(default)]
    pub sms_sender_id: Option<String>,
}

/// Request to admit a bulk send job.
///
/// Exactly one of `rows` and `csv` must be present; the first row/line is
/// the header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkSendRequest {
    pub template_id: String,
    pub name: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub rows: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    #[serde(default)]
    pub reply_to_id: Option<String>,
}

/// Rendered email content as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailContent {
    pub from_email: String,
    pub subject: String,
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Rendered SMS content as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmsContent {
    pub body: String,
    pub from_number: String,
}

/// Channel-specific rendered content in the response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NotificationContent {
    Email(EmailContent),
    Sms(SmsContent),
}

/// Pointer to the template a notification was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateRef {
    pub id: String,
    pub version: u32,
    pub uri: String,
}

/// Envelope returned for every accepted send. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub content: NotificationContent,
    pub uri: String,
    pub template: TemplateRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
}

/// Navigation links on list responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Links {
    pub current: String,
}

/// Listing envelope for notifications.
///
/// Notifications are not persisted, so the collection is always empty; the
/// envelope exists so the boundary contract stays stable.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationList {
    pub notifications: Vec<NotificationResponse>,
    pub links: Links,
}
