use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{CoreError, Result};
use crate::id::generate_id;
use crate::time::{Timestamp, now_utc};

/// Channel(s) a sender identity can be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Email,
    Sms,
    Both,
}

impl SenderType {
    pub fn covers_email(self) -> bool {
        matches!(self, Self::Email | Self::Both)
    }

    pub fn covers_sms(self) -> bool {
        matches!(self, Self::Sms | Self::Both)
    }

    /// Whether a sender of this type matches a type filter.
    /// `both` senders match every queried type.
    pub fn matches(self, query: SenderType) -> bool {
        self == query || self == Self::Both
    }
}

impl fmt::Display for SenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Sms => write!(f, "sms"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// A reply-to email address and/or SMS sender identity.
///
/// Type-conditional invariants: `email_address` is present when the type
/// covers email, `sms_sender` when it covers SMS. Both creation and merged
/// updates re-validate, so a violating record is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    pub id: String,
    #[serde(rename = "type")]
    pub sender_type: SenderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    /// Alphanumeric sender id (1-11 chars) or phone number (up to 15 chars,
    /// optional leading `+`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_sender: Option<String>,
    pub is_default: bool,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// Fields accepted when creating a sender.
#[derive(Debug, Clone, Deserialize)]
pub struct SenderDraft {
    #[serde(rename = "type")]
    pub sender_type: SenderType,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub sms_sender: Option<String>,
    /// Defaults to `false` when omitted.
    #[serde(default)]
    pub is_default: Option<bool>,
}

/// Partial update merged over an existing sender.
///
/// `None` fields keep the current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SenderPatch {
    #[serde(default, rename = "type")]
    pub sender_type: Option<SenderType>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub sms_sender: Option<String>,
    #[serde(default)]
    pub is_default: Option<bool>,
}

static ALPHANUMERIC_SENDER: OnceLock<Regex> = OnceLock::new();
static PHONE_SENDER: OnceLock<Regex> = OnceLock::new();

fn alphanumeric_sender() -> &'static Regex {
    ALPHANUMERIC_SENDER.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]{1,11}$").expect("alphanumeric sender pattern is valid")
    })
}

fn phone_sender() -> &'static Regex {
    PHONE_SENDER.get_or_init(|| {
        Regex::new(r"^\+?[0-9]{1,15}$").expect("phone sender pattern is valid")
    })
}

fn is_valid_sms_sender(value: &str) -> bool {
    if value.len() > 15 {
        return false;
    }
    alphanumeric_sender().is_match(value) || phone_sender().is_match(value)
}

fn validate_fields(
    sender_type: SenderType,
    email_address: Option<&str>,
    sms_sender: Option<&str>,
) -> Result<()> {
    if sender_type.covers_email() && email_address.is_none() {
        return Err(CoreError::validation(
            "email_address is required when type is email or both",
        ));
    }
    if sender_type.covers_sms() && sms_sender.is_none() {
        return Err(CoreError::validation(
            "sms_sender is required when type is sms or both",
        ));
    }
    if let Some(sms_sender) = sms_sender
        && !is_valid_sms_sender(sms_sender)
    {
        return Err(CoreError::validation(
            "sms_sender must be alphanumeric (max 11 chars) or a phone number (max 15 chars)",
        ));
    }
    Ok(())
}

impl Sender {
    /// Validates the draft and creates a new sender record with a fresh id
    /// and creation timestamp. Validation failures leave nothing stored.
    pub fn create(draft: SenderDraft) -> Result<Self> {
        validate_fields(
            draft.sender_type,
            draft.email_address.as_deref(),
            draft.sms_sender.as_deref(),
        )?;
        Ok(Self {
            id: generate_id(),
            sender_type: draft.sender_type,
            email_address: draft.email_address,
            sms_sender: draft.sms_sender,
            is_default: draft.is_default.unwrap_or(false),
            created_at: now_utc(),
            updated_at: None,
        })
    }

    /// Merges the patch over this record, re-validates the merged result,
    /// and returns the updated record with a refreshed `updated_at`.
    ///
    /// Validating the merged snapshot (never the patch alone) guarantees a
    /// partial update cannot strip a type-conditional field.
    pub fn apply(&self, patch: SenderPatch) -> Result<Self> {
        let merged = Self {
            id: self.id.clone(),
            sender_type: patch.sender_type.unwrap_or(self.sender_type),
            email_address: patch.email_address.or_else(|| self.email_address.clone()),
            sms_sender: patch.sms_sender.or_else(|| self.sms_sender.clone()),
            is_default: patch.is_default.unwrap_or(self.is_default),
            created_at: self.created_at,
            updated_at: Some(now_utc()),
        };
        validate_fields(
            merged.sender_type,
            merged.email_address.as_deref(),
            merged.sms_sender.as_deref(),
        )?;
        Ok(merged)
    }
}
