use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::id::generate_id;
use crate::time::{Timestamp, now_utc};

/// Channel a template is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Email,
    Sms,
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Sms => write!(f, "sms"),
        }
    }
}

/// A named, versioned content blueprint with `{{placeholder}}` markers.
///
/// The identity (`id`) never changes; content is mutable through
/// [`Template::apply`], which bumps `version` by exactly 1 per update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    /// Subject template; only meaningful for email templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
    /// Informational map of variable names to example values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalisation: Option<HashMap<String, String>>,
    pub active: bool,
    pub version: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields accepted when creating a template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
    #[serde(default)]
    pub personalisation: Option<HashMap<String, String>>,
    /// Defaults to `true` when omitted.
    #[serde(default)]
    pub active: Option<bool>,
}

/// Partial update merged over an existing template.
///
/// `None` fields keep the current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub personalisation: Option<HashMap<String, String>>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl Template {
    /// Creates a new template record with a fresh id, `version = 1`, and
    /// creation timestamps.
    #[must_use]
    pub fn create(draft: TemplateDraft) -> Self {
        let now = now_utc();
        Self {
            id: generate_id(),
            name: draft.name,
            description: draft.description,
            template_type: draft.template_type,
            subject: draft.subject,
            body: draft.body,
            personalisation: draft.personalisation,
            active: draft.active.unwrap_or(true),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a new record with the patch merged over this one.
    ///
    /// `version` increments by exactly 1 and `updated_at` is refreshed;
    /// `id` and `created_at` never change.
    #[must_use]
    pub fn apply(&self, patch: TemplatePatch) -> Self {
        Self {
            id: self.id.clone(),
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            description: patch.description.or_else(|| self.description.clone()),
            template_type: self.template_type,
            subject: patch.subject.or_else(|| self.subject.clone()),
            body: patch.body.unwrap_or_else(|| self.body.clone()),
            personalisation: patch
                .personalisation
                .or_else(|| self.personalisation.clone()),
            active: patch.active.unwrap_or(self.active),
            version: self.version + 1,
            created_at: self.created_at,
            updated_at: now_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_draft() -> TemplateDraft {
        TemplateDraft {
            name: "Welcome".to_string(),
            description: None,
            template_type: TemplateType::Email,
            subject: Some("Hi {{name}}".to_string()),
            body: "Hello {{name}}".to_string(),
            personalisation: None,
            active: None,
        }
    }

    #[test]
    fn test_create_assigns_id_version_and_defaults() {
        let template = Template::create(email_draft());
        assert!(!template.id.is_empty());
        assert_eq!(template.version, 1);
        assert!(template.active);
        assert_eq!(template.created_at, template.updated_at);
    }

    #[test]
    fn test_create_respects_explicit_active_flag() {
        let template = Template::create(TemplateDraft {
            active: Some(false),
            ..email_draft()
        });
        assert!(!template.active);
    }

    #[test]
    fn test_apply_merges_and_bumps_version() {
        let template = Template::create(email_draft());
        let updated = template.apply(TemplatePatch {
            name: Some("New name".to_string()),
            body: Some("B2".to_string()),
            ..TemplatePatch::default()
        });

        assert_eq!(updated.id, template.id);
        assert_eq!(updated.name, "New name");
        assert_eq!(updated.body, "B2");
        // Untouched fields carry over.
        assert_eq!(updated.subject, template.subject);
        assert_eq!(updated.version, 2);
        assert_eq!(updated.created_at, template.created_at);
    }

    #[test]
    fn test_version_strictly_increases_across_updates() {
        let mut template = Template::create(email_draft());
        for expected in 2..=5 {
            template = template.apply(TemplatePatch::default());
            assert_eq!(template.version, expected);
        }
    }

    #[test]
    fn test_template_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TemplateType::Email).unwrap(),
            "\"email\""
        );
        assert_eq!(serde_json::to_string(&TemplateType::Sms).unwrap(), "\"sms\"");
        assert_eq!(TemplateType::Sms.to_string(), "sms");
    }

    #[test]
    fn test_template_serializes_type_field_name() {
        let template = Template::create(email_draft());
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["type"], "email");
        assert!(json.get("description").is_none());
    }
}
