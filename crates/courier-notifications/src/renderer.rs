use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;

use courier_core::Template;

use crate::error::NotificationError;
use crate::types::{Attachment, Personalisation, SendingMethod};

/// Subject used when an email template defines none.
pub const DEFAULT_SUBJECT: &str = "Notification";

/// Output of rendering an email template.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

/// Output of rendering an SMS template.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSms {
    pub body: String,
}

/// Capability to turn a template plus personalisation into sendable
/// content. Rendering is pure: no I/O, and identical inputs always
/// produce identical output.
pub trait TemplateRenderer: Send + Sync {
    fn render_email(
        &self,
        template: &Template,
        personalisation: &Personalisation,
    ) -> Result<RenderedEmail, NotificationError>;

    fn render_sms(
        &self,
        template: &Template,
        personalisation: &Personalisation,
    ) -> Result<RenderedSms, NotificationError>;
}

/// Type alias for a shareable renderer instance
pub type DynTemplateRenderer = Arc<dyn TemplateRenderer>;

/// `{{variable}}` renderer with structural attachment extraction.
///
/// Every `{{key}}` in subject and body is replaced with the stringified
/// personalisation value; placeholders with no matching key are left
/// verbatim. A personalisation value shaped as
/// `{file, filename, sending_method}` is an attachment descriptor: it is
/// removed from interpolation, base64-decoded, and collected in encounter
/// order.
#[derive(Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    fn render_email(
        &self,
        template: &Template,
        personalisation: &Personalisation,
    ) -> Result<RenderedEmail, NotificationError> {
        let (values, attachments) = split_attachments(personalisation)?;
        let subject = template.subject.as_deref().unwrap_or(DEFAULT_SUBJECT);

        Ok(RenderedEmail {
            subject: interpolate(subject, &values),
            body: interpolate(&template.body, &values),
            attachments,
        })
    }

    fn render_sms(
        &self,
        template: &Template,
        personalisation: &Personalisation,
    ) -> Result<RenderedSms, NotificationError> {
        // Attachment descriptors carry no meaning over SMS; they are still
        // excluded from interpolation rather than stringified into the body.
        let (values, _) = split_attachments(personalisation)?;

        Ok(RenderedSms {
            body: interpolate(&template.body, &values),
        })
    }
}

struct AttachmentDescriptor<'a> {
    file: &'a str,
    filename: &'a str,
    sending_method: SendingMethod,
}

/// Structurally matches an attachment descriptor: any object carrying
/// `file` (string), `filename` (string), and a known `sending_method`.
fn parse_descriptor(value: &Value) -> Option<AttachmentDescriptor<'_>> {
    let object = value.as_object()?;
    let file = object.get("file")?.as_str()?;
    let filename = object.get("filename")?.as_str()?;
    let sending_method = match object.get("sending_method")?.as_str()? {
        "attach" => SendingMethod::Attach,
        "link" => SendingMethod::Link,
        _ => return None,
    };
    Some(AttachmentDescriptor {
        file,
        filename,
        sending_method,
    })
}

/// Splits personalisation into interpolation pairs and decoded
/// attachments, preserving encounter order on both sides.
fn split_attachments(
    personalisation: &Personalisation,
) -> Result<(Vec<(String, String)>, Vec<Attachment>), NotificationError> {
    let mut values = Vec::new();
    let mut attachments = Vec::new();

    for (key, value) in personalisation {
        match parse_descriptor(value) {
            Some(descriptor) => {
                let content = BASE64.decode(descriptor.file).map_err(|e| {
                    NotificationError::bad_request(format!(
                        "Attachment '{key}' has invalid base64 content: {e}"
                    ))
                })?;
                attachments.push(Attachment {
                    filename: descriptor.filename.to_string(),
                    content,
                    sending_method: descriptor.sending_method,
                });
            }
            None => values.push((key.clone(), stringify(value))),
        }
    }

    Ok((values, attachments))
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn interpolate(template: &str, values: &[(String, String)]) -> String {
    let mut result = template.to_string();
    for (key, value) in values {
        let placeholder = format!("{{{{{key}}}}}");
        result = result.replace(&placeholder, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{TemplateDraft, TemplateType};
    use serde_json::json;

    fn email_template(subject: Option<&str>, body: &str) -> Template {
        Template::create(TemplateDraft {
            name: "Email".to_string(),
            description: None,
            template_type: TemplateType::Email,
            subject: subject.map(String::from),
            body: body.to_string(),
            personalisation: None,
            active: None,
        })
    }

    fn sms_template(body: &str) -> Template {
        Template::create(TemplateDraft {
            name: "SMS".to_string(),
            description: None,
            template_type: TemplateType::Sms,
            subject: None,
            body: body.to_string(),
            personalisation: None,
            active: None,
        })
    }

    fn personalisation(entries: &[(&str, Value)]) -> Personalisation {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_email_interpolates_subject_and_body() {
        let renderer = PlaceholderRenderer::new();
        let template = email_template(
            Some("Hello {{name}}"),
            "Welcome, {{name}}. Your code is {{code}}.",
        );
        let data = personalisation(&[("name", json!("Alice")), ("code", json!("123"))]);

        let rendered = renderer.render_email(&template, &data).unwrap();
        assert_eq!(rendered.subject, "Hello Alice");
        assert_eq!(rendered.body, "Welcome, Alice. Your code is 123.");
        assert!(rendered.attachments.is_empty());
    }

    #[test]
    fn test_render_email_uses_default_subject() {
        let renderer = PlaceholderRenderer::new();
        let template = email_template(None, "Body only");

        let rendered = renderer
            .render_email(&template, &Personalisation::new())
            .unwrap();
        assert_eq!(rendered.subject, DEFAULT_SUBJECT);
        assert_eq!(rendered.body, "Body only");
    }

    #[test]
    fn test_unresolved_placeholders_left_verbatim() {
        let renderer = PlaceholderRenderer::new();
        let template = email_template(Some("Hi {{name}}"), "Code: {{code}}");
        let data = personalisation(&[("name", json!("Alice"))]);

        let rendered = renderer.render_email(&template, &data).unwrap();
        assert_eq!(rendered.subject, "Hi Alice");
        assert_eq!(rendered.body, "Code: {{code}}");
    }

    #[test]
    fn test_scalar_stringification() {
        let renderer = PlaceholderRenderer::new();
        let template = sms_template("{{count}} {{flag}} {{nothing}} {{list}}");
        let data = personalisation(&[
            ("count", json!(5)),
            ("flag", json!(true)),
            ("nothing", json!(null)),
            ("list", json!(["a", "b"])),
        ]);

        let rendered = renderer.render_sms(&template, &data).unwrap();
        assert_eq!(rendered.body, "5 true  [\"a\",\"b\"]");
    }

    #[test]
    fn test_rendering_is_pure() {
        let renderer = PlaceholderRenderer::new();
        let template = email_template(Some("Hi {{name}}"), "Hello {{name}}");
        let data = personalisation(&[("name", json!("Alice"))]);

        let first = renderer.render_email(&template, &data).unwrap();
        let second = renderer.render_email(&template, &data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_attachment_extraction() {
        let renderer = PlaceholderRenderer::new();
        let template = email_template(Some("S"), "B");
        let encoded = BASE64.encode(b"file content");
        let data = personalisation(&[
            ("name", json!("Alice")),
            (
                "document",
                json!({
                    "file": encoded,
                    "filename": "doc.pdf",
                    "sending_method": "attach"
                }),
            ),
        ]);

        let rendered = renderer.render_email(&template, &data).unwrap();
        assert_eq!(rendered.attachments.len(), 1);
        assert_eq!(rendered.attachments[0].filename, "doc.pdf");
        assert_eq!(rendered.attachments[0].content, b"file content");
        assert_eq!(rendered.attachments[0].sending_method, SendingMethod::Attach);
    }

    #[test]
    fn test_attachments_keep_encounter_order() {
        let renderer = PlaceholderRenderer::new();
        let template = email_template(Some("S"), "B");
        let encoded = BASE64.encode(b"x");
        let descriptor = |filename: &str| {
            json!({"file": encoded, "filename": filename, "sending_method": "link"})
        };
        let data = personalisation(&[
            ("second", descriptor("b.pdf")),
            ("first", descriptor("a.pdf")),
        ]);

        let rendered = renderer.render_email(&template, &data).unwrap();
        let filenames: Vec<&str> = rendered
            .attachments
            .iter()
            .map(|a| a.filename.as_str())
            .collect();
        assert_eq!(filenames, ["b.pdf", "a.pdf"]);
    }

    #[test]
    fn test_attachment_descriptor_excluded_from_interpolation() {
        let renderer = PlaceholderRenderer::new();
        let template = email_template(Some("S"), "See {{document}}");
        let data = personalisation(&[(
            "document",
            json!({
                "file": BASE64.encode(b"x"),
                "filename": "doc.pdf",
                "sending_method": "attach"
            }),
        )]);

        let rendered = renderer.render_email(&template, &data).unwrap();
        // The placeholder stays verbatim; the descriptor became an attachment.
        assert_eq!(rendered.body, "See {{document}}");
        assert_eq!(rendered.attachments.len(), 1);
    }

    #[test]
    fn test_object_without_descriptor_shape_is_stringified() {
        let renderer = PlaceholderRenderer::new();
        let template = sms_template("{{data}}");
        let data = personalisation(&[("data", json!({"file": "x", "filename": "y"}))]);

        let rendered = renderer.render_sms(&template, &data).unwrap();
        // Missing sending_method: not an attachment, so compact JSON it is.
        assert_eq!(rendered.body, "{\"file\":\"x\",\"filename\":\"y\"}");
    }

    #[test]
    fn test_unknown_sending_method_is_not_a_descriptor() {
        let value = json!({"file": "eA==", "filename": "a", "sending_method": "carrier-pigeon"});
        assert!(parse_descriptor(&value).is_none());
    }

    #[test]
    fn test_invalid_base64_fails_with_bad_request() {
        let renderer = PlaceholderRenderer::new();
        let template = email_template(Some("S"), "B");
        let data = personalisation(&[(
            "document",
            json!({"file": "not base64 !!!", "filename": "doc.pdf", "sending_method": "attach"}),
        )]);

        let err = renderer.render_email(&template, &data).unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_render_sms_interpolates_body() {
        let renderer = PlaceholderRenderer::new();
        let template = sms_template("Hi {{name}}, your code: {{code}}");
        let data = personalisation(&[("name", json!("Bob")), ("code", json!("456"))]);

        let rendered = renderer.render_sms(&template, &data).unwrap();
        assert_eq!(rendered.body, "Hi Bob, your code: 456");
    }
}
