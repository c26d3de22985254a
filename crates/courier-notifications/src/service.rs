use tracing::info;

use courier_config::{EmailSettings, SmsSettings};
use courier_core::{
    BulkJob, Sender, SenderDraft, SenderPatch, SenderType, Template, TemplateDraft, TemplatePatch,
    TemplateType, generate_id,
};
use courier_storage::{DynSenderStore, DynTemplateStore};

use crate::bulk;
use crate::error::NotificationError;
use crate::renderer::DynTemplateRenderer;
use crate::resolver::DynTemplateResolver;
use crate::transport::{DynEmailTransport, DynSmsTransport, SendEmailOptions, SendSmsOptions};
use crate::types::{
    BulkSendRequest, EmailContent, Links, NotificationContent, NotificationList,
    NotificationResponse, SendEmailRequest, SendSmsRequest, SmsContent, TemplateRef,
};

/// Base path notifications are addressed under.
pub const NOTIFICATIONS_BASE_PATH: &str = "/v2/notifications";

/// Base path templates are addressed under.
pub const TEMPLATES_BASE_PATH: &str = "/v2/templates";

/// Default "from" identities used when a request names no sender.
#[derive(Debug, Clone, Default)]
pub struct SenderDefaults {
    pub from_email: Option<String>,
    pub from_number: Option<String>,
}

impl SenderDefaults {
    pub fn from_config(email: &EmailSettings, sms: &SmsSettings) -> Self {
        Self {
            from_email: email.from.clone(),
            from_number: sms.from_number.clone(),
        }
    }
}

/// The pipeline coordinator.
///
/// Stateless apart from the collaborators it is wired with: it resolves
/// the template, applies the admission checks, renders, picks the "from"
/// identity, dispatches through the channel's transport, and assembles
/// the response envelope. A failure at any step aborts the whole
/// operation; the transport call is the only externally-visible action.
pub struct NotificationService {
    templates: DynTemplateStore,
    senders: DynSenderStore,
    resolver: DynTemplateResolver,
    renderer: DynTemplateRenderer,
    email_transport: DynEmailTransport,
    sms_transport: DynSmsTransport,
    defaults: SenderDefaults,
}

impl NotificationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        templates: DynTemplateStore,
        senders: DynSenderStore,
        resolver: DynTemplateResolver,
        renderer: DynTemplateRenderer,
        email_transport: DynEmailTransport,
        sms_transport: DynSmsTransport,
        defaults: SenderDefaults,
    ) -> Self {
        Self {
            templates,
            senders,
            resolver,
            renderer,
            email_transport,
            sms_transport,
            defaults,
        }
    }

    // ==================== Sends ====================

    pub async fn send_email(
        &self,
        request: SendEmailRequest,
    ) -> Result<NotificationResponse, NotificationError> {
        let template = self
            .resolve_template(&request.template_id, TemplateType::Email)
            .await?;

        let personalisation = request.personalisation.unwrap_or_default();
        let rendered = self.renderer.render_email(&template, &personalisation)?;

        let from_email = self
            .resolve_from_email(request.email_reply_to_id.as_deref())
            .await?;

        let outcome = self
            .email_transport
            .send(SendEmailOptions {
                to: request.email_address.clone(),
                subject: rendered.subject.clone(),
                body: rendered.body.clone(),
                from: Some(from_email.clone()),
                attachments: rendered.attachments.clone(),
            })
            .await?;

        let id = generate_id();
        info!(
            notification_id = %id,
            template_id = %template.id,
            to = %request.email_address,
            message_id = ?outcome.message_id,
            "Email notification dispatched"
        );

        Ok(NotificationResponse {
            uri: format!("{NOTIFICATIONS_BASE_PATH}/{id}"),
            id,
            reference: request.reference,
            content: NotificationContent::Email(EmailContent {
                from_email,
                subject: rendered.subject,
                body: rendered.body,
                attachments: rendered.attachments,
            }),
            template: template_ref(&template),
            scheduled_for: request.scheduled_for,
        })
    }

    pub async fn send_sms(
        &self,
        request: SendSmsRequest,
    ) -> Result<NotificationResponse, NotificationError> {
        let template = self
            .resolve_template(&request.template_id, TemplateType::Sms)
            .await?;

        let personalisation = request.personalisation.unwrap_or_default();
        let rendered = self.renderer.render_sms(&template, &personalisation)?;

        let from_number = self
            .resolve_from_number(request.sms_sender_id.as_deref())
            .await?;

        let outcome = self
            .sms_transport
            .send(SendSmsOptions {
                to: request.phone_number.clone(),
                body: rendered.body.clone(),
                from: Some(from_number.clone()),
            })
            .await?;

        let id = generate_id();
        info!(
            notification_id = %id,
            template_id = %template.id,
            to = %request.phone_number,
            message_id = ?outcome.message_id,
            "SMS notification dispatched"
        );

        Ok(NotificationResponse {
            uri: format!("{NOTIFICATIONS_BASE_PATH}/{id}"),
            id,
            reference: request.reference,
            content: NotificationContent::Sms(SmsContent {
                body: rendered.body,
                from_number,
            }),
            template: template_ref(&template),
            scheduled_for: request.scheduled_for,
        })
    }

    /// Admits a bulk send request; see [`bulk::admit`].
    pub async fn send_bulk(&self, request: BulkSendRequest) -> Result<BulkJob, NotificationError> {
        bulk::admit(&request)
    }

    // ==================== Notification lookups ====================

    /// Notifications are not persisted, so the listing is always empty.
    pub fn list_notifications(&self) -> NotificationList {
        NotificationList {
            notifications: Vec::new(),
            links: Links {
                current: NOTIFICATIONS_BASE_PATH.to_string(),
            },
        }
    }

    /// Sent notifications leave no record behind; lookups by id are
    /// permanent misses.
    pub fn get_notification(&self, id: &str) -> Result<NotificationResponse, NotificationError> {
        Err(NotificationError::not_found("notification", id))
    }

    // ==================== Template management ====================

    pub async fn create_template(
        &self,
        draft: TemplateDraft,
    ) -> Result<Template, NotificationError> {
        let template = Template::create(draft);
        self.templates.put(template.clone()).await?;
        info!(template_id = %template.id, "Created template");
        Ok(template)
    }

    pub async fn get_template(&self, template_id: &str) -> Result<Template, NotificationError> {
        self.templates
            .get(template_id)
            .await?
            .ok_or_else(|| NotificationError::not_found("template", template_id))
    }

    pub async fn list_templates(
        &self,
        template_type: Option<TemplateType>,
    ) -> Result<Vec<Template>, NotificationError> {
        let mut templates = self.templates.list().await?;
        if let Some(kind) = template_type {
            templates.retain(|t| t.template_type == kind);
        }
        Ok(templates)
    }

    pub async fn update_template(
        &self,
        template_id: &str,
        patch: TemplatePatch,
    ) -> Result<Template, NotificationError> {
        let existing = self.get_template(template_id).await?;
        let updated = existing.apply(patch);
        self.templates.put(updated.clone()).await?;
        info!(template_id, version = updated.version, "Updated template");
        Ok(updated)
    }

    pub async fn delete_template(&self, template_id: &str) -> Result<(), NotificationError> {
        if !self.templates.remove(template_id).await? {
            return Err(NotificationError::not_found("template", template_id));
        }
        info!(template_id, "Deleted template");
        Ok(())
    }

    // ==================== Sender management ====================

    pub async fn create_sender(&self, draft: SenderDraft) -> Result<Sender, NotificationError> {
        let sender = Sender::create(draft)?;
        self.senders.put(sender.clone()).await?;
        info!(sender_id = %sender.id, "Created sender");
        Ok(sender)
    }

    pub async fn get_sender(&self, sender_id: &str) -> Result<Sender, NotificationError> {
        self.senders
            .get(sender_id)
            .await?
            .ok_or_else(|| NotificationError::not_found("sender", sender_id))
    }

    pub async fn list_senders(
        &self,
        sender_type: Option<SenderType>,
    ) -> Result<Vec<Sender>, NotificationError> {
        let mut senders = self.senders.list().await?;
        if let Some(kind) = sender_type {
            senders.retain(|s| s.sender_type.matches(kind));
        }
        Ok(senders)
    }

    pub async fn update_sender(
        &self,
        sender_id: &str,
        patch: SenderPatch,
    ) -> Result<Sender, NotificationError> {
        let existing = self.get_sender(sender_id).await?;
        // Validation runs on the merged record; a failure stores nothing.
        let updated = existing.apply(patch)?;
        self.senders.put(updated.clone()).await?;
        info!(sender_id, "Updated sender");
        Ok(updated)
    }

    pub async fn delete_sender(&self, sender_id: &str) -> Result<(), NotificationError> {
        if !self.senders.remove(sender_id).await? {
            return Err(NotificationError::not_found("sender", sender_id));
        }
        info!(sender_id, "Deleted sender");
        Ok(())
    }

    // ==================== Internals ====================

    async fn resolve_template(
        &self,
        template_id: &str,
        expected: TemplateType,
    ) -> Result<Template, NotificationError> {
        let template = self
            .resolver
            .resolve(template_id)
            .await?
            .ok_or_else(|| NotificationError::not_found("template", template_id))?;

        if template.template_type != expected {
            return Err(NotificationError::bad_request(format!(
                "Template {} is a {} template, not {expected}",
                template.id, template.template_type
            )));
        }
        if !template.active {
            return Err(NotificationError::bad_request(format!(
                "Template {} is inactive and cannot be sent",
                template.id
            )));
        }
        Ok(template)
    }

    async fn resolve_from_email(
        &self,
        reply_to_id: Option<&str>,
    ) -> Result<String, NotificationError> {
        if let Some(sender_id) = reply_to_id {
            let sender = self.get_sender(sender_id).await?;
            return sender.email_address.ok_or_else(|| {
                NotificationError::bad_request(format!(
                    "Sender {sender_id} has no email address"
                ))
            });
        }
        self.defaults.from_email.clone().ok_or_else(|| {
            NotificationError::configuration(
                "Default from email address is not configured (set email.from)",
            )
        })
    }

    async fn resolve_from_number(
        &self,
        sms_sender_id: Option<&str>,
    ) -> Result<String, NotificationError> {
        if let Some(sender_id) = sms_sender_id {
            let sender = self.get_sender(sender_id).await?;
            return sender.sms_sender.ok_or_else(|| {
                NotificationError::bad_request(format!("Sender {sender_id} has no sms_sender"))
            });
        }
        self.defaults.from_number.clone().ok_or_else(|| {
            NotificationError::configuration(
                "Default from number is not configured (set sms.from_number)",
            )
        })
    }
}

fn template_ref(template: &Template) -> TemplateRef {
    TemplateRef {
        id: template.id.clone(),
        version: template.version,
        uri: format!("{TEMPLATES_BASE_PATH}/{}", template.id),
    }
}
