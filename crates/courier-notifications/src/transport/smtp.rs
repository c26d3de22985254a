use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use courier_config::EmailSettings;

use crate::error::NotificationError;
use crate::transport::{EmailTransport, SendEmailOptions, SendOutcome};
use crate::types::SendingMethod;

/// Email transport delivering through an SMTP relay.
pub struct SmtpEmailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    default_from: Option<String>,
}

impl SmtpEmailTransport {
    pub fn new(settings: &EmailSettings) -> Result<Self, NotificationError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)
            .map_err(|e| NotificationError::configuration(e.to_string()))?
            .port(settings.smtp_port);

        if let (Some(username), Some(password)) = (&settings.smtp_username, &settings.smtp_password)
        {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            default_from: settings.from.clone(),
        })
    }

    fn build_message(&self, options: &SendEmailOptions) -> Result<Message, NotificationError> {
        let from = options
            .from
            .as_deref()
            .or(self.default_from.as_deref())
            .ok_or_else(|| {
                NotificationError::configuration(
                    "Email from address is required (set email.from or pass in options)",
                )
            })?;

        let from: Mailbox = from.parse().map_err(|e| {
            NotificationError::configuration(format!("Invalid from address '{from}': {e}"))
        })?;
        let to: Mailbox = options.to.parse().map_err(|e| {
            NotificationError::bad_request(format!(
                "Invalid recipient address '{}': {e}",
                options.to
            ))
        })?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(options.subject.clone());

        // Link-style attachments are already referenced by URL in the body;
        // only attach-style ones go out to the relay.
        let attached: Vec<_> = options
            .attachments
            .iter()
            .filter(|a| a.sending_method == SendingMethod::Attach)
            .collect();

        let message = if attached.is_empty() {
            builder
                .header(ContentType::TEXT_PLAIN)
                .body(options.body.clone())
        } else {
            let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(options.body.clone()));
            for attachment in attached {
                let content_type = ContentType::parse("application/octet-stream")
                    .map_err(|e| NotificationError::internal(e.to_string()))?;
                multipart = multipart.singlepart(
                    MimeAttachment::new(attachment.filename.clone())
                        .body(attachment.content.clone(), content_type),
                );
            }
            builder.multipart(multipart)
        }
        .map_err(|e| NotificationError::transport(e.to_string()))?;

        Ok(message)
    }
}

#[async_trait]
impl EmailTransport for SmtpEmailTransport {
    async fn send(&self, options: SendEmailOptions) -> Result<SendOutcome, NotificationError> {
        let message = self.build_message(&options)?;

        let response = self
            .mailer
            .send(message)
            .await
            .map_err(|e| NotificationError::transport(e.to_string()))?;

        let reply: String = response.message().collect::<Vec<_>>().join(" ");
        let message_id = if reply.is_empty() { None } else { Some(reply) };
        let provider_response = response.code().to_string();

        info!(to = %options.to, message_id = ?message_id, "Email handed to SMTP relay");

        Ok(SendOutcome {
            message_id,
            provider_response,
        })
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
