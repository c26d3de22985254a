use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use courier_config::SmsSettings;
use courier_core::now_utc;

use crate::error::NotificationError;
use crate::transport::{SendOutcome, SendSmsOptions, SmsTransport};

const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// SMS transport delivering through the Twilio Messages API.
///
/// Without configured credentials the transport runs in degraded/dev mode:
/// nothing leaves the process, a `dev-<millis>` message id is synthesized,
/// and the provider response reads `"logged"`.
pub struct TwilioSmsTransport {
    http_client: Client,
    base_url: String,
    account_sid: Option<String>,
    auth_token: Option<String>,
    default_from: Option<String>,
}

impl TwilioSmsTransport {
    pub fn new(settings: &SmsSettings) -> Self {
        Self::with_base_url(settings, TWILIO_API_BASE)
    }

    /// Builds a transport against a non-default API endpoint, for
    /// exercising the wire format against a local HTTP double.
    pub fn with_base_url(settings: &SmsSettings, base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
            account_sid: settings.account_sid.clone(),
            auth_token: settings.auth_token.clone(),
            default_from: settings.from_number.clone(),
        }
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (self.account_sid.as_deref(), self.auth_token.as_deref()) {
            (Some(sid), Some(token)) => Some((sid, token)),
            _ => None,
        }
    }
}

#[async_trait]
impl SmsTransport for TwilioSmsTransport {
    async fn send(&self, options: SendSmsOptions) -> Result<SendOutcome, NotificationError> {
        let Some((account_sid, auth_token)) = self.credentials() else {
            let message_id = format!("dev-{}", now_utc().unix_millis());
            info!(
                to = %options.to,
                %message_id,
                "SMS credentials not configured; message logged instead of sent"
            );
            return Ok(SendOutcome {
                message_id: Some(message_id),
                provider_response: "logged".to_string(),
            });
        };

        let from = options
            .from
            .as_deref()
            .or(self.default_from.as_deref())
            .ok_or_else(|| {
                NotificationError::configuration(
                    "SMS from number is required (set sms.from_number or pass in options)",
                )
            })?;

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, account_sid
        );
        let params = [
            ("To", options.to.as_str()),
            ("From", from),
            ("Body", options.body.as_str()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(account_sid, Some(auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| NotificationError::transport(e.to_string()))?;

        let status = response.status();
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NotificationError::transport(e.to_string()))?;

        if status.is_success() {
            let message_id = payload["sid"].as_str().map(String::from);
            let provider_response = payload["status"].as_str().unwrap_or("accepted").to_string();

            info!(to = %options.to, message_id = ?message_id, %provider_response, "SMS handed to gateway");

            Ok(SendOutcome {
                message_id,
                provider_response,
            })
        } else {
            let detail = payload["message"].as_str().unwrap_or("Unknown error");
            Err(NotificationError::transport(format!(
                "SMS gateway rejected message: {detail}"
            )))
        }
    }

    fn name(&self) -> &'static str {
        "twilio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{basic_auth, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn configured(from_number: Option<&str>) -> SmsSettings {
        SmsSettings {
            from_number: from_number.map(String::from),
            account_sid: Some("AC123".to_string()),
            auth_token: Some("token".to_string()),
            ..SmsSettings::default()
        }
    }

    fn options(from: Option<&str>) -> SendSmsOptions {
        SendSmsOptions {
            to: "+15559876543".to_string(),
            body: "Hello".to_string(),
            from: from.map(String::from),
        }
    }

    #[test]
    fn test_transport_name() {
        let transport = TwilioSmsTransport::new(&SmsSettings::default());
        assert_eq!(transport.name(), "twilio");
    }

    #[tokio::test]
    async fn test_dev_mode_without_credentials() {
        // Point at an unroutable endpoint: dev mode must never touch it.
        let transport =
            TwilioSmsTransport::with_base_url(&SmsSettings::default(), "http://127.0.0.1:1");

        let outcome = transport.send(options(None)).await.unwrap();
        assert_eq!(outcome.provider_response, "logged");

        let message_id = outcome.message_id.unwrap();
        let digits = message_id.strip_prefix("dev-").unwrap();
        assert!(!digits.is_empty());
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_fails_fast_when_from_number_missing() {
        let transport =
            TwilioSmsTransport::with_base_url(&configured(None), "http://127.0.0.1:1");

        let err = transport.send(options(None)).await.unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("from number is required"));
    }

    #[tokio::test]
    async fn test_sends_form_encoded_message_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .and(basic_auth("AC123", "token"))
            .and(body_string_contains("To=%2B15559876543"))
            .and(body_string_contains("From=%2B15551234567"))
            .and(body_string_contains("Body=Hello"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "sid": "SM123456",
                "status": "queued"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport =
            TwilioSmsTransport::with_base_url(&configured(Some("+15551234567")), server.uri());

        let outcome = transport.send(options(None)).await.unwrap();
        assert_eq!(outcome.message_id.as_deref(), Some("SM123456"));
        assert_eq!(outcome.provider_response, "queued");
    }

    #[tokio::test]
    async fn test_options_from_overrides_configured_number() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("From=%2B15559999999"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "sid": "SM1",
                "status": "sent"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport =
            TwilioSmsTransport::with_base_url(&configured(Some("+15551234567")), server.uri());

        transport
            .send(options(Some("+15559999999")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_gateway_rejection_surfaces_as_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "code": 21211,
                "message": "The 'To' number is not a valid phone number."
            })))
            .mount(&server)
            .await;

        let transport =
            TwilioSmsTransport::with_base_url(&configured(Some("+15551234567")), server.uri());

        let err = transport.send(options(None)).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("not a valid phone number"));
    }
}
