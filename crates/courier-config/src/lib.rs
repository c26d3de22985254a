//! Typed configuration for the Courier notification service.
//!
//! Settings load from an optional `courier.toml` file layered with
//! `COURIER__`-prefixed environment variables (e.g.
//! `COURIER__SMS__FROM_NUMBER=+15551234567`), with a `.env` file honored
//! when present. Every field carries a serde default so a bare deployment
//! starts with sane values.

use serde::{Deserialize, Serialize};

/// Root configuration for the notification pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub email: EmailSettings,
    #[serde(default)]
    pub sms: SmsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.email.transport.is_empty() {
            return Err("email.transport must not be empty".into());
        }
        if self.email.smtp_port == 0 {
            return Err("email.smtp_port must be > 0".into());
        }
        if self.sms.transport.is_empty() {
            return Err("sms.transport must not be empty".into());
        }
        // Credentials only make sense as a pair.
        if self.sms.account_sid.is_some() != self.sms.auth_token.is_some() {
            return Err("sms.account_sid and sms.auth_token must be set together".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }
}

/// Email delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    /// Email transport implementation name (registry key).
    #[serde(default = "default_email_transport")]
    pub transport: String,
    /// Default "from" address used when a request names no sender.
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
}

fn default_email_transport() -> String {
    "smtp".into()
}
fn default_smtp_host() -> String {
    "localhost".into()
}
fn default_smtp_port() -> u16 {
    587
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            transport: default_email_transport(),
            from: None,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
        }
    }
}

/// SMS delivery settings.
///
/// With `account_sid`/`auth_token` unset the SMS transport runs in
/// degraded/dev mode and never calls the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsSettings {
    /// SMS transport implementation name (registry key).
    #[serde(default = "default_sms_transport")]
    pub transport: String,
    /// Default "from" number or sender id used when a request names no
    /// sender.
    #[serde(default)]
    pub from_number: Option<String>,
    #[serde(default)]
    pub account_sid: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_sms_transport() -> String {
    "twilio".into()
}

impl Default for SmsSettings {
    fn default() -> Self {
        Self {
            transport: default_sms_transport(),
            from_number: None,
            account_sid: None,
            auth_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Loads configuration from the given TOML file (or `courier.toml` in
    /// the working directory when no path is supplied), layered with
    /// `COURIER__SECTION__KEY` environment overrides. A `.env` file is
    /// loaded first when present.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let _ = dotenvy::dotenv();

        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                let default_path = PathBuf::from("courier.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., COURIER__SMS__ACCOUNT_SID=AC123
        builder = builder.add_source(
            Environment::with_prefix("COURIER")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

pub mod telemetry {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, fmt};

    /// Installs the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over the configured level. Safe to call more than
    /// once; later calls are no-ops.
    pub fn init_tracing(level: &str) {
        let filter = std::env::var("RUST_LOG")
            .ok()
            .and_then(|_| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new(level));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init();
    }
}
