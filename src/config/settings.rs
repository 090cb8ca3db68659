//! Configuration settings structures for clinic-notify
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables. Each channel sender receives its
//! section at construction time — there is no global implicit configuration
//! inside the dispatch core.

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::LogFormat;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "clinic-notify".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_smtp_host() -> String {
    "smtp.example.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "noreply@petclinic.org".to_string()
}

fn default_sms_api_url() -> String {
    "https://api.twilio.com/2010-04-01".to_string()
}

fn default_from_number() -> String {
    "+15551234567".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Logger Configuration
// ============================================================================

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for log lines
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ============================================================================
// SMTP Configuration
// ============================================================================

/// SMTP relay configuration for the email channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host
    #[serde(default = "default_smtp_host")]
    pub host: String,

    /// SMTP relay port (STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Relay username; empty disables authentication
    #[serde(default)]
    pub username: String,

    /// Relay password
    #[serde(default)]
    pub password: String,

    /// Sender address placed on outgoing reminders
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_address: default_from_address(),
        }
    }
}

// ============================================================================
// SMS Gateway Configuration
// ============================================================================

/// SMS gateway configuration for the SMS channel
///
/// Points at a Twilio-compatible REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Gateway API base URL
    #[serde(default = "default_sms_api_url")]
    pub api_url: String,

    /// Account identifier, also used as the basic-auth username
    #[serde(default)]
    pub account_sid: String,

    /// API auth token
    #[serde(default)]
    pub auth_token: String,

    /// Sender number placed on outgoing reminders, E.164
    #[serde(default = "default_from_number")]
    pub from_number: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            api_url: default_sms_api_url(),
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: default_from_number(),
        }
    }
}

// ============================================================================
// Dispatch Configuration
// ============================================================================

/// Channel enablement for the dispatch coordinator
///
/// Disabling a channel removes its sender from the registered list; schedules
/// whose effective preference only matches disabled channels end up `Failed`
/// through the coordinator's nothing-applicable path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Register the email sender
    #[serde(default = "default_true")]
    pub email_enabled: bool,

    /// Register the SMS sender
    #[serde(default = "default_true")]
    pub sms_enabled: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            email_enabled: true,
            sms_enabled: true,
        }
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerConfig,

    /// SMTP relay configuration
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// SMS gateway configuration
    #[serde(default)]
    pub sms: SmsConfig,

    /// Channel enablement
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl Settings {
    /// Validates the loaded settings.
    ///
    /// Transport credentials are intentionally not required here — an empty
    /// username simply disables SMTP authentication, and a gateway without a
    /// token fails at send time and surfaces as a `Failed` schedule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logger.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::validation(
                    "logger.level",
                    format!(
                        "unknown log level '{}'; expected trace, debug, info, warn or error",
                        other
                    ),
                ));
            }
        }

        if self.dispatch.email_enabled {
            if self.smtp.host.trim().is_empty() {
                return Err(ConfigError::validation(
                    "smtp.host",
                    "SMTP host must not be empty while the email channel is enabled",
                ));
            }
            if !self.smtp.from_address.contains('@') {
                return Err(ConfigError::validation(
                    "smtp.from_address",
                    "from_address must be a valid email address",
                ));
            }
        }

        if self.dispatch.sms_enabled {
            if self.sms.api_url.trim().is_empty() {
                return Err(ConfigError::validation(
                    "sms.api_url",
                    "SMS gateway URL must not be empty while the SMS channel is enabled",
                ));
            }
            if self.sms.from_number.trim().is_empty() {
                return Err(ConfigError::validation(
                    "sms.from_number",
                    "from_number must not be empty while the SMS channel is enabled",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.application.name, "clinic-notify");
        assert_eq!(settings.smtp.port, 587);
        assert!(settings.dispatch.email_enabled);
        assert!(settings.dispatch.sms_enabled);
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logger.level = "verbose".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError { field, .. }) if field == "logger.level"
        ));
    }

    #[test]
    fn rejects_bad_from_address_when_email_enabled() {
        let mut settings = Settings::default();
        settings.smtp.from_address = "not-an-address".to_string();
        assert!(settings.validate().is_err());

        // Irrelevant once the channel is off.
        settings.dispatch.email_enabled = false;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_blank_sms_sender_when_sms_enabled() {
        let mut settings = Settings::default();
        settings.sms.from_number = "  ".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError { field, .. }) if field == "sms.from_number"
        ));
    }

    #[test]
    fn sections_deserialize_with_defaults() {
        let settings: Settings = toml_from_str(
            r#"
            [smtp]
            host = "mail.clinic.test"

            [sms]
            account_sid = "AC123"
            "#,
        );
        assert_eq!(settings.smtp.host, "mail.clinic.test");
        assert_eq!(settings.smtp.port, 587);
        assert_eq!(settings.sms.account_sid, "AC123");
        assert_eq!(settings.sms.api_url, default_sms_api_url());
    }

    fn toml_from_str(raw: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}
