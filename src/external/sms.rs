//! SMS transport port and its HTTP gateway adapter.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::TransportError;
use super::client::HTTP_CLIENT;
use crate::config::SmsConfig;

/// Outbound SMS port consumed by the SMS channel sender.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Delivers one text message and returns the provider's delivery-status
    /// string (for example "queued" or "sent").
    async fn send_sms(&self, from: &str, to: &str, body: &str)
    -> Result<String, TransportError>;
}

/// Adapter for a Twilio-compatible REST gateway.
///
/// Posts `From`/`To`/`Body` as form fields to the account's message endpoint
/// with basic auth, through the shared [`HTTP_CLIENT`].
pub struct HttpSmsGateway {
    config: SmsConfig,
}

impl HttpSmsGateway {
    pub fn new(config: SmsConfig) -> Self {
        Self { config }
    }

    /// The account-scoped message endpoint.
    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.config.api_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsGateway for HttpSmsGateway {
    async fn send_sms(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<String, TransportError> {
        let url = self.messages_url();

        let response = HTTP_CLIENT
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("From", from), ("To", to), ("Body", body)])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    TransportError::Connection {
                        endpoint: url.clone(),
                        reason: e.to_string(),
                    }
                } else {
                    TransportError::Provider {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let payload = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => TransportError::Authentication {
                    endpoint: url,
                    reason: format!("HTTP {status}"),
                },
                400..=499 => TransportError::Rejected {
                    reason: format!("HTTP {status}: {payload}"),
                },
                _ => TransportError::Provider {
                    reason: format!("HTTP {status}: {payload}"),
                },
            });
        }

        // The gateway reports the message state in the JSON body; fall back
        // to the HTTP status line when it does not.
        let delivery_status = serde_json::from_str::<JsonValue>(&payload)
            .ok()
            .and_then(|v| v.get("status").and_then(JsonValue::as_str).map(String::from))
            .unwrap_or_else(|| status.to_string());

        debug!(to = %to, delivery_status = %delivery_status, "sms gateway accepted message");
        Ok(delivery_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpSmsGateway {
        HttpSmsGateway::new(SmsConfig {
            api_url: "https://api.gateway.test/2010-04-01/".to_string(),
            account_sid: "AC42".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+15551234567".to_string(),
        })
    }

    #[test]
    fn messages_url_is_account_scoped() {
        assert_eq!(
            gateway().messages_url(),
            "https://api.gateway.test/2010-04-01/Accounts/AC42/Messages.json"
        );
    }
}
