//! Email transport port and its SMTP adapter.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::TransportError;
use crate::config::SmtpConfig;

/// Outbound email port consumed by the email channel sender.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers one message. A returned error carries the cause; the caller
    /// decides what to do with the failure.
    async fn send_mail(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError>;
}

/// SMTP relay adapter over lettre's async transport (STARTTLS).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// Builds a mailer against the configured relay. An empty username
    /// disables authentication.
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| TransportError::Connection {
                endpoint: config.host.clone(),
                reason: e.to_string(),
            })?
            .port(config.port);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            host: config.host.clone(),
        })
    }

    fn mailbox(address: &str) -> Result<Mailbox, TransportError> {
        address
            .parse::<Mailbox>()
            .map_err(|e| TransportError::InvalidAddress {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_mail(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError> {
        let message = Message::builder()
            .from(Self::mailbox(from)?)
            .to(Self::mailbox(to)?)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| TransportError::Rejected {
                reason: e.to_string(),
            })?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| {
                if e.is_permanent() {
                    TransportError::Rejected {
                        reason: e.to_string(),
                    }
                } else {
                    TransportError::Connection {
                        endpoint: self.host.clone(),
                        reason: e.to_string(),
                    }
                }
            })
    }
}
