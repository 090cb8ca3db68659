//! External transport collaborators for the delivery channels.
//!
//! The dispatch core only sees the two narrow ports defined here: a `Mailer`
//! and an `SmsGateway`. The production adapters (`SmtpMailer`,
//! `HttpSmsGateway`) speak SMTP and a Twilio-style REST API; tests substitute
//! recording fakes.

pub mod client;
pub mod mail;
pub mod sms;

pub use mail::{Mailer, SmtpMailer};
pub use sms::{HttpSmsGateway, SmsGateway};

use thiserror::Error;

/// Failure of a single delivery attempt at the transport boundary.
///
/// Channel senders convert every one of these into a `Failed` status plus a
/// log line; transport errors never cross the dispatch boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote endpoint could not be reached.
    #[error("could not reach {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    /// The provider refused our credentials.
    #[error("authentication rejected by {endpoint}: {reason}")]
    Authentication { endpoint: String, reason: String },

    /// A sender or recipient address the provider will not accept.
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The provider accepted the connection but rejected the message.
    #[error("message rejected: {reason}")]
    Rejected { reason: String },

    /// Any other provider-side failure.
    #[error("provider error: {reason}")]
    Provider { reason: String },
}
