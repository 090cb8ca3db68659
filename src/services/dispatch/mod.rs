//! Reminder dispatch engine.
//!
//! The pieces, leaf to root: the preference resolver, the per-channel
//! senders behind the [`ChannelSender`] contract, the coordinator that fans
//! a reminder out across them, and the batch processor that drives a whole
//! pending set. The sender list is assembled explicitly at startup from
//! configuration — no runtime discovery.

mod batch;
mod coordinator;
mod email_sender;
mod preference;
mod sender;
mod sms_sender;

pub use batch::BatchProcessor;
pub use coordinator::DispatchCoordinator;
pub use email_sender::EmailSender;
pub use preference::effective_preference;
pub use sender::ChannelSender;
pub use sms_sender::SmsSender;

use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::external::{HttpSmsGateway, SmtpMailer};

/// Builds the production sender list from configuration.
///
/// Each enabled channel gets its transport adapter and its sender identity
/// here; a disabled channel is simply not registered, so reminders that only
/// match it fall through to the coordinator's nothing-applicable handling.
pub fn standard_senders(settings: &Settings) -> AppResult<Vec<Arc<dyn ChannelSender>>> {
    let mut senders: Vec<Arc<dyn ChannelSender>> = Vec::new();

    if settings.dispatch.email_enabled {
        let mailer = SmtpMailer::new(&settings.smtp).map_err(|e| AppError::Configuration {
            key: "smtp".to_string(),
            source: anyhow::Error::new(e),
        })?;
        senders.push(Arc::new(EmailSender::new(
            Arc::new(mailer),
            settings.smtp.from_address.clone(),
        )));
    }

    if settings.dispatch.sms_enabled {
        let gateway = HttpSmsGateway::new(settings.sms.clone());
        senders.push(Arc::new(SmsSender::new(
            Arc::new(gateway),
            settings.sms.from_number.clone(),
        )));
    }

    info!(
        channels = senders.len(),
        email = settings.dispatch.email_enabled,
        sms = settings.dispatch.sms_enabled,
        "channel senders registered"
    );
    Ok(senders)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn standard_senders_respect_channel_flags() {
        let mut settings = Settings::default();
        let senders = standard_senders(&settings).unwrap();
        assert_eq!(senders.len(), 2);

        settings.dispatch.sms_enabled = false;
        let senders = standard_senders(&settings).unwrap();
        assert_eq!(senders.len(), 1);
        assert_eq!(senders[0].name(), "email");

        settings.dispatch.email_enabled = false;
        assert!(standard_senders(&settings).unwrap().is_empty());
    }
}
