//! Email channel sender.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::preference::effective_preference;
use super::sender::{ChannelSender, visit_context};
use crate::external::Mailer;
use crate::models::{ChannelPreference, NotificationSchedule, NotificationStatus, Owner, Pet, Visit};

/// Sends visit reminders by email through an SMTP relay.
pub struct EmailSender {
    mailer: Arc<dyn Mailer>,
    from_address: String,
}

impl EmailSender {
    /// Creates an email sender with its relay port and sender identity.
    pub fn new(mailer: Arc<dyn Mailer>, from_address: String) -> Self {
        Self {
            mailer,
            from_address,
        }
    }

    /// Default reminder letter, used when the schedule carries no message.
    fn default_message(owner: &Owner, pet: &Pet, visit: &Visit) -> String {
        format!(
            "Dear {},\n\nThis is a reminder that your pet {} has a {} scheduled on {}.\n\n\
             Please contact us if you need to reschedule.\n\nRegards,\nThe Pet Clinic Team",
            owner.full_name(),
            pet.name,
            visit.description,
            visit.date
        )
    }
}

#[async_trait]
impl ChannelSender for EmailSender {
    fn name(&self) -> &'static str {
        "email"
    }

    fn can_handle(&self, preference: ChannelPreference) -> bool {
        matches!(
            preference,
            ChannelPreference::Email | ChannelPreference::Both
        )
    }

    async fn send(&self, schedule: &mut NotificationSchedule, owner: &Owner) -> bool {
        if !self.can_handle(effective_preference(schedule, owner)) {
            debug!(
                owner_id = owner.id,
                schedule_id = schedule.id,
                "email sender cannot handle this reminder"
            );
            return false;
        }

        let Some(to_address) = owner.email_address() else {
            warn!(
                owner_id = owner.id,
                schedule_id = schedule.id,
                "cannot send email reminder: owner has no email address"
            );
            schedule.set_status(NotificationStatus::Failed);
            return false;
        };

        let Some((pet, visit)) = visit_context(schedule, owner) else {
            warn!(
                schedule_id = schedule.id,
                pet_id = schedule.pet_id,
                visit_id = schedule.visit_id,
                "cannot send email reminder: schedule references an unknown pet or visit"
            );
            schedule.set_status(NotificationStatus::Failed);
            return false;
        };

        let subject = format!("Pet Clinic Reminder: {}'s {}", pet.name, visit.description);
        let body = match &schedule.message {
            Some(message) if !message.trim().is_empty() => message.clone(),
            _ => Self::default_message(owner, pet, visit),
        };

        match self
            .mailer
            .send_mail(&self.from_address, to_address, &subject, &body)
            .await
        {
            Ok(()) => {
                schedule.set_status(NotificationStatus::Sent);
                info!(to = to_address, schedule_id = schedule.id, "email reminder sent");
                true
            }
            Err(cause) => {
                error!(
                    to = to_address,
                    schedule_id = schedule.id,
                    %cause,
                    "failed to send email reminder"
                );
                schedule.set_status(NotificationStatus::Failed);
                false
            }
        }
    }
}
