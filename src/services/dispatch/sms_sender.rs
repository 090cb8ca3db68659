//! SMS channel sender.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::preference::effective_preference;
use super::sender::{ChannelSender, visit_context};
use crate::external::SmsGateway;
use crate::models::{ChannelPreference, NotificationSchedule, NotificationStatus, Owner, Pet, Visit};

/// Sends visit reminders as text messages through an SMS gateway.
pub struct SmsSender {
    gateway: Arc<dyn SmsGateway>,
    from_number: String,
}

impl SmsSender {
    /// Creates an SMS sender with its gateway port and sender number.
    pub fn new(gateway: Arc<dyn SmsGateway>, from_number: String) -> Self {
        Self {
            gateway,
            from_number,
        }
    }

    /// Default reminder text. Kept to a single line with an opt-out hint,
    /// reflecting the channel's length constraints.
    fn default_message(pet: &Pet, visit: &Visit) -> String {
        format!(
            "Pet Clinic Reminder: {} has a {} on {}. Reply HELP for assistance or STOP to unsubscribe.",
            pet.name, visit.description, visit.date
        )
    }

    /// Stored numbers without a country code are dialed as NANP; numbers
    /// already in E.164 pass through unchanged.
    fn dial_number(phone: &str) -> String {
        if phone.starts_with('+') {
            phone.to_string()
        } else {
            format!("+1{phone}")
        }
    }
}

#[async_trait]
impl ChannelSender for SmsSender {
    fn name(&self) -> &'static str {
        "sms"
    }

    fn can_handle(&self, preference: ChannelPreference) -> bool {
        matches!(preference, ChannelPreference::Sms | ChannelPreference::Both)
    }

    async fn send(&self, schedule: &mut NotificationSchedule, owner: &Owner) -> bool {
        if !self.can_handle(effective_preference(schedule, owner)) {
            debug!(
                owner_id = owner.id,
                schedule_id = schedule.id,
                "sms sender cannot handle this reminder"
            );
            return false;
        }

        let Some(phone) = owner.phone_number() else {
            warn!(
                owner_id = owner.id,
                schedule_id = schedule.id,
                "cannot send sms reminder: owner has no phone number"
            );
            schedule.set_status(NotificationStatus::Failed);
            return false;
        };

        let body = match &schedule.message {
            Some(message) if !message.trim().is_empty() => message.clone(),
            _ => {
                let Some((pet, visit)) = visit_context(schedule, owner) else {
                    warn!(
                        schedule_id = schedule.id,
                        pet_id = schedule.pet_id,
                        visit_id = schedule.visit_id,
                        "cannot send sms reminder: schedule references an unknown pet or visit"
                    );
                    schedule.set_status(NotificationStatus::Failed);
                    return false;
                };
                Self::default_message(pet, visit)
            }
        };

        let to_number = Self::dial_number(phone);
        match self
            .gateway
            .send_sms(&self.from_number, &to_number, &body)
            .await
        {
            Ok(delivery_status) => {
                schedule.set_status(NotificationStatus::Sent);
                info!(
                    to = %to_number,
                    schedule_id = schedule.id,
                    delivery_status = %delivery_status,
                    "sms reminder sent"
                );
                true
            }
            Err(cause) => {
                error!(
                    to = %to_number,
                    schedule_id = schedule.id,
                    %cause,
                    "failed to send sms reminder"
                );
                schedule.set_status(NotificationStatus::Failed);
                false
            }
        }
    }
}
