//! Batch processing of pending reminders.

use tracing::{info, warn};

use super::coordinator::DispatchCoordinator;
use crate::models::{NotificationSchedule, NotificationStatus, Owner};

/// Runs a batch of schedules against the recipient universe.
///
/// Schedules are independent units of work: they are processed strictly in
/// input order, and nothing is shared across them beyond the sent counter.
pub struct BatchProcessor {
    coordinator: DispatchCoordinator,
}

impl BatchProcessor {
    /// Creates a batch processor over a dispatch coordinator.
    pub fn new(coordinator: DispatchCoordinator) -> Self {
        Self { coordinator }
    }

    /// Dispatches every schedule, resolving each recipient as the owner of
    /// the schedule's pet. A schedule whose recipient cannot be resolved is
    /// marked `Failed` and the batch continues. Returns the number of
    /// schedules that reached `Sent`.
    pub async fn process_all(
        &self,
        schedules: &mut [NotificationSchedule],
        owners: &[Owner],
    ) -> usize {
        let mut sent_count = 0;

        for schedule in schedules.iter_mut() {
            match find_owner_for_pet(schedule.pet_id, owners) {
                Some(owner) => {
                    if self.coordinator.dispatch(schedule, Some(owner)).await {
                        sent_count += 1;
                    }
                }
                None => {
                    warn!(
                        schedule_id = schedule.id,
                        pet_id = schedule.pet_id,
                        "could not find owner for pet"
                    );
                    schedule.set_status(NotificationStatus::Failed);
                }
            }
        }

        info!(
            total = schedules.len(),
            sent = sent_count,
            "reminder batch processed"
        );
        sent_count
    }
}

/// Scans the recipient collection for the owner of the given pet.
fn find_owner_for_pet(pet_id: i32, owners: &[Owner]) -> Option<&Owner> {
    owners.iter().find(|owner| owner.pet(pet_id).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChannelPreference;
    use crate::services::dispatch::testing::{
        MockMailer, MockSmsGateway, coordinator_with, owner_jane, reminder_schedule,
    };

    fn processor(mailer: MockMailer, gateway: MockSmsGateway) -> BatchProcessor {
        let (coordinator, _, _) = coordinator_with(mailer, gateway);
        BatchProcessor::new(coordinator)
    }

    #[tokio::test]
    async fn counts_only_sent_schedules() {
        let processor = processor(MockMailer::default(), MockSmsGateway::default());
        let owners = vec![
            owner_jane(ChannelPreference::Email),
            owner_jane(ChannelPreference::None),
        ];
        // Both schedules point at Jane's pet; the first owner in the scan
        // wins, so both dispatch against the email-preferring Jane.
        let mut schedules = vec![reminder_schedule(1), reminder_schedule(2)];

        let sent = processor.process_all(&mut schedules, &owners).await;
        assert_eq!(sent, 2);
        assert!(schedules
            .iter()
            .all(|s| s.status == NotificationStatus::Sent));
    }

    #[tokio::test]
    async fn unresolvable_recipient_fails_locally_and_batch_continues() {
        let processor = processor(MockMailer::default(), MockSmsGateway::default());
        let owners = vec![owner_jane(ChannelPreference::Email)];

        let mut orphan = reminder_schedule(2);
        orphan.pet_id = 99;
        let mut schedules = vec![reminder_schedule(1), orphan, reminder_schedule(3)];

        let sent = processor.process_all(&mut schedules, &owners).await;
        assert_eq!(sent, 2);
        assert_eq!(schedules[0].status, NotificationStatus::Sent);
        assert_eq!(schedules[1].status, NotificationStatus::Failed);
        assert_eq!(schedules[2].status, NotificationStatus::Sent);
    }

    #[tokio::test]
    async fn mixed_outcomes_tally_in_input_order() {
        let processor = processor(MockMailer::failing(), MockSmsGateway::default());

        let mut jane = owner_jane(ChannelPreference::Email);
        jane.id = 1;
        let mut opted_out = owner_jane(ChannelPreference::None);
        opted_out.id = 2;
        opted_out.pets[0].id = 8;
        let owners = vec![jane, opted_out];

        // Schedule 1: email only, mailer failing -> Failed.
        // Schedule 2: opted-out owner -> Skipped.
        // Schedule 3: override to SMS -> Sent.
        let mut skipped = reminder_schedule(2);
        skipped.pet_id = 8;
        let mut by_sms = reminder_schedule(3);
        by_sms.channel_preference = Some(ChannelPreference::Sms);
        let mut schedules = vec![reminder_schedule(1), skipped, by_sms];

        let sent = processor.process_all(&mut schedules, &owners).await;
        assert_eq!(sent, 1);
        assert_eq!(schedules[0].status, NotificationStatus::Failed);
        assert_eq!(schedules[1].status, NotificationStatus::Skipped);
        assert_eq!(schedules[2].status, NotificationStatus::Sent);
    }

    #[tokio::test]
    async fn empty_batch_returns_zero() {
        let processor = processor(MockMailer::default(), MockSmsGateway::default());
        let sent = processor.process_all(&mut [], &[]).await;
        assert_eq!(sent, 0);
    }
}
