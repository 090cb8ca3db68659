//! Dispatch coordination across the registered channel senders.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::preference::effective_preference;
use super::sender::ChannelSender;
use crate::models::{ChannelPreference, NotificationSchedule, NotificationStatus, Owner};

/// Fans one reminder out to every applicable channel and aggregates the
/// outcomes.
///
/// The sender list is assembled explicitly at startup; there is no runtime
/// discovery. Status is written at the point of attempt by each sender, so a
/// partial crash after one channel succeeded still leaves an accurate
/// terminal state. The coordinator re-asserts the aggregate outcome at the
/// end: `Sent` when any channel delivered, `Failed` when none was applicable
/// or none succeeded. All of these writes are idempotent last-writer-wins
/// assignments to the same field.
pub struct DispatchCoordinator {
    senders: Vec<Arc<dyn ChannelSender>>,
}

impl DispatchCoordinator {
    /// Creates a coordinator over the given sender list.
    pub fn new(senders: Vec<Arc<dyn ChannelSender>>) -> Self {
        Self { senders }
    }

    /// Dispatches one reminder to its recipient.
    ///
    /// Returns true when at least one channel delivered. An absent recipient
    /// is reported without touching the schedule; an opted-out recipient
    /// short-circuits to `Skipped` before any schedule-level override is
    /// consulted.
    pub async fn dispatch(
        &self,
        schedule: &mut NotificationSchedule,
        owner: Option<&Owner>,
    ) -> bool {
        let Some(owner) = owner else {
            error!(
                schedule_id = schedule.id,
                "cannot dispatch reminder: no recipient"
            );
            return false;
        };

        if owner.notification_preference == ChannelPreference::None {
            info!(
                owner_id = owner.id,
                schedule_id = schedule.id,
                "owner has opted out of reminders"
            );
            schedule.set_status(NotificationStatus::Skipped);
            return false;
        }

        let preference = effective_preference(schedule, owner);

        let mut delivered = false;
        for sender in &self.senders {
            if sender.can_handle(preference) {
                let success = sender.send(schedule, owner).await;
                delivered = delivered || success;
            }
        }

        if delivered {
            // Re-assert the aggregate outcome: a channel that failed after
            // another one succeeded must not leave its `Failed` write as the
            // last one on the schedule.
            schedule.set_status(NotificationStatus::Sent);
        } else {
            warn!(
                schedule_id = schedule.id,
                owner_id = owner.id,
                preference = ?preference,
                "no channel delivered the reminder"
            );
            schedule.set_status(NotificationStatus::Failed);
        }

        delivered
    }
}
