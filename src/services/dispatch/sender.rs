//! Channel sender contract.
//!
//! One implementation per delivery channel. The coordinator filters senders
//! by `can_handle`, but `send` re-checks on its own so the contract holds
//! standalone.

use async_trait::async_trait;

use crate::models::{ChannelPreference, NotificationSchedule, Owner, Pet, Visit};

/// A delivery channel for visit reminders.
///
/// `send` owns the status writes for its own attempt: it marks the schedule
/// `Sent` or `Failed` whenever it actually tries (or has to give up on)
/// delivery, and leaves status untouched only when the defensive
/// `can_handle` re-check rejects up front. Transport failures are converted
/// to the boolean result here and never propagate further.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &'static str;

    /// Whether this channel applies under the given effective preference.
    fn can_handle(&self, preference: ChannelPreference) -> bool;

    /// Attempts delivery of one reminder. Returns true only when the
    /// channel's transport accepted the message.
    async fn send(&self, schedule: &mut NotificationSchedule, owner: &Owner) -> bool;
}

/// Resolves the pet and visit a schedule refers to through the recipient's
/// graph. `None` when the owner does not own the pet or the pet has no such
/// visit — senders treat that as a local failure.
pub(crate) fn visit_context<'a>(
    schedule: &NotificationSchedule,
    owner: &'a Owner,
) -> Option<(&'a Pet, &'a Visit)> {
    let pet = owner.pet(schedule.pet_id)?;
    let visit = pet.visit(schedule.visit_id)?;
    Some((pet, visit))
}
