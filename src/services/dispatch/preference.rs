//! Effective-preference resolution.

use crate::models::{ChannelPreference, NotificationSchedule, Owner};

/// Resolves the channel preference for one dispatch attempt: the
/// schedule-level override when present, otherwise the owner's default.
///
/// Note that an owner-level opt-out is handled before this is consulted —
/// the coordinator checks the owner's raw preference, so a schedule override
/// cannot reach an opted-out recipient.
pub fn effective_preference(schedule: &NotificationSchedule, owner: &Owner) -> ChannelPreference {
    schedule
        .channel_preference
        .unwrap_or(owner.notification_preference)
}
