//! Notification schedule model and its enums.
//!
//! A `NotificationSchedule` is the unit of work for the dispatch engine: one
//! reminder, tied to a visit and a pet by id, carrying an optional
//! channel-preference override and an optional message override.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

/// Delivery channel preference.
///
/// Lives at two levels: the owner's default, and an optional per-schedule
/// override. `None` at the owner level is an absolute opt-out and cannot be
/// overridden by a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelPreference {
    Email,
    Sms,
    Both,
    None,
}

/// Status of a notification schedule.
///
/// `Pending` is the initial state; `Sent`, `Failed`, and `Skipped` are
/// terminal — the engine never transitions out of them automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Sent,
    Failed,
    Skipped,
}

impl NotificationStatus {
    /// Whether this status is a terminal outcome.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NotificationStatus::Pending)
    }
}

/// A scheduled visit reminder.
///
/// The referenced visit and pet are carried by stable identity only; the
/// display data needed for message synthesis is resolved through the
/// recipient's owner/pet/visit graph at send time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSchedule {
    pub id: i32,

    /// Per-schedule override of the owner's default preference.
    #[serde(default)]
    pub channel_preference: Option<ChannelPreference>,

    /// When the reminder should fire. Firing-time scheduling itself is the
    /// caller's concern; the engine only dispatches what it is handed.
    pub scheduled_time: DateTime,

    #[serde(default)]
    pub status: NotificationStatus,

    pub visit_id: i32,
    pub pet_id: i32,

    /// Message override. When absent or blank, each channel synthesizes its
    /// own default text.
    #[serde(default)]
    pub message: Option<String>,
}

impl NotificationSchedule {
    /// Creates a new schedule in the `Pending` state.
    pub fn new(
        id: i32,
        visit_id: i32,
        pet_id: i32,
        channel_preference: Option<ChannelPreference>,
        scheduled_time: DateTime,
        message: Option<String>,
    ) -> Self {
        Self {
            id,
            channel_preference,
            scheduled_time,
            status: NotificationStatus::Pending,
            visit_id,
            pet_id,
            message,
        }
    }

    /// Records a dispatch outcome. Plain last-writer-wins assignment: both
    /// the channel senders and the coordinator write through here, and the
    /// coordinator's safety-net `Failed` may overwrite a sender's `Failed`.
    pub fn set_status(&mut self, status: NotificationStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::datetime;

    fn schedule() -> NotificationSchedule {
        NotificationSchedule::new(1, 10, 20, None, datetime(2024, 4, 24, 9, 0, 0, 0), None)
    }

    #[test]
    fn new_schedule_starts_pending() {
        let schedule = schedule();
        assert_eq!(schedule.status, NotificationStatus::Pending);
        assert!(!schedule.status.is_terminal());
    }

    #[test]
    fn outcome_states_are_terminal() {
        for status in [
            NotificationStatus::Sent,
            NotificationStatus::Failed,
            NotificationStatus::Skipped,
        ] {
            assert!(status.is_terminal());
        }
    }

    #[test]
    fn set_status_is_last_writer_wins() {
        let mut schedule = schedule();
        schedule.set_status(NotificationStatus::Failed);
        schedule.set_status(NotificationStatus::Failed);
        assert_eq!(schedule.status, NotificationStatus::Failed);
        schedule.set_status(NotificationStatus::Sent);
        assert_eq!(schedule.status, NotificationStatus::Sent);
    }

    #[test]
    fn preference_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChannelPreference::Both).unwrap(),
            "\"both\""
        );
        assert_eq!(
            serde_json::from_str::<ChannelPreference>("\"none\"").unwrap(),
            ChannelPreference::None
        );
    }

    #[test]
    fn deserializing_without_status_defaults_to_pending() {
        let schedule: NotificationSchedule = serde_json::from_str(
            r#"{"id": 7, "scheduled_time": "2024-04-24T09:00:00", "visit_id": 1, "pet_id": 2}"#,
        )
        .unwrap();
        assert_eq!(schedule.status, NotificationStatus::Pending);
        assert_eq!(schedule.channel_preference, None);
        assert_eq!(schedule.message, None);
    }
}
