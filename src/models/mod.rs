//! Domain models for the reminder dispatch engine.

mod owner;
mod schedule;

pub use owner::{Owner, Pet, Visit};
pub use schedule::{ChannelPreference, NotificationSchedule, NotificationStatus};
