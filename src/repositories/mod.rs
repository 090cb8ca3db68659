//! Repository layer: the persistence port consumed by the engine.

mod schedule_repo;

pub use schedule_repo::{InMemoryScheduleRepository, ScheduleRepository};
