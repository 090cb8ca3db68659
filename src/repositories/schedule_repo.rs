//! Notification schedule persistence port and in-memory backend.
//!
//! The dispatch core mutates schedule status in memory on the values it is
//! handed; persisting those mutations through this port after
//! `dispatch`/`process_all` return is the caller's responsibility.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::AppResult;
use crate::models::{NotificationSchedule, NotificationStatus};

/// Persistence port for notification schedules.
///
/// A durable implementation lives with whatever store the deployment uses;
/// the engine only needs these five operations.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Retrieve a schedule by its id.
    async fn find_by_id(&self, id: i32) -> AppResult<Option<NotificationSchedule>>;

    /// Save a schedule, replacing any stored version with the same id.
    async fn save(&self, schedule: &NotificationSchedule) -> AppResult<()>;

    /// Find all schedules still in the `Pending` state.
    async fn find_pending(&self) -> AppResult<Vec<NotificationSchedule>>;

    /// Find schedules for a specific visit.
    async fn find_by_visit_id(&self, visit_id: i32) -> AppResult<Vec<NotificationSchedule>>;

    /// Find schedules for a specific pet.
    async fn find_by_pet_id(&self, pet_id: i32) -> AppResult<Vec<NotificationSchedule>>;
}

/// Concurrent in-memory backend, used by the CLI roster runs and by tests.
#[derive(Default)]
pub struct InMemoryScheduleRepository {
    schedules: DashMap<i32, NotificationSchedule>,
}

impl InMemoryScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored schedule, ordered by id.
    pub fn all(&self) -> Vec<NotificationSchedule> {
        let mut schedules: Vec<_> = self
            .schedules
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        schedules.sort_by_key(|schedule| schedule.id);
        schedules
    }

    fn filtered<F>(&self, predicate: F) -> Vec<NotificationSchedule>
    where
        F: Fn(&NotificationSchedule) -> bool,
    {
        let mut schedules: Vec<_> = self
            .schedules
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        schedules.sort_by_key(|schedule| schedule.id);
        schedules
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<NotificationSchedule>> {
        Ok(self.schedules.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, schedule: &NotificationSchedule) -> AppResult<()> {
        self.schedules.insert(schedule.id, schedule.clone());
        Ok(())
    }

    async fn find_pending(&self) -> AppResult<Vec<NotificationSchedule>> {
        Ok(self.filtered(|schedule| schedule.status == NotificationStatus::Pending))
    }

    async fn find_by_visit_id(&self, visit_id: i32) -> AppResult<Vec<NotificationSchedule>> {
        Ok(self.filtered(|schedule| schedule.visit_id == visit_id))
    }

    async fn find_by_pet_id(&self, pet_id: i32) -> AppResult<Vec<NotificationSchedule>> {
        Ok(self.filtered(|schedule| schedule.pet_id == pet_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::datetime;

    fn schedule(id: i32, visit_id: i32, pet_id: i32) -> NotificationSchedule {
        NotificationSchedule::new(
            id,
            visit_id,
            pet_id,
            None,
            datetime(2024, 4, 24, 9, 0, 0, 0),
            None,
        )
    }

    #[tokio::test]
    async fn save_then_find_by_id_round_trips() {
        let repo = InMemoryScheduleRepository::new();
        let stored = schedule(1, 10, 20);
        repo.save(&stored).await.unwrap();

        let found = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_existing_entry() {
        let repo = InMemoryScheduleRepository::new();
        let mut stored = schedule(1, 10, 20);
        repo.save(&stored).await.unwrap();

        stored.set_status(NotificationStatus::Sent);
        repo.save(&stored).await.unwrap();

        let found = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.status, NotificationStatus::Sent);
    }

    #[tokio::test]
    async fn find_pending_filters_terminal_schedules() {
        let repo = InMemoryScheduleRepository::new();
        repo.save(&schedule(2, 10, 20)).await.unwrap();
        repo.save(&schedule(1, 11, 21)).await.unwrap();

        let mut sent = schedule(3, 12, 22);
        sent.set_status(NotificationStatus::Sent);
        repo.save(&sent).await.unwrap();

        let pending = repo.find_pending().await.unwrap();
        assert_eq!(
            pending.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[tokio::test]
    async fn finds_by_visit_and_pet() {
        let repo = InMemoryScheduleRepository::new();
        repo.save(&schedule(1, 10, 20)).await.unwrap();
        repo.save(&schedule(2, 10, 21)).await.unwrap();
        repo.save(&schedule(3, 11, 20)).await.unwrap();

        let by_visit = repo.find_by_visit_id(10).await.unwrap();
        assert_eq!(by_visit.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);

        let by_pet = repo.find_by_pet_id(20).await.unwrap();
        assert_eq!(by_pet.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3]);
    }
}
