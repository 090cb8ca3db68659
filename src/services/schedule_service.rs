//! Schedule management over the persistence port.
//!
//! Creating schedules and querying/updating them is orchestration around the
//! repository; the dispatch engine itself never touches the store.

use std::sync::Arc;

use jiff::civil::DateTime;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{ChannelPreference, NotificationSchedule, NotificationStatus};
use crate::repositories::ScheduleRepository;

/// Service for managing notification schedules.
#[derive(Clone)]
pub struct ScheduleService {
    repo: Arc<dyn ScheduleRepository>,
}

impl ScheduleService {
    /// Creates a new ScheduleService over a repository.
    pub fn new(repo: Arc<dyn ScheduleRepository>) -> Self {
        Self { repo }
    }

    /// Creates and persists a new reminder for a visit, in the `Pending`
    /// state.
    pub async fn schedule_notification(
        &self,
        id: i32,
        visit_id: i32,
        pet_id: i32,
        channel_preference: Option<ChannelPreference>,
        scheduled_time: DateTime,
        message: Option<String>,
    ) -> AppResult<NotificationSchedule> {
        let schedule = NotificationSchedule::new(
            id,
            visit_id,
            pet_id,
            channel_preference,
            scheduled_time,
            message,
        );
        self.repo.save(&schedule).await?;
        debug!(schedule_id = id, visit_id, pet_id, "reminder scheduled");
        Ok(schedule)
    }

    /// Finds a schedule by its id.
    pub async fn find_by_id(&self, id: i32) -> AppResult<NotificationSchedule> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "notification_schedule".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            })
    }

    /// Finds all pending schedules.
    pub async fn find_pending(&self) -> AppResult<Vec<NotificationSchedule>> {
        self.repo.find_pending().await
    }

    /// Finds schedules for a specific visit.
    pub async fn find_by_visit(&self, visit_id: i32) -> AppResult<Vec<NotificationSchedule>> {
        self.repo.find_by_visit_id(visit_id).await
    }

    /// Finds schedules for a specific pet.
    pub async fn find_by_pet(&self, pet_id: i32) -> AppResult<Vec<NotificationSchedule>> {
        self.repo.find_by_pet_id(pet_id).await
    }

    /// Updates the status of a stored schedule and persists the change.
    pub async fn update_status(
        &self,
        id: i32,
        status: NotificationStatus,
    ) -> AppResult<NotificationSchedule> {
        let mut schedule = self.find_by_id(id).await?;
        schedule.set_status(status);
        self.repo.save(&schedule).await?;
        Ok(schedule)
    }

    /// Persists a schedule the dispatch engine mutated in memory.
    pub async fn save(&self, schedule: &NotificationSchedule) -> AppResult<()> {
        self.repo.save(schedule).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryScheduleRepository;
    use jiff::civil::datetime;

    fn service() -> ScheduleService {
        ScheduleService::new(Arc::new(InMemoryScheduleRepository::new()))
    }

    #[tokio::test]
    async fn schedule_notification_persists_pending() {
        let service = service();
        let created = service
            .schedule_notification(
                1,
                3,
                7,
                Some(ChannelPreference::Email),
                datetime(2024, 4, 24, 9, 0, 0, 0),
                None,
            )
            .await
            .unwrap();
        assert_eq!(created.status, NotificationStatus::Pending);

        let found = service.find_by_id(1).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn find_by_id_reports_not_found() {
        let service = service();
        let err = service.find_by_id(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_status_persists_the_transition() {
        let service = service();
        service
            .schedule_notification(1, 3, 7, None, datetime(2024, 4, 24, 9, 0, 0, 0), None)
            .await
            .unwrap();

        let updated = service
            .update_status(1, NotificationStatus::Sent)
            .await
            .unwrap();
        assert_eq!(updated.status, NotificationStatus::Sent);
        assert!(service.find_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn queries_filter_by_visit_and_pet() {
        let service = service();
        let when = datetime(2024, 4, 24, 9, 0, 0, 0);
        service
            .schedule_notification(1, 3, 7, None, when, None)
            .await
            .unwrap();
        service
            .schedule_notification(2, 4, 7, None, when, None)
            .await
            .unwrap();
        service
            .schedule_notification(3, 3, 8, None, when, None)
            .await
            .unwrap();

        let by_visit = service.find_by_visit(3).await.unwrap();
        assert_eq!(by_visit.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3]);

        let by_pet = service.find_by_pet(7).await.unwrap();
        assert_eq!(by_pet.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
