//! Service layer: the dispatch engine and schedule management.

pub mod dispatch;
mod schedule_service;

pub use dispatch::{BatchProcessor, DispatchCoordinator};
pub use schedule_service::ScheduleService;
