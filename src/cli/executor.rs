//! Command execution.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cli::parser::{Cli, Commands};
use crate::config::{ConfigLoader, Settings};
use crate::logger::init_logger;
use crate::models::{NotificationSchedule, NotificationStatus, Owner};
use crate::repositories::InMemoryScheduleRepository;
use crate::services::dispatch::{self, DispatchCoordinator};
use crate::services::{BatchProcessor, ScheduleService};

/// Input document for the `process` command: the recipient universe plus
/// the schedules to run.
#[derive(Debug, Serialize, Deserialize)]
pub struct Roster {
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub schedules: Vec<NotificationSchedule>,
}

/// Loads configuration, installs the logger, and runs the parsed command.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut loader = ConfigLoader::from_env();
    if let Some(ref env) = cli.env {
        loader = loader.with_environment(env.parse()?);
    }
    if let Some(ref path) = cli.config {
        loader = loader.with_config_file(path.clone());
    }
    let mut settings = loader.load()?;

    if cli.verbose {
        settings.logger.level = "debug".to_string();
    } else if cli.quiet {
        settings.logger.level = "error".to_string();
    }
    init_logger(&settings.logger)?;

    match cli.command {
        Commands::Process { roster, output } => {
            process(&settings, &roster, output.as_deref()).await
        }
        Commands::CheckConfig => check_config(&settings),
    }
}

/// Runs every pending schedule in the roster through the dispatch engine.
async fn process(
    settings: &Settings,
    roster_path: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let raw = fs::read_to_string(roster_path)
        .with_context(|| format!("failed to read roster file {}", roster_path.display()))?;
    let roster: Roster = serde_json::from_str(&raw)
        .with_context(|| format!("roster file {} is not valid JSON", roster_path.display()))?;

    let repo = Arc::new(InMemoryScheduleRepository::new());
    let service = ScheduleService::new(repo.clone());
    for schedule in &roster.schedules {
        service.save(schedule).await?;
    }

    let processor = BatchProcessor::new(DispatchCoordinator::new(dispatch::standard_senders(
        settings,
    )?));

    let mut pending = service.find_pending().await?;
    info!(
        pending = pending.len(),
        owners = roster.owners.len(),
        "dispatching pending reminders"
    );
    let sent = processor.process_all(&mut pending, &roster.owners).await;

    // The engine mutates status in memory; persisting is on us.
    for schedule in &pending {
        service.save(schedule).await?;
    }

    let failed = pending
        .iter()
        .filter(|s| s.status == NotificationStatus::Failed)
        .count();
    let skipped = pending
        .iter()
        .filter(|s| s.status == NotificationStatus::Skipped)
        .count();
    println!(
        "Processed {} pending reminders: {} sent, {} failed, {} skipped",
        pending.len(),
        sent,
        failed,
        skipped
    );

    if let Some(path) = output {
        let all = repo.all();
        let json = serde_json::to_string_pretty(&all)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Updated schedules written to {}", path.display());
    }

    Ok(())
}

/// Prints the effective configuration with secrets redacted.
///
/// Validation already happened during loading, so reaching this point means
/// the configuration is usable.
fn check_config(settings: &Settings) -> anyhow::Result<()> {
    let mut redacted = settings.clone();
    if !redacted.smtp.password.is_empty() {
        redacted.smtp.password = "***".to_string();
    }
    if !redacted.sms.auth_token.is_empty() {
        redacted.sms.auth_token = "***".to_string();
    }

    println!("{}", serde_json::to_string_pretty(&redacted)?);
    println!("Configuration OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChannelPreference;

    const ROSTER: &str = r#"{
        "owners": [{
            "id": 1,
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane.doe@example.com",
            "notification_preference": "none",
            "pets": [{
                "id": 7,
                "name": "Rex",
                "visits": [{"id": 3, "date": "2024-05-01", "description": "vaccination"}]
            }]
        }],
        "schedules": [{
            "id": 1,
            "scheduled_time": "2024-04-24T09:00:00",
            "visit_id": 3,
            "pet_id": 7,
            "channel_preference": "email"
        }]
    }"#;

    #[test]
    fn roster_deserializes_with_defaults() {
        let roster: Roster = serde_json::from_str(ROSTER).unwrap();
        assert_eq!(roster.owners.len(), 1);
        assert_eq!(
            roster.owners[0].notification_preference,
            ChannelPreference::None
        );
        assert_eq!(roster.schedules[0].status, NotificationStatus::Pending);
    }

    #[tokio::test]
    async fn process_writes_updated_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let roster_path = dir.path().join("roster.json");
        let output_path = dir.path().join("out.json");
        fs::write(&roster_path, ROSTER).unwrap();

        // The only owner is opted out, so the run touches no transport.
        process(&Settings::default(), &roster_path, Some(&output_path))
            .await
            .unwrap();

        let written: Vec<NotificationSchedule> =
            serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].status, NotificationStatus::Skipped);
    }
}
