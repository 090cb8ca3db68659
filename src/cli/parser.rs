//! CLI argument parsing with clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Multi-channel visit-reminder dispatch engine
#[derive(Parser, Debug)]
#[command(name = "clinic-notify")]
#[command(about = "Dispatch visit reminders over email and SMS")]
#[command(long_about = "
Clinic-notify dispatches scheduled visit reminders to pet owners over their
preferred channels (email, SMS or both), with at-least-one-success
aggregation and an auditable terminal status per reminder.

EXAMPLES:
    # Dispatch every pending reminder in a roster file
    clinic-notify process roster.json

    # Same, persisting the updated statuses
    clinic-notify process roster.json --output processed.json

    # Use a single configuration file instead of the layered config/ dir
    clinic-notify --config /etc/clinic-notify/production.toml process roster.json

    # Validate configuration without sending anything
    clinic-notify check-config
")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Uses a single TOML file instead of the layered configuration
    /// directory. Environment variables still take precedence.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Available values: development (dev), test, production (prod)
    #[arg(short, long, value_name = "ENV", global = true)]
    pub env: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch all pending reminders from a roster file
    ///
    /// The roster is a JSON document with an `owners` array (the recipient
    /// universe, including each owner's pets and visits) and a `schedules`
    /// array. Every schedule still in the pending state is dispatched; the
    /// command reports how many ended up sent, failed and skipped.
    Process {
        /// JSON roster containing owners and schedules
        #[arg(value_name = "FILE")]
        roster: PathBuf,

        /// Write the schedules, with their updated statuses, to this file
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Validate configuration and print the effective settings
    ///
    /// Secrets are redacted. Exits non-zero when the configuration does not
    /// validate, so this doubles as a deployment preflight check.
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_process_with_output() {
        let cli = Cli::try_parse_from([
            "clinic-notify",
            "process",
            "roster.json",
            "--output",
            "out.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Process { roster, output } => {
                assert_eq!(roster, PathBuf::from("roster.json"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli =
            Cli::try_parse_from(["clinic-notify", "check-config", "--env", "prod", "--verbose"])
                .unwrap();
        assert!(matches!(cli.command, Commands::CheckConfig));
        assert_eq!(cli.env.as_deref(), Some("prod"));
        assert!(cli.verbose);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["clinic-notify", "check-config", "-v", "-q"]).is_err());
    }
}
