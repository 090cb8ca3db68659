//! Logging setup based on `tracing-subscriber`.
//!
//! Console output only, with a level filter and a choice of text or JSON
//! lines. Everything in the crate logs through `tracing` macros with
//! structured fields; this module only wires the subscriber.

use std::io::IsTerminal;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::config::LoggerConfig;

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Initialize the global tracing subscriber.
///
/// The level string accepts anything `EnvFilter` does, so both plain levels
/// ("debug") and targeted directives ("clinic_notify=debug,lettre=warn")
/// work. Fails if a subscriber is already installed.
pub fn init_logger(config: &LoggerConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let use_ansi = std::io::stdout().is_terminal();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(use_ansi);

    match config.format {
        LogFormat::Text => builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?,
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_deserializes_lowercase() {
        assert_eq!(
            serde_json::from_str::<LogFormat>("\"json\"").unwrap(),
            LogFormat::Json
        );
        assert_eq!(LogFormat::default(), LogFormat::Text);
    }
}
