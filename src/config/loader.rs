//! Configuration loader for clinic-notify
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::{Config, ConfigBuilder, Environment as EnvSource, File, FileFormat};

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for the configuration directory
const CONFIG_DIR_ENV: &str = "CLINIC_CONFIG_DIR";

/// Environment variable for a single configuration file
const CONFIG_FILE_ENV: &str = "CLINIC_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "CLINIC";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader that handles layered configuration loading
///
/// Sources, in order of priority:
/// 1. `default.toml` — base defaults (required in layered mode)
/// 2. `{environment}.toml` — environment-specific overrides (optional)
/// 3. `local.toml` — local development overrides (optional)
/// 4. `CLINIC__*` environment variables (highest priority)
///
/// When a single configuration file is set (via `CLINIC_CONFIG_FILE` or the
/// CLI), it replaces the layered file stack; environment variables still
/// apply on top.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: Environment,
}

impl ConfigLoader {
    /// Create a loader from process environment variables.
    pub fn from_env() -> Self {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        Self {
            config_dir,
            config_file,
            environment: Environment::from_env(),
        }
    }

    /// Override the configuration file, switching to single-file mode.
    pub fn with_config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    /// Override the detected application environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Get the current application environment
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Load and validate configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, parsing
    /// fails, or the resulting settings fail validation.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let mut builder = Config::builder();

        if let Some(ref config_file) = self.config_file {
            builder = Self::add_file(builder, config_file, true)?;
        } else {
            builder = self.add_layered_files(builder)?;
        }

        // Environment variables always win over files.
        builder = builder.add_source(
            EnvSource::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

        builder.build().map_err(ConfigError::from)
    }

    fn add_layered_files(
        &self,
        mut builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder = Self::add_file(builder, &self.config_dir.join("default.toml"), false)?;
        builder = Self::add_file(
            builder,
            &self
                .config_dir
                .join(format!("{}.toml", self.environment.as_str())),
            false,
        )?;
        builder = Self::add_file(builder, &self.config_dir.join("local.toml"), false)?;
        Ok(builder)
    }

    fn add_file(
        builder: ConfigBuilder<config::builder::DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }
        Ok(builder.add_source(
            File::from(path.to_path_buf())
                .format(FileFormat::Toml)
                .required(required),
        ))
    }
}
