//! Preview server configuration (`mdlive.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── cache      # [cache], [timing]
//! │   ├── converter  # [converter]
//! │   ├── paths      # [paths]
//! │   └── serve      # [serve]
//! ├── error          # ConfigError
//! └── mod.rs         # PreviewConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                         |
//! |----------------|-------------------------------------------------|
//! | `[serve]`      | Viewer WebSocket interface and port             |
//! | `[paths]`      | Home directory, runtime directory, viewer pages |
//! | `[converter]`  | Converter program, input format, math method    |
//! | `[cache]`      | Memo table capacities                           |
//! | `[timing]`     | Cool-down and progress tick intervals           |
//!
//! The file is optional: without one every section takes its defaults, and
//! CLI flags override whatever the file says.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{CacheConfig, ConverterConfig, PathsConfig, ServeConfig, TimingConfig};

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "mdlive.toml";

/// Root configuration structure representing mdlive.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Absolute path to the config file, if one was loaded (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    pub serve: ServeConfig,
    pub paths: PathsConfig,
    pub converter: ConverterConfig,
    pub cache: CacheConfig,
    pub timing: TimingConfig,
}

impl PreviewConfig {
    /// Load configuration from CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match &cli.config {
            Some(path) => Some(cwd.join(path)),
            None => Some(cwd.join(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        let base = config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or(cwd);

        config.config_path = config_path;
        config.apply_cli(cli);
        config.paths.expand(&base);
        config.validate()?;
        config.validate_converter()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored): {}", display_path, fields.join(", "));
    }

    /// CLI flags win over file values.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(port) = cli.port {
            self.serve.port = port;
        }
        if let Some(home) = &cli.home {
            self.paths.home = home.clone();
        }
        if let Some(math) = &cli.math {
            self.converter.math = math.clone();
        }
        if let Some(program) = &cli.converter {
            self.converter.program = program.clone();
        }
    }

    /// Check values that do not depend on the environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let empty = self.cache.empty_tables();
        if !empty.is_empty() {
            return Err(ConfigError::Validation(format!(
                "cache capacity must be at least 1: {}",
                empty.join(", ")
            )));
        }
        if self.converter.program.trim().is_empty() {
            return Err(ConfigError::Validation("converter.program is empty".into()));
        }
        if self.converter.math.trim().is_empty() {
            return Err(ConfigError::Validation("converter.math is empty".into()));
        }
        Ok(())
    }

    /// Make sure the converter can actually be started.
    fn validate_converter(&self) -> Result<(), ConfigError> {
        which::which(&self.converter.program).map_err(|_| {
            ConfigError::Validation(format!(
                "converter `{}` not found on PATH",
                self.converter.program
            ))
        })?;
        if !self.paths.home.is_dir() {
            return Err(ConfigError::Validation(format!(
                "home directory `{}` does not exist",
                self.paths.home.display()
            )));
        }
        Ok(())
    }
}

/// Parse a config snippet for tests, asserting there are no unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PreviewConfig {
    let (parsed, ignored) = PreviewConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
