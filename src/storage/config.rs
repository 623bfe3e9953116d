//! Configuration handling for tasklist
//!
//! Configuration is stored in `.tasklist/config.toml` (project) and
//! `~/.config/tasklist/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::slot::DEFAULT_MAX_SLOT_BYTES;
use crate::domain::{ClockIds, Filter, IdGenerator, SequentialIds};

/// Name of the per-project directory
pub const PROJECT_DIR: &str = ".tasklist";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// How new todo IDs are generated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Millisecond creation timestamps
    #[default]
    Clock,
    /// 1, 2, 3, ...
    Sequential,
}

impl IdStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            IdStrategy::Clock => "clock",
            IdStrategy::Sequential => "sequential",
        }
    }

    /// Builds the generator for this strategy
    pub fn generator(&self) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Clock => Box::new(ClockIds::new()),
            IdStrategy::Sequential => Box::new(SequentialIds::new()),
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Filter applied by `list` and the TUI when none is given
    pub default_filter: Filter,

    /// Largest payload the todo slot may hold
    pub max_slot_bytes: usize,

    /// ID generation strategy
    pub id_strategy: IdStrategy,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_filter: Filter::All,
            max_slot_bytes: DEFAULT_MAX_SLOT_BYTES,
            id_strategy: IdStrategy::Clock,
        }
    }
}

impl ProjectConfig {
    /// Rejects values that parse but make no sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_slot_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_slot_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = match Self::find_project_root() {
            Some(root) => Self::load_project_config(&root)?,
            None => ProjectConfig::default(),
        };

        Ok(Self { project, global })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self { project, global })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "tasklist", "tasklist")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config.validate().context("Invalid project config")?;
        Ok(config)
    }

    /// Finds the project root by looking for a `.tasklist/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    /// Walks up from `start` looking for a `.tasklist/` directory
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}
