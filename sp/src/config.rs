//! studyplan configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::schedule::clamp_steps;

/// Main studyplan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Scheduling defaults
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// An explicit path must load. Otherwise `./.studyplan.yml` and then the
    /// user config file are tried; an unreadable file is logged and skipped.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            let config =
                Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()))?;
            return config.validated();
        }

        match Self::load_first(&Self::search_paths()) {
            Some(config) => config.validated(),
            None => {
                tracing::info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Project-local file first, then ~/.config/studyplan/studyplan.yml
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".studyplan.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("studyplan").join("studyplan.yml"));
        }
        paths
    }

    fn load_first(paths: &[PathBuf]) -> Option<Self> {
        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return Some(config),
                Err(e) => tracing::warn!("Failed to load config from {}: {:#}", path.display(), e),
            }
        }
        None
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    fn validated(self) -> Result<Self> {
        if self.storage.db_path.as_os_str().is_empty() {
            eyre::bail!("storage.db-path must not be empty");
        }
        let steps = self.schedule.steps();
        if i64::from(steps) != self.schedule.default_steps {
            tracing::warn!(
                configured = self.schedule.default_steps,
                steps,
                "schedule.default-steps outside {}-{}, clamped",
                crate::MIN_STEPS,
                crate::MAX_STEPS
            );
        }
        Ok(self)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(rename = "db-path")]
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("studyplan")
                .join("studyplan.db"),
        }
    }
}

/// Scheduling defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Step count used when `plan generate` is run without `--steps`
    #[serde(rename = "default-steps")]
    pub default_steps: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            default_steps: i64::from(crate::DEFAULT_STEPS),
        }
    }
}

impl ScheduleConfig {
    /// Default step count, clamped like any requested count
    pub fn steps(&self) -> u32 {
        clamp_steps(self.default_steps)
    }
}
