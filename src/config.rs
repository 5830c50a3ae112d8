//! Board configuration and app data paths
//!
//! Defaults are baked in at build time by `build.rs`, then overridden by
//! `config.json` in the app data directory, then by `POTLUCK_*` environment
//! variables.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::controller::FailurePolicy;
use crate::error::SyncError;

const BUILD_TARGET: &str = env!("POTLUCK_BUILD_TARGET");
const BUILD_DEVELOPMENT_URL: &str = env!("POTLUCK_BUILD_DEVELOPMENT_URL");
const BUILD_PRODUCTION_URL: &str = env!("POTLUCK_BUILD_PRODUCTION_URL");

/// Used when the build did not provide a development URL
pub const FALLBACK_DEVELOPMENT_URL: &str = "http://localhost:8000";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Gets the application data directory
pub fn get_app_data_dir() -> Result<PathBuf, SyncError> {
    dirs::data_dir()
        .map(|p| p.join("com.potluck.board"))
        .ok_or_else(|| SyncError::Config("Could not find app data directory".to_string()))
}

/// Gets the configuration file path
pub fn get_config_path() -> Result<PathBuf, SyncError> {
    get_app_data_dir().map(|p| p.join("config.json"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Development => f.write_str("development"),
            Target::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Target::Development),
            "production" | "prod" => Ok(Target::Production),
            other => Err(format!("Unknown target: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target: Target,
    pub development_url: String,
    pub production_url: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    /// Prefill forms and keep them filled after submitting
    pub seed_mode: bool,
    pub failure_policy: FailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        let development_url = if BUILD_DEVELOPMENT_URL.is_empty() {
            FALLBACK_DEVELOPMENT_URL
        } else {
            BUILD_DEVELOPMENT_URL
        };
        Self {
            target: BUILD_TARGET.parse().unwrap_or_default(),
            development_url: development_url.to_string(),
            production_url: BUILD_PRODUCTION_URL.to_string(),
            api_key: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            seed_mode: false,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Config {
    /// Loads the config file from the app data directory and applies the environment
    pub fn load() -> Result<Self, SyncError> {
        let mut config = Self::load_from(&get_config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Like [`Config::load`], but an unreadable file falls back to the
    /// defaults. Environment overrides apply either way.
    pub fn load_or_default() -> Self {
        Self::load_or_default_with(get_config_path(), |key| std::env::var(key).ok())
    }

    fn load_or_default_with(
        path: Result<PathBuf, SyncError>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = path
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_else(|e| {
                warn!("[config] {}, using defaults", e);
                Self::default()
            });
        config.apply_overrides(var);
        config
    }

    /// Reads a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, SyncError> {
        if !path.exists() {
            info!("[config] No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| SyncError::Config(format!("Failed to read config: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| SyncError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self) -> Result<(), SyncError> {
        self.save_to(&get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SyncError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::Config(format!("Failed to create directory: {}", e)))?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SyncError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)
            .map_err(|e| SyncError::Config(format!("Failed to save config: {}", e)))
    }

    /// Applies `POTLUCK_*` overrides looked up through `var`.
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = var("POTLUCK_TARGET") {
            match raw.parse() {
                Ok(target) => self.target = target,
                Err(e) => warn!("[config] Ignoring POTLUCK_TARGET: {}", e),
            }
        }
        if let Some(url) = var("POTLUCK_BASE_URL").filter(|u| !u.trim().is_empty()) {
            let url = url.trim().to_string();
            match self.target {
                Target::Development => self.development_url = url,
                Target::Production => self.production_url = url,
            }
        }
        if let Some(key) = var("POTLUCK_API_KEY") {
            self.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(raw) = var("POTLUCK_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => warn!("[config] Ignoring POTLUCK_TIMEOUT_SECS={}", raw),
            }
        }
        if let Some(raw) = var("POTLUCK_SEED_MODE") {
            match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => self.seed_mode = true,
                "0" | "false" | "no" => self.seed_mode = false,
                _ => warn!("[config] Ignoring POTLUCK_SEED_MODE={}", raw),
            }
        }
    }

    /// Base URL of the active deployment target
    pub fn base_url(&self) -> Result<String, SyncError> {
        let url = match self.target {
            Target::Development => &self.development_url,
            Target::Production => &self.production_url,
        };
        let url = url.trim();
        if url.is_empty() {
            return Err(SyncError::Config(format!(
                "No base URL configured for the {} target",
                self.target
            )));
        }
        Ok(url.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
