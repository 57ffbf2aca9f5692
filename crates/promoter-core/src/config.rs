//! # Settings
//!
//! Layered configuration for a promotion run. Layers apply in order, each
//! overriding the previous one:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config`)
//! 3. Environment variables
//! 4. Command-line flags (applied by the binary)
//!
//! ## TOML Example
//!
//! ```toml
//! tracking_uri = "http://mlflow.internal:5000"
//! model_name = "churn-classifier"
//! stage = "Staging"
//! archive_existing_versions = false
//! await_registration_secs = 300
//! ```

use crate::formats::DEFAULT_MODEL_INFO_PATH;
use crate::{PromoterError, Stage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Registry used when nothing else is configured.
pub const DEFAULT_TRACKING_URI: &str = "http://localhost:5000";

/// Registered model name used when nothing else is configured.
pub const DEFAULT_MODEL_NAME: &str = "my_model";

/// Error-only log file, relative to the working directory.
pub const DEFAULT_ERROR_LOG: &str = "model_registration_errors.log";

/// How long to wait for a pending version to become ready.
pub const DEFAULT_AWAIT_REGISTRATION_SECS: u64 = 300;

/// Upper bound accepted for `await_registration_secs` (one day).
pub const MAX_AWAIT_REGISTRATION_SECS: u64 = 24 * 60 * 60;

/// Delay between readiness polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

pub const ENV_TRACKING_URI: &str = "MLFLOW_TRACKING_URI";
pub const ENV_MODEL_NAME: &str = "PROMOTER_MODEL_NAME";
pub const ENV_MODEL_INFO: &str = "PROMOTER_MODEL_INFO";
pub const ENV_STAGE: &str = "PROMOTER_STAGE";
pub const ENV_ERROR_LOG: &str = "PROMOTER_ERROR_LOG";

// =============================================================================
// SETTINGS
// =============================================================================

/// Effective configuration for one promotion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URI of the model registry.
    pub tracking_uri: String,
    /// Path of the model info JSON document.
    pub model_info_path: PathBuf,
    /// Registered model name to add the version to.
    pub model_name: String,
    /// Stage the new version is moved to.
    pub stage: Stage,
    /// Archive versions already sitting in the target stage.
    pub archive_existing_versions: bool,
    /// File that receives error-level log lines.
    pub error_log: PathBuf,
    /// Wait budget for a pending version; 0 disables waiting.
    pub await_registration_secs: u64,
    /// Delay between readiness polls.
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tracking_uri: DEFAULT_TRACKING_URI.to_string(),
            model_info_path: PathBuf::from(DEFAULT_MODEL_INFO_PATH),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            stage: Stage::Staging,
            archive_existing_versions: false,
            error_log: PathBuf::from(DEFAULT_ERROR_LOG),
            await_registration_secs: DEFAULT_AWAIT_REGISTRATION_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Settings {
    /// Decode settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, PromoterError> {
        toml::from_str(text).map_err(|e| PromoterError::ConfigError(e.to_string()))
    }

    /// Read settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, PromoterError> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PromoterError::FileNotFound(path.to_path_buf()),
            _ => PromoterError::IoError(format!(
                "Cannot read config '{}': {}",
                path.display(),
                e
            )),
        })?;
        Self::from_toml_str(&text).map_err(|e| match e {
            PromoterError::ConfigError(msg) => {
                PromoterError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Overlay values from the process environment.
    pub fn apply_env(self) -> Result<Self, PromoterError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self, PromoterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(uri) = get(ENV_TRACKING_URI) {
            self.tracking_uri = uri;
        }
        if let Some(name) = get(ENV_MODEL_NAME) {
            self.model_name = name;
        }
        if let Some(path) = get(ENV_MODEL_INFO) {
            self.model_info_path = PathBuf::from(path);
        }
        if let Some(stage) = get(ENV_STAGE) {
            self.stage = stage.parse()?;
        }
        if let Some(path) = get(ENV_ERROR_LOG) {
            self.error_log = PathBuf::from(path);
        }
        Ok(self)
    }

    /// Check the settings that the registry client depends on.
    pub fn validate(&self) -> Result<(), PromoterError> {
        if !(self.tracking_uri.starts_with("http://") || self.tracking_uri.starts_with("https://"))
        {
            return Err(PromoterError::ConfigError(format!(
                "tracking_uri must be an http(s) URI, got '{}'",
                self.tracking_uri
            )));
        }
        if self.model_name.trim().is_empty() {
            return Err(PromoterError::ConfigError(
                "model_name must not be empty".to_string(),
            ));
        }
        if self.await_registration_secs > MAX_AWAIT_REGISTRATION_SECS {
            return Err(PromoterError::ConfigError(format!(
                "await_registration_secs must be at most {}, got {}",
                MAX_AWAIT_REGISTRATION_SECS, self.await_registration_secs
            )));
        }
        if self.poll_interval_ms == 0 && self.await_registration_secs > 0 {
            return Err(PromoterError::ConfigError(
                "poll_interval_ms must be positive when await_registration_secs is set".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn await_registration(&self) -> Duration {
        Duration::from_secs(self.await_registration_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Render the settings as TOML.
    pub fn to_toml_string(&self) -> Result<String, PromoterError> {
        toml::to_string(self).map_err(|e| PromoterError::ConfigError(e.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
