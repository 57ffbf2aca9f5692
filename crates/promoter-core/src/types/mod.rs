//! # Core Type Definitions
//!
//! This module contains the data the promoter moves between the input file
//! and the model registry:
//! - The model info document (`ModelInfo`)
//! - The artifact locator (`ModelLocator`)
//! - The registry's view of a version (`ModelVersion`, `VersionStatus`)
//! - Error types (`PromoterError`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// MODEL INFO
// =============================================================================

/// The document written by the training step.
///
/// Only the two keys below are read; any other keys in the document are
/// ignored. Values are taken verbatim, no trimming or validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Identifier of the training run that produced the artifact.
    pub run_id: String,
    /// Path of the model artifact inside the run's artifact store.
    pub model_path: String,
}

impl ModelInfo {
    /// Create a new model info record.
    #[must_use]
    pub fn new(run_id: impl Into<String>, model_path: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            model_path: model_path.into(),
        }
    }

    /// Build the `runs:/` locator for this artifact.
    #[must_use]
    pub fn locator(&self) -> ModelLocator {
        ModelLocator::new(&self.run_id, &self.model_path)
    }
}

// =============================================================================
// MODEL LOCATOR
// =============================================================================

/// Scheme prefix for run-relative artifact locators.
pub const RUNS_SCHEME: &str = "runs:/";

/// A run-relative artifact locator of the form `runs:/{run_id}/{model_path}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelLocator {
    run_id: String,
    model_path: String,
}

impl ModelLocator {
    /// Create a locator. Both parts are kept exactly as given.
    #[must_use]
    pub fn new(run_id: impl Into<String>, model_path: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            model_path: model_path.into(),
        }
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Join the locator's model path onto a run's artifact root.
    ///
    /// A single trailing `/` on the root is dropped so the result never
    /// contains `//` at the seam.
    #[must_use]
    pub fn resolve_against(&self, artifact_root: &str) -> String {
        let root = artifact_root.strip_suffix('/').unwrap_or(artifact_root);
        format!("{}/{}", root, self.model_path)
    }
}

impl std::fmt::Display for ModelLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}/{}", RUNS_SCHEME, self.run_id, self.model_path)
    }
}

// =============================================================================
// MODEL VERSION
// =============================================================================

/// Registration status reported by the registry for a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    /// The registry is still copying or validating the artifact.
    PendingRegistration,
    /// Registration did not complete.
    FailedRegistration,
    /// The version is usable.
    #[default]
    Ready,
}

/// A model version as returned by the registry.
///
/// Version identifiers are strings on the wire and are passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub current_stage: Option<String>,
    #[serde(default)]
    pub status: VersionStatus,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub run_id: Option<String>,
}

impl ModelVersion {
    /// Check whether the registry is still working on this version.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == VersionStatus::PendingRegistration
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while promoting a model.
///
/// File errors come from loading the model info document, `Config` from the
/// settings layers, and `Registry` from any remote call.
#[derive(Debug, Error)]
pub enum PromoterError {
    /// The input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The input could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A configuration layer is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A call to the model registry failed.
    #[error("Registry error: {0}")]
    RegistryError(String),
}

// =============================================================================
// TESTS
// =============================================================================
