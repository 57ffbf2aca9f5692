//! # Promoter CLI Module
//!
//! This module implements the CLI interface for the promoter.
//!
//! ## Available Commands
//!
//! - `register` - Register the artifact and move it to the target stage (default)
//! - `locator` - Print the `runs:/` locator for the model info file
//! - `config` - Print the effective settings

mod commands;

use clap::{Parser, Subcommand};
use promoter_core::{PromoterError, Settings, Stage};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Promoter - model registry promotion
///
/// Registers the artifact named in a model info file as a new version of a
/// registered model, then moves that version to a lifecycle stage.
#[derive(Parser, Debug)]
#[command(name = "promoter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the model info JSON file
    #[arg(short = 'i', long, global = true)]
    pub model_info: Option<PathBuf>,

    /// Registered model name
    #[arg(short = 'n', long, global = true)]
    pub model_name: Option<String>,

    /// Registry base URI
    #[arg(short = 'u', long, global = true)]
    pub tracking_uri: Option<String>,

    /// Target stage (None, Staging, Production, Archived)
    #[arg(short, long, global = true)]
    pub stage: Option<Stage>,

    /// Archive versions already in the target stage
    #[arg(long, global = true)]
    pub archive_existing: bool,

    /// File receiving error-level log lines
    #[arg(long, global = true)]
    pub error_log: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Commands {
    /// Register the model version and transition its stage
    #[default]
    Register,

    /// Print the runs:/ locator without contacting the registry
    Locator,

    /// Print the effective settings
    Config,
}

impl Cli {
    /// Build settings from defaults, the config file, the environment and flags.
    pub fn resolve_settings(&self) -> Result<Settings, PromoterError> {
        let base = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        let settings = self.apply_overrides(base.apply_env()?);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line flags on top of `settings`.
    pub fn apply_overrides(&self, mut settings: Settings) -> Settings {
        if let Some(path) = &self.model_info {
            settings.model_info_path = path.clone();
        }
        if let Some(name) = &self.model_name {
            settings.model_name = name.clone();
        }
        if let Some(uri) = &self.tracking_uri {
            settings.tracking_uri = uri.clone();
        }
        if let Some(stage) = self.stage {
            settings.stage = stage;
        }
        if self.archive_existing {
            settings.archive_existing_versions = true;
        }
        if let Some(path) = &self.error_log {
            settings.error_log = path.clone();
        }
        settings
    }

    /// Error log to use when settings could not be resolved.
    pub fn fallback_error_log(&self) -> PathBuf {
        self.error_log
            .clone()
            .unwrap_or_else(|| PathBuf::from(promoter_core::config::DEFAULT_ERROR_LOG))
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute a command against resolved settings.
pub async fn execute(
    command: Commands,
    settings: &Settings,
    json_mode: bool,
) -> Result<(), PromoterError> {
    match command {
        Commands::Register => cmd_register(settings, json_mode).await,
        Commands::Locator => cmd_locator(settings, json_mode),
        Commands::Config => cmd_config(settings, json_mode),
    }
}

// =============================================================================
// TESTS
// =============================================================================
