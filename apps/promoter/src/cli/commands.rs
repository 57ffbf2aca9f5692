//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::client::{Credentials, MlflowClient};
use crate::registrar::{Promotion, register_and_stage};
use promoter_core::{ModelInfo, PromoterError, Settings, Stage, read_model_info};
use serde::Serialize;
use std::path::Path;

// =============================================================================
// LOADER
// =============================================================================

/// Load the model info document, logging the outcome.
pub fn load_model_info(path: &Path) -> Result<ModelInfo, PromoterError> {
    match read_model_info(path) {
        Ok(info) => {
            tracing::debug!("Model info loaded from {}", path.display());
            Ok(info)
        }
        Err(PromoterError::FileNotFound(missing)) => {
            tracing::error!("File not found: {}", missing.display());
            Err(PromoterError::FileNotFound(missing))
        }
        Err(e) => {
            tracing::error!("Unexpected error while loading model info: {}", e);
            Err(e)
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Result line for a completed promotion in `--json-mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotionReport {
    pub status: &'static str,
    pub model_name: String,
    pub version: String,
    pub stage: Stage,
}

/// Human-readable success line.
pub fn success_line(model_name: &str, version: &str, stage: Stage) -> String {
    format!(
        "Model '{}' successfully registered (version {}) and moved to {}.",
        model_name, version, stage
    )
}

/// Line printed to standard output when a run fails.
pub fn failure_line(error: &PromoterError, json_mode: bool) -> String {
    if json_mode {
        serde_json::json!({ "status": "error", "error": error.to_string() }).to_string()
    } else {
        format!("Error: {}", error)
    }
}

// =============================================================================
// REGISTER COMMAND
// =============================================================================

/// Build the registry client described by `settings`.
pub fn registry_client(settings: &Settings) -> MlflowClient {
    MlflowClient::new(settings.tracking_uri.as_str(), Credentials::from_env())
        .with_registration_wait(settings.await_registration(), settings.poll_interval())
}

/// Load the model info, register it and transition the new version.
pub async fn cmd_register(settings: &Settings, json_mode: bool) -> Result<(), PromoterError> {
    let report = promote(&registry_client(settings), settings).await?;

    if json_mode {
        let output = serde_json::to_string(&report)
            .map_err(|e| PromoterError::ParseError(e.to_string()))?;
        println!("{}", output);
    } else {
        println!(
            "{}",
            success_line(&report.model_name, &report.version, report.stage)
        );
    }
    Ok(())
}

/// Run one promotion against `client` without printing anything.
pub async fn promote(
    client: &MlflowClient,
    settings: &Settings,
) -> Result<PromotionReport, PromoterError> {
    tracing::debug!("Using registry at {}", client.base_url());
    let info = load_model_info(&settings.model_info_path)?;

    let promotion = Promotion {
        model_name: settings.model_name.clone(),
        stage: settings.stage,
        archive_existing_versions: settings.archive_existing_versions,
    };
    let version = register_and_stage(client, &promotion, &info).await?;

    Ok(PromotionReport {
        status: "ok",
        model_name: promotion.model_name,
        version,
        stage: promotion.stage,
    })
}

// =============================================================================
// LOCATOR COMMAND
// =============================================================================

/// Print the locator the register command would use.
pub fn cmd_locator(settings: &Settings, json_mode: bool) -> Result<(), PromoterError> {
    let info = load_model_info(&settings.model_info_path)?;
    let locator = info.locator();

    if json_mode {
        let output = serde_json::json!({
            "run_id": info.run_id,
            "model_path": info.model_path,
            "locator": locator.to_string(),
        });
        let output = serde_json::to_string_pretty(&output)
            .map_err(|e| PromoterError::ParseError(e.to_string()))?;
        println!("{}", output);
    } else {
        println!("{}", locator);
    }
    Ok(())
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Print the effective settings.
pub fn cmd_config(settings: &Settings, json_mode: bool) -> Result<(), PromoterError> {
    if json_mode {
        let output = serde_json::to_string_pretty(settings)
            .map_err(|e| PromoterError::ConfigError(e.to_string()))?;
        println!("{}", output);
    } else {
        print!("{}", settings.to_toml_string()?);
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn success_line_names_model_version_and_stage() {
        assert_eq!(
            success_line("my_model", "3", Stage::Staging),
            "Model 'my_model' successfully registered (version 3) and moved to Staging."
        );
    }

    #[test]
    fn failure_line_plain_and_json() {
        let err = PromoterError::FileNotFound(PathBuf::from("reports/experiment_info.json"));

        assert_eq!(
            failure_line(&err, false),
            "Error: File not found: reports/experiment_info.json"
        );

        let json: serde_json::Value =
            serde_json::from_str(&failure_line(&err, true)).expect("json");
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "File not found: reports/experiment_info.json");
    }

    #[test]
    fn report_serializes_stage_label() {
        let report = PromotionReport {
            status: "ok",
            model_name: "m".to_string(),
            version: "4".to_string(),
            stage: Stage::Production,
        };
        let json = serde_json::to_value(&report).expect("json");
        assert_eq!(json["stage"], "Production");
        assert_eq!(json["version"], "4");
    }

    #[test]
    fn loader_passes_through_file_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("experiment_info.json");

        let result = load_model_info(&missing);

        assert!(matches!(result, Err(PromoterError::FileNotFound(p)) if p == missing));
    }

    #[test]
    fn locator_command_fails_on_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("experiment_info.json");
        std::fs::write(&path, "not json").expect("write");
        let settings = Settings {
            model_info_path: path,
            ..Settings::default()
        };

        let result = cmd_locator(&settings, false);

        assert!(matches!(result, Err(PromoterError::ParseError(_))));
    }
}
