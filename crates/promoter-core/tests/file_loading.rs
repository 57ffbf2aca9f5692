//! # File Loading Tests
//!
//! Reads model info documents and settings files from a scratch directory.

use promoter_core::{ModelInfo, PromoterError, Settings, Stage, read_model_info};
use std::io::Write;

// =============================================================================
// MODEL INFO
// =============================================================================

mod model_info {
    use super::*;

    #[test]
    fn valid_document_loads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("experiment_info.json");
        std::fs::write(&path, r#"{"run_id": "abc", "model_path": "model"}"#).expect("write");

        let info = read_model_info(&path).expect("load");

        assert_eq!(info, ModelInfo::new("abc", "model"));
        assert_eq!(info.locator().to_string(), "runs:/abc/model");
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("reports").join("experiment_info.json");

        let result = read_model_info(&path);

        assert!(matches!(result, Err(PromoterError::FileNotFound(p)) if p == path));
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"{ run_id: abc }").expect("write");

        let result = read_model_info(file.path());

        assert!(matches!(result, Err(PromoterError::ParseError(_))));
    }

    #[test]
    fn directory_path_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");

        let result = read_model_info(dir.path());

        assert!(matches!(result, Err(PromoterError::IoError(_))));
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

mod settings {
    use super::*;

    #[test]
    fn settings_file_loads() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "tracking_uri = \"https://registry.example:443\"\nmodel_name = \"ranker\"\narchive_existing_versions = true"
        )
        .expect("write");

        let settings = Settings::from_file(file.path()).expect("load");

        assert_eq!(settings.tracking_uri, "https://registry.example:443");
        assert_eq!(settings.model_name, "ranker");
        assert!(settings.archive_existing_versions);
        assert_eq!(settings.stage, Stage::Staging);
    }

    #[test]
    fn missing_settings_file_is_file_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");

        let result = Settings::from_file(&dir.path().join("promoter.toml"));

        assert!(matches!(result, Err(PromoterError::FileNotFound(_))));
    }

    #[test]
    fn invalid_settings_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"await_registration_secs = \"soon\"").expect("write");

        let result = Settings::from_file(file.path());

        let Err(PromoterError::ConfigError(msg)) = result else {
            unreachable!("expected config error");
        };
        assert!(msg.contains(&file.path().display().to_string()));
    }
}
