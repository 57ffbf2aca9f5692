//! # Model Info Format
//!
//! The training step writes a small JSON document next to its reports:
//!
//! ```json
//! {"run_id": "0f3c2a…", "model_path": "model"}
//! ```
//!
//! Decoding is strict about the two keys being present and lenient about
//! everything else.

use crate::{ModelInfo, PromoterError};
use std::io::ErrorKind;
use std::path::Path;

/// Default location of the model info document, relative to the working directory.
pub const DEFAULT_MODEL_INFO_PATH: &str = "reports/experiment_info.json";

/// Decode a model info document from JSON text.
pub fn parse_model_info(json: &str) -> Result<ModelInfo, PromoterError> {
    serde_json::from_str(json).map_err(|e| PromoterError::ParseError(e.to_string()))
}

/// Read and decode the model info document at `path`.
///
/// A path that does not exist yields [`PromoterError::FileNotFound`]; every
/// other read failure is an [`PromoterError::IoError`].
pub fn read_model_info(path: &Path) -> Result<ModelInfo, PromoterError> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PromoterError::FileNotFound(path.to_path_buf()),
        _ => PromoterError::IoError(format!("Cannot read '{}': {}", path.display(), e)),
    })?;
    parse_model_info(&contents)
}
