//! # Property-Based Tests
//!
//! Invariants of the model info document and the locator built from it.

use promoter_core::{ModelInfo, Stage, parse_model_info};
use proptest::prelude::*;

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The locator is always the runs scheme followed by the two parts, untouched.
    #[test]
    fn locator_is_verbatim_concatenation(
        run_id in "[a-zA-Z0-9_-]{1,40}",
        model_path in "[a-zA-Z0-9_./-]{1,60}",
    ) {
        let info = ModelInfo::new(run_id.clone(), model_path.clone());
        let locator = info.locator().to_string();

        prop_assert_eq!(locator, format!("runs:/{}/{}", run_id, model_path));
    }

    /// Any string values survive decoding exactly, whatever they contain.
    #[test]
    fn decoding_preserves_values(run_id in ".*", model_path in ".*") {
        let json = serde_json::json!({ "run_id": run_id, "model_path": model_path }).to_string();
        let info = parse_model_info(&json).expect("valid document");

        prop_assert_eq!(info.run_id, run_id);
        prop_assert_eq!(info.model_path, model_path);
    }

    /// Stage parsing ignores ASCII case.
    #[test]
    fn stage_parse_ignores_case(index in 0usize..4, upper in proptest::bool::ANY) {
        let stage = Stage::ALL[index];
        let label = if upper {
            stage.as_str().to_ascii_uppercase()
        } else {
            stage.as_str().to_ascii_lowercase()
        };

        prop_assert_eq!(label.parse::<Stage>().ok(), Some(stage));
    }
}
