//! # Lifecycle Stages
//!
//! The registry attaches one lifecycle label to each model version.
//!
//! | Stage | Meaning |
//! |-------|---------|
//! | None | Registered, not promoted |
//! | Staging | Candidate under evaluation |
//! | Production | Serving |
//! | Archived | Retired |
//!
//! Stages parse case-insensitively and always render in the registry's
//! capitalisation.

use crate::PromoterError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// STAGE ENUM
// =============================================================================

/// Lifecycle stage of a model version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Stage {
    None,
    #[default]
    Staging,
    Production,
    Archived,
}

impl Stage {
    /// All stages, in promotion order.
    pub const ALL: [Stage; 4] = [
        Stage::None,
        Stage::Staging,
        Stage::Production,
        Stage::Archived,
    ];

    /// Get the stage label as the registry spells it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::None => "None",
            Stage::Staging => "Staging",
            Stage::Production => "Production",
            Stage::Archived => "Archived",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = PromoterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PromoterError::ConfigError(format!(
                    "Unknown stage '{}' (expected one of None, Staging, Production, Archived)",
                    s
                ))
            })
    }
}

impl TryFrom<String> for Stage {
    type Error = PromoterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.as_str().to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stage_is_staging() {
        assert_eq!(Stage::default(), Stage::Staging);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("production".parse::<Stage>().ok(), Some(Stage::Production));
        assert_eq!("STAGING".parse::<Stage>().ok(), Some(Stage::Staging));
        assert_eq!(" archived ".parse::<Stage>().ok(), Some(Stage::Archived));
        assert_eq!("none".parse::<Stage>().ok(), Some(Stage::None));
    }

    #[test]
    fn unknown_stage_rejected() {
        let result = "Canary".parse::<Stage>();
        assert!(matches!(result, Err(PromoterError::ConfigError(_))));
    }

    #[test]
    fn serde_uses_registry_spelling() {
        let json = serde_json::to_string(&Stage::Production).expect("encode");
        assert_eq!(json, "\"Production\"");
        let stage: Stage = serde_json::from_str("\"staging\"").expect("decode");
        assert_eq!(stage, Stage::Staging);
    }
}
