//! # promoter-core
//!
//! The data layer of the promoter - THE DATA.
//!
//! The promoter takes the model info document written by a training run,
//! registers the artifact it points at as a new version of a named model in a
//! remote registry, and moves that version to a lifecycle stage. This crate
//! holds everything about that flow that does not touch the network:
//!
//! - `types`: `ModelInfo`, `ModelLocator`, `ModelVersion`, `PromoterError`
//! - `stage`: lifecycle stages
//! - `formats`: decoding the model info document
//! - `config`: layered `Settings`
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies
//! - No logging; callers report errors the way they see fit

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod formats;
pub mod stage;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use config::Settings;
pub use formats::{DEFAULT_MODEL_INFO_PATH, parse_model_info, read_model_info};
pub use stage::Stage;
pub use types::{ModelInfo, ModelLocator, ModelVersion, PromoterError, RUNS_SCHEME, VersionStatus};
