//! # Registrar
//!
//! Registers a run artifact as a new model version, then moves that version
//! to its target stage. The two remote calls run strictly in order and the
//! transition is only attempted once registration has succeeded.
//!
//! Nothing here retries. Running twice against the same run registers two
//! versions.

use crate::client::ClientError;
use promoter_core::{ModelInfo, ModelLocator, ModelVersion, PromoterError, Stage};

// =============================================================================
// REGISTRY SEAM
// =============================================================================

/// The two registry operations a promotion needs.
pub trait ModelRegistry {
    /// Register the artifact behind `locator` as a new version of `model_name`.
    fn register_model_version(
        &self,
        locator: &ModelLocator,
        model_name: &str,
    ) -> impl Future<Output = Result<ModelVersion, ClientError>>;

    /// Move `version` of `model_name` to `stage`.
    fn transition_stage(
        &self,
        model_name: &str,
        version: &str,
        stage: Stage,
        archive_existing_versions: bool,
    ) -> impl Future<Output = Result<ModelVersion, ClientError>>;
}

// =============================================================================
// PROMOTION REQUEST
// =============================================================================

/// What to register and where to move it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub model_name: String,
    pub stage: Stage,
    pub archive_existing_versions: bool,
}

/// Register `info` as a new version and transition it.
///
/// Returns the new version identifier. Failures are logged here and returned
/// unchanged to the caller.
pub async fn register_and_stage<R: ModelRegistry>(
    registry: &R,
    promotion: &Promotion,
    info: &ModelInfo,
) -> Result<String, PromoterError> {
    run_promotion(registry, promotion, info)
        .await
        .inspect_err(|e| tracing::error!("Error during model registration: {}", e))
        .map_err(PromoterError::from)
}

async fn run_promotion<R: ModelRegistry>(
    registry: &R,
    promotion: &Promotion,
    info: &ModelInfo,
) -> Result<String, ClientError> {
    let name = promotion.model_name.as_str();
    let locator = info.locator();
    tracing::debug!("Registering model from URI: {}", locator);

    let registered = registry.register_model_version(&locator, name).await?;
    let version = registered.version;
    tracing::info!("Model '{}' registered as version {}", name, version);

    registry
        .transition_stage(
            name,
            &version,
            promotion.stage,
            promotion.archive_existing_versions,
        )
        .await?;
    tracing::info!("Model '{}' transitioned to '{}'", name, promotion.stage);

    Ok(version)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Register {
            locator: String,
            model_name: String,
        },
        Transition {
            model_name: String,
            version: String,
            stage: Stage,
            archive: bool,
        },
    }

    /// Records every call and answers from canned results.
    struct RecordingRegistry {
        calls: RefCell<Vec<Call>>,
        register_result: Result<String, ClientError>,
        transition_result: Result<(), ClientError>,
    }

    impl RecordingRegistry {
        fn returning_version(version: &str) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                register_result: Ok(version.to_string()),
                transition_result: Ok(()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    fn staging(model_name: &str) -> Promotion {
        Promotion {
            model_name: model_name.to_string(),
            stage: Stage::Staging,
            archive_existing_versions: false,
        }
    }

    fn version(name: &str, version: &str, stage: Option<&str>) -> ModelVersion {
        ModelVersion {
            name: name.to_string(),
            version: version.to_string(),
            current_stage: stage.map(str::to_string),
            status: promoter_core::VersionStatus::Ready,
            status_message: None,
            source: None,
            run_id: None,
        }
    }

    impl ModelRegistry for RecordingRegistry {
        async fn register_model_version(
            &self,
            locator: &ModelLocator,
            model_name: &str,
        ) -> Result<ModelVersion, ClientError> {
            self.calls.borrow_mut().push(Call::Register {
                locator: locator.to_string(),
                model_name: model_name.to_string(),
            });
            self.register_result
                .clone()
                .map(|v| version(model_name, &v, None))
        }

        async fn transition_stage(
            &self,
            model_name: &str,
            version_id: &str,
            stage: Stage,
            archive_existing_versions: bool,
        ) -> Result<ModelVersion, ClientError> {
            self.calls.borrow_mut().push(Call::Transition {
                model_name: model_name.to_string(),
                version: version_id.to_string(),
                stage,
                archive: archive_existing_versions,
            });
            self.transition_result
                .clone()
                .map(|()| version(model_name, version_id, Some(stage.as_str())))
        }
    }

    #[tokio::test]
    async fn registers_runs_locator() {
        let registry = RecordingRegistry::returning_version("1");
        let info = ModelInfo::new("abc", "model");

        register_and_stage(&registry, &staging("my_model"), &info)
            .await
            .expect("promotion");

        assert_eq!(
            registry.calls().first(),
            Some(&Call::Register {
                locator: "runs:/abc/model".to_string(),
                model_name: "my_model".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn transitions_returned_version_to_staging() {
        let registry = RecordingRegistry::returning_version("3");
        let info = ModelInfo::new("abc", "model");

        let version = register_and_stage(&registry, &staging("my_model"), &info)
            .await
            .expect("promotion");

        assert_eq!(version, "3");
        assert_eq!(
            registry.calls(),
            vec![
                Call::Register {
                    locator: "runs:/abc/model".to_string(),
                    model_name: "my_model".to_string(),
                },
                Call::Transition {
                    model_name: "my_model".to_string(),
                    version: "3".to_string(),
                    stage: Stage::Staging,
                    archive: false,
                },
            ]
        );
    }

    #[tokio::test]
    async fn failed_registration_skips_transition() {
        let registry = RecordingRegistry {
            register_result: Err(ClientError::ConnectionFailed(
                "http://localhost:5000: connection refused".to_string(),
            )),
            ..RecordingRegistry::returning_version("unused")
        };
        let info = ModelInfo::new("abc", "model");

        let result = register_and_stage(&registry, &staging("my_model"), &info).await;

        assert!(matches!(result, Err(PromoterError::RegistryError(_))));
        assert_eq!(registry.calls().len(), 1);
        assert!(matches!(registry.calls()[0], Call::Register { .. }));
    }

    #[tokio::test]
    async fn failed_transition_is_surfaced() {
        let registry = RecordingRegistry {
            transition_result: Err(ClientError::Api {
                status: 400,
                error_code: "INVALID_PARAMETER_VALUE".to_string(),
                message: "bad stage".to_string(),
            }),
            ..RecordingRegistry::returning_version("7")
        };
        let info = ModelInfo::new("abc", "model");

        let result = register_and_stage(&registry, &staging("my_model"), &info).await;

        let Err(PromoterError::RegistryError(msg)) = result else {
            unreachable!("expected registry error");
        };
        assert!(msg.contains("INVALID_PARAMETER_VALUE"));
        assert_eq!(registry.calls().len(), 2);
    }

    #[tokio::test]
    async fn custom_stage_and_archive_flag_are_forwarded() {
        let registry = RecordingRegistry::returning_version("12");
        let promotion = Promotion {
            model_name: "ranker".to_string(),
            stage: Stage::Production,
            archive_existing_versions: true,
        };

        register_and_stage(&registry, &promotion, &ModelInfo::new("r9", "artifacts/model"))
            .await
            .expect("promotion");

        assert_eq!(
            registry.calls().last(),
            Some(&Call::Transition {
                model_name: "ranker".to_string(),
                version: "12".to_string(),
                stage: Stage::Production,
                archive: true,
            })
        );
    }
}
