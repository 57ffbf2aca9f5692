//! # MLflow Registry Client
//!
//! Wrapper around the MLflow tracking server's REST API (`/api/2.0/mlflow`)
//! covering the calls needed to register a model version and move it between
//! stages.

use crate::registrar::ModelRegistry;
use promoter_core::{ModelLocator, ModelVersion, Stage};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// REST prefix shared by every registry endpoint.
const API_PREFIX: &str = "/api/2.0/mlflow";

/// Error code the registry returns when a registered model name is taken.
const RESOURCE_ALREADY_EXISTS: &str = "RESOURCE_ALREADY_EXISTS";

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from the HTTP client layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Cannot reach the registry.
    ConnectionFailed(String),
    /// 401/403 - invalid or missing credentials.
    Unauthorized,
    /// 429 Too Many Requests.
    RateLimited,
    /// The registry rejected the request with a structured error body.
    Api {
        status: u16,
        error_code: String,
        message: String,
    },
    /// Non-success status without a structured error body.
    HttpStatus(u16, String),
    /// Failed to parse response body.
    ParseError(String),
    /// The registry gave up registering the version.
    RegistrationFailed { version: String, message: String },
    /// The version was still pending when the wait budget ran out.
    RegistrationTimeout { version: String, waited_secs: u64 },
}

impl ClientError {
    /// The registry's error code, if the response carried one.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Api { error_code, .. } => Some(error_code),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to registry at {url}"),
            Self::Unauthorized => write!(f, "Unauthorized: invalid or missing credentials"),
            Self::RateLimited => write!(f, "Rate limited: too many requests"),
            Self::Api {
                status,
                error_code,
                message,
            } => write!(f, "Registry rejected request ({status} {error_code}): {message}"),
            Self::HttpStatus(status, body) => write!(f, "Unexpected response ({status}): {body}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::RegistrationFailed { version, message } => {
                write!(f, "Registration of version {version} failed: {message}")
            }
            Self::RegistrationTimeout {
                version,
                waited_secs,
            } => write!(
                f,
                "Version {version} still pending registration after {waited_secs}s"
            ),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ClientError> for promoter_core::PromoterError {
    fn from(e: ClientError) -> Self {
        Self::RegistryError(e.to_string())
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// How requests authenticate against the registry.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Anonymous,
    Bearer(String),
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Bearer(_) => f.write_str("Bearer(***)"),
            Self::Basic { username, .. } => write!(f, "Basic({username}:***)"),
        }
    }
}

impl Credentials {
    /// Read credentials from the standard MLflow environment variables.
    ///
    /// `MLFLOW_TRACKING_TOKEN` wins over the username/password pair.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(token) = get("MLFLOW_TRACKING_TOKEN") {
            return Self::Bearer(token);
        }
        match (
            get("MLFLOW_TRACKING_USERNAME"),
            get("MLFLOW_TRACKING_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Self::Basic { username, password },
            _ => Self::Anonymous,
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ModelVersionEnvelope {
    model_version: ModelVersion,
}

#[derive(Debug, Deserialize)]
struct RunEnvelope {
    run: RunBody,
}

#[derive(Debug, Deserialize)]
struct RunBody {
    info: RunInfo,
}

#[derive(Debug, Deserialize)]
struct RunInfo {
    artifact_uri: String,
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client that wraps calls to the MLflow registry REST API.
#[derive(Clone)]
pub struct MlflowClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    await_registration: Duration,
    poll_interval: Duration,
}

impl MlflowClient {
    /// Create a new client pointing at the given tracking server URL.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            await_registration: Duration::from_secs(
                promoter_core::config::DEFAULT_AWAIT_REGISTRATION_SECS,
            ),
            poll_interval: Duration::from_millis(promoter_core::config::DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Set how long `register_model_version` waits for a pending version.
    #[must_use]
    pub fn with_registration_wait(mut self, await_registration: Duration, poll_interval: Duration) -> Self {
        self.await_registration = await_registration;
        self.poll_interval = poll_interval;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with the configured authentication.
    fn request(&self, method: reqwest::Method, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, endpoint);
        let req = self.http.request(method, &url);
        match &self.credentials {
            Credentials::Anonymous => req,
            Credentials::Bearer(token) => req.bearer_auth(token),
            Credentials::Basic { username, password } => req.basic_auth(username, Some(password)),
        }
    }

    /// Handle HTTP response: check status codes and decode JSON.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(api) => ClientError::Api {
                    status: status.as_u16(),
                    error_code: api.error_code,
                    message: api.message,
                },
                Err(_) => ClientError::HttpStatus(status.as_u16(), body),
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))
    }

    /// POST /registered-models/create → create the registered model if missing.
    ///
    /// Returns `false` when the name was already registered.
    pub async fn ensure_registered_model(&self, name: &str) -> Result<bool, ClientError> {
        let body = serde_json::json!({ "name": name });
        let req = self
            .request(reqwest::Method::POST, "/registered-models/create")
            .json(&body);
        let resp = self.send(req).await?;
        match self.handle_response::<serde_json::Value>(resp).await {
            Ok(_) => {
                tracing::debug!("Created registered model '{}'", name);
                Ok(true)
            }
            Err(e) if e.error_code() == Some(RESOURCE_ALREADY_EXISTS) => {
                tracing::debug!("Registered model '{}' already exists", name);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// GET /runs/get → resolve a `runs:/` locator to the artifact's storage URI.
    pub async fn resolve_source(&self, locator: &ModelLocator) -> Result<String, ClientError> {
        let req = self
            .request(reqwest::Method::GET, "/runs/get")
            .query(&[("run_id", locator.run_id())]);
        let resp = self.send(req).await?;
        let run: RunEnvelope = self.handle_response(resp).await?;
        Ok(locator.resolve_against(&run.run.info.artifact_uri))
    }

    /// POST /model-versions/create → add a version under `name`.
    pub async fn create_model_version(
        &self,
        name: &str,
        source: &str,
        run_id: &str,
    ) -> Result<ModelVersion, ClientError> {
        let body = serde_json::json!({
            "name": name,
            "source": source,
            "run_id": run_id,
        });
        let req = self
            .request(reqwest::Method::POST, "/model-versions/create")
            .json(&body);
        let resp = self.send(req).await?;
        let envelope: ModelVersionEnvelope = self.handle_response(resp).await?;
        Ok(envelope.model_version)
    }

    /// GET /model-versions/get → fetch one version.
    pub async fn get_model_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<ModelVersion, ClientError> {
        let req = self
            .request(reqwest::Method::GET, "/model-versions/get")
            .query(&[("name", name), ("version", version)]);
        let resp = self.send(req).await?;
        let envelope: ModelVersionEnvelope = self.handle_response(resp).await?;
        Ok(envelope.model_version)
    }

    /// Poll a freshly created version until the registry reports it ready.
    async fn await_ready(&self, created: ModelVersion) -> Result<ModelVersion, ClientError> {
        if self.await_registration.is_zero() {
            return Ok(created);
        }

        // A budget too large to represent as an instant means no deadline.
        let deadline = tokio::time::Instant::now().checked_add(self.await_registration);
        let mut current = created;
        loop {
            if current.status == promoter_core::VersionStatus::FailedRegistration {
                return Err(ClientError::RegistrationFailed {
                    message: current
                        .status_message
                        .clone()
                        .unwrap_or_else(|| "no status message".to_string()),
                    version: current.version,
                });
            }
            if !current.is_pending() {
                return Ok(current);
            }
            if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
                return Err(ClientError::RegistrationTimeout {
                    version: current.version,
                    waited_secs: self.await_registration.as_secs(),
                });
            }

            tracing::debug!(
                "Version {} of '{}' pending registration, polling again",
                current.version,
                current.name
            );
            tokio::time::sleep(self.poll_interval).await;
            current = self
                .get_model_version(&current.name, &current.version)
                .await?;
        }
    }
}

impl ModelRegistry for MlflowClient {
    async fn register_model_version(
        &self,
        locator: &ModelLocator,
        model_name: &str,
    ) -> Result<ModelVersion, ClientError> {
        self.ensure_registered_model(model_name).await?;
        let source = self.resolve_source(locator).await?;
        tracing::debug!("Resolved {} to {}", locator, source);
        let created = self
            .create_model_version(model_name, &source, locator.run_id())
            .await?;
        self.await_ready(created).await
    }

    /// POST /model-versions/transition-stage
    async fn transition_stage(
        &self,
        model_name: &str,
        version: &str,
        stage: Stage,
        archive_existing_versions: bool,
    ) -> Result<ModelVersion, ClientError> {
        let body = serde_json::json!({
            "name": model_name,
            "version": version,
            "stage": stage.as_str(),
            "archive_existing_versions": archive_existing_versions,
        });
        let req = self
            .request(reqwest::Method::POST, "/model-versions/transition-stage")
            .json(&body);
        let resp = self.send(req).await?;
        let envelope: ModelVersionEnvelope = self.handle_response(resp).await?;
        Ok(envelope.model_version)
    }
}

// =============================================================================
// TESTS
// =============================================================================
