//! # Control Plane API Client
//!
//! HTTP client for the control-plane API consumed by subscription workers
//! and operational tooling. Covers the full surface: system state, pause and
//! resume mutations, and the health probe.
//!
//! The client is constructed once at startup and injected wherever it is
//! needed; every request carries the configured timeout so a hung control
//! plane can never stall a worker iteration.

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::control_plane::responses::{AckResponse, HealthResponse};
use crate::system_state::SystemState;
use crate::worker::StateOracle;

/// Errors raised by the control-plane API client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid client configuration: {0}")]
    Configuration(String),

    #[error("Control plane request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Configuration for the control-plane API client
///
/// # Examples
///
/// ```rust
/// use relay_core::client::ControlPlaneApiConfig;
///
/// let config = ControlPlaneApiConfig::default();
/// assert_eq!(config.base_url, "http://localhost:8080");
/// assert_eq!(config.timeout_ms, 2000);
/// ```
#[derive(Debug, Clone)]
pub struct ControlPlaneApiConfig {
    /// Base URL for the control-plane API (e.g. `http://control-plane:8080`)
    pub base_url: String,
    /// Request timeout in milliseconds; kept short because workers consult
    /// the control plane on every iteration
    pub timeout_ms: u64,
}

impl Default for ControlPlaneApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 2000,
        }
    }
}

/// HTTP client for the control-plane API
#[derive(Clone)]
pub struct ControlPlaneApiClient {
    client: Client,
    base_url: Url,
    timeout_ms: u64,
}

impl std::fmt::Debug for ControlPlaneApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPlaneApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ControlPlaneApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ControlPlaneApiConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Configuration(format!("Invalid base URL: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("relay-worker/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            "Created control plane API client"
        );

        Ok(Self {
            client,
            base_url,
            timeout_ms: config.timeout_ms,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Configuration(format!("Failed to construct URL: {e}")))
    }

    /// Fetch the current system state
    ///
    /// GET /system-state
    pub async fn system_state(&self) -> Result<SystemState, ClientError> {
        let url = self.endpoint("/system-state")?;

        let state = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<SystemState>()
            .await?;

        Ok(state)
    }

    /// Pause processing across the worker fleet
    ///
    /// POST /pause-processing
    pub async fn pause_processing(&self) -> Result<AckResponse, ClientError> {
        let url = self.endpoint("/pause-processing")?;

        let ack = self
            .client
            .post(url)
            .send()
            .await?
            .error_for_status()?
            .json::<AckResponse>()
            .await?;

        Ok(ack)
    }

    /// Resume processing across the worker fleet
    ///
    /// POST /resume-processing
    pub async fn resume_processing(&self) -> Result<AckResponse, ClientError> {
        let url = self.endpoint("/resume-processing")?;

        let ack = self
            .client
            .post(url)
            .send()
            .await?
            .error_for_status()?
            .json::<AckResponse>()
            .await?;

        Ok(ack)
    }

    /// Probe control-plane health
    ///
    /// GET /healthz
    pub async fn healthz(&self) -> Result<HealthResponse, ClientError> {
        let url = self.endpoint("/healthz")?;

        let health = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<HealthResponse>()
            .await?;

        Ok(health)
    }
}

#[async_trait]
impl StateOracle for ControlPlaneApiClient {
    async fn fetch_system_state(&self) -> Result<SystemState, ClientError> {
        self.system_state().await
    }
}
