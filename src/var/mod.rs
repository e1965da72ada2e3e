pub mod image_client;

use std::time::Duration;

use reqwest::Client;

use crate::{
    config::{Deadlines, VarApiConfig},
    error::{Result, VarError},
    models::HealthStatus,
};

pub use image_client::ImageClient;

/// Client for the VAR text-to-image service.
///
/// Construction takes an explicit [`VarApiConfig`] so tests can point it at
/// mock endpoints; there is no ambient configuration. Generation lives on
/// the [`ImageClient`] reached through [`VarClient::image`].
#[derive(Clone)]
pub struct VarClient {
    http: Client,
    base_url: String,
    deadlines: Deadlines,
    image_client: ImageClient,
}

impl VarClient {
    pub fn new(config: VarApiConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .ok_or_else(|| VarError::ConfigError("VAR API base URL is required".into()))?;
        let base_url = normalize_base_url(&base_url);

        let http = Client::new();
        let image_client = ImageClient::new(http.clone(), base_url.clone(), config.deadlines.clone());

        Ok(Self {
            http,
            base_url,
            deadlines: config.deadlines,
            image_client,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(VarApiConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    /// Read the service health endpoint.
    ///
    /// Transport failures are returned to the caller rather than swallowed;
    /// callers treat them as "service unavailable" and degrade accordingly.
    pub async fn check_health(&self) -> Result<HealthStatus> {
        self.check_health_with_deadline(self.deadlines.health).await
    }

    pub async fn check_health_with_deadline(&self, deadline: Duration) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        log::debug!("Checking service health at {}", url);

        let response = self
            .http
            .get(&url)
            .timeout(deadline)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(VarError::RequestError(format!(
                "Health check returned {}",
                response.status()
            )));
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| VarError::ResponseError(format!("Failed to parse health response: {}", e)))
    }
}

/// Strip trailing slashes so endpoint joins never produce `//`.
pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}

pub(crate) fn map_transport_error(e: reqwest::Error) -> VarError {
    if e.is_timeout() {
        VarError::TimeoutError(format!("Request timed out: {}", e))
    } else {
        VarError::RequestError(format!("Request failed: {}", e))
    }
}
