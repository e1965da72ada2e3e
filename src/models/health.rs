use serde::{Deserialize, Serialize};

/// Health report returned by `GET {base}/health`.
///
/// `vae_loaded` and `clip_loaded` are reported by the service alongside the
/// main model flag; older deployments omit them, so they stay optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub vae_loaded: Option<bool>,
    #[serde(default)]
    pub clip_loaded: Option<bool>,
}

impl HealthStatus {
    /// Fallback status stored when the service cannot be reached at all.
    pub fn offline() -> Self {
        HealthStatus {
            status: "offline".to_string(),
            model_loaded: false,
            device: None,
            vae_loaded: None,
            clip_loaded: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model_loaded
    }
}
