use std::env;
use std::time::Duration;

/// Per-operation request deadlines.
///
/// Deadlines are plain data so tests can shrink them instead of waiting on
/// wall-clock timeouts. The defaults match the hosted service: health checks
/// answer quickly, single generations can take a minute on a cold GPU, and
/// batches get twice that.
#[derive(Debug, Clone)]
pub struct Deadlines {
    pub health: Duration,
    pub generate: Duration,
    pub batch: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Deadlines {
            health: Duration::from_secs(5),
            generate: Duration::from_secs(60),
            batch: Duration::from_secs(120),
        }
    }
}

impl Deadlines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Deadlines {
            health: env_millis("VAR_HEALTH_TIMEOUT_MS").unwrap_or(defaults.health),
            generate: env_millis("VAR_GENERATE_TIMEOUT_MS").unwrap_or(defaults.generate),
            batch: env_millis("VAR_BATCH_TIMEOUT_MS").unwrap_or(defaults.batch),
        }
    }

    pub fn with_health(mut self, deadline: Duration) -> Self {
        self.health = deadline;
        self
    }

    pub fn with_generate(mut self, deadline: Duration) -> Self {
        self.generate = deadline;
        self
    }

    pub fn with_batch(mut self, deadline: Duration) -> Self {
        self.batch = deadline;
        self
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .map(Duration::from_millis)
}

/// Connection settings for the VAR service.
///
/// The base URL is injected explicitly; hosted deployments usually carry an
/// `/api` suffix. A trailing slash is tolerated and stripped at client
/// construction.
#[derive(Debug, Clone)]
pub struct VarApiConfig {
    pub base_url: Option<String>,
    pub deadlines: Deadlines,
}

impl Default for VarApiConfig {
    fn default() -> Self {
        VarApiConfig {
            base_url: None,
            deadlines: Deadlines::default(),
        }
    }
}

impl VarApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        VarApiConfig {
            base_url: env::var("VAR_API_URL").ok(),
            deadlines: Deadlines::from_env(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }
}

/// Top-level configuration for the demo binary and the optional web frontend.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub api: VarApiConfig,
    pub suggestions: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: None,
            api: VarApiConfig::default(),
            suggestions: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());

        Config {
            port,
            api: VarApiConfig::from_env(),
            suggestions: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_api(mut self, api: VarApiConfig) -> Self {
        self.api = api;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_deadlines_match_service_expectations() {
        let deadlines = Deadlines::default();
        assert_eq!(deadlines.health, Duration::from_secs(5));
        assert_eq!(deadlines.generate, Duration::from_secs(60));
        assert_eq!(deadlines.batch, Duration::from_secs(120));
    }

    #[test]
    fn builders_compose() {
        let config = VarApiConfig::new()
            .with_base_url("http://localhost:8000")
            .with_deadlines(Deadlines::new().with_generate(Duration::from_millis(250)));

        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.deadlines.generate, Duration::from_millis(250));
        assert_eq!(config.deadlines.health, Duration::from_secs(5));
    }
}
