pub mod suggestions;

use crate::{
    error::VarError,
    models::{GeneratedImage, GenerationOptions, HealthStatus},
    var::VarClient,
};

pub use suggestions::{default_suggestions, DEFAULT_SUGGESTIONS};

/// Where the current generation cycle stands.
///
/// A cycle walks `Idle → Loading → {Success | Failed}` and re-enters
/// `Loading` on the next submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Loading,
    Success,
    Failed,
}

/// Controller for the interactive generation page.
///
/// Owns all mutable page state: prompt text, sampling options, the last
/// health report, the cycle state, and the last result or error message.
/// At most one request is in flight at a time; `submit` is a no-op while a
/// cycle is loading or when the trimmed prompt is empty.
pub struct StudioPage {
    client: VarClient,
    suggestions: Vec<String>,
    prompt: String,
    options: GenerationOptions,
    api_status: Option<HealthStatus>,
    state: PageState,
    image: Option<GeneratedImage>,
    error: Option<String>,
}

impl StudioPage {
    pub fn new(client: VarClient) -> Self {
        Self {
            client,
            suggestions: default_suggestions(),
            prompt: String::new(),
            options: GenerationOptions::default(),
            api_status: None,
            state: PageState::Idle,
            image: None,
            error: None,
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Mount trigger: probe service health and remember the answer.
    ///
    /// An unreachable service is recorded as an offline status rather than
    /// surfaced as an error; the page renders a "model loading" badge from it.
    pub async fn mount(&mut self) {
        let health = self.client.check_health().await;
        match health {
            Ok(status) => {
                log::info!(
                    "Service healthy: status={} model_loaded={}",
                    status.status,
                    status.model_loaded
                );
                self.api_status = Some(status);
            }
            Err(e) => {
                log::warn!("Health check failed: {}", e);
                self.api_status = Some(HealthStatus::offline());
            }
        }
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_options(&mut self, options: GenerationOptions) {
        self.options = options;
    }

    /// Suggestion-click trigger: prefill the prompt from the list.
    pub fn apply_suggestion(&mut self, index: usize) -> bool {
        match self.suggestions.get(index) {
            Some(suggestion) => {
                self.prompt = suggestion.clone();
                true
            }
            None => false,
        }
    }

    /// Submit trigger: run one generation cycle.
    pub async fn submit(&mut self) {
        if self.state == PageState::Loading {
            return;
        }

        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return;
        }

        self.state = PageState::Loading;
        self.image = None;
        self.error = None;

        let result = self.client.image().generate(&prompt, &self.options).await;
        match result {
            Ok(image) => {
                self.image = Some(image);
                self.state = PageState::Success;
            }
            Err(e) => {
                log::error!("Generation failed: {}", e);
                self.error = Some(failure_message(&e));
                self.state = PageState::Failed;
            }
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == PageState::Loading
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn api_status(&self) -> Option<&HealthStatus> {
        self.api_status.as_ref()
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        self.image.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

/// Map a failure onto the message the page shows for it.
pub fn failure_message(error: &VarError) -> String {
    match error {
        VarError::UnavailableError(_) => {
            "Model is still loading. Please wait and try again.".to_string()
        }
        VarError::TimeoutError(_) => "Request timed out. Please try again.".to_string(),
        VarError::ServiceError(message) => message.clone(),
        _ => "Failed to generate image. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages_follow_error_kind() {
        assert_eq!(
            failure_message(&VarError::UnavailableError("Model not loaded".into())),
            "Model is still loading. Please wait and try again."
        );
        assert_eq!(
            failure_message(&VarError::TimeoutError("deadline exceeded".into())),
            "Request timed out. Please try again."
        );
        assert_eq!(
            failure_message(&VarError::ServiceError("bad prompt".into())),
            "bad prompt"
        );
        assert_eq!(
            failure_message(&VarError::RequestError("connection refused".into())),
            "Failed to generate image. Please try again."
        );
    }
}
