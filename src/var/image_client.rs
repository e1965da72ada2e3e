use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    config::Deadlines,
    error::{Result, VarError},
    models::{
        BatchGenerateRequest, BatchGenerateResponse, BatchResult, GenerateRequest,
        GenerateResponse, GeneratedImage, GenerationOptions, MAX_BATCH_PROMPTS,
    },
    var::map_transport_error,
};

/// Image generation operations against the VAR service.
#[derive(Clone)]
pub struct ImageClient {
    http: Client,
    base_url: String,
    deadlines: Deadlines,
}

impl ImageClient {
    pub(crate) fn new(http: Client, base_url: String, deadlines: Deadlines) -> Self {
        Self {
            http,
            base_url,
            deadlines,
        }
    }

    /// Generate a single image from a text prompt.
    ///
    /// Prompt-emptiness is not validated here; the page controller owns that
    /// rule. A `success: false` envelope becomes a service error carrying the
    /// server-supplied message, or a generic fallback when none is given.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GeneratedImage> {
        self.generate_with_deadline(prompt, options, self.deadlines.generate)
            .await
    }

    pub async fn generate_with_deadline(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        deadline: Duration,
    ) -> Result<GeneratedImage> {
        let request = GenerateRequest::new(prompt, options);
        let url = format!("{}/generate", self.base_url);
        log::info!("Generating image for prompt: {}", prompt);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .timeout(deadline)
            .send()
            .await
            .map_err(map_transport_error)?;

        let envelope: GenerateResponse = read_envelope(response).await?;

        if !envelope.success {
            return Err(VarError::ServiceError(
                envelope
                    .error
                    .unwrap_or_else(|| "Failed to generate image".to_string()),
            ));
        }

        let image_base64 = envelope
            .image_base64
            .ok_or_else(|| VarError::ResponseError("Response is missing the image payload".into()))?;

        log::debug!("Image generated ({} base64 chars)", image_base64.len());

        Ok(GeneratedImage {
            image_base64,
            prompt: envelope.prompt.unwrap_or(request.prompt),
            parameters: envelope.parameters.unwrap_or_default(),
        })
    }

    /// Generate one image per prompt, preserving input order.
    pub async fn generate_batch(
        &self,
        prompts: &[String],
        options: &GenerationOptions,
    ) -> Result<BatchResult> {
        self.generate_batch_with_deadline(prompts, options, self.deadlines.batch)
            .await
    }

    pub async fn generate_batch_with_deadline(
        &self,
        prompts: &[String],
        options: &GenerationOptions,
        deadline: Duration,
    ) -> Result<BatchResult> {
        if prompts.len() > MAX_BATCH_PROMPTS {
            return Err(VarError::RequestError(format!(
                "Maximum {} prompts allowed per batch, got {}",
                MAX_BATCH_PROMPTS,
                prompts.len()
            )));
        }

        let request = BatchGenerateRequest::new(prompts.to_vec(), options);
        let url = format!("{}/generate/batch", self.base_url);
        log::info!("Generating batch of {} images", prompts.len());

        let response = self
            .http
            .post(&url)
            .json(&request)
            .timeout(deadline)
            .send()
            .await
            .map_err(map_transport_error)?;

        let envelope: BatchGenerateResponse = read_envelope(response).await?;

        if !envelope.success {
            return Err(VarError::ServiceError(
                envelope
                    .error
                    .unwrap_or_else(|| "Failed to generate images".to_string()),
            ));
        }

        Ok(BatchResult {
            images: envelope.images,
            parameters: envelope.parameters.unwrap_or_default(),
        })
    }
}

/// Unwrap an HTTP response into a decoded envelope.
///
/// 503 means the model is still loading and is kept distinguishable from
/// generic transport failures so the page can show a tailored message.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if status == StatusCode::SERVICE_UNAVAILABLE {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("detail")
                    .and_then(|detail| detail.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| "Model not loaded".to_string());
        return Err(VarError::UnavailableError(detail));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(VarError::RequestError(format!(
            "Service returned {}: {}",
            status, body
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| VarError::ResponseError(format!("Failed to parse service response: {}", e)))
}
