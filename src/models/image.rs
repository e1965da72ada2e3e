use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VarError};

pub const DEFAULT_CFG_SCALE: f64 = 1.5;
pub const DEFAULT_TOP_K: u32 = 900;
pub const DEFAULT_TOP_P: f64 = 0.96;

/// The service rejects batches larger than this; checked locally before a
/// request is sent.
pub const MAX_BATCH_PROMPTS: usize = 8;

/// Sampling parameters for a generation call.
///
/// An absent seed means the service picks one; it is serialized as JSON
/// `null` on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOptions {
    pub cfg_scale: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub seed: Option<i64>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            cfg_scale: DEFAULT_CFG_SCALE,
            top_k: DEFAULT_TOP_K,
            top_p: DEFAULT_TOP_P,
            seed: None,
        }
    }
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cfg_scale(mut self, cfg_scale: f64) -> Self {
        self.cfg_scale = cfg_scale;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Wire payload for `POST {base}/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub cfg_scale: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub seed: Option<i64>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, options: &GenerationOptions) -> Self {
        GenerateRequest {
            prompt: prompt.into(),
            cfg_scale: options.cfg_scale,
            top_k: options.top_k,
            top_p: options.top_p,
            seed: options.seed,
        }
    }
}

/// Wire payload for `POST {base}/generate/batch`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchGenerateRequest {
    pub prompts: Vec<String>,
    pub cfg_scale: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub seed: Option<i64>,
}

impl BatchGenerateRequest {
    pub fn new(prompts: Vec<String>, options: &GenerationOptions) -> Self {
        BatchGenerateRequest {
            prompts,
            cfg_scale: options.cfg_scale,
            top_k: options.top_k,
            top_p: options.top_p,
            seed: options.seed,
        }
    }
}

/// Echo of the settings the service actually applied.
///
/// The single-image endpoint echoes the prompt inside the parameter block;
/// the batch endpoint does not. Fields default so a bare `{}` from a failure
/// envelope still deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default = "default_cfg_scale")]
    pub cfg_scale: f64,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default)]
    pub seed: Option<i64>,
}

fn default_cfg_scale() -> f64 {
    DEFAULT_CFG_SCALE
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

fn default_top_p() -> f64 {
    DEFAULT_TOP_P
}

impl Default for GenerationParameters {
    fn default() -> Self {
        GenerationParameters {
            prompt: None,
            cfg_scale: DEFAULT_CFG_SCALE,
            top_k: DEFAULT_TOP_K,
            top_p: DEFAULT_TOP_P,
            seed: None,
        }
    }
}

/// Envelope returned by the single-image endpoint.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub parameters: Option<GenerationParameters>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Envelope returned by the batch endpoint.
#[derive(Debug, Deserialize)]
pub struct BatchGenerateResponse {
    pub success: bool,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub images: Vec<BatchImage>,
    #[serde(default)]
    pub parameters: Option<GenerationParameters>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A successfully generated image.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub image_base64: String,
    pub prompt: String,
    pub parameters: GenerationParameters,
}

impl GeneratedImage {
    /// Inline `data:` URI suitable for direct display in an `<img>` tag.
    pub fn to_data_uri(&self) -> String {
        data_uri(&self.image_base64)
    }

    /// Decode the payload back into PNG bytes.
    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        decode_image(&self.image_base64)
    }

    /// Download name in the `generated_{timestamp}.png` convention.
    pub fn suggested_filename(&self) -> String {
        format!("generated_{}.png", chrono::Utc::now().timestamp_millis())
    }
}

/// One entry of a batch result, paired with the prompt that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchImage {
    pub image_base64: String,
    pub prompt: String,
}

impl BatchImage {
    pub fn to_data_uri(&self) -> String {
        data_uri(&self.image_base64)
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        decode_image(&self.image_base64)
    }
}

/// Ordered batch result; `images` preserves the input prompt order.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub images: Vec<BatchImage>,
    pub parameters: GenerationParameters,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn data_uri(image_base64: &str) -> String {
    format!("data:image/png;base64,{}", image_base64)
}

fn decode_image(image_base64: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(image_base64)
        .map_err(|e| VarError::ResponseError(format!("Failed to decode base64 image: {}", e)))
}
