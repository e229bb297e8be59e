//! Retro Diffusion image client: JSON inference API returning base64 images.

use std::time::Duration;

use base64::Engine;
use retrobot_core::ServiceError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{mask_key, request_error, REQUEST_TIMEOUT};

const DEFAULT_BASE_URL: &str = "https://api.retrodiffusion.ai";
pub const DEFAULT_MODEL: &str = "RD_FLUX";

#[derive(Serialize)]
struct InferenceRequest<'a> {
    model: &'a str,
    width: u32,
    height: u32,
    prompt: &'a str,
    num_images: u32,
}

#[derive(Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    base64_images: Vec<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    credit_cost: Option<u32>,
    #[serde(default)]
    remaining_credits: Option<u32>,
}

/// A decoded generation result with the metadata the reply embed shows.
#[derive(Debug, Clone)]
pub struct RetroImage {
    pub png: Vec<u8>,
    pub model: String,
    pub credit_cost: Option<u32>,
    pub remaining_credits: Option<u32>,
}

/// Retro Diffusion API client. Generates one 512x512 image per call.
#[derive(Clone)]
pub struct RetroClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl RetroClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.trim().to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the API base URL (used for mock-server tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the per-request timeout ceiling.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Inference endpoint URL; shown by the diagnostics command.
    pub fn api_url(&self) -> String {
        format!("{}/v1/inferences", self.base_url)
    }

    /// API key masked for display.
    pub fn masked_key(&self) -> String {
        mask_key(&self.api_key)
    }

    pub fn key_len(&self) -> usize {
        self.api_key.chars().count()
    }

    #[instrument(skip(self, prompt))]
    pub async fn generate(&self, prompt: &str) -> Result<RetroImage, ServiceError> {
        let body = InferenceRequest {
            model: DEFAULT_MODEL,
            width: 512,
            height: 512,
            prompt,
            num_images: 1,
        };

        tracing::info!(
            api_key = %self.masked_key(),
            prompt_preview = %prompt.chars().take(100).collect::<String>(),
            "Retro Diffusion inference request"
        );

        let response = self
            .http
            .post(self.api_url())
            .header("X-RD-Token", &self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        let body: InferenceResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;

        let Some(encoded) = body.base64_images.first() else {
            return Err(ServiceError::Malformed(
                "no images were generated in the response".to_string(),
            ));
        };
        let png = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| ServiceError::Malformed(format!("invalid base64 image: {e}")))?;

        Ok(RetroImage {
            png,
            model: body.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            credit_cost: body.credit_cost,
            remaining_credits: body.remaining_credits,
        })
    }
}
