//! Stability image client: text-to-image over the stable-image core endpoint.

use std::time::Duration;

use reqwest::header::ACCEPT;
use retrobot_core::ServiceError;
use tracing::instrument;

use crate::{mask_key, request_error, REQUEST_TIMEOUT};

const DEFAULT_BASE_URL: &str = "https://api.stability.ai";

/// Stability API client returning raw PNG bytes.
#[derive(Clone)]
pub struct StabilityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    output_format: String,
    timeout: Duration,
}

impl StabilityClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            output_format: "png".to_string(),
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

    /// Generates one image for the prompt and returns the encoded bytes.
    #[instrument(skip(self, prompt))]
    pub async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ServiceError> {
        let url = format!("{}/v2beta/stable-image/generate/core", self.base_url);
        let form = reqwest::multipart::Form::new()
            .text("prompt", prompt.to_string())
            .text("output_format", self.output_format.clone());

        tracing::info!(
            api_key = %mask_key(&self.api_key),
            prompt_preview = %prompt.chars().take(100).collect::<String>(),
            "Stability image generation request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "image/*")
            .multipart(form)
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

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_the_raw_image_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2beta/stable-image/generate/core")
            .match_header("authorization", "Bearer k")
            .match_header("accept", "image/*")
            .with_status(200)
            .with_body(b"\x89PNG-fake-bytes".as_slice())
            .create_async()
            .await;

        let client = StabilityClient::new("k".to_string()).with_base_url(server.url());
        let bytes = client.generate("a cute cat").await.unwrap();
        assert_eq!(bytes, b"\x89PNG-fake-bytes");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_carries_the_body_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v2beta/stable-image/generate/core")
            .with_status(400)
            .with_body(r#"{"errors":["prompt too long"]}"#)
            .create_async()
            .await;

        let client = StabilityClient::new("k".to_string()).with_base_url(server.url());
        match client.generate("p").await {
            Err(ServiceError::Http { status, detail }) => {
                assert_eq!(status, 400);
                assert!(detail.contains("prompt too long"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }
}
