use anyhow::{ensure, Context};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Body, Client,
};
use serde::Deserialize;
use tracing::error;

pub mod text_generation;

pub static DEFAULT_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta";

/// Handle to the Gemini REST API.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct Models {
    base_url: String,
    client: Client,
}

impl Models {
    pub fn new(api_key: &str) -> anyhow::Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let mut key = HeaderValue::from_str(api_key)
            .context("api key is not a valid header value")?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert("x-goog-api-key", key);

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn string_response<R: Into<Body>>(
        &self,
        request: R,
        model: &str,
        method: &str,
    ) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!("{}/models/{}:{}", self.base_url, model, method))
            .header("Content-Type", "application/json")
            .body(request)
            .send()
            .await
            .context("failed to send request")?;

        let status_code = response.status();
        let text = response
            .text()
            .await
            .context("failed to read response body")?;

        if !status_code.is_success() {
            error!(
                task = "gemini request",
                model = model,
                status = status_code.as_u16()
            );
        }

        ensure!(
            status_code.is_success(),
            "status code: {}, message: {}",
            status_code,
            error_message(&text)
        );

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pulls `error.message` out of a Gemini error body, falling back to the raw
/// body when it has another shape.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(response) => response.error.message,
        Err(_) => body.trim().to_string(),
    }
}
