//! HTTP client for the Gemini text-generation API.
//!
//! Configuration is via environment variables:
//! - `GEMINI_API_KEY` - API key (analysis is disabled without it)
//! - `CURRICULUM_BOARD_MODEL` - model name (default: `gemini-2.5-pro`)

use serde_json::Value;
use thiserror::Error;

/// Default model when `CURRICULUM_BOARD_MODEL` is unset.
const DEFAULT_MODEL: &str = "gemini-2.5-pro";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Upstream failures. Callers inside this crate convert all of these to the
/// fixed fallback text; the variants exist for logging.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {0}")]
    Api(reqwest::StatusCode),

    #[error("No text in response")]
    MalformedResponse,
}

/// Thin client over the `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    /// Create client from environment variables. Warns (once, at startup)
    /// when the key is missing rather than failing: the rest of the board
    /// works fine without analysis.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; analysis requests will fall back");
        }
        let model =
            std::env::var("CURRICULUM_BOARD_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    /// Create with explicit configuration.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the generated text verbatim.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;

        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let url = format!("{}/{}:generateContent?key={}", API_BASE, self.model, api_key);
        let response = self.http.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(GeminiError::Api(response.status()));
        }

        let payload: Value = response.json().await?;
        payload
            .get("candidates")
            .and_then(|candidates| candidates.get(0))
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.get(0))
            .and_then(|part| part.get("text"))
            .and_then(|text| text.as_str())
            .map(|text| text.to_string())
            .ok_or(GeminiError::MalformedResponse)
    }
}
