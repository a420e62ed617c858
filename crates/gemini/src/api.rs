//! HTTP client for the Gemini `generateContent` endpoints.
//!
//! Wraps the Generative Language REST API (single-shot generation and
//! SSE streaming) using [`reqwest`]. The API key is sent in the
//! `x-goog-api-key` header so it never appears in URLs or error text.

use std::pin::Pin;

use futures::stream::Stream;
use serde::{Deserialize, Serialize};

use crate::sse;

/// Base URL of the Generative Language REST API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// HTTP client for the Gemini API, scoped to one API key and model.
pub struct GeminiApi {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

/// Errors from the Gemini REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The streaming response could not be parsed.
    #[error("Gemini stream error: {0}")]
    Stream(String),
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

/// One response message (or stream chunk) from `generateContent`.
///
/// Both the single-shot endpoint and each SSE chunk of the streaming
/// endpoint use this shape.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts, or `None` when
    /// the response carries no text (e.g. a safety block or a metadata-only
    /// stream chunk).
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl GeminiApi {
    /// Create a client for one request, reusing an existing
    /// [`reqwest::Client`] for connection pooling.
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    /// Generate a complete response for a prompt.
    ///
    /// Returns `None` when the model produced no text.
    pub async fn generate(&self, prompt: &str) -> Result<Option<String>, GeminiApiError> {
        let response = self
            .client
            .post(format!(
                "{DEFAULT_BASE_URL}/models/{}:generateContent",
                self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let parsed: GenerateContentResponse = response.json().await?;
        Ok(parsed.text())
    }

    /// Open a streaming generation call.
    ///
    /// Yields the text of each chunk as it arrives; chunks without text
    /// are skipped. The stream ends when the provider's stream ends.
    pub async fn stream_generate(
        &self,
        prompt: &str,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<String, GeminiApiError>> + Send>>, GeminiApiError>
    {
        let response = self
            .client
            .post(format!(
                "{DEFAULT_BASE_URL}/models/{}:streamGenerateContent",
                self.model
            ))
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(sse::parse_text_stream(response))
    }

    /// Turn a non-2xx response into [`GeminiApiError::Api`] with the raw body.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GeminiApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GeminiApiError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_concatenates_parts() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "Hello"}, {"text": ", world"}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Hello, world"));
    }

    #[test]
    fn response_without_candidates_has_no_text() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.text().is_none());
    }

    #[test]
    fn response_with_metadata_only_chunk_has_no_text() {
        // Streaming chunks can carry only usage metadata.
        let json = r#"{
            "candidates": [{"content": {"parts": [], "role": "model"}}],
            "usageMetadata": {"promptTokenCount": 4}
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.text().is_none());
    }

    #[test]
    fn request_serializes_to_contents_parts_shape() {
        let request = GenerateContentRequest::from_prompt("Hi");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Hi");
    }
}
