//! Handlers for the `/gemini` relay endpoints.
//!
//! Both endpoints resolve the provider credential per request: a key in
//! the request body wins, else the configured `GEMINI_API_KEY`, else 400.
//! The resolved key is passed explicitly into the [`GeminiApi`] built for
//! that one request and never written to shared state.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use postrelay_gemini::{GeminiApi, GeminiApiError};

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Substituted when the provider yields no text at all.
const NO_RESPONSE_PLACEHOLDER: &str = "No response generated";

/// Request body for `POST /gemini/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub context: String,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// Request body for `POST /gemini/stream`.
#[derive(Debug, Deserialize)]
pub struct StreamRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// Resolve the Gemini credential for one request.
///
/// Order: request-supplied key, then the configured process-wide key,
/// then a client error.
pub fn resolve_api_key(
    request_key: Option<String>,
    config: &ServerConfig,
) -> Result<String, AppError> {
    request_key
        .filter(|k| !k.is_empty())
        .or_else(|| config.gemini_api_key.clone())
        .ok_or_else(|| AppError::BadRequest("No API key provided".to_string()))
}

/// Compose the provider prompt from a message and optional context text.
pub fn compose_prompt(message: &str, context: &str) -> String {
    if context.is_empty() {
        message.to_string()
    } else {
        format!("{message}\n\nContext (selected files):\n{context}")
    }
}

/// POST /gemini/generate
///
/// Single-shot generation: returns the complete response text in one
/// JSON object.
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<Json<GenerateResponse>> {
    let api_key = resolve_api_key(input.api_key, &state.config)?;
    let api = GeminiApi::new(state.http.clone(), api_key, state.config.gemini_model.clone());

    let text = api
        .generate(&compose_prompt(&input.message, &input.context))
        .await?;

    Ok(Json(GenerateResponse {
        response: text.unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string()),
    }))
}

/// POST /gemini/stream
///
/// Streaming generation as newline-delimited JSON: each provider chunk is
/// flushed to the caller as soon as it arrives, one `{"response": chunk}`
/// object per line. Empty chunks are skipped and the stream ends without
/// a terminator record.
pub async fn stream(
    State(state): State<AppState>,
    Json(input): Json<StreamRequest>,
) -> AppResult<Response> {
    let api_key = resolve_api_key(input.api_key, &state.config)?;
    let api = GeminiApi::new(state.http.clone(), api_key, state.config.gemini_model.clone());

    let chunks = api.stream_generate(&input.prompt).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(ndjson_lines(chunks)))
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// Encode text chunks as NDJSON lines, skipping empty chunks.
///
/// Errors pass through untouched; an error mid-stream aborts the
/// response body.
fn ndjson_lines(
    chunks: impl Stream<Item = Result<String, GeminiApiError>> + Send,
) -> impl Stream<Item = Result<String, GeminiApiError>> + Send {
    chunks.filter_map(|result| async move {
        match result {
            Ok(chunk) if chunk.is_empty() => None,
            Ok(chunk) => Some(Ok(
                serde_json::json!({ "response": chunk }).to_string() + "\n"
            )),
            Err(e) => Some(Err(e)),
        }
    })
}
