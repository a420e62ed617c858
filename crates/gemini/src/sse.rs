//! SSE stream parser for `streamGenerateContent` responses.
//!
//! Converts a reqwest response byte stream into text chunks using the
//! `eventsource-stream` crate for SSE protocol compliance. Each SSE data
//! payload is one `GenerateContentResponse` chunk; chunks without text
//! (metadata-only) are skipped.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};

use crate::api::{GeminiApiError, GenerateContentResponse};

/// Parse a streaming response body into a stream of text chunks.
pub fn parse_text_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<String, GeminiApiError>> + Send>> {
    let event_stream = response.bytes_stream().eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => match serde_json::from_str::<GenerateContentResponse>(&event.data) {
                Ok(chunk) => chunk.text().map(Ok),
                Err(e) => Some(Err(GeminiApiError::Stream(format!(
                    "failed to parse stream chunk: {e}"
                )))),
            },
            Err(e) => Some(Err(GeminiApiError::Stream(format!("SSE stream error: {e}")))),
        }
    });

    Box::pin(mapped)
}
