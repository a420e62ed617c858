//! REST client for the Google Gemini text-generation API.
//!
//! Supports single-shot generation (`generateContent`) and incremental
//! streaming (`streamGenerateContent` with `alt=sse`). The client is
//! cheap to construct per request over a shared [`reqwest::Client`], so
//! callers can scope the API key to a single request instead of storing
//! it in shared process state.

pub mod api;
pub mod sse;

pub use api::{GeminiApi, GeminiApiError};
