//! Route definitions for the Gemini relay.

use axum::routing::post;
use axum::Router;

use crate::handlers::gemini;
use crate::state::AppState;

/// Routes mounted at `/gemini`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(gemini::generate))
        .route("/stream", post(gemini::stream))
}
