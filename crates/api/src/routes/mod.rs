//! Route definitions.

pub mod content;
pub mod gemini;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the application route tree (health is mounted separately).
///
/// ```text
/// POST /gemini/generate                    single-shot generation
/// POST /gemini/stream                      NDJSON streaming generation
///
/// GET  /trends                             trending topics (with fallback)
///
/// POST   /content/                         create
/// GET    /content/                         list (latest_only, platform, date)
/// GET    /content/{id}                     get_by_id
/// PUT    /content/{id}                     update (new version)
/// DELETE /content/{id}                     delete
/// GET    /content/versions/{title}/{platform}  version chain, newest first
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/gemini", gemini::router())
        .nest("/content/", content::router())
        .route("/trends", get(handlers::trends::trends))
}
