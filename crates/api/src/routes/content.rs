//! Route definitions for the content resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// Routes mounted at `/content`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(content::create).get(content::list))
        .route(
            "/versions/{title}/{platform}",
            get(content::list_versions),
        )
        .route(
            "/{id}",
            get(content::get_by_id)
                .put(content::update)
                .delete(content::delete),
        )
}
