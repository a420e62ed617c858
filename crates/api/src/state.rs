use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
///
/// Note that no Gemini credential lives here beyond the immutable config
/// default: the key used for a given request is resolved per request and
/// passed explicitly, so one caller's credential can never leak into
/// another caller's request.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: postrelay_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Shared HTTP connection pool for Gemini calls.
    pub http: reqwest::Client,
}
