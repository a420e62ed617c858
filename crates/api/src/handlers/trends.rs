//! Handler for the `/trends` endpoint.
//!
//! Wraps a fixed prompt template around the Gemini call. This endpoint
//! never surfaces a provider failure to the caller: a missing credential,
//! provider error, or unparseable reply all degrade to a fallback payload
//! with the same shape.

use axum::extract::{Query, State};
use axum::Json;
use rand::Rng;
use serde::{Deserialize, Serialize};

use postrelay_gemini::GeminiApi;

use crate::error::AppError;
use crate::handlers::gemini::resolve_api_key;
use crate::state::AppState;

/// Platforms named in the trends prompt and used for fallback entries.
const TREND_PLATFORMS: &[&str] = &["Twitter/X", "LinkedIn", "Threads"];

/// Topic templates for the fallback payload, one per entry.
const FALLBACK_TOPICS: &[&str] = &[
    "AI-assisted content workflows",
    "Short-form video strategy",
    "Building in public",
    "Community-led growth",
    "Creator monetization",
    "Authentic founder stories",
];

/// One trend entry, as requested from the provider and as returned to
/// the caller.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrendEntry {
    pub topic: String,
    pub engagement: String,
    pub platform: String,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub trends: Vec<TrendEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TrendsParams {
    pub area: Option<String>,
}

/// GET /trends?area=
pub async fn trends(
    State(state): State<AppState>,
    Query(params): Query<TrendsParams>,
) -> Json<TrendsResponse> {
    let area = params.area.as_deref().unwrap_or("general");

    let trends = match fetch_trends(&state, area).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, area, "Trend fetch failed, serving fallback");
            fallback_trends(area)
        }
    };

    Json(TrendsResponse { trends })
}

/// Ask the provider for trend entries and parse its reply.
async fn fetch_trends(state: &AppState, area: &str) -> Result<Vec<TrendEntry>, AppError> {
    let api_key = resolve_api_key(None, &state.config)?;
    let api = GeminiApi::new(state.http.clone(), api_key, state.config.gemini_model.clone());

    let text = api
        .generate(&trends_prompt(area))
        .await?
        .ok_or_else(|| AppError::InternalError("Provider returned no text".to_string()))?;

    serde_json::from_str(strip_code_fences(&text))
        .map_err(|e| AppError::InternalError(format!("Unparseable trends reply: {e}")))
}

/// Fixed instructional prompt sent to the provider.
fn trends_prompt(area: &str) -> String {
    format!(
        "List exactly 6 topics currently trending in the \"{area}\" space \
         for social media content creators. Respond with only a JSON array \
         of objects, each with keys \"topic\", \"engagement\", and \
         \"platform\". The engagement value must be a percentage string \
         between \"+120%\" and \"+300%\". Spread the entries across these \
         platforms: {}. Do not include any text outside the JSON array.",
        TREND_PLATFORMS.join(", ")
    )
}

/// Strip surrounding Markdown code-fence markers, if present.
///
/// Models frequently wrap JSON replies in ```json ... ``` fences even
/// when told not to.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Six deterministically-shaped placeholder entries with randomly
/// sampled engagement, so the caller always receives a usable payload.
fn fallback_trends(area: &str) -> Vec<TrendEntry> {
    let mut rng = rand::rng();
    FALLBACK_TOPICS
        .iter()
        .enumerate()
        .map(|(i, base)| TrendEntry {
            topic: format!("{base} in {area}"),
            engagement: format!("+{}%", rng.random_range(150..=280)),
            platform: TREND_PLATFORMS[i % TREND_PLATFORMS.len()].to_string(),
        })
        .collect()
}
