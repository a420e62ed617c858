//! Handlers for the `/content` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use postrelay_core::error::CoreError;
use postrelay_core::types::DbId;
use postrelay_db::models::content::{Content, ContentFilter, CreateContent, UpdateContent};
use postrelay_db::repositories::ContentRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `GET /content/`.
#[derive(Debug, Deserialize)]
pub struct ContentListParams {
    #[serde(default)]
    pub latest_only: bool,
    pub platform: Option<String>,
    /// Calendar day in `YYYY-MM-DD` form.
    pub date: Option<String>,
}

/// POST /content/
///
/// Creates a content record as the latest version of its (title, platform)
/// chain, demoting any previous latest.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateContent>,
) -> AppResult<(StatusCode, Json<Content>)> {
    let content = ContentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(content)))
}

/// GET /content/?latest_only=&platform=&date=
///
/// An invalid `date` string yields a 400, never a silent empty list.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ContentListParams>,
) -> AppResult<Json<Vec<Content>>> {
    let date = params
        .date
        .as_deref()
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                AppError::BadRequest(format!("Invalid date '{s}', expected YYYY-MM-DD"))
            })
        })
        .transpose()?;

    let filter = ContentFilter {
        latest_only: params.latest_only,
        platform: params.platform,
        date,
    };
    let records = ContentRepo::list(&state.pool, &filter).await?;
    Ok(Json(records))
}

/// GET /content/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Content>> {
    let content = ContentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Content",
            id,
        }))?;
    Ok(Json(content))
}

/// GET /content/versions/{title}/{platform}
///
/// All versions for a (title, platform) key, newest first. 404 when the
/// chain has no records at all.
pub async fn list_versions(
    State(state): State<AppState>,
    Path((title, platform)): Path<(String, String)>,
) -> AppResult<Json<Vec<Content>>> {
    let versions = ContentRepo::list_versions(&state.pool, &title, &platform).await?;
    if versions.is_empty() {
        return Err(AppError::NotFound(format!(
            "No versions found for '{title}' on {platform}"
        )));
    }
    Ok(Json(versions))
}

/// PUT /content/{id}
///
/// Never mutates the existing record: creates a new version with the
/// supplied fields (falling back to the existing values) and demotes the
/// prior latest of the target chain.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContent>,
) -> AppResult<Json<Content>> {
    let content = ContentRepo::create_new_version(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Content",
            id,
        }))?;
    Ok(Json(content))
}

/// DELETE /content/{id}
///
/// Removes exactly the identified version; the rest of the chain is left
/// untouched (no re-promotion of the next-highest version).
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Json<Value>> {
    let deleted = ContentRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(Json(json!({ "message": format!("Content {id} deleted") })))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Content",
            id,
        }))
    }
}
