//! Content version entity model and DTOs.

use chrono::NaiveDate;
use postrelay_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `content_versions` table.
///
/// Rows are immutable after insert except `is_latest`, which the
/// repository flips when a newer version of the same (title, platform)
/// key is created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Content {
    pub id: DbId,
    pub title: String,
    pub platform: String,
    pub content_type: String,
    pub content_text: String,
    pub version: i32,
    pub is_latest: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new content record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContent {
    pub title: String,
    pub platform: String,
    pub content_type: String,
    pub content_text: String,
}

/// DTO for the update flow. An update never mutates the existing row;
/// it creates a new version, falling back to the existing title and
/// text when a field is omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContent {
    pub title: Option<String>,
    pub content_text: Option<String>,
}

/// Optional filters for the list query.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    /// Only return rows with `is_latest = true`.
    pub latest_only: bool,
    /// Case-insensitive substring match on `platform`.
    pub platform: Option<String>,
    /// Calendar-day match on `created_at`.
    pub date: Option<NaiveDate>,
}
