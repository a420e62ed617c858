//! Repository for the `content_versions` table.
//!
//! Versioning model: each (title, platform) pair owns an independent
//! version chain starting at 1, with exactly one row flagged
//! `is_latest`. Creating a version demotes the previous latest and
//! inserts the successor in a single transaction, so concurrent writers
//! on the same key serialize instead of producing duplicate version
//! numbers or two latest rows.

use sqlx::PgPool;

use postrelay_core::types::DbId;

use crate::models::content::{Content, ContentFilter, CreateContent, UpdateContent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, platform, content_type, content_text, \
    version, is_latest, created_at";

/// Provides CRUD and version-management operations for content records.
pub struct ContentRepo;

impl ContentRepo {
    // ── Version-chain operations ─────────────────────────────────────

    /// Insert a new content record as the latest version of its
    /// (title, platform) chain.
    ///
    /// Demotes any previously latest row for the key and auto-assigns
    /// `MAX(version) + 1` (or 1 if the chain is empty), all inside one
    /// transaction.
    pub async fn create(pool: &PgPool, input: &CreateContent) -> Result<Content, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Demote the current latest (if any).
        sqlx::query(
            "UPDATE content_versions SET is_latest = false \
             WHERE title = $1 AND platform = $2 AND is_latest = true",
        )
        .bind(&input.title)
        .bind(&input.platform)
        .execute(&mut *tx)
        .await?;

        // Insert the new row as latest with the next version number.
        let query = format!(
            "INSERT INTO content_versions
                (title, platform, content_type, content_text, version, is_latest)
             VALUES (
                $1, $2, $3, $4,
                (SELECT COALESCE(MAX(version), 0) + 1 FROM content_versions
                 WHERE title = $1 AND platform = $2),
                true
             )
             RETURNING {COLUMNS}"
        );
        let content = sqlx::query_as::<_, Content>(&query)
            .bind(&input.title)
            .bind(&input.platform)
            .bind(&input.content_type)
            .bind(&input.content_text)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(content)
    }

    /// Create a new version from an existing record.
    ///
    /// Resolves the existing row (returns `None` if absent), then inserts
    /// a successor copying `platform`/`content_type` from it and using the
    /// supplied title/text or falling back to the existing values. The
    /// version number is `MAX(version) + 1` of the *target* chain, i.e.
    /// the (supplied-or-existing title, platform) pair, so a renamed title
    /// joins (or starts) the chain for the new key and the old chain's
    /// remaining rows keep their flags.
    pub async fn create_new_version(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContent,
    ) -> Result<Option<Content>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM content_versions WHERE id = $1 FOR UPDATE");
        let existing = sqlx::query_as::<_, Content>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let title = input.title.as_deref().unwrap_or(&existing.title);
        let content_text = input
            .content_text
            .as_deref()
            .unwrap_or(&existing.content_text);

        // Demote the current latest of the target chain.
        sqlx::query(
            "UPDATE content_versions SET is_latest = false \
             WHERE title = $1 AND platform = $2 AND is_latest = true",
        )
        .bind(title)
        .bind(&existing.platform)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO content_versions
                (title, platform, content_type, content_text, version, is_latest)
             VALUES (
                $1, $2, $3, $4,
                (SELECT COALESCE(MAX(version), 0) + 1 FROM content_versions
                 WHERE title = $1 AND platform = $2),
                true
             )
             RETURNING {COLUMNS}"
        );
        let content = sqlx::query_as::<_, Content>(&query)
            .bind(title)
            .bind(&existing.platform)
            .bind(&existing.content_type)
            .bind(content_text)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(content))
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Find a content record by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Content>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_versions WHERE id = $1");
        sqlx::query_as::<_, Content>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all versions for a (title, platform) key, newest version first.
    pub async fn list_versions(
        pool: &PgPool,
        title: &str,
        platform: &str,
    ) -> Result<Vec<Content>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_versions
             WHERE title = $1 AND platform = $2
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, Content>(&query)
            .bind(title)
            .bind(platform)
            .fetch_all(pool)
            .await
    }

    /// List content records ordered by creation time descending, with
    /// optional filters.
    ///
    /// - `latest_only` restricts to rows flagged `is_latest`.
    /// - `platform` is a case-insensitive substring match (ILIKE).
    /// - `date` matches rows whose `created_at` falls on that calendar day.
    pub async fn list(pool: &PgPool, filter: &ContentFilter) -> Result<Vec<Content>, sqlx::Error> {
        // Build dynamic WHERE clauses; bind order must match clause order.
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if filter.latest_only {
            conditions.push("is_latest = true".to_string());
        }
        if filter.platform.is_some() {
            conditions.push(format!("platform ILIKE '%' || ${bind_idx} || '%'"));
            bind_idx += 1;
        }
        if filter.date.is_some() {
            conditions.push(format!("created_at::date = ${bind_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM content_versions {where_clause} ORDER BY created_at DESC"
        );

        let mut q = sqlx::query_as::<_, Content>(&query);
        if let Some(platform) = &filter.platform {
            q = q.bind(platform);
        }
        if let Some(date) = filter.date {
            q = q.bind(date);
        }
        q.fetch_all(pool).await
    }

    // ── Deletion ─────────────────────────────────────────────────────

    /// Permanently delete a content record by ID. Returns `true` if a row
    /// was removed.
    ///
    /// Deletes exactly the identified row; deleting the current latest
    /// does not re-promote the next-highest version.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_versions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
