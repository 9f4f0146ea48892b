//! Database operations for the `providers` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `providers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProviderRow {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub url: String,
    pub is_active: bool,
    pub last_fetch_at: Option<DateTime<Utc>>,
    pub last_content_hash: Option<String>,
    pub last_error: Option<String>,
    pub needs_review: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns up to `limit` active providers ordered by staleness: providers
/// never fetched come first, then the longest-unfetched.
///
/// This ordering is the whole batch-selection policy; no explicit queue
/// is needed for fair round-robin freshness.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_stale_active_providers(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<ProviderRow>, DbError> {
    let rows = sqlx::query_as::<_, ProviderRow>(
        "SELECT id, slug, name, url, is_active, last_fetch_at, last_content_hash, \
                last_error, needs_review, created_at, updated_at \
         FROM providers \
         WHERE is_active = TRUE \
         ORDER BY last_fetch_at ASC NULLS FIRST, id ASC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetches a provider by slug.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_provider_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<ProviderRow>, DbError> {
    let row = sqlx::query_as::<_, ProviderRow>(
        "SELECT id, slug, name, url, is_active, last_fetch_at, last_content_hash, \
                last_error, needs_review, created_at, updated_at \
         FROM providers \
         WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts or updates a provider from the seed file.
///
/// Conflicts on `slug` update the display name, url, and active flag in
/// place. Health columns (`last_fetch_at`, `last_content_hash`,
/// `last_error`, `needs_review`) are never touched by seeding.
///
/// Returns the internal `id` of the upserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_provider(
    pool: &PgPool,
    seed: &nbnwatch_core::ProviderSeed,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO providers (slug, name, url, is_active) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (slug) DO UPDATE SET \
             name       = EXCLUDED.name, \
             url        = EXCLUDED.url, \
             is_active  = EXCLUDED.is_active, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(seed.slug())
    .bind(&seed.name)
    .bind(&seed.url)
    .bind(seed.active)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Records an unchanged-page check: the page was reachable and its hash
/// matches the stored one, so parsing was skipped. Refreshes
/// `last_fetch_at` and clears any previous error/review state.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn record_fetch_unchanged(pool: &PgPool, id: i64) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE providers \
         SET last_fetch_at = NOW(), last_error = NULL, needs_review = FALSE, \
             updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Records a fetch failure.
///
/// `needs_review` is deliberately untouched: a 403 or timeout is network
/// friction, not an extraction-quality problem. `last_fetch_at` is still
/// advanced so a permanently failing provider cannot hog every batch.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn record_fetch_failure(pool: &PgPool, id: i64, error: &str) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE providers \
         SET last_fetch_at = NOW(), last_error = $2, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(error)
    .execute(pool)
    .await?;

    Ok(())
}

/// Records the outcome of a parse attempt on a changed page.
///
/// The new content hash is persisted whether or not extraction produced
/// anything, so an unchanged broken page is not re-parsed every cycle.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn record_parse_outcome(
    pool: &PgPool,
    id: i64,
    content_hash: &str,
    last_error: Option<&str>,
    needs_review: bool,
) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE providers \
         SET last_fetch_at = NOW(), last_content_hash = $2, last_error = $3, \
             needs_review = $4, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(content_hash)
    .bind(last_error)
    .bind(needs_review)
    .execute(pool)
    .await?;

    Ok(())
}

/// Clears the `needs_review` flag after manual correction (the admin
/// approve action). Plan data is left untouched.
///
/// Returns `true` if a provider row was updated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn clear_needs_review(pool: &PgPool, slug: &str) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "UPDATE providers SET needs_review = FALSE, updated_at = NOW() WHERE slug = $1",
    )
    .bind(slug)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Activates or deactivates a provider. Providers are never deleted.
///
/// Returns `true` if a provider row was updated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn set_provider_active(pool: &PgPool, slug: &str, active: bool) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "UPDATE providers SET is_active = $2, updated_at = NOW() WHERE slug = $1",
    )
    .bind(slug)
    .bind(active)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}
