//! Database operations for `plans` and `plan_price_history`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `plans` table.
///
/// `technology` and `plan_type` are stored as TEXT and parse back through
/// the core enums' `FromStr` impls when a typed value is needed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRow {
    pub id: i64,
    pub provider_id: i64,
    pub name: String,
    pub speed_tier: Option<i32>,
    pub upload_mbps: Option<i32>,
    pub intro_price_cents: Option<i64>,
    pub ongoing_price_cents: Option<i64>,
    pub intro_duration_days: Option<i32>,
    pub min_term_months: Option<i32>,
    pub setup_fee_cents: Option<i64>,
    pub modem_cost_cents: Option<i64>,
    pub conditions: Option<String>,
    pub source_url: Option<String>,
    pub technology: String,
    pub plan_type: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns a provider's plans, active first, then by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_plans_for_provider(
    pool: &PgPool,
    provider_id: i64,
) -> Result<Vec<PlanRow>, DbError> {
    let rows = sqlx::query_as::<_, PlanRow>(
        "SELECT id, provider_id, name, speed_tier, upload_mbps, intro_price_cents, \
                ongoing_price_cents, intro_duration_days, min_term_months, \
                setup_fee_cents, modem_cost_cents, conditions, source_url, \
                technology, plan_type, is_active, created_at, updated_at \
         FROM plans \
         WHERE provider_id = $1 \
         ORDER BY is_active DESC, name ASC",
    )
    .bind(provider_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Upserts a plan row by its `(provider_id, name)` identity.
///
/// Last-write-wins: every mutable attribute is overwritten from the new
/// extraction, `is_active` snaps back to TRUE, and `updated_at` advances.
/// No old/new field merging happens here.
///
/// Returns `(id, is_new)` where `is_new` reports whether the row was
/// inserted rather than updated (`xmax = 0` on the returned tuple).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_plan(
    pool: &PgPool,
    provider_id: i64,
    plan: &nbnwatch_core::NormalizedPlan,
) -> Result<(i64, bool), DbError> {
    let speed_tier = plan
        .speed_tier
        .and_then(|tier| i32::try_from(tier.mbps()).ok());
    let upload_mbps = plan.upload_mbps.and_then(|mbps| i32::try_from(mbps).ok());

    let (id, is_new): (i64, bool) = sqlx::query_as(
        "INSERT INTO plans \
             (provider_id, name, speed_tier, upload_mbps, intro_price_cents, \
              ongoing_price_cents, intro_duration_days, min_term_months, \
              setup_fee_cents, modem_cost_cents, conditions, source_url, \
              technology, plan_type) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         ON CONFLICT (provider_id, name) DO UPDATE SET \
             speed_tier          = EXCLUDED.speed_tier, \
             upload_mbps         = EXCLUDED.upload_mbps, \
             intro_price_cents   = EXCLUDED.intro_price_cents, \
             ongoing_price_cents = EXCLUDED.ongoing_price_cents, \
             intro_duration_days = EXCLUDED.intro_duration_days, \
             min_term_months     = EXCLUDED.min_term_months, \
             setup_fee_cents     = EXCLUDED.setup_fee_cents, \
             modem_cost_cents    = EXCLUDED.modem_cost_cents, \
             conditions          = EXCLUDED.conditions, \
             source_url          = EXCLUDED.source_url, \
             technology          = EXCLUDED.technology, \
             plan_type           = EXCLUDED.plan_type, \
             is_active           = TRUE, \
             updated_at          = NOW() \
         RETURNING id, (xmax = 0) AS is_new",
    )
    .bind(provider_id)
    .bind(&plan.plan_name)
    .bind(speed_tier)
    .bind(upload_mbps)
    .bind(plan.intro_price_cents)
    .bind(plan.ongoing_price_cents)
    .bind(plan.intro_duration_days)
    .bind(plan.min_term_months)
    .bind(plan.setup_fee_cents)
    .bind(plan.modem_cost_cents)
    .bind(&plan.conditions)
    .bind(&plan.source_url)
    .bind(plan.technology.as_str())
    .bind(plan.plan_type.as_str())
    .fetch_one(pool)
    .await?;

    Ok((id, is_new))
}

/// Appends a price-history observation only when the ongoing price
/// differs from the latest recorded one.
///
/// Uses an atomic CTE so the check and the insert happen in a single
/// round-trip; two concurrent observers cannot both read "unchanged" and
/// then both insert.
///
/// Returns `true` if a new observation was recorded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the database operation fails.
pub async fn insert_price_observation_if_changed(
    pool: &PgPool,
    plan_id: i64,
    update_run_id: Option<i64>,
    price_cents: i64,
) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "WITH last AS ( \
             SELECT price_cents \
             FROM plan_price_history \
             WHERE plan_id = $1 \
             ORDER BY observed_at DESC, id DESC \
             LIMIT 1 \
         ) \
         INSERT INTO plan_price_history (plan_id, update_run_id, price_cents) \
         SELECT $1, $2, $3 \
         WHERE NOT EXISTS (SELECT 1 FROM last WHERE last.price_cents = $3)",
    )
    .bind(plan_id)
    .bind(update_run_id)
    .bind(price_cents)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Marks plans for `provider_id` whose `name` is NOT in `seen_names` as
/// inactive.
///
/// Called after a successful non-empty scrape so plans that vanished from
/// the provider's page stop showing as active. Callers must not invoke
/// this with an empty `seen_names` produced by a failed or empty parse;
/// the updater guards that path, since deactivating everything off the
/// back of a transient parse miss would be destructive.
///
/// Returns the number of rows deactivated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn deactivate_missing_plans(
    pool: &PgPool,
    provider_id: i64,
    seen_names: &[String],
) -> Result<u64, DbError> {
    let rows_affected = sqlx::query(
        "UPDATE plans \
         SET is_active = FALSE, updated_at = NOW() \
         WHERE provider_id = $1 \
           AND is_active = TRUE \
           AND name != ALL($2::text[])",
    )
    .bind(provider_id)
    .bind(seen_names)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected)
}
