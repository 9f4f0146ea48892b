//! Database operations for the `update_runs` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `update_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UpdateRunRow {
    pub id: i64,
    pub public_id: Uuid,
    /// One of `running`, `finished`, `error`.
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Serialized result summary, or the failure note for `error` runs.
    pub notes: Option<String>,
}

/// Opens a new run in `running` status with `started_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_update_run(pool: &PgPool) -> Result<UpdateRunRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, UpdateRunRow>(
        "INSERT INTO update_runs (public_id, status) \
         VALUES ($1, 'running') \
         RETURNING id, public_id, status, started_at, finished_at, notes",
    )
    .bind(public_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Closes a run as `finished` with the serialized result summary.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`,
/// or [`DbError::Sqlx`] if the update fails.
pub async fn finish_update_run(pool: &PgPool, id: i64, notes: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE update_runs \
         SET status = 'finished', finished_at = NOW(), notes = $1 \
         WHERE id = $2 AND status = 'running'",
    )
    .bind(notes)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Closes a run as `error` with a descriptive note. Used by the crash
/// handler so an aborted orchestrator never leaves a run stuck in
/// `running`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`,
/// or [`DbError::Sqlx`] if the update fails.
pub async fn fail_update_run(pool: &PgPool, id: i64, note: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE update_runs \
         SET status = 'error', finished_at = NOW(), notes = $1 \
         WHERE id = $2 AND status = 'running'",
    )
    .bind(note)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Returns the most recent `limit` runs, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_update_runs(pool: &PgPool, limit: i64) -> Result<Vec<UpdateRunRow>, DbError> {
    let rows = sqlx::query_as::<_, UpdateRunRow>(
        "SELECT id, public_id, status, started_at, finished_at, notes \
         FROM update_runs \
         ORDER BY started_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
