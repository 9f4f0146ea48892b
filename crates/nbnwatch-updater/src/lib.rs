//! The update orchestrator.
//!
//! One invocation selects a bounded batch of stale providers, refreshes
//! them concurrently with per-provider failure isolation, and records the
//! run outcome. Every failure path between opening and closing the run
//! goes through a best-effort `error` close so a crash cannot leave a run
//! stuck in `running`.

mod debug;
mod unit;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use sqlx::PgPool;

use nbnwatch_core::AppConfig;
use nbnwatch_scraper::PageFetcher;

pub use debug::{debug_provider, DebugReport};
pub use unit::UnitOutcome;

/// Aggregated counts for one orchestrator pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Providers attempted.
    pub checked: usize,
    /// Providers whose content hash differed and were reparsed.
    pub changed: usize,
    /// Providers that failed anywhere in their unit of work.
    pub errors: usize,
}

/// Runs one update batch of up to `max_providers` stale active providers.
///
/// All selected providers are processed concurrently; a failure inside
/// one provider's unit of work is recorded against that provider and
/// counted, never propagated to siblings. The run record is closed with a
/// serialized [`RunSummary`] on success, or an `error` note if the
/// orchestrator itself fails outside the per-provider isolation.
///
/// # Errors
///
/// Returns an error for orchestrator-level failures only (run record
/// bookkeeping, batch selection, fetcher construction). Per-provider
/// failures surface in `RunSummary::errors`.
pub async fn run_update_batch(
    pool: &PgPool,
    config: &AppConfig,
    max_providers: i64,
) -> anyhow::Result<RunSummary> {
    let run = nbnwatch_db::create_update_run(pool).await?;

    let providers = match nbnwatch_db::list_stale_active_providers(pool, max_providers).await {
        Ok(providers) => providers,
        Err(err) => {
            fail_run_best_effort(pool, run.id, format!("batch selection failed: {err}")).await;
            return Err(err.into());
        }
    };

    let fetcher = match PageFetcher::new(
        config.fetch_timeout_secs,
        config.fetch_forbidden_retries,
        config.fetch_backoff_base_ms,
    ) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            fail_run_best_effort(pool, run.id, format!("fetcher construction failed: {err}"))
                .await;
            return Err(err.into());
        }
    };

    tracing::info!(
        run_id = run.id,
        providers = providers.len(),
        "starting update batch"
    );

    let max_concurrent = config.updater_max_concurrent.max(1);
    let outcomes: Vec<UnitOutcome> = stream::iter(&providers)
        .map(|provider| unit::process_provider(pool, &fetcher, provider, run.id))
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let summary = summarize(providers.len(), &outcomes);

    let notes = serde_json::json!({
        "checked": summary.checked,
        "changed": summary.changed,
        "errors": summary.errors,
    })
    .to_string();

    if let Err(err) = nbnwatch_db::finish_update_run(pool, run.id, &notes).await {
        fail_run_best_effort(pool, run.id, format!("failed to close run: {err}")).await;
        return Err(err.into());
    }

    tracing::info!(
        run_id = run.id,
        checked = summary.checked,
        changed = summary.changed,
        errors = summary.errors,
        "update batch finished"
    );

    Ok(summary)
}

fn summarize(checked: usize, outcomes: &[UnitOutcome]) -> RunSummary {
    let mut summary = RunSummary {
        checked,
        ..RunSummary::default()
    };
    for outcome in outcomes {
        match outcome {
            UnitOutcome::Unchanged => {}
            UnitOutcome::Updated { .. } => summary.changed += 1,
            UnitOutcome::Failed => summary.errors += 1,
        }
    }
    summary
}

/// Records an `error` close for the run, logging instead of propagating
/// if even that write fails (the datastore is likely the problem).
async fn fail_run_best_effort(pool: &PgPool, run_id: i64, note: String) {
    if let Err(err) = nbnwatch_db::fail_update_run(pool, run_id, &note).await {
        tracing::error!(run_id, error = %err, "failed to record error state for update run");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_counts_each_outcome_kind() {
        let outcomes = [
            UnitOutcome::Unchanged,
            UnitOutcome::Updated { plans: 4 },
            UnitOutcome::Updated { plans: 1 },
            UnitOutcome::Failed,
            UnitOutcome::Unchanged,
        ];
        let summary = summarize(outcomes.len(), &outcomes);

        assert_eq!(summary.checked, 5);
        assert_eq!(summary.changed, 2);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn summary_serializes_to_run_notes_shape() {
        let summary = RunSummary {
            checked: 30,
            changed: 3,
            errors: 1,
        };
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["checked"], 30);
        assert_eq!(json["changed"], 3);
        assert_eq!(json["errors"], 1);
    }

    #[test]
    fn empty_batch_summarizes_to_zeroes() {
        let summary = summarize(0, &[]);
        assert_eq!(summary, RunSummary::default());
    }
}
