//! The per-provider unit of work.
//!
//! fetch → hash compare → parse → normalize/validate → upsert → provider
//! state update, strictly sequential within one provider. Every failure is
//! converted into a recorded outcome at this boundary; nothing propagates
//! to sibling providers.

use sqlx::PgPool;

use nbnwatch_db::{DbError, ProviderRow};
use nbnwatch_scraper::{content_hash, find_parser_for_url, normalize_extract, validate_plan, PageFetcher};

/// How one provider's unit of work settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Page reachable, content hash unchanged, parsing skipped.
    Unchanged,
    /// Page changed and was reparsed; plans were upserted.
    Updated { plans: usize },
    /// Fetch, parse, or persistence failed; recorded on the provider.
    Failed,
}

/// Processes one provider, absorbing every error into an outcome.
pub(crate) async fn process_provider(
    pool: &PgPool,
    fetcher: &PageFetcher,
    provider: &ProviderRow,
    run_id: i64,
) -> UnitOutcome {
    match process_provider_inner(pool, fetcher, provider, run_id).await {
        Ok(outcome) => outcome,
        Err(err) => {
            // Persistence failed mid-unit. Recording the failure would hit
            // the same datastore, so just log and count it.
            tracing::error!(provider = %provider.slug, error = %err, "provider update failed");
            UnitOutcome::Failed
        }
    }
}

async fn process_provider_inner(
    pool: &PgPool,
    fetcher: &PageFetcher,
    provider: &ProviderRow,
    run_id: i64,
) -> Result<UnitOutcome, DbError> {
    let html = match fetcher.fetch_html(&provider.url).await {
        Ok(html) => html,
        Err(err) => {
            // Network friction is not an extraction-quality problem;
            // needs_review stays as-is.
            tracing::warn!(provider = %provider.slug, error = %err, "fetch failed");
            nbnwatch_db::record_fetch_failure(pool, provider.id, &err.to_string()).await?;
            return Ok(UnitOutcome::Failed);
        }
    };

    let hash = content_hash(&html);
    if provider.last_content_hash.as_deref() == Some(hash.as_str()) {
        tracing::debug!(provider = %provider.slug, "content unchanged, skipping parse");
        nbnwatch_db::record_fetch_unchanged(pool, provider.id).await?;
        return Ok(UnitOutcome::Unchanged);
    }

    let parser = find_parser_for_url(&provider.url);
    tracing::debug!(
        provider = %provider.slug,
        parser = parser.name(),
        "content changed, parsing"
    );
    let extracts = parser.parse(&html, &provider.url);

    if extracts.is_empty() {
        // The new hash is persisted anyway so a broken-but-stable page is
        // not reparsed every cycle.
        tracing::warn!(provider = %provider.slug, parser = parser.name(), "no plans extracted");
        nbnwatch_db::record_parse_outcome(
            pool,
            provider.id,
            &hash,
            Some("no plans extracted from changed page"),
            true,
        )
        .await?;
        return Ok(UnitOutcome::Failed);
    }

    let mut review_notes: Vec<String> = Vec::new();
    let mut seen_names: Vec<String> = Vec::with_capacity(extracts.len());

    for raw in extracts {
        let plan = normalize_extract(raw);
        let validation = validate_plan(&plan);
        if validation.needs_review() {
            tracing::warn!(
                provider = %provider.slug,
                plan = %plan.plan_name,
                errors = validation.errors.len(),
                warnings = validation.warnings.len(),
                "plan failed plausibility checks, flagging provider for review"
            );
            review_notes.extend(validation.errors.iter().cloned());
            review_notes.extend(validation.warnings.iter().cloned());
        }

        // Imperfect rows are still upserted: availability over strictness.
        let (plan_id, _is_new) = nbnwatch_db::upsert_plan(pool, provider.id, &plan).await?;
        if let Some(price_cents) = plan.ongoing_price_cents {
            nbnwatch_db::insert_price_observation_if_changed(
                pool,
                plan_id,
                Some(run_id),
                price_cents,
            )
            .await?;
        }
        seen_names.push(plan.plan_name);
    }

    // Plans that vanished from the page stop showing as active. Only
    // reached with a non-empty extraction, so a transient parse miss can
    // never mass-deactivate a provider's catalogue.
    let deactivated =
        nbnwatch_db::deactivate_missing_plans(pool, provider.id, &seen_names).await?;
    if deactivated > 0 {
        tracing::info!(
            provider = %provider.slug,
            deactivated,
            "deactivated plans missing from this scrape"
        );
    }

    let needs_review = !review_notes.is_empty();
    let last_error = if needs_review {
        Some(review_notes.join("; "))
    } else {
        None
    };
    nbnwatch_db::record_parse_outcome(
        pool,
        provider.id,
        &hash,
        last_error.as_deref(),
        needs_review,
    )
    .await?;

    Ok(UnitOutcome::Updated {
        plans: seen_names.len(),
    })
}
