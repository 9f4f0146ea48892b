//! Single-provider diagnosis without persistence.

use serde::Serialize;
use sqlx::PgPool;

use nbnwatch_core::{AppConfig, NormalizedPlan};
use nbnwatch_scraper::{find_parser_for_url, normalize_extract, validate_plan, PageFetcher};

/// What `debug_provider` saw: which parser claimed the URL, how many
/// extracts it produced, one normalized sample, and any plausibility
/// issues. Nothing is written to the database.
#[derive(Debug, Serialize)]
pub struct DebugReport {
    pub slug: String,
    pub url: String,
    pub parser: &'static str,
    pub count: usize,
    pub sample: Option<NormalizedPlan>,
    pub issues: Vec<String>,
}

/// Fetches and parses a single provider for diagnosing a broken strategy.
///
/// # Errors
///
/// Returns an error if the provider is unknown, the fetcher cannot be
/// built, or the page cannot be fetched.
pub async fn debug_provider(
    pool: &PgPool,
    config: &AppConfig,
    slug: &str,
) -> anyhow::Result<DebugReport> {
    let provider = nbnwatch_db::get_provider_by_slug(pool, slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("provider '{slug}' not found"))?;

    let fetcher = PageFetcher::new(
        config.fetch_timeout_secs,
        config.fetch_forbidden_retries,
        config.fetch_backoff_base_ms,
    )?;
    let html = fetcher.fetch_html(&provider.url).await?;

    let parser = find_parser_for_url(&provider.url);
    let extracts = parser.parse(&html, &provider.url);
    let count = extracts.len();

    let mut issues = Vec::new();
    let mut sample = None;
    for raw in extracts {
        let plan = normalize_extract(raw);
        let validation = validate_plan(&plan);
        issues.extend(validation.errors);
        issues.extend(validation.warnings);
        if sample.is_none() {
            sample = Some(plan);
        }
    }

    Ok(DebugReport {
        slug: provider.slug,
        url: provider.url,
        parser: parser.name(),
        count,
        sample,
        issues,
    })
}
