//! Generic text-scan heuristic.
//!
//! The universal fallback for providers with no specialized strategy, and
//! the second pass for specialized strategies whose structured pass came
//! up empty. Lower precision by design: it only trusts chunks that carry
//! both a currency amount and an `NBN <n>` marker.

use std::sync::LazyLock;

use regex::Regex;

use nbnwatch_core::{RawPlanExtract, SpeedTier};

use crate::parse::{dollar_amount_cents, parse_intro_pricing, speed_from_text};
use crate::providers::{classify_plan_type, classify_technology, MIN_EXTRACT_PRICE_CENTS};
use crate::registry::PlanParser;

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("valid regex")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\s*\d").expect("valid regex"));

static NBN_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnbn\s*\d+").expect("valid regex"));

pub(crate) struct GenericFallback;

impl PlanParser for GenericFallback {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn can_handle(&self, _url: &str) -> bool {
        true
    }

    fn parse(&self, html: &str, url: &str) -> Vec<RawPlanExtract> {
        scan_text_lines(html, &slug_from_url(url), url)
    }
}

/// Scans stripped page text line by line, emitting one extract per chunk
/// that mentions both a dollar amount and an NBN speed marker.
///
/// A short plain-text chunk immediately preceding a match is taken as the
/// plan name; otherwise the name is synthesized from the speed marker.
/// Speeds outside the canonical tier set are kept as `None` rather than
/// invented.
pub(crate) fn scan_text_lines(html: &str, provider_slug: &str, url: &str) -> Vec<RawPlanExtract> {
    let mut extracts = Vec::new();
    let mut candidate_name: Option<String> = None;
    let mut seen_names: Vec<String> = Vec::new();

    for chunk in text_chunks(html) {
        let has_price = CURRENCY_RE.is_match(&chunk);
        let has_speed = NBN_MARKER_RE.is_match(&chunk);

        if !has_price && !has_speed {
            if looks_like_plan_name(&chunk) {
                candidate_name = Some(chunk);
            }
            continue;
        }
        if !(has_price && has_speed) {
            continue;
        }

        let speed_mbps = speed_from_text(&chunk).filter(|&s| SpeedTier::from_mbps(s).is_some());

        let (intro_price_cents, ongoing_price_cents, intro_duration_days) =
            match parse_intro_pricing(&chunk) {
                Some(pricing) => (
                    Some(pricing.intro_cents),
                    Some(pricing.ongoing_cents),
                    Some(pricing.duration_days),
                ),
                None => match dollar_amount_cents(&chunk) {
                    Some(cents) => (Some(cents), Some(cents), None),
                    None => (None, None, None),
                },
            };

        let Some(ongoing) = ongoing_price_cents else {
            continue;
        };
        if ongoing < MIN_EXTRACT_PRICE_CENTS {
            continue;
        }

        let plan_name = candidate_name.take().unwrap_or_else(|| {
            speed_mbps.map_or_else(|| "NBN Plan".to_string(), |s| format!("NBN {s} Plan"))
        });
        if seen_names.contains(&plan_name) {
            continue;
        }
        seen_names.push(plan_name.clone());

        extracts.push(RawPlanExtract {
            provider_slug: provider_slug.to_string(),
            plan_name,
            speed_mbps,
            upload_mbps: None,
            intro_price_cents,
            ongoing_price_cents,
            intro_duration_days,
            min_term_months: None,
            setup_fee_cents: None,
            modem_cost_cents: None,
            conditions: None,
            source_url: url.to_string(),
            technology: classify_technology(&chunk),
            plan_type: classify_plan_type(&chunk),
        });
    }

    extracts
}

/// Strips `<script>`/`<style>` blocks and splits the remaining markup into
/// trimmed, non-empty text chunks (tags act as chunk boundaries).
fn text_chunks(html: &str) -> impl Iterator<Item = String> {
    let without_scripts = SCRIPT_STYLE_RE.replace_all(html, "\n");
    let text = TAG_RE.replace_all(&without_scripts, "\n").into_owned();
    text.split('\n')
        .map(|chunk| decode_entities(chunk.trim()))
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .into_iter()
}

/// The handful of entities that matter for price/speed text.
fn decode_entities(chunk: &str) -> String {
    chunk
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&#36;", "$")
}

fn looks_like_plan_name(chunk: &str) -> bool {
    let len = chunk.chars().count();
    (3..=60).contains(&len) && chunk.chars().any(|c| c.is_ascii_alphabetic())
}

/// A best-effort provider slug from a URL host: scheme and `www.` stripped,
/// first dot-label kept.
pub(crate) fn slug_from_url(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let host = without_scheme.split('/').next().unwrap_or(without_scheme);
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.split('.').next().unwrap_or("unknown").to_string()
}
