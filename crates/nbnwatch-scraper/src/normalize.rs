//! Canonicalization from raw parser output to [`NormalizedPlan`].
//!
//! Speed and duration coercion is delegated to [`crate::parse`]; this
//! module decides which raw values survive and which become "unknown".

use nbnwatch_core::{NormalizedPlan, RawPlanExtract, SpeedTier};

use crate::parse::{parse_duration_days, speed_tier_from_text};

/// Normalizes a [`RawPlanExtract`] into a [`NormalizedPlan`].
///
/// - Scraped speed values are coerced onto the canonical tier set; an
///   off-tier number becomes `None` rather than a bogus tier. When the
///   parser found no numeric speed at all, the plan name is consulted for
///   retail aliases ("Standard Plus" → 100).
/// - An intro price with no scraped promo duration falls back to reading
///   the duration out of the conditions text.
/// - Prices are already integer cents and pass through unchanged.
///
/// Idempotent: normalizing the output of a previous normalization yields
/// the same plan.
#[must_use]
pub fn normalize_extract(raw: RawPlanExtract) -> NormalizedPlan {
    let speed_tier = raw
        .speed_mbps
        .and_then(SpeedTier::from_mbps)
        .or_else(|| speed_tier_from_text(&raw.plan_name));

    let intro_duration_days = match (raw.intro_price_cents, raw.intro_duration_days) {
        (Some(_), None) => raw.conditions.as_deref().and_then(parse_duration_days),
        (_, days) => days,
    };

    NormalizedPlan {
        provider_slug: raw.provider_slug,
        plan_name: raw.plan_name,
        speed_tier,
        upload_mbps: raw.upload_mbps,
        intro_price_cents: raw.intro_price_cents,
        ongoing_price_cents: raw.ongoing_price_cents,
        intro_duration_days,
        min_term_months: raw.min_term_months,
        setup_fee_cents: raw.setup_fee_cents,
        modem_cost_cents: raw.modem_cost_cents,
        conditions: raw.conditions,
        source_url: raw.source_url,
        technology: raw.technology,
        plan_type: raw.plan_type,
    }
}
