//! Superloop plan page extraction.
//!
//! Superloop markets its top tiers in Gbps, so speed parsing has to scale
//! gigabit figures back to the Mbps tier set.

use nbnwatch_core::RawPlanExtract;
use scraper::Html;

use crate::parse::{
    dollar_amount_cents, parse_intro_pricing, speed_from_text, upload_from_text,
};
use crate::providers::{
    classify_plan_type, classify_technology, element_text, first_text, select_all,
    MIN_EXTRACT_PRICE_CENTS,
};
use crate::registry::PlanParser;

const SLUG: &str = "superloop";

const CARD_SELECTORS: &str =
    "[class*='plan-card'], [class*='speed-card'], [class*='tier-card'], [class*='PlanTile']";

const NAME_SELECTORS: &str = "[class*='plan-title'], [class*='tier-name'], h3";

pub(crate) struct Superloop;

impl PlanParser for Superloop {
    fn name(&self) -> &'static str {
        SLUG
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("superloop.com")
    }

    fn parse(&self, html: &str, url: &str) -> Vec<RawPlanExtract> {
        let doc = Html::parse_document(html);
        let mut extracts = Vec::new();

        for card in select_all(&doc, CARD_SELECTORS) {
            let text = element_text(card);

            let Some(speed_mbps) = speed_from_text(&text) else {
                continue;
            };

            let (intro_price_cents, ongoing_price_cents, intro_duration_days) =
                match parse_intro_pricing(&text) {
                    Some(pricing) => (
                        Some(pricing.intro_cents),
                        Some(pricing.ongoing_cents),
                        Some(pricing.duration_days),
                    ),
                    None => (None, dollar_amount_cents(&text), None),
                };
            let Some(ongoing) = ongoing_price_cents else {
                continue;
            };
            if ongoing < MIN_EXTRACT_PRICE_CENTS {
                continue;
            }

            let plan_name = first_text(card, NAME_SELECTORS)
                .unwrap_or_else(|| format!("NBN {speed_mbps}"));

            extracts.push(RawPlanExtract {
                provider_slug: SLUG.to_string(),
                plan_name,
                speed_mbps: Some(speed_mbps),
                upload_mbps: upload_from_text(&text),
                intro_price_cents,
                ongoing_price_cents,
                intro_duration_days,
                min_term_months: None,
                setup_fee_cents: None,
                modem_cost_cents: None,
                conditions: first_text(card, "[class*='disclaimer'], [class*='footnote'], small"),
                source_url: url.to_string(),
                technology: classify_technology(&text),
                plan_type: classify_plan_type(&text),
            });
        }

        extracts
    }
}
