//! TPG plan page extraction.

use nbnwatch_core::RawPlanExtract;
use scraper::Html;

use crate::parse::{
    dollar_amount_cents, min_term_months_from_text, parse_intro_pricing,
    setup_fee_cents_from_text, speed_from_text,
};
use crate::providers::generic::scan_text_lines;
use crate::providers::{
    classify_plan_type, classify_technology, element_text, first_text, select_all,
    MIN_EXTRACT_PRICE_CENTS,
};
use crate::registry::PlanParser;

const SLUG: &str = "tpg";

const CARD_SELECTORS: &str =
    "[class*='plan-item'], [class*='product-tile'], [class*='planCard'], [class*='bundle-card']";

const NAME_SELECTORS: &str = "h2, h3, [class*='plan-heading'], [class*='product-name']";

pub(crate) struct Tpg;

impl PlanParser for Tpg {
    fn name(&self) -> &'static str {
        SLUG
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("tpg.com.au")
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
                upload_mbps: None,
                intro_price_cents,
                ongoing_price_cents,
                intro_duration_days,
                min_term_months: min_term_months_from_text(&text),
                setup_fee_cents: setup_fee_cents_from_text(&text),
                modem_cost_cents: None,
                conditions: first_text(card, "[class*='terms'], [class*='fine-print'], small"),
                source_url: url.to_string(),
                technology: classify_technology(&text),
                plan_type: classify_plan_type(&text),
            });
        }

        if extracts.is_empty() {
            tracing::debug!(url, "structured pass empty, falling back to text scan");
            return scan_text_lines(html, SLUG, url);
        }
        extracts
    }
}
