//! Exetel plan page extraction.
//!
//! Exetel advertises download/upload pairs ("50/20") and runs promo
//! pricing on nearly every tier.

use nbnwatch_core::RawPlanExtract;
use scraper::Html;

use crate::parse::{
    dollar_amount_cents, parse_intro_pricing, speed_from_text, upload_from_text,
};
use crate::providers::generic::scan_text_lines;
use crate::providers::{
    classify_plan_type, classify_technology, element_text, first_text, select_all,
    MIN_EXTRACT_PRICE_CENTS,
};
use crate::registry::PlanParser;

const SLUG: &str = "exetel";

const CARD_SELECTORS: &str =
    "[class*='plan-card'], [class*='package-card'], [class*='planBox'], [class*='plan-option']";

const NAME_SELECTORS: &str = "[class*='plan-name'], [class*='package-name'], h3, h4";

pub(crate) struct Exetel;

impl PlanParser for Exetel {
    fn name(&self) -> &'static str {
        SLUG
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("exetel.com.au")
    }

    fn parse(&self, html: &str, url: &str) -> Vec<RawPlanExtract> {
        let doc = Html::parse_document(html);
        let mut extracts = Vec::new();

        for card in select_all(&doc, CARD_SELECTORS) {
            let text = element_text(card);

            let speed_mbps = speed_from_text(&text);
            let upload_mbps = upload_from_text(&text);

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

            // Speed is part of Exetel's plan identity; a card with a price
            // but no recognizable speed is an accessory, not a plan.
            let Some(speed) = speed_mbps else {
                continue;
            };

            let plan_name = first_text(card, NAME_SELECTORS)
                .unwrap_or_else(|| format!("NBN {speed}"));

            extracts.push(RawPlanExtract {
                provider_slug: SLUG.to_string(),
                plan_name,
                speed_mbps: Some(speed),
                upload_mbps,
                intro_price_cents,
                ongoing_price_cents,
                intro_duration_days,
                min_term_months: None,
                setup_fee_cents: None,
                modem_cost_cents: None,
                conditions: first_text(card, "[class*='promo-terms'], [class*='fine-print'], small"),
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

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://exetel.com.au/nbn-plans";

    #[test]
    fn parses_speed_pairs_and_promos() {
        let html = r#"
            <div class="plan-card">
                <h4 class="plan-name">One Plan Family</h4>
                <p>50/20 Mbps unlimited</p>
                <p>$53.99/mth for 6 months, then $78.99/mth</p>
                <small>Promo for new customers only</small>
            </div>
        "#;
        let extracts = Exetel.parse(html, URL);

        assert_eq!(extracts.len(), 1);
        let e = &extracts[0];
        assert_eq!(e.plan_name, "One Plan Family");
        assert_eq!(e.speed_mbps, Some(50));
        assert_eq!(e.upload_mbps, Some(20));
        assert_eq!(e.intro_price_cents, Some(5399));
        assert_eq!(e.ongoing_price_cents, Some(7899));
        assert_eq!(e.intro_duration_days, Some(180));
        assert_eq!(e.conditions.as_deref(), Some("Promo for new customers only"));
    }

    #[test]
    fn flat_priced_card_parses() {
        let html = r#"
            <div class="package-card">
                <h3>One Plan Ultra</h3>
                <p>NBN 1000 for power users</p>
                <p>$109.99 per month</p>
            </div>
        "#;
        let extracts = Exetel.parse(html, URL);
        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].speed_mbps, Some(1000));
        assert_eq!(extracts[0].intro_price_cents, None);
        assert_eq!(extracts[0].ongoing_price_cents, Some(10_999));
    }

    #[test]
    fn priced_card_without_speed_is_not_a_plan() {
        let html = r#"
            <div class="plan-card">
                <h3>Static IP add-on</h3>
                <p>$5,000 enterprise support retainer</p>
            </div>
        "#;
        assert!(Exetel.parse(html, URL).is_empty());
    }
}
