//! Telstra plan page extraction.
//!
//! Telstra's marketing leans on retail tier labels ("Essential",
//! "Premium", "Ultrafast") instead of raw NBN numbers, so speed detection
//! goes through the alias-aware tier resolver rather than bare markers.

use nbnwatch_core::{RawPlanExtract, SpeedTier};
use scraper::Html;

use crate::parse::{dollar_amount_cents, min_term_months_from_text, speed_tier_from_text};
use crate::providers::{
    classify_plan_type, classify_technology, element_text, first_text, select_all,
    MIN_EXTRACT_PRICE_CENTS,
};
use crate::registry::PlanParser;

const SLUG: &str = "telstra";

const CARD_SELECTORS: &str =
    "[class*='plan-tile'], [class*='product-card'], [class*='planCard'], [class*='plan-panel']";

const NAME_SELECTORS: &str = "[class*='plan-name'], [class*='heading'], h2, h3";

pub(crate) struct Telstra;

impl PlanParser for Telstra {
    fn name(&self) -> &'static str {
        SLUG
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("telstra.com")
    }

    fn parse(&self, html: &str, url: &str) -> Vec<RawPlanExtract> {
        let doc = Html::parse_document(html);
        let mut extracts = Vec::new();

        for card in select_all(&doc, CARD_SELECTORS) {
            let text = element_text(card);

            let Some(ongoing) = dollar_amount_cents(&text) else {
                continue;
            };
            if ongoing < MIN_EXTRACT_PRICE_CENTS {
                continue;
            }

            let plan_name = match first_text(card, NAME_SELECTORS) {
                Some(name) => name,
                None => continue,
            };

            // Tier labels live in the name more reliably than in the body
            // copy, which quotes typical evening speeds.
            let speed_mbps = speed_tier_from_text(&plan_name)
                .or_else(|| speed_tier_from_text(&text))
                .map(SpeedTier::mbps);

            extracts.push(RawPlanExtract {
                provider_slug: SLUG.to_string(),
                plan_name,
                speed_mbps,
                upload_mbps: None,
                intro_price_cents: None,
                ongoing_price_cents: Some(ongoing),
                intro_duration_days: None,
                min_term_months: min_term_months_from_text(&text),
                setup_fee_cents: None,
                modem_cost_cents: None,
                conditions: first_text(card, "[class*='disclaimer'], [class*='fine-print'], small"),
                source_url: url.to_string(),
                technology: classify_technology(&text),
                plan_type: classify_plan_type(&text),
            });
        }

        extracts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbnwatch_core::PlanType;

    const URL: &str = "https://www.telstra.com.au/internet/nbn";

    #[test]
    fn resolves_retail_tier_labels_to_speeds() {
        let html = r#"
            <div class="plan-tile">
                <p class="plan-name">Standard Plus Internet</p>
                <p>$95.00/mth</p>
            </div>
            <div class="plan-tile">
                <p class="plan-name">Ultrafast Internet</p>
                <p>$180.00/mth</p>
            </div>
        "#;
        let extracts = Telstra.parse(html, URL);

        assert_eq!(extracts.len(), 2);
        assert_eq!(extracts[0].speed_mbps, Some(100));
        assert_eq!(extracts[0].ongoing_price_cents, Some(9500));
        assert_eq!(extracts[1].speed_mbps, Some(1000));
    }

    #[test]
    fn reads_minimum_term_from_card_body() {
        let html = r#"
            <div class="product-card">
                <h3 class="heading">Essential Internet NBN 25</h3>
                <p>$80.00 per month on a 24 month term</p>
            </div>
        "#;
        let extracts = Telstra.parse(html, URL);
        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].min_term_months, Some(24));
        assert_eq!(extracts[0].speed_mbps, Some(25));
    }

    #[test]
    fn business_cards_are_classified() {
        let html = r#"
            <div class="planCard">
                <h2>Business Internet Plus</h2>
                <p>Business NBN 100 with priority support</p>
                <p>$120.00/mth</p>
            </div>
        "#;
        let extracts = Telstra.parse(html, URL);
        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].plan_type, PlanType::Business);
        assert_eq!(extracts[0].speed_mbps, Some(100));
    }

    #[test]
    fn unparseable_markup_yields_empty_not_garbage() {
        let extracts = Telstra.parse("<html><body><p>maintenance page</p></body></html>", URL);
        assert!(extracts.is_empty());
    }

    #[test]
    fn nameless_cards_are_skipped() {
        let html = r#"<div class="plan-tile"><span>$95.00/mth deal</span></div>"#;
        let extracts = Telstra.parse(html, URL);
        assert!(extracts.is_empty());
    }
}
