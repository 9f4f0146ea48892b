//! Aussie Broadband plan page extraction.

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

const SLUG: &str = "aussie-broadband";

const CARD_SELECTORS: &str =
    "[class*='plan-card'], [class*='PlanCard'], [class*='plan-tile'], [data-testid*='plan-card']";

const NAME_SELECTORS: &str = "h3, h2, [class*='plan-name'], [class*='planTitle']";

const FINE_PRINT_SELECTORS: &str =
    "[class*='typical-evening'], [class*='fine-print'], [class*='disclaimer'], small";

pub(crate) struct AussieBroadband;

impl PlanParser for AussieBroadband {
    fn name(&self) -> &'static str {
        SLUG
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("aussiebroadband.com.au")
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
                    None => {
                        let flat = dollar_amount_cents(&text);
                        (flat, flat, None)
                    }
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
                conditions: first_text(card, FINE_PRINT_SELECTORS),
                source_url: url.to_string(),
                technology: classify_technology(&text),
                plan_type: classify_plan_type(&text),
            });
        }

        if extracts.is_empty() {
            // Structured pass found nothing; the markup likely changed.
            // Fall back to the lower-precision text scan.
            tracing::debug!(url, "structured pass empty, falling back to text scan");
            return scan_text_lines(html, SLUG, url);
        }
        extracts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbnwatch_core::TechnologyType;

    const URL: &str = "https://www.aussiebroadband.com.au/internet/nbn-plans/";

    #[test]
    fn parses_plan_cards() {
        let html = r#"
            <div class="plan-card">
                <h3>Family Everyday</h3>
                <p>NBN 100/20</p>
                <p>$99.00 per month</p>
                <small>Typical evening speed 97 Mbps</small>
            </div>
            <div class="plan-card">
                <h3>Power House</h3>
                <p>NBN 250/25</p>
                <p>$109.00 per month</p>
            </div>
        "#;
        let extracts = AussieBroadband.parse(html, URL);

        assert_eq!(extracts.len(), 2);
        assert_eq!(extracts[0].plan_name, "Family Everyday");
        assert_eq!(extracts[0].speed_mbps, Some(100));
        assert_eq!(extracts[0].upload_mbps, Some(20));
        assert_eq!(extracts[0].ongoing_price_cents, Some(9900));
        assert!(extracts[0]
            .conditions
            .as_deref()
            .unwrap()
            .contains("Typical evening speed"));
        assert_eq!(extracts[1].speed_mbps, Some(250));
    }

    #[test]
    fn promo_pricing_is_captured() {
        let html = r#"
            <div class="PlanCard">
                <h3>Value Saver</h3>
                <span>NBN 50</span>
                <span>$65.00/mth for 6 months, then $85.00/mth</span>
            </div>
        "#;
        let extracts = AussieBroadband.parse(html, URL);
        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].intro_price_cents, Some(6500));
        assert_eq!(extracts[0].ongoing_price_cents, Some(8500));
        assert_eq!(extracts[0].intro_duration_days, Some(180));
    }

    #[test]
    fn fixed_wireless_cards_are_classified() {
        let html = r#"
            <div class="plan-tile">
                <h3>Regional Fixed Wireless</h3>
                <p>NBN 75 fixed wireless</p>
                <p>$79.00 per month</p>
            </div>
        "#;
        let extracts = AussieBroadband.parse(html, URL);
        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].technology, TechnologyType::FixedWireless);
    }

    #[test]
    fn falls_back_to_text_scan_when_cards_vanish() {
        let html = "Starter<br>NBN 25 now just $59.00 per month";
        let extracts = AussieBroadband.parse(html, URL);
        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].plan_name, "Starter");
        assert_eq!(extracts[0].provider_slug, SLUG);
    }

    #[test]
    fn cards_without_a_price_are_skipped() {
        let html = r#"
            <div class="plan-card">
                <h3>Mystery Plan</h3>
                <p>NBN 50, call us for pricing</p>
            </div>
        "#;
        let extracts = AussieBroadband.parse(html, URL);
        assert!(extracts.is_empty());
    }
}
