//! Optus plan page extraction.

use nbnwatch_core::RawPlanExtract;
use scraper::Html;

use crate::parse::{
    dollar_amount_cents, modem_cost_cents_from_text, parse_intro_pricing, speed_from_text,
    upload_from_text,
};
use crate::providers::{
    classify_plan_type, classify_technology, element_text, first_text, select_all,
    MIN_EXTRACT_PRICE_CENTS,
};
use crate::registry::PlanParser;

const SLUG: &str = "optus";

const CARD_SELECTORS: &str =
    "[class*='plan-box'], [class*='pricing-card'], [class*='PlanCard'], [class*='plan-summary']";

const NAME_SELECTORS: &str = "h3, [class*='plan-title'], [class*='card-title']";

const PRICE_SELECTORS: &str = "[class*='price'], [class*='cost'], [class*='charge']";

pub(crate) struct Optus;

impl PlanParser for Optus {
    fn name(&self) -> &'static str {
        SLUG
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("optus.com.au")
    }

    fn parse(&self, html: &str, url: &str) -> Vec<RawPlanExtract> {
        let doc = Html::parse_document(html);
        let mut extracts = Vec::new();

        for card in select_all(&doc, CARD_SELECTORS) {
            let text = element_text(card);

            let Some(speed_mbps) = speed_from_text(&text) else {
                continue;
            };

            // Optus runs near-permanent first-6-months promos; read the
            // two-stage offer before settling for a flat price. Flat
            // prices come from the dedicated price element when one
            // exists, since the first $-amount in the whole card is often
            // the modem, not the plan.
            let (intro_price_cents, ongoing_price_cents, intro_duration_days) =
                match parse_intro_pricing(&text) {
                    Some(pricing) => (
                        Some(pricing.intro_cents),
                        Some(pricing.ongoing_cents),
                        Some(pricing.duration_days),
                    ),
                    None => {
                        let flat = first_text(card, PRICE_SELECTORS)
                            .as_deref()
                            .and_then(dollar_amount_cents)
                            .or_else(|| dollar_amount_cents(&text));
                        (None, flat, None)
                    }
                };
            let Some(ongoing) = ongoing_price_cents else {
                continue;
            };
            if ongoing < MIN_EXTRACT_PRICE_CENTS {
                continue;
            }

            let plan_name = first_text(card, NAME_SELECTORS)
                .unwrap_or_else(|| format!("Optus NBN {speed_mbps}"));

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
                modem_cost_cents: modem_cost_cents_from_text(&text),
                conditions: first_text(card, "[class*='disclaimer'], [class*='legal'], small"),
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

    const URL: &str = "https://www.optus.com.au/broadband-nbn/home-broadband/plans";

    #[test]
    fn captures_promo_and_ongoing_pricing() {
        let html = r#"
            <div class="plan-box">
                <h3>Everyday Fast</h3>
                <p>NBN 100</p>
                <p>$79.00/mth for 6 months, then $99.00/mth</p>
            </div>
        "#;
        let extracts = Optus.parse(html, URL);

        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].plan_name, "Everyday Fast");
        assert_eq!(extracts[0].intro_price_cents, Some(7900));
        assert_eq!(extracts[0].ongoing_price_cents, Some(9900));
        assert_eq!(extracts[0].intro_duration_days, Some(180));
    }

    #[test]
    fn flat_price_has_no_intro_price() {
        let html = r#"
            <div class="pricing-card">
                <h3>Everyday Basic</h3>
                <p>NBN 50, $89.00 per month</p>
            </div>
        "#;
        let extracts = Optus.parse(html, URL);
        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].intro_price_cents, None);
        assert_eq!(extracts[0].ongoing_price_cents, Some(8900));
    }

    #[test]
    fn modem_cost_is_read_from_card_text() {
        let html = r#"
            <div class="plan-summary">
                <h3>Family Entertainer</h3>
                <p>NBN 250 with modem from $216</p>
                <p class="price">$119.00 per month</p>
            </div>
        "#;
        let extracts = Optus.parse(html, URL);
        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].modem_cost_cents, Some(21_600));
        assert_eq!(extracts[0].speed_mbps, Some(250));
    }

    #[test]
    fn speedless_cards_are_skipped() {
        let html = r#"<div class="plan-box"><h3>Accessories</h3><p>$99.00</p></div>"#;
        assert!(Optus.parse(html, URL).is_empty());
    }
}
