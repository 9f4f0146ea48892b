//! Per-provider extraction strategies.
//!
//! Each module implements [`crate::registry::PlanParser`] for one
//! provider's marketing site. Selectors target a broad union of likely
//! "plan card" class-name substrings since these sites re-skin often.

pub(crate) mod aussie_broadband;
pub(crate) mod exetel;
pub(crate) mod generic;
pub(crate) mod optus;
pub(crate) mod superloop;
pub(crate) mod telstra;
pub(crate) mod tpg;

use nbnwatch_core::{PlanType, TechnologyType};
use scraper::{ElementRef, Html, Selector};

/// Extracted prices below this floor are page furniture (per-day prices,
/// add-on fees matched by accident), not monthly plan fees.
pub(crate) const MIN_EXTRACT_PRICE_CENTS: i64 = 2000;

/// Whole-card text with whitespace squeezed to single spaces.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// All elements matching a selector union, in document order.
pub(crate) fn select_all<'a>(doc: &'a Html, selectors: &str) -> Vec<ElementRef<'a>> {
    let selector = Selector::parse(selectors).expect("valid selector");
    doc.select(&selector).collect()
}

/// Text of the first descendant matching a selector union.
pub(crate) fn first_text(card: ElementRef<'_>, selectors: &str) -> Option<String> {
    let selector = Selector::parse(selectors).expect("valid selector");
    card.select(&selector)
        .map(|el| element_text(el))
        .find(|text| !text.is_empty())
}

/// Classifies the access technology from card text.
pub(crate) fn classify_technology(text: &str) -> TechnologyType {
    let lowered = text.to_lowercase();
    if lowered.contains("fixed wireless")
        || lowered.contains("fixed-wireless")
        || lowered.contains("wireless broadband")
    {
        TechnologyType::FixedWireless
    } else {
        TechnologyType::Standard
    }
}

/// Classifies the plan audience from card text.
pub(crate) fn classify_plan_type(text: &str) -> PlanType {
    let lowered = text.to_lowercase();
    if lowered.contains("business") || lowered.contains("sme ") {
        PlanType::Business
    } else {
        PlanType::Residential
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technology_classification() {
        assert_eq!(
            classify_technology("NBN Fixed Wireless Plus plan"),
            TechnologyType::FixedWireless
        );
        assert_eq!(
            classify_technology("NBN 100 fibre plan"),
            TechnologyType::Standard
        );
    }

    #[test]
    fn plan_type_classification() {
        assert_eq!(
            classify_plan_type("Business NBN 100 with static IP"),
            PlanType::Business
        );
        assert_eq!(
            classify_plan_type("Family streaming bundle"),
            PlanType::Residential
        );
    }

    #[test]
    fn element_text_squeezes_whitespace() {
        let doc = Html::parse_fragment("<div><span>NBN  50</span>\n  <b>$69.99</b></div>");
        let cards = select_all(&doc, "div");
        assert_eq!(element_text(cards[0]), "NBN 50 $69.99");
    }
}
