//! Low-level text parsing shared by every extraction strategy.
//!
//! Provider marketing copy is free text; these routines pull prices,
//! speeds, and durations out of it without ever guessing. Anything that
//! cannot be read confidently comes back as `None`, which downstream code
//! treats as "unknown", never as zero.

use std::sync::LazyLock;

use regex::Regex;

use nbnwatch_core::SpeedTier;

static FIRST_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d{1,2})?)").expect("valid regex"));

static DOLLAR_AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*([\d,]+(?:\.\d{1,2})?)").expect("valid regex"));

static GBPS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*gbps\b").expect("valid regex"));

static SPEED_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2,4})\s*/\s*(\d{1,3})\b").expect("valid regex"));

static NBN_SPEED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnbn\s*(\d+)\b").expect("valid regex"));

static MBPS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s*mbps\b").expect("valid regex"));

static UPLOAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*mbps\s*upload|\bupload(?:\s*speed)?(?:s)?\s*(?:of|up\s*to)?\s*(\d+)\s*mbps")
        .expect("valid regex")
});

static MONTHS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s*months?\b").expect("valid regex"));

static DAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s*days?\b").expect("valid regex"));

static INTRO_PRICING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \$\s*(?P<intro>[\d,]+(?:\.\d{1,2})?)          # promo amount
        \s*(?:/|per\s*)?(?:mo(?:nth)?|mth)?\.?
        \s*for\s*(?:the\s*first\s*)?(?P<months>\d+)\s*months?
        \s*[,.]?\s*
        (?:then|after(?:\s*that)?|reverts?\s*to)
        \s*\$\s*(?P<ongoing>[\d,]+(?:\.\d{1,2})?)",
    )
    .expect("valid regex")
});

static MIN_TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*month\s*(?:contract|term|plan|minimum)").expect("valid regex")
});

static SETUP_FEE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:setup|activation)(?:\s*fee)?\s*(?:of\s*)?\$\s*([\d,]+(?:\.\d{1,2})?)|\$\s*([\d,]+(?:\.\d{1,2})?)\s*(?:setup|activation)",
    )
    .expect("valid regex")
});

static MODEM_COST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)modem\s*(?:from\s*)?\$\s*([\d,]+(?:\.\d{1,2})?)|\$\s*([\d,]+(?:\.\d{1,2})?)\s*modem",
    )
    .expect("valid regex")
});

/// Retail speed labels the industry uses in place of raw tier numbers.
///
/// Checked in order, so longer labels shadow their substrings
/// ("standard plus" before "standard", "superfast" before "fast").
const SPEED_ALIASES: [(&str, u32); 9] = [
    ("home ultrafast", 1000),
    ("home superfast", 250),
    ("home fast", 100),
    ("ultrafast", 1000),
    ("superfast", 250),
    ("standard plus", 100),
    ("standard", 50),
    ("basic ii", 25),
    ("basic i", 12),
];

/// A two-stage promotional price: a discounted amount for a limited number
/// of months, then the ongoing amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroPricing {
    pub intro_cents: i64,
    pub duration_days: i32,
    pub ongoing_cents: i64,
}

/// Parses a price-like string to integer cents.
///
/// Strips thousands separators, matches the first decimal number (up to
/// two decimal places), and rounds to cents. Returns `None` (not zero)
/// when no numeric token is present, so "Contact us" pricing propagates
/// as "no price" rather than "free".
#[must_use]
pub fn parse_price_to_cents(text: &str) -> Option<i64> {
    let stripped = text.replace(',', "");
    let captures = FIRST_NUMBER_RE.captures(&stripped)?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    #[allow(clippy::cast_possible_truncation)]
    let cents = (value * 100.0).round() as i64;
    Some(cents)
}

/// Parses the first `$`-anchored amount in `text` to cents.
///
/// Unlike [`parse_price_to_cents`], this refuses to read bare numbers:
/// "NBN 50 from $69.99" yields 6999, never 5000.
#[must_use]
pub fn dollar_amount_cents(text: &str) -> Option<i64> {
    let captures = DOLLAR_AMOUNT_RE.captures(text)?;
    parse_price_to_cents(captures.get(1)?.as_str())
}

/// Parses a two-stage "intro price for N months, then ongoing" offer.
#[must_use]
pub fn parse_intro_pricing(text: &str) -> Option<IntroPricing> {
    let captures = INTRO_PRICING_RE.captures(text)?;
    let intro_cents = parse_price_to_cents(captures.name("intro")?.as_str())?;
    let months: i32 = captures.name("months")?.as_str().parse().ok()?;
    let ongoing_cents = parse_price_to_cents(captures.name("ongoing")?.as_str())?;
    Some(IntroPricing {
        intro_cents,
        duration_days: months * 30,
        ongoing_cents,
    })
}

/// Extracts a download speed in Mbps from marketing text.
///
/// Recognizes `NBN <n>`, `<n> Mbps`, `<n> Gbps` (scaled ×1000), and the
/// `<down>/<up>` pair notation ("100/20"). The value is returned as
/// scraped; tier membership is normalization's decision.
#[must_use]
pub fn speed_from_text(text: &str) -> Option<u32> {
    if let Some(captures) = GBPS_RE.captures(text) {
        let gbps: f64 = captures.get(1)?.as_str().parse().ok()?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mbps = (gbps * 1000.0).round() as u32;
        return Some(mbps);
    }
    if let Some(captures) = NBN_SPEED_RE.captures(text) {
        return captures.get(1)?.as_str().parse().ok();
    }
    if let Some(captures) = SPEED_PAIR_RE.captures(text) {
        return captures.get(1)?.as_str().parse().ok();
    }
    if let Some(captures) = MBPS_RE.captures(text) {
        return captures.get(1)?.as_str().parse().ok();
    }
    None
}

/// Extracts an upload speed in Mbps, either from explicit upload wording
/// or from the trailing half of a `<down>/<up>` pair.
#[must_use]
pub fn upload_from_text(text: &str) -> Option<u32> {
    if let Some(captures) = UPLOAD_RE.captures(text) {
        let m = captures.get(1).or_else(|| captures.get(2))?;
        return m.as_str().parse().ok();
    }
    if let Some(captures) = SPEED_PAIR_RE.captures(text) {
        return captures.get(2)?.as_str().parse().ok();
    }
    None
}

/// Resolves text to a canonical speed tier: explicit speed markers first,
/// then retail aliases ("Standard Plus" → 100), then a bare number as a
/// last resort.
#[must_use]
pub fn speed_tier_from_text(text: &str) -> Option<SpeedTier> {
    if let Some(tier) = speed_from_text(text).and_then(SpeedTier::from_mbps) {
        return Some(tier);
    }

    let lowered = text.to_lowercase();
    for (alias, mbps) in SPEED_ALIASES {
        if lowered.contains(alias) {
            return SpeedTier::from_mbps(mbps);
        }
    }

    let captures = FIRST_NUMBER_RE.captures(&lowered)?;
    let mbps: u32 = captures.get(1)?.as_str().parse().ok()?;
    SpeedTier::from_mbps(mbps)
}

/// Coerces a duration string to integer days: "12 months" → 360
/// (months × 30), "14 days" → 14.
#[must_use]
pub fn parse_duration_days(text: &str) -> Option<i32> {
    if let Some(captures) = MONTHS_RE.captures(text) {
        let months: i32 = captures.get(1)?.as_str().parse().ok()?;
        return Some(months * 30);
    }
    if let Some(captures) = DAYS_RE.captures(text) {
        return captures.get(1)?.as_str().parse().ok();
    }
    None
}

/// Reads a minimum contract term in months. "No lock-in" wording maps to
/// `None`; unknown and month-to-month are indistinguishable to us.
#[must_use]
pub fn min_term_months_from_text(text: &str) -> Option<i32> {
    let captures = MIN_TERM_RE.captures(text)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Reads a setup/activation fee in cents from either "setup fee of $X" or
/// "$X setup" phrasing.
#[must_use]
pub fn setup_fee_cents_from_text(text: &str) -> Option<i64> {
    let captures = SETUP_FEE_RE.captures(text)?;
    let m = captures.get(1).or_else(|| captures.get(2))?;
    parse_price_to_cents(m.as_str())
}

/// Reads a modem cost in cents from "modem $X" / "$X modem" phrasing.
#[must_use]
pub fn modem_cost_cents_from_text(text: &str) -> Option<i64> {
    let captures = MODEM_COST_RE.captures(text)?;
    let m = captures.get(1).or_else(|| captures.get(2))?;
    parse_price_to_cents(m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // parse_price_to_cents
    // -----------------------------------------------------------------------

    #[test]
    fn price_with_decimal_cents() {
        assert_eq!(parse_price_to_cents("$85.50/mo"), Some(8550));
    }

    #[test]
    fn price_without_cents() {
        assert_eq!(parse_price_to_cents("$99 per month"), Some(9900));
    }

    #[test]
    fn price_with_thousands_separator() {
        assert_eq!(parse_price_to_cents("$1,089.95"), Some(108_995));
    }

    #[test]
    fn price_with_no_numeric_token_is_none() {
        assert_eq!(parse_price_to_cents("Contact us"), None);
        assert_eq!(parse_price_to_cents(""), None);
    }

    #[test]
    fn price_single_decimal_rounds_to_cents() {
        assert_eq!(parse_price_to_cents("79.9"), Some(7990));
    }

    // -----------------------------------------------------------------------
    // dollar_amount_cents
    // -----------------------------------------------------------------------

    #[test]
    fn dollar_amount_skips_leading_bare_numbers() {
        assert_eq!(
            dollar_amount_cents("NBN 50 available from $69.99 per month"),
            Some(6999)
        );
    }

    #[test]
    fn dollar_amount_requires_a_dollar_sign() {
        assert_eq!(dollar_amount_cents("69.99 per month"), None);
    }

    // -----------------------------------------------------------------------
    // parse_intro_pricing
    // -----------------------------------------------------------------------

    #[test]
    fn intro_pricing_for_n_months_then_ongoing() {
        let pricing = parse_intro_pricing("$74.99/mth for 6 months, then $89.99/mth").unwrap();
        assert_eq!(pricing.intro_cents, 7499);
        assert_eq!(pricing.duration_days, 180);
        assert_eq!(pricing.ongoing_cents, 8999);
    }

    #[test]
    fn intro_pricing_reverts_to_phrasing() {
        let pricing =
            parse_intro_pricing("$59 for the first 12 months. Reverts to $79 after.").unwrap();
        assert_eq!(pricing.intro_cents, 5900);
        assert_eq!(pricing.duration_days, 360);
        assert_eq!(pricing.ongoing_cents, 7900);
    }

    #[test]
    fn flat_pricing_is_not_intro_pricing() {
        assert_eq!(parse_intro_pricing("$85.50 per month, no lock-in"), None);
    }

    // -----------------------------------------------------------------------
    // speed extraction
    // -----------------------------------------------------------------------

    #[test]
    fn speed_from_nbn_marker() {
        assert_eq!(speed_from_text("NBN 100 Unlimited"), Some(100));
        assert_eq!(speed_from_text("nbn50 deal"), Some(50));
    }

    #[test]
    fn speed_from_mbps() {
        assert_eq!(speed_from_text("up to 250 Mbps typical evening"), Some(250));
    }

    #[test]
    fn speed_from_gbps_scales_to_mbps() {
        assert_eq!(speed_from_text("blazing 1 Gbps fibre"), Some(1000));
    }

    #[test]
    fn speed_from_pair_notation() {
        assert_eq!(speed_from_text("100/20 unlimited data"), Some(100));
        assert_eq!(upload_from_text("100/20 unlimited data"), Some(20));
    }

    #[test]
    fn upload_from_explicit_wording() {
        assert_eq!(upload_from_text("uploads up to 40 Mbps"), Some(40));
    }

    #[test]
    fn no_speed_marker_is_none() {
        assert_eq!(speed_from_text("Unlimited data, no lock-in"), None);
    }

    // -----------------------------------------------------------------------
    // speed_tier_from_text
    // -----------------------------------------------------------------------

    #[test]
    fn tier_from_every_canonical_number() {
        for tier in SpeedTier::ALL {
            let text = format!("NBN {}", tier.mbps());
            assert_eq!(speed_tier_from_text(&text), Some(tier), "{text}");
            assert_eq!(speed_tier_from_text(&tier.mbps().to_string()), Some(tier));
        }
    }

    #[test]
    fn tier_from_off_tier_number_is_none() {
        assert_eq!(speed_tier_from_text("NBN 999"), None);
        assert_eq!(speed_tier_from_text("999"), None);
    }

    #[test]
    fn tier_from_retail_aliases() {
        assert_eq!(
            speed_tier_from_text("Standard Plus Evening Speed"),
            Some(SpeedTier::Mbps100)
        );
        assert_eq!(speed_tier_from_text("Standard plan"), Some(SpeedTier::Mbps50));
        assert_eq!(
            speed_tier_from_text("Home Superfast"),
            Some(SpeedTier::Mbps250)
        );
        assert_eq!(
            speed_tier_from_text("Ultrafast fibre"),
            Some(SpeedTier::Mbps1000)
        );
    }

    // -----------------------------------------------------------------------
    // durations and fees
    // -----------------------------------------------------------------------

    #[test]
    fn duration_in_months_converts_to_days() {
        assert_eq!(parse_duration_days("12 months"), Some(360));
        assert_eq!(parse_duration_days("first 6 months of service"), Some(180));
    }

    #[test]
    fn duration_in_days_passes_through() {
        assert_eq!(parse_duration_days("14 day trial"), Some(14));
    }

    #[test]
    fn duration_without_units_is_none() {
        assert_eq!(parse_duration_days("forever"), None);
    }

    #[test]
    fn min_term_from_contract_wording() {
        assert_eq!(min_term_months_from_text("24 month contract"), Some(24));
        assert_eq!(min_term_months_from_text("no lock-in contract"), None);
    }

    #[test]
    fn setup_fee_both_phrasings() {
        assert_eq!(setup_fee_cents_from_text("setup fee of $99.95"), Some(9995));
        assert_eq!(setup_fee_cents_from_text("$59 setup applies"), Some(5900));
        assert_eq!(setup_fee_cents_from_text("free setup"), None);
    }

    #[test]
    fn modem_cost_both_phrasings() {
        assert_eq!(modem_cost_cents_from_text("modem from $149"), Some(14_900));
        assert_eq!(modem_cost_cents_from_text("$99 modem"), Some(9900));
        assert_eq!(modem_cost_cents_from_text("BYO modem"), None);
    }
}
