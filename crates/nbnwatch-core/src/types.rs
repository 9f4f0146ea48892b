//! Domain types shared across the scraping and persistence crates.

use serde::{Deserialize, Serialize};

/// One of the fixed NBN download-speed categories plans are bucketed into.
///
/// Anything outside this set (legacy 20 Mbps tiers, typo'd marketing copy,
/// phone numbers misread as speeds) is rejected during normalization rather
/// than stored as a bogus tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum SpeedTier {
    Mbps12,
    Mbps25,
    Mbps50,
    Mbps100,
    Mbps250,
    Mbps500,
    Mbps1000,
}

impl SpeedTier {
    pub const ALL: [SpeedTier; 7] = [
        SpeedTier::Mbps12,
        SpeedTier::Mbps25,
        SpeedTier::Mbps50,
        SpeedTier::Mbps100,
        SpeedTier::Mbps250,
        SpeedTier::Mbps500,
        SpeedTier::Mbps1000,
    ];

    /// Maps a raw megabit value onto the canonical tier set.
    ///
    /// Returns `None` for any value that is not exactly one of the seven
    /// NBN wholesale tiers.
    #[must_use]
    pub fn from_mbps(mbps: u32) -> Option<Self> {
        match mbps {
            12 => Some(SpeedTier::Mbps12),
            25 => Some(SpeedTier::Mbps25),
            50 => Some(SpeedTier::Mbps50),
            100 => Some(SpeedTier::Mbps100),
            250 => Some(SpeedTier::Mbps250),
            500 => Some(SpeedTier::Mbps500),
            1000 => Some(SpeedTier::Mbps1000),
            _ => None,
        }
    }

    #[must_use]
    pub fn mbps(self) -> u32 {
        match self {
            SpeedTier::Mbps12 => 12,
            SpeedTier::Mbps25 => 25,
            SpeedTier::Mbps50 => 50,
            SpeedTier::Mbps100 => 100,
            SpeedTier::Mbps250 => 250,
            SpeedTier::Mbps500 => 500,
            SpeedTier::Mbps1000 => 1000,
        }
    }
}

impl From<SpeedTier> for u32 {
    fn from(tier: SpeedTier) -> Self {
        tier.mbps()
    }
}

impl TryFrom<u32> for SpeedTier {
    type Error = String;

    fn try_from(mbps: u32) -> Result<Self, Self::Error> {
        SpeedTier::from_mbps(mbps).ok_or_else(|| format!("{mbps} is not an NBN speed tier"))
    }
}

impl std::fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NBN {}", self.mbps())
    }
}

/// Access technology a plan is delivered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechnologyType {
    Standard,
    FixedWireless,
}

impl TechnologyType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TechnologyType::Standard => "standard",
            TechnologyType::FixedWireless => "fixed-wireless",
        }
    }
}

impl std::fmt::Display for TechnologyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TechnologyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(TechnologyType::Standard),
            "fixed-wireless" => Ok(TechnologyType::FixedWireless),
            other => Err(format!("unknown technology type: {other}")),
        }
    }
}

/// Audience a plan is marketed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Residential,
    Business,
}

impl PlanType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlanType::Residential => "residential",
            PlanType::Business => "business",
        }
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "residential" => Ok(PlanType::Residential),
            "business" => Ok(PlanType::Business),
            other => Err(format!("unknown plan type: {other}")),
        }
    }
}

/// A plan record extracted from a provider page by a parser strategy.
///
/// Ephemeral: produced and consumed within one update cycle, never
/// persisted as-is. `speed_mbps` is the value as scraped and may fall
/// outside the canonical tier set; normalization decides whether it
/// survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlanExtract {
    pub provider_slug: String,
    pub plan_name: String,
    pub speed_mbps: Option<u32>,
    pub upload_mbps: Option<u32>,
    pub intro_price_cents: Option<i64>,
    pub ongoing_price_cents: Option<i64>,
    pub intro_duration_days: Option<i32>,
    pub min_term_months: Option<i32>,
    pub setup_fee_cents: Option<i64>,
    pub modem_cost_cents: Option<i64>,
    pub conditions: Option<String>,
    pub source_url: String,
    pub technology: TechnologyType,
    pub plan_type: PlanType,
}

/// A [`RawPlanExtract`] after canonicalization: speed coerced onto the
/// tier enumeration, prices in integer cents, durations in integer days.
///
/// Invariant (enforced by validation, not by construction): a non-null
/// `intro_price_cents` requires a non-null `ongoing_price_cents`; a plan
/// cannot carry a promo price with no base price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPlan {
    pub provider_slug: String,
    pub plan_name: String,
    pub speed_tier: Option<SpeedTier>,
    pub upload_mbps: Option<u32>,
    pub intro_price_cents: Option<i64>,
    pub ongoing_price_cents: Option<i64>,
    pub intro_duration_days: Option<i32>,
    pub min_term_months: Option<i32>,
    pub setup_fee_cents: Option<i64>,
    pub modem_cost_cents: Option<i64>,
    pub conditions: Option<String>,
    pub source_url: String,
    pub technology: TechnologyType,
    pub plan_type: PlanType,
}

/// Outcome of the business-plausibility checks on a [`NormalizedPlan`].
///
/// Errors and warnings never block ingestion; either sets the owning
/// provider's `needs_review` flag so a human can audit the extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PlanValidation {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// True when the extraction should be surfaced for human audit.
    #[must_use]
    pub fn needs_review(&self) -> bool {
        !self.is_ok()
    }
}
