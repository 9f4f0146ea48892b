//! Business-plausibility checks on normalized plans.
//!
//! These are not schema checks: a plan that fails them is still upserted
//! (an imperfect row is more useful than a missing one), but the owning
//! provider is flagged `needs_review` so a human can audit the extraction.

use nbnwatch_core::{NormalizedPlan, PlanValidation};

/// Lower bound of the plausible ongoing monthly fee band, in cents.
pub const MIN_PLAUSIBLE_MONTHLY_CENTS: i64 = 3000;
/// Upper bound of the plausible ongoing monthly fee band, in cents.
pub const MAX_PLAUSIBLE_MONTHLY_CENTS: i64 = 20_000;

/// Judges whether a normalized plan is trustworthy enough to publish
/// without human review.
///
/// - An intro price with no ongoing price is an **error**: a promo price
///   with no base price is an incomplete offer.
/// - An ongoing price outside the plausible monthly band is a **warning**:
///   suspicious, but real plans occasionally sit outside it.
/// - Speed tier membership is enforced by the type system: an off-tier
///   scraped speed was already dropped to `None` during normalization.
#[must_use]
pub fn validate_plan(plan: &NormalizedPlan) -> PlanValidation {
    let mut validation = PlanValidation::default();

    if plan.intro_price_cents.is_some() && plan.ongoing_price_cents.is_none() {
        validation.errors.push(format!(
            "plan \"{}\" has an intro price but no ongoing price",
            plan.plan_name
        ));
    }

    if let Some(cents) = plan.ongoing_price_cents {
        if !(MIN_PLAUSIBLE_MONTHLY_CENTS..=MAX_PLAUSIBLE_MONTHLY_CENTS).contains(&cents) {
            validation.warnings.push(format!(
                "plan \"{}\" ongoing price {} cents is outside the plausible monthly band",
                plan.plan_name, cents
            ));
        }
    }

    if plan.plan_name.trim().is_empty() {
        validation
            .errors
            .push("plan has an empty name".to_string());
    }

    validation
}
