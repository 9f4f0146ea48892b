//! Parser strategy selection.
//!
//! Provider markup is heterogeneous and unversioned; a marketing site can
//! change its CSS classes at any time. Each provider gets its own strategy
//! so a broken one affects only that provider, and the generic text-scan
//! fallback guarantees no provider silently yields zero plans forever.

use nbnwatch_core::RawPlanExtract;

use crate::providers::aussie_broadband::AussieBroadband;
use crate::providers::exetel::Exetel;
use crate::providers::generic::GenericFallback;
use crate::providers::optus::Optus;
use crate::providers::superloop::Superloop;
use crate::providers::telstra::Telstra;
use crate::providers::tpg::Tpg;

/// An extraction strategy for one provider's plan pages.
pub trait PlanParser: Send + Sync {
    /// Stable identifier used in logs and debug output.
    fn name(&self) -> &'static str;

    /// Whether this strategy is responsible for the given URL.
    fn can_handle(&self, url: &str) -> bool;

    /// Extracts plan records from fetched HTML.
    ///
    /// Never panics. Unparseable structure yields an empty vec rather
    /// than partial garbage.
    fn parse(&self, html: &str, url: &str) -> Vec<RawPlanExtract>;
}

/// Specialized strategies in priority order; the first `can_handle` match
/// wins.
static PARSERS: [&dyn PlanParser; 6] = [
    &AussieBroadband,
    &Telstra,
    &Optus,
    &Tpg,
    &Exetel,
    &Superloop,
];

static GENERIC: GenericFallback = GenericFallback;

/// Maps a provider URL to the strategy responsible for its markup.
///
/// URLs no specialized strategy claims fall through to the generic
/// text-scan heuristic; the fallthrough is logged so operators can see
/// which providers run at reduced extraction precision.
#[must_use]
pub fn find_parser_for_url(url: &str) -> &'static dyn PlanParser {
    for parser in PARSERS {
        if parser.can_handle(url) {
            return parser;
        }
    }
    tracing::info!(url, "no specialized parser for url, using generic fallback");
    &GENERIC
}
