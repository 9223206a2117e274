//! Report freshness classification
//!
//! Maps the age of an asset's latest position report to a three-way tier
//! used for display coloring and map-marker styling. Classification is a
//! total step function: an unknown age (missing or unparsable report
//! timestamp) is treated as maximally old and classifies as stale.

use std::fmt;

/// Maximum age in minutes for a report to classify as fresh.
pub const FRESH_MAX_MINUTES: i64 = 15;

/// Maximum age in minutes for a report to classify as aging.
pub const AGING_MAX_MINUTES: i64 = 30;

/// Freshness tier of an asset's latest report.
///
/// Ordering reflects staleness: `Fresh < Aging < Stale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FreshnessTier {
    /// Reported within the last 15 minutes.
    Fresh,
    /// Reported within the last 30 minutes.
    Aging,
    /// Older than 30 minutes, or age unknown.
    Stale,
}

/// Classify a report age in minutes.
///
/// `None` means the report timestamp was missing or unparsable and
/// classifies as [`FreshnessTier::Stale`].
pub fn classify(age_minutes: Option<i64>) -> FreshnessTier {
    match age_minutes {
        Some(age) if age <= FRESH_MAX_MINUTES => FreshnessTier::Fresh,
        Some(age) if age <= AGING_MAX_MINUTES => FreshnessTier::Aging,
        _ => FreshnessTier::Stale,
    }
}

impl FreshnessTier {
    /// Display color for this tier as a hex string.
    pub fn color(&self) -> &'static str {
        match self {
            FreshnessTier::Fresh => "#00A86B",
            FreshnessTier::Aging => "#ccae16",
            FreshnessTier::Stale => "#FF0000",
        }
    }
}

impl fmt::Display for FreshnessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreshnessTier::Fresh => write!(f, "fresh"),
            FreshnessTier::Aging => write!(f, "aging"),
            FreshnessTier::Stale => write!(f, "stale"),
        }
    }
}
