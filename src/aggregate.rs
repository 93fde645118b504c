//! Result aggregation
//!
//! Turns per-symbol evaluation output into reports: annual summaries of
//! support opportunities, a whole-scan tally, and the filtered flat-return
//! table. Grouping keys are calendar years and symbols, so identical inputs
//! aggregate identically regardless of evaluation order.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::screens::{FlatReturnResult, SupportOpportunity};

/// Per-year tally of support opportunities
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnnualSummary {
    pub year: i32,
    pub events: usize,
    pub successes: usize,
    /// successes / events; 0.0 for a year with no events
    pub success_rate: f64,
}

impl AnnualSummary {
    /// Build a summary, guarding the zero-event division
    pub fn new(year: i32, events: usize, successes: usize) -> Self {
        let success_rate = if events == 0 {
            0.0
        } else {
            successes as f64 / events as f64
        };
        Self {
            year,
            events,
            successes,
            success_rate,
        }
    }
}

/// Whole-scan tally of support opportunities
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SupportSummary {
    pub events: usize,
    pub successes: usize,
    /// successes / events; 0.0 for an empty scan
    pub success_rate: f64,
}

/// Group support opportunities by the calendar year of their event.
///
/// Output is ascending by year and covers only years with at least one
/// event. Deterministic: the grouping key is the year, never encounter
/// order, so shuffled input produces identical summaries.
pub fn aggregate_annual<'a, I>(pairs: I) -> Vec<AnnualSummary>
where
    I: IntoIterator<Item = &'a SupportOpportunity>,
{
    let mut years: BTreeMap<i32, (usize, usize)> = BTreeMap::new();

    for (event, outcome) in pairs {
        let entry = years.entry(event.date.year()).or_insert((0, 0));
        entry.0 += 1;
        if outcome.success {
            entry.1 += 1;
        }
    }

    years
        .into_iter()
        .map(|(year, (events, successes))| AnnualSummary::new(year, events, successes))
        .collect()
}

/// Tally a whole scan's support opportunities across all years.
pub fn summarize_support<'a, I>(pairs: I) -> SupportSummary
where
    I: IntoIterator<Item = &'a SupportOpportunity>,
{
    let mut events = 0;
    let mut successes = 0;

    for (_, outcome) in pairs {
        events += 1;
        if outcome.success {
            successes += 1;
        }
    }

    let success_rate = if events == 0 {
        0.0
    } else {
        successes as f64 / events as f64
    };

    SupportSummary {
        events,
        successes,
        success_rate,
    }
}

/// Filter flat-return results to qualifying symbols, ordered by symbol
/// ascending regardless of scan order.
pub fn collect_flat_return_report(results: &[FlatReturnResult]) -> Vec<FlatReturnResult> {
    let mut report: Vec<FlatReturnResult> = results
        .iter()
        .filter(|r| r.meets_threshold)
        .cloned()
        .collect();
    report.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    report
}

// ============================================================
// TESTS
// ============================================================
