//! # Highwater - stock screening over daily closing prices
//!
//! Screening library for two screens: flat total return over a lookback
//! span, and lifetime highs that later hold as support before appreciating.
//!
//! ## Quick Start
//!
//! ```rust
//! use highwater::prelude::*;
//!
//! use chrono::{Days, NaiveDate};
//!
//! // Build a series from provider data
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let points: Vec<PricePoint> = (0..10u64)
//!     .map(|i| PricePoint::new(start + Days::new(i * 30), 100.0 + i as f64))
//!     .collect();
//! let series = PriceSeries::new("ACME", points).unwrap();
//!
//! // Lifetime-high events, their support outcomes, and the annual report
//! let threshold = Fraction::new(0.05).unwrap();
//! let opportunities = collect_support_outcomes(&series, threshold);
//! let by_year = aggregate_annual(&opportunities);
//! assert!(!by_year.is_empty());
//! ```

pub mod aggregate;
pub mod params;
pub mod screens;
pub mod series;

pub mod prelude {
    pub use crate::{
        // Aggregation
        aggregate::{
            aggregate_annual, collect_flat_return_report, summarize_support, AnnualSummary,
            SupportSummary,
        },
        // Parameters
        params::{Fraction, ScanParameters, Years},
        // Scanning
        scan_flat_returns,
        scan_flat_returns_parallel,
        scan_support_appreciation,
        scan_support_appreciation_parallel,
        // Screens
        screens::{
            collect_support_outcomes, evaluate_flat_return, evaluate_support_appreciation,
            FlatReturnResult, LifetimeHighEvent, LifetimeHighs, SupportAppreciationOutcome,
            SupportOpportunity, SUPPORT_MARGIN,
        },
        // Series
        series::{PricePoint, PriceSeries},
        // Seams
        HistorySource,
        // Errors
        Result,
        ScreenError,
        SupportScanResult,
        SymbolSkip,
    };
}

use chrono::NaiveDate;

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, ScreenError>;

/// Errors that can occur during screening
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScreenError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("Insufficient history: need {need} closes in the span, got {got}")]
    InsufficientHistory { need: usize, got: usize },

    #[error("Insufficient data: no closes after {after}")]
    InsufficientData { after: NaiveDate },

    #[error("Provider failure: {0}")]
    ProviderFailure(String),

    #[error("Invalid series at index {index}: {reason}")]
    InvalidSeries { index: usize, reason: &'static str },
}

// ============================================================
// HISTORY SOURCE
// ============================================================

use series::PriceSeries;

/// Source of per-symbol price history - the provider collaborator seam.
///
/// Implementations wrap whatever actually fetches data: a market-data API
/// client, a file reader, an in-memory fixture. Timeouts and retries belong
/// behind this trait; the scan drivers only see a bounded call that either
/// yields a validated series or fails with a per-symbol error
/// (typically [`ScreenError::ProviderFailure`]).
pub trait HistorySource: Send + Sync {
    fn history(&self, symbol: &str) -> Result<PriceSeries>;
}

// ============================================================
// SCAN DRIVERS
// ============================================================

use params::ScanParameters;
use screens::{collect_support_outcomes, evaluate_flat_return, FlatReturnResult, SupportOpportunity};

/// Per-symbol failure recorded during a scan
#[derive(Debug)]
pub struct SymbolSkip {
    pub symbol: String,
    pub error: ScreenError,
}

/// Support opportunities found for a single symbol
#[derive(Debug, serde::Serialize)]
pub struct SupportScanResult {
    pub symbol: String,
    pub opportunities: Vec<SupportOpportunity>,
}

/// Scan every configured ticker through the flat-return screen.
///
/// Returns one [`FlatReturnResult`] per evaluated symbol (qualifying or not)
/// in ticker order, plus one [`SymbolSkip`] per failed symbol. Per-symbol
/// errors never abort the scan; the scan came up entirely empty exactly when
/// the result vector is empty.
pub fn scan_flat_returns<S: HistorySource>(
    source: &S,
    params: &ScanParameters,
) -> (Vec<FlatReturnResult>, Vec<SymbolSkip>) {
    let mut results = Vec::new();
    let mut skipped = Vec::new();

    for symbol in &params.tickers {
        match flat_return_for(source, symbol, params) {
            Ok(result) => results.push(result),
            Err(error) => {
                tracing::warn!(symbol = %symbol, error = %error, "Symbol skipped");
                skipped.push(SymbolSkip {
                    symbol: symbol.clone(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        evaluated = results.len(),
        skipped = skipped.len(),
        "Flat-return scan finished"
    );
    (results, skipped)
}

/// Scan every configured ticker through the support/appreciation screen.
///
/// Returns one [`SupportScanResult`] per evaluated symbol in ticker order
/// (a symbol with zero qualifying events still counts as evaluated), plus
/// one [`SymbolSkip`] per failed symbol. Same partial-failure contract as
/// [`scan_flat_returns`].
pub fn scan_support_appreciation<S: HistorySource>(
    source: &S,
    params: &ScanParameters,
) -> (Vec<SupportScanResult>, Vec<SymbolSkip>) {
    let mut results = Vec::new();
    let mut skipped = Vec::new();

    for symbol in &params.tickers {
        match support_scan_for(source, symbol, params) {
            Ok(result) => results.push(result),
            Err(error) => {
                tracing::warn!(symbol = %symbol, error = %error, "Symbol skipped");
                skipped.push(SymbolSkip {
                    symbol: symbol.clone(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        evaluated = results.len(),
        skipped = skipped.len(),
        "Support scan finished"
    );
    (results, skipped)
}

fn flat_return_for<S: HistorySource>(
    source: &S,
    symbol: &str,
    params: &ScanParameters,
) -> Result<FlatReturnResult> {
    let series = source.history(symbol)?;
    evaluate_flat_return(&series, params)
}

fn support_scan_for<S: HistorySource>(
    source: &S,
    symbol: &str,
    params: &ScanParameters,
) -> Result<SupportScanResult> {
    let series = source.history(symbol)?;
    Ok(SupportScanResult {
        symbol: symbol.to_string(),
        opportunities: collect_support_outcomes(&series, params.appreciation_threshold),
    })
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Parallel [`scan_flat_returns`]: symbols fan out across the rayon pool.
///
/// Evaluation is pure and symbols share no state, so the only coordination
/// is collecting. Results and skips come back in ticker order, identical to
/// the sequential driver.
pub fn scan_flat_returns_parallel<S: HistorySource>(
    source: &S,
    params: &ScanParameters,
) -> (Vec<FlatReturnResult>, Vec<SymbolSkip>) {
    let results: Vec<_> = params
        .tickers
        .par_iter()
        .map(|symbol| {
            flat_return_for(source, symbol, params).map_err(|error| {
                tracing::warn!(symbol = %symbol, error = %error, "Symbol skipped");
                SymbolSkip {
                    symbol: symbol.clone(),
                    error,
                }
            })
        })
        .collect();

    partition(results)
}

/// Parallel [`scan_support_appreciation`], same contract as the sequential
/// driver.
pub fn scan_support_appreciation_parallel<S: HistorySource>(
    source: &S,
    params: &ScanParameters,
) -> (Vec<SupportScanResult>, Vec<SymbolSkip>) {
    let results: Vec<_> = params
        .tickers
        .par_iter()
        .map(|symbol| {
            support_scan_for(source, symbol, params).map_err(|error| {
                tracing::warn!(symbol = %symbol, error = %error, "Symbol skipped");
                SymbolSkip {
                    symbol: symbol.clone(),
                    error,
                }
            })
        })
        .collect();

    partition(results)
}

fn partition<T>(results: Vec<std::result::Result<T, SymbolSkip>>) -> (Vec<T>, Vec<SymbolSkip>) {
    let mut successes = Vec::new();
    let mut skipped = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => skipped.push(e),
        }
    }

    (successes, skipped)
}

// ============================================================
// TESTS
// ============================================================
