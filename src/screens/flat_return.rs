//! Flat-return screen
//!
//! Filters symbols whose total return over the lookback span stayed within a
//! tolerance band of zero. The motivating use case: finding index constituents
//! that went nowhere for years.

use crate::params::ScanParameters;
use crate::series::PriceSeries;
use crate::{Result, ScreenError};

/// Per-symbol outcome of the flat-return screen
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FlatReturnResult {
    pub symbol: String,
    /// Fractional total return over the span window (0.05 = 5%)
    pub total_return: f64,
    pub meets_threshold: bool,
}

/// Evaluate the flat-return screen for one series.
///
/// The window is the trailing `params.years` span of the series, opened at
/// the nearest trading date at or before the span boundary
/// ([`PriceSeries::span_window`]). The return is computed strictly from the
/// first and last closes of that window.
///
/// A symbol qualifies when `total_return.abs() <= min_return`, so "flat"
/// means within `min_return` of zero in either direction. With
/// `min_return = 0` only an exactly-zero return qualifies.
///
/// Fails with [`ScreenError::InsufficientHistory`] when the window holds
/// fewer than two points; such symbols are skipped by the scan drivers,
/// never reported as a fabricated 0% return.
pub fn evaluate_flat_return(
    series: &PriceSeries,
    params: &ScanParameters,
) -> Result<FlatReturnResult> {
    let window = series.span_window(params.years);
    if window.len() < 2 {
        return Err(ScreenError::InsufficientHistory {
            need: 2,
            got: window.len(),
        });
    }

    let first = window[0].close;
    let last = window[window.len() - 1].close;
    let total_return = (last - first) / first;

    Ok(FlatReturnResult {
        symbol: series.symbol().to_string(),
        total_return,
        meets_threshold: total_return.abs() <= params.min_return.get(),
    })
}
