//! Lifetime-high events and the support/appreciation screen
//!
//! A lifetime high is a close that equals or exceeds every close before it.
//! The screen asks, for each such event: did the price later hold that level
//! as support (never closing more than [`SUPPORT_MARGIN`] below it), and if
//! so, did it go on to appreciate past the configured threshold? Breach and
//! target race each other in date order; whichever comes first decides.

use chrono::NaiveDate;

use crate::params::Fraction;
use crate::series::{PricePoint, PriceSeries};
use crate::{Result, ScreenError};

/// Closes up to this fraction below an event price still count as the high
/// holding as support; a close below the margin breaks the support test.
pub const SUPPORT_MARGIN: f64 = 0.02;

/// A point where close equals or exceeds the running maximum so far
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LifetimeHighEvent {
    /// Position in the series that produced the event
    pub index: usize,
    pub date: NaiveDate,
    pub price: f64,
}

/// Outcome of the support/appreciation test for one event.
///
/// `appreciation_date` and `appreciation` are `Some` exactly when `success`
/// is true: the first date the target was reached, and the fractional gain
/// over the event price on that date.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SupportAppreciationOutcome {
    pub success: bool,
    pub appreciation_date: Option<NaiveDate>,
    pub appreciation: Option<f64>,
}

/// A qualifying lifetime-high event paired with its outcome
pub type SupportOpportunity = (LifetimeHighEvent, SupportAppreciationOutcome);

// ============================================================
// LIFETIME-HIGH ITERATOR
// ============================================================

/// Lazy iterator over the lifetime-high events of a series.
///
/// Yields an event for every point whose close equals or exceeds the running
/// maximum (a new or repeated lifetime high); the first point of a non-empty
/// series is always one. Restartable: each [`PriceSeries::lifetime_highs`]
/// call recomputes from the start. Dates are unique within a series, so at
/// most one event is emitted per calendar date.
pub struct LifetimeHighs<'a> {
    points: &'a [PricePoint],
    current: usize,
    running_max: f64,
}

impl<'a> LifetimeHighs<'a> {
    fn new(points: &'a [PricePoint]) -> Self {
        Self {
            points,
            current: 0,
            running_max: f64::NEG_INFINITY,
        }
    }
}

impl Iterator for LifetimeHighs<'_> {
    type Item = LifetimeHighEvent;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current < self.points.len() {
            let index = self.current;
            let point = self.points[index];
            self.current += 1;

            if point.close >= self.running_max {
                self.running_max = point.close;
                return Some(LifetimeHighEvent {
                    index,
                    date: point.date,
                    price: point.close,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Any of the remaining points may extend the running maximum
        let remaining = self.points.len().saturating_sub(self.current);
        (0, Some(remaining))
    }
}

impl PriceSeries {
    /// Iterate the lifetime-high events of this series.
    pub fn lifetime_highs(&self) -> LifetimeHighs<'_> {
        LifetimeHighs::new(self.points())
    }
}

// ============================================================
// SUPPORT / APPRECIATION
// ============================================================

/// Evaluate the support/appreciation test for one lifetime-high event.
///
/// Walks the series forward from the event in date order:
/// - a close below `event.price * (1.0 - SUPPORT_MARGIN)` breaks support;
///   the event is not a qualifying instance and `Ok(None)` is returned,
/// - a close at or above `event.price * (1.0 + threshold)` succeeds with
///   that date and the gain over the event price,
/// - reaching the end of the series with support intact but the target
///   unmet yields an unsuccessful outcome with empty date/magnitude.
///
/// Fails with [`ScreenError::InsufficientData`] when the series has no
/// points after the event date.
pub fn evaluate_support_appreciation(
    series: &PriceSeries,
    event: &LifetimeHighEvent,
    threshold: Fraction,
) -> Result<Option<SupportAppreciationOutcome>> {
    let forward = &series.points()[event.index + 1..];
    if forward.is_empty() {
        return Err(ScreenError::InsufficientData { after: event.date });
    }

    let floor = event.price * (1.0 - SUPPORT_MARGIN);
    let target = event.price * (1.0 + threshold.get());

    for point in forward {
        if point.close < floor {
            return Ok(None);
        }
        if point.close >= target {
            return Ok(Some(SupportAppreciationOutcome {
                success: true,
                appreciation_date: Some(point.date),
                appreciation: Some((point.close - event.price) / event.price),
            }));
        }
    }

    Ok(Some(SupportAppreciationOutcome {
        success: false,
        appreciation_date: None,
        appreciation: None,
    }))
}

/// Run the support/appreciation test across every lifetime-high event of a
/// series, keeping qualifying `(event, outcome)` pairs in series order.
///
/// Support breaches are dropped; events with no forward data are skipped
/// (the last point of every non-empty series is a lifetime high with nothing
/// after it).
pub fn collect_support_outcomes(
    series: &PriceSeries,
    threshold: Fraction,
) -> Vec<SupportOpportunity> {
    let mut outcomes = Vec::new();

    for event in series.lifetime_highs() {
        match evaluate_support_appreciation(series, &event, threshold) {
            Ok(Some(outcome)) => outcomes.push((event, outcome)),
            // Support broke before the target
            Ok(None) => {}
            // No forward data: skip the event
            Err(_) => {}
        }
    }

    outcomes
}
