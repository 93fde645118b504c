//! Daily closing-price series.
//!
//! A [`PriceSeries`] owns the (date, close) observations for one symbol and
//! enforces the series invariants at construction: dates strictly ascending
//! (so no duplicates), every close finite and strictly positive. Evaluators
//! can then index and slice freely without re-checking.

use chrono::{Months, NaiveDate};

use crate::params::Years;
use crate::{Result, ScreenError};

/// One daily closing observation
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Validated, time-ordered closing prices for one symbol.
///
/// Immutable once built; a scan invocation owns the series it fetched and
/// discards it with the report.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, validating every point.
    ///
    /// Fails with [`ScreenError::InvalidSeries`] naming the first offending
    /// index when dates are out of order or duplicated, or a close is
    /// non-finite or not strictly positive.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        for (i, point) in points.iter().enumerate() {
            if point.close.is_nan() {
                return Err(ScreenError::InvalidSeries {
                    index: i,
                    reason: "NaN close",
                });
            }
            if point.close.is_infinite() {
                return Err(ScreenError::InvalidSeries {
                    index: i,
                    reason: "infinite close",
                });
            }
            if point.close <= 0.0 {
                return Err(ScreenError::InvalidSeries {
                    index: i,
                    reason: "close must be > 0",
                });
            }
            if i > 0 {
                let prev = points[i - 1].date;
                if point.date == prev {
                    return Err(ScreenError::InvalidSeries {
                        index: i,
                        reason: "duplicate date",
                    });
                }
                if point.date < prev {
                    return Err(ScreenError::InvalidSeries {
                        index: i,
                        reason: "dates out of order",
                    });
                }
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[inline]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Trailing slice covering the requested span.
    ///
    /// The span ends at the last observation and opens at the nearest trading
    /// date at or before `last.date - years`. A series shorter than the span
    /// degrades to the whole series: a recently listed symbol still evaluates
    /// over the history it has.
    pub fn span_window(&self, years: Years) -> &[PricePoint] {
        let last = match self.points.last() {
            Some(p) => p,
            None => return &self.points,
        };

        let boundary = years
            .get()
            .checked_mul(12)
            .map(Months::new)
            .and_then(|months| last.date.checked_sub_months(months));
        let boundary = match boundary {
            Some(b) => b,
            // Span reaches past representable dates: the whole series is inside it
            None => return &self.points,
        };

        let cut = self.points.partition_point(|p| p.date <= boundary);
        // cut is the first index after the boundary; step back one to the
        // nearest at-or-before point when there is one
        &self.points[cut.saturating_sub(1)..]
    }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(points: Vec<PricePoint>) -> PriceSeries {
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn test_valid_series() {
        let s = series(vec![
            PricePoint::new(d(2020, 1, 1), 100.0),
            PricePoint::new(d(2020, 1, 2), 101.0),
            PricePoint::new(d(2020, 1, 3), 99.5),
        ]);
        assert_eq!(s.symbol(), "TEST");
        assert_eq!(s.len(), 3);
        assert_eq!(s.first().unwrap().close, 100.0);
        assert_eq!(s.last().unwrap().date, d(2020, 1, 3));
    }

    #[test]
    fn test_empty_series_is_valid() {
        let s = series(vec![]);
        assert!(s.is_empty());
        assert!(s.first().is_none());
    }

    #[test]
    fn test_rejects_out_of_order_dates() {
        let err = PriceSeries::new(
            "TEST",
            vec![
                PricePoint::new(d(2020, 1, 2), 100.0),
                PricePoint::new(d(2020, 1, 1), 101.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ScreenError::InvalidSeries {
                index: 1,
                reason: "dates out of order"
            }
        ));
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let err = PriceSeries::new(
            "TEST",
            vec![
                PricePoint::new(d(2020, 1, 1), 100.0),
                PricePoint::new(d(2020, 1, 1), 101.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ScreenError::InvalidSeries {
                index: 1,
                reason: "duplicate date"
            }
        ));
    }

    #[test]
    fn test_rejects_bad_closes() {
        for close in [f64::NAN, f64::INFINITY, 0.0, -5.0] {
            let result = PriceSeries::new("TEST", vec![PricePoint::new(d(2020, 1, 1), close)]);
            assert!(result.is_err(), "close {close} should be rejected");
        }
    }

    #[test]
    fn test_span_window_nearest_at_or_before() {
        // Last date 2022-01-01, 7y boundary 2015-01-01; 2014-12-30 is the
        // nearest point at or before it and must open the window
        let s = series(vec![
            PricePoint::new(d(2010, 6, 1), 50.0),
            PricePoint::new(d(2014, 12, 30), 80.0),
            PricePoint::new(d(2016, 3, 1), 90.0),
            PricePoint::new(d(2022, 1, 1), 120.0),
        ]);
        let window = s.span_window(Years::new(7).unwrap());
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].date, d(2014, 12, 30));
    }

    #[test]
    fn test_span_window_exact_boundary_point() {
        let s = series(vec![
            PricePoint::new(d(2015, 1, 1), 100.0),
            PricePoint::new(d(2022, 1, 1), 100.0),
        ]);
        let window = s.span_window(Years::new(7).unwrap());
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].date, d(2015, 1, 1));
    }

    #[test]
    fn test_span_window_short_history_degrades() {
        let s = series(vec![
            PricePoint::new(d(2020, 1, 1), 100.0),
            PricePoint::new(d(2021, 1, 1), 110.0),
        ]);
        let window = s.span_window(Years::new(7).unwrap());
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_span_window_empty_series() {
        let s = series(vec![]);
        assert!(s.span_window(Years::new(7).unwrap()).is_empty());
    }

    #[test]
    fn test_price_point_serde_round_trip() {
        let p = PricePoint::new(d(2020, 5, 4), 123.45);
        let json = serde_json::to_string(&p).unwrap();
        let back: PricePoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
