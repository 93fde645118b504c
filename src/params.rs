//! Scan parameters and validated value types
//!
//! Everything a scan invocation is configured with lives here:
//! - `Fraction`: non-negative fractional quantities (thresholds, margins)
//! - `Years`: lookback spans in whole calendar years
//! - `ScanParameters`: the full per-invocation configuration
//!
//! Values are validated at construction and again on deserialization, so a
//! config layer cannot hand the evaluators a NaN threshold or a zero-year span.
//!
//! # Example
//!
//! ```rust
//! use highwater::params::ScanParameters;
//!
//! let params = ScanParameters::new(0.05, 7, 0.2, ["AAPL", "MSFT"]).unwrap();
//! assert_eq!(params.years.get(), 7);
//! assert!(params.tickers.contains("AAPL"));
//! ```

use std::collections::BTreeSet;

use crate::{Result, ScreenError};

// ============================================================
// DEFAULTS
// ============================================================

/// Default flat-return tolerance: only an exactly-zero return qualifies.
pub const DEFAULT_MIN_RETURN: f64 = 0.0;

/// Default lookback span in years.
pub const DEFAULT_YEARS: u32 = 7;

/// Default appreciation threshold (10%).
pub const DEFAULT_APPRECIATION_THRESHOLD: f64 = 0.10;

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Non-negative fractional quantity (0.05 = 5%)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Fraction(f64);

impl Fraction {
  /// Create a new Fraction, validating the value is finite and >= 0
  pub fn new(value: f64) -> Result<Self> {
    if value.is_nan() || value.is_infinite() {
      return Err(ScreenError::InvalidValue(
        "Fraction cannot be NaN or infinite",
      ));
    }
    if value < 0.0 {
      return Err(ScreenError::InvalidValue("Fraction must be >= 0"));
    }
    Ok(Self(value))
  }

  /// Create a Fraction from a compile-time constant (library internal use)
  #[doc(hidden)]
  pub const fn new_const(value: f64) -> Self {
    Self(value)
  }

  #[inline]
  pub fn get(self) -> f64 {
    self.0
  }
}

impl serde::Serialize for Fraction {
  fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
    self.0.serialize(s)
  }
}

impl<'de> serde::Deserialize<'de> for Fraction {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
    let value = f64::deserialize(d)?;
    Fraction::new(value).map_err(serde::de::Error::custom)
  }
}

/// Lookback span in whole calendar years (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Years(u32);

impl Years {
  /// Create a new Years, validating value is > 0
  pub fn new(value: u32) -> Result<Self> {
    if value == 0 {
      return Err(ScreenError::InvalidValue("Years must be > 0"));
    }
    Ok(Self(value))
  }

  #[doc(hidden)]
  pub const fn new_const(value: u32) -> Self {
    Self(value)
  }

  #[inline]
  pub fn get(self) -> u32 {
    self.0
  }
}

impl serde::Serialize for Years {
  fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
    self.0.serialize(s)
  }
}

impl<'de> serde::Deserialize<'de> for Years {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
    let value = u32::deserialize(d)?;
    Years::new(value).map_err(serde::de::Error::custom)
  }
}

// ============================================================
// SCAN PARAMETERS
// ============================================================

/// Configuration for one scan invocation. Never mutated after construction.
///
/// `min_return` bounds the flat-return tolerance band, `years` the lookback
/// span, `appreciation_threshold` the forward gain a held lifetime high must
/// reach, and `tickers` the symbols to scan. The ticker set is ordered, so
/// sequential scans walk symbols in a stable order.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScanParameters {
  pub min_return: Fraction,
  pub years: Years,
  pub appreciation_threshold: Fraction,
  pub tickers: BTreeSet<String>,
}

impl ScanParameters {
  /// Build parameters from raw values, validating each field
  pub fn new<I, T>(
    min_return: f64,
    years: u32,
    appreciation_threshold: f64,
    tickers: I,
  ) -> Result<Self>
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    Ok(Self {
      min_return: Fraction::new(min_return)?,
      years: Years::new(years)?,
      appreciation_threshold: Fraction::new(appreciation_threshold)?,
      tickers: tickers.into_iter().map(Into::into).collect(),
    })
  }
}

impl Default for ScanParameters {
  fn default() -> Self {
    Self {
      min_return: Fraction::new_const(DEFAULT_MIN_RETURN),
      years: Years::new_const(DEFAULT_YEARS),
      appreciation_threshold: Fraction::new_const(DEFAULT_APPRECIATION_THRESHOLD),
      tickers: BTreeSet::new(),
    }
  }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fraction_validation() {
    assert!(Fraction::new(0.0).is_ok());
    assert!(Fraction::new(0.5).is_ok());
    assert!(Fraction::new(2.0).is_ok());
    assert!(Fraction::new(-0.1).is_err());
    assert!(Fraction::new(f64::NAN).is_err());
    assert!(Fraction::new(f64::INFINITY).is_err());
  }

  #[test]
  fn test_years_validation() {
    assert!(Years::new(1).is_ok());
    assert!(Years::new(100).is_ok());
    assert!(Years::new(0).is_err());
  }

  #[test]
  fn test_parameters_new() {
    let params = ScanParameters::new(0.0, 7, 0.1, ["MSFT", "AAPL", "MSFT"]).unwrap();
    assert_eq!(params.min_return.get(), 0.0);
    assert_eq!(params.years.get(), 7);
    assert_eq!(params.appreciation_threshold.get(), 0.1);
    // Set semantics: duplicates collapse, iteration is ordered
    let tickers: Vec<_> = params.tickers.iter().cloned().collect();
    assert_eq!(tickers, vec!["AAPL".to_string(), "MSFT".to_string()]);
  }

  #[test]
  fn test_parameters_new_rejects_invalid() {
    assert!(ScanParameters::new(-0.1, 7, 0.1, ["AAPL"]).is_err());
    assert!(ScanParameters::new(0.0, 0, 0.1, ["AAPL"]).is_err());
    assert!(ScanParameters::new(0.0, 7, f64::NAN, ["AAPL"]).is_err());
  }

  #[test]
  fn test_parameters_default() {
    let params = ScanParameters::default();
    assert_eq!(params.min_return.get(), DEFAULT_MIN_RETURN);
    assert_eq!(params.years.get(), DEFAULT_YEARS);
    assert_eq!(
      params.appreciation_threshold.get(),
      DEFAULT_APPRECIATION_THRESHOLD
    );
    assert!(params.tickers.is_empty());
  }

  #[test]
  fn test_parameters_deserialize_validates() {
    let ok = r#"{"min_return":0.05,"years":7,"appreciation_threshold":0.2,"tickers":["AAPL"]}"#;
    let params: ScanParameters = serde_json::from_str(ok).unwrap();
    assert_eq!(params.min_return.get(), 0.05);

    let bad_years =
      r#"{"min_return":0.05,"years":0,"appreciation_threshold":0.2,"tickers":["AAPL"]}"#;
    assert!(serde_json::from_str::<ScanParameters>(bad_years).is_err());

    let bad_return =
      r#"{"min_return":-0.05,"years":7,"appreciation_threshold":0.2,"tickers":["AAPL"]}"#;
    assert!(serde_json::from_str::<ScanParameters>(bad_return).is_err());
  }
}
