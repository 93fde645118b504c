//! Screen implementations
//!
//! Two independent evaluation modes over a validated price series:
//! - `flat_return`: total return over a lookback span, within a tolerance band of zero
//! - `lifetime_high`: running-maximum events, the support test, forward appreciation
//!
//! Both evaluators are pure functions of their inputs; the scan drivers in the
//! crate root run them across many symbols.

pub mod flat_return;
pub mod lifetime_high;

pub use flat_return::*;
pub use lifetime_high::*;
