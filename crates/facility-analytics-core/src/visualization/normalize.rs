//! Shared rescaling helpers for chart datasets.
//!
//! The carbon bubble radius and the matrix radius are separate functions on
//! purpose: one is compressed by an exponent, the other is linear.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{Band, RadiusRange};
use crate::metrics::safe_div;
use crate::types::Rate;

/// Smallest span used when all observed values coincide.
pub const MIN_RANGE: Decimal = dec!(0.000000001);

/// Largest value, floored at zero. Empty input gives zero.
pub fn max_or_zero<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::max)
}

pub fn clamp(value: Decimal, lower: Decimal, upper: Decimal) -> Decimal {
    value.max(lower).min(upper)
}

/// `value / max`, clamped to `[0, 1]`; zero when `max` is zero.
pub fn normalize_by_max(value: Decimal, max: Decimal) -> Rate {
    clamp(safe_div(value, max), Decimal::ZERO, Decimal::ONE)
}

pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = values.iter().sum();
    sum / Decimal::from(values.len() as i64)
}

/// Bubble radius for the efficiency-vs-capacity chart.
///
/// `min + ci_norm^exponent × (max - min)`. An exponent below 1 lifts small
/// intensities so near-zero emitters stay visible.
pub fn carbon_bubble_radius(ci_norm: Rate, range: RadiusRange, exponent: Decimal) -> Decimal {
    let n = clamp(ci_norm, Decimal::ZERO, Decimal::ONE);
    let scaled = if n.is_zero() || n == Decimal::ONE {
        n
    } else {
        n.checked_powd(exponent).unwrap_or(n)
    };
    range.min + scaled * range.span()
}

/// Bubble radius for the performance matrix: linear in `ci_norm`.
pub fn matrix_bubble_radius(ci_norm: Rate, range: RadiusRange) -> Decimal {
    range.min + clamp(ci_norm, Decimal::ZERO, Decimal::ONE) * range.span()
}

/// Minimum and maximum of a value set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl ObservedRange {
    /// `None` for an empty set.
    pub fn of(values: &[Decimal]) -> Option<Self> {
        let first = *values.first()?;
        let (min, max) = values
            .iter()
            .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        Some(Self { min, max })
    }

    /// Width of the range, never below [`MIN_RANGE`].
    pub fn span(&self) -> Decimal {
        (self.max - self.min).max(MIN_RANGE)
    }

    /// Absolute bounds of a fractional band of this range.
    pub fn band(&self, band: Band) -> (Decimal, Decimal) {
        let span = self.span();
        (self.min + span * band.lower, self.min + span * band.upper)
    }
}
