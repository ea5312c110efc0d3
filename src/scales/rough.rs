//! Approximate logarithmic scale for hot paths.
//!
//! [`RoughLogarithmic`] places its delimiters at `low + base^(i+1) / mul`
//! with `mul = base^n / (high - low)`, so that
//!
//! ```text
//!   pos(v) = floor(log_base((v - low) * mul))
//!          = floor(log2((v - low) * mul)) / log2(base)
//! ```
//!
//! and `floor(log2(..))` is read from the exponent bits of the product
//! (see [`crate::log2`]). Only bases 2 and 8 are accepted, because for them
//! `log2(base)` is the integer 1 or 3 and the division is exact.
//!
//! Values below `(low + delimiters[0]) / 2` are raised to that point before
//! the logarithm is taken. That keeps the product positive and normal, which
//! is the domain where exponent extraction is exact, without changing the
//! bucket those values land in.

use std::fmt::{self, Display};

use num_traits::NumCast;

use crate::error::{Result, ScaleError};
use crate::scales::{as_f64, check_ascending, check_buckets, check_range, Bounds, Scale, ScaleType};
use crate::value::Value;

/// `n` geometric buckets whose index is computed without calling `ln`.
///
/// # Examples
///
/// ```rust
/// use misure::scales::{RoughLogarithmic, Scale};
///
/// let scale = RoughLogarithmic::new(2.0, 0.0, 1024.0, 10).unwrap();
/// assert_eq!(scale.delimiters(), &[2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0, 256.0, 512.0]);
/// assert_eq!(scale.pos(0.1), 0);
/// assert_eq!(scale.pos(3.0), 1);
/// assert_eq!(scale.pos(700.0), 9);
/// assert_eq!(scale.pos(1e12), 9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RoughLogarithmic<T> {
    bounds: Bounds<T>,
    base: T,
    mul: f64,
    in_first: T,
    div: i32,
}

impl<T: Value> RoughLogarithmic<T> {
    /// Builds a rough logarithmic scale with `n` buckets.
    ///
    /// # Errors
    ///
    /// Fails when `base` is neither 2 nor 8, `n < 2`, `low >= high`, or the
    /// delimiters collapse in the value type.
    pub fn new(base: T, low: T, high: T, n: usize) -> Result<Self> {
        check_buckets(n)?;
        check_range(low, high)?;
        let b = as_f64(base);
        let div = if b == 2.0 {
            1
        } else if b == 8.0 {
            3
        } else {
            return Err(ScaleError::InvalidBase { base: b });
        };

        let lo = as_f64(low);
        let mul = b.powf(n as f64) / (as_f64(high) - lo);
        let mut delimiters = Vec::with_capacity(n - 1);
        for i in 1..n {
            let d = lo + b.powf(i as f64) / mul;
            delimiters.push(<T as NumCast>::from(d).unwrap_or(low));
        }

        let first = delimiters[0];
        if !(first > low) {
            return Err(ScaleError::NonPositiveFirstDelimiter {
                first: as_f64(first),
                low: lo,
            });
        }
        check_ascending(&delimiters)?;

        let midpoint = (lo + (lo + b / mul)) / 2.0;
        let in_first = <T as NumCast>::from(midpoint).unwrap_or(low);

        tracing::debug!(n, %base, %low, %high, mul, "rough logarithmic scale built");
        Ok(Self {
            bounds: Bounds {
                low,
                high,
                delimiters,
            },
            base,
            mul,
            in_first,
            div,
        })
    }

    /// The base, 2 or 8.
    pub fn base(&self) -> T {
        self.base
    }

    /// The multiplier mapping `v - low` onto `[0, base^n)`.
    pub fn mul(&self) -> f64 {
        self.mul
    }
}

impl<T: Value> Scale for RoughLogarithmic<T> {
    type Value = T;

    fn scale_type(&self) -> ScaleType {
        ScaleType::RoughLogarithmic
    }

    fn low(&self) -> T {
        self.bounds.low
    }

    fn high(&self) -> T {
        self.bounds.high
    }

    fn delimiters(&self) -> &[T] {
        &self.bounds.delimiters
    }

    #[inline]
    fn pos(&self, value: T) -> usize {
        let clamped = if value < self.in_first {
            self.in_first
        } else {
            value
        };
        let low = self.bounds.low;
        let l = match clamped.checked_offset(low) {
            Some(offset) => offset.scaled_log2(self.mul),
            None => (as_f64(clamped) - as_f64(low)).scaled_log2(self.mul),
        } / self.div;
        (l.max(0) as usize).min(self.bounds.last())
    }
}

impl<T: Value> Display for RoughLogarithmic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bounds.describe(f, ScaleType::RoughLogarithmic)?;
        write!(f, ", base: {}", self.base)
    }
}
