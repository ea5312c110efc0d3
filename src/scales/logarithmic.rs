//! Scale with geometrically growing buckets, using the exact logarithm.

use std::fmt::{self, Display};

use num_traits::{NumCast, ToPrimitive};

use crate::error::{Result, ScaleError};
use crate::scales::{as_f64, check_ascending, check_buckets, check_range, Bounds, Scale, ScaleType};
use crate::value::Value;

/// `n` buckets whose delimiters approach `high` geometrically from below.
///
/// Delimiter `i` is `low + (high - low) * base^(i - (n - 1))`, so the top
/// bucket below `high` spans `[low + (high - low) / base, high)` and each
/// bucket further down is `base` times narrower. Values below the first
/// delimiter fall into bucket 0, values at or above `high` into bucket
/// `n - 1`. A value equal to a delimiter opens the next bucket.
///
/// `pos` evaluates one natural logarithm and then checks the candidate
/// bucket against the stored delimiters, so rounding in `ln` never moves
/// a value into a neighbouring bucket.
///
/// # Examples
///
/// ```rust
/// use misure::scales::{Logarithmic, Scale};
///
/// let scale = Logarithmic::new(2.0, 0.0, 1024.0, 10).unwrap();
/// assert_eq!(scale.delimiters()[0], 2.0);
/// assert_eq!(scale.delimiters()[8], 512.0);
/// assert_eq!(scale.pos(1.0), 0);
/// assert_eq!(scale.pos(3.0), 1);
/// assert_eq!(scale.pos(600.0), 9);
/// assert_eq!(scale.pos(5000.0), 9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Logarithmic<T> {
    bounds: Bounds<T>,
    base: T,
    ln_base: f64,
    ln_first: f64,
}

impl<T: Value> Logarithmic<T> {
    /// Builds a logarithmic scale with `n` buckets.
    ///
    /// # Errors
    ///
    /// Fails when `n < 2`, `low >= high`, `base <= 1`, or when the delimiters
    /// collapse in the value type (e.g. an integer range too narrow for `n`).
    pub fn new(base: T, low: T, high: T, n: usize) -> Result<Self> {
        check_buckets(n)?;
        check_range(low, high)?;
        let b = as_f64(base);
        if !(b > 1.0) || !b.is_finite() {
            return Err(ScaleError::InvalidBase { base: b });
        }

        let (lo, hi) = (as_f64(low), as_f64(high));
        let mut delimiters = Vec::with_capacity(n - 1);
        let mut exponent = -((n - 1) as f64);
        for _ in 1..n {
            let d = (hi - lo) * b.powf(exponent) + lo;
            delimiters.push(<T as NumCast>::from(d).unwrap_or(low));
            exponent += 1.0;
        }

        let first = delimiters[0];
        if !(first > low) {
            return Err(ScaleError::NonPositiveFirstDelimiter {
                first: as_f64(first),
                low: lo,
            });
        }
        check_ascending(&delimiters)?;

        tracing::debug!(n, %base, %low, %high, "logarithmic scale built");
        Ok(Self {
            bounds: Bounds {
                low,
                high,
                delimiters,
            },
            base,
            ln_base: b.ln(),
            ln_first: (as_f64(first) - lo).ln(),
        })
    }

    /// The base of the geometric progression.
    pub fn base(&self) -> T {
        self.base
    }
}

impl<T: Value> Scale for Logarithmic<T> {
    type Value = T;

    fn scale_type(&self) -> ScaleType {
        ScaleType::Logarithmic
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
        let delimiters = &self.bounds.delimiters;
        let last = self.bounds.last();
        if !(value >= delimiters[0]) {
            return 0;
        }
        if value >= self.bounds.high {
            return last;
        }

        let offset = as_f64(value) - as_f64(self.bounds.low);
        let raw = 1.0 + ((offset.ln() - self.ln_first) / self.ln_base).floor();
        let mut p = raw.to_usize().unwrap_or(1).clamp(1, last);

        // bucket p covers [delimiters[p - 1], delimiters[p])
        while p > 1 && value < delimiters[p - 1] {
            p -= 1;
        }
        while p < last && value >= delimiters[p] {
            p += 1;
        }
        p
    }
}

impl<T: Value> Display for Logarithmic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bounds.describe(f, ScaleType::Logarithmic)?;
        write!(f, ", base: {}", self.base)
    }
}
