//! Bucket-assignment policies for histograms.
//!
//! A [`Scale`] partitions the value domain into `n` buckets separated by
//! `n - 1` ascending delimiters and maps every sample to one of them with
//! [`Scale::pos`]. Values outside the normal range `[low, high)` are never
//! rejected: they land in the first or the last bucket.
//!
//! ```text
//!   bucket:    0        1        2              n-1
//!          ─────────┼────────┼────────┼ ... ┼──────────▶
//!                  d[0]     d[1]     d[2]  d[n-2]    (+Inf)
//! ```
//!
//! # Variants
//!
//! | Type | Delimiters | `pos` cost | A value equal to `d[i]` goes to |
//! |------|------------|------------|---------------------------------|
//! | [`Fixed`] | explicit list | linear scan | bucket `i` |
//! | [`Linear`] | `low + (i+1)·w` | one division | bucket `i + 1` |
//! | [`Logarithmic`] | `low + (high-low)·base^(i-(n-1))` | one `ln` | bucket `i + 1` |
//! | [`RoughLogarithmic`] | `low + base^(i+1)/mul` | exponent bit extraction | bucket `i + 1` (up to rounding) |
//!
//! The set of scales is closed. [`AnyScale`] is the sum type over all of
//! them, and [`ScaleConfig`] is the parameter surface that builds one.
//!
//! # Examples
//!
//! ```rust
//! use misure::scales::{Fixed, Linear, Scale};
//!
//! let fixed = Fixed::new(0u64, 1000, [10, 100, 500]).unwrap();
//! assert_eq!(fixed.n(), 4);
//! assert_eq!(fixed.pos(10), 0);
//! assert_eq!(fixed.pos(11), 1);
//! assert_eq!(fixed.pos(5000), 3);
//!
//! let linear = Linear::new(0.0, 10.0, 5).unwrap();
//! assert_eq!(linear.delimiters(), &[2.0, 4.0, 6.0, 8.0]);
//! assert_eq!(linear.pos(-3.0), 0);
//! assert_eq!(linear.pos(100.0), 4);
//! ```

mod any;
mod fixed;
mod linear;
mod logarithmic;
mod rough;

pub use any::{AnyScale, ScaleConfig};
pub use fixed::Fixed;
pub use linear::Linear;
pub use logarithmic::Logarithmic;
pub use rough::RoughLogarithmic;

use std::fmt::{self, Debug, Display};

use crate::error::{Result, ScaleError};
use crate::value::Value;

/// The kind of a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleType {
    /// Explicit delimiter list.
    Fixed,
    /// Equal-width buckets.
    Linear,
    /// Geometric buckets, exact logarithm.
    Logarithmic,
    /// Geometric buckets, logarithm read from the exponent bits.
    RoughLogarithmic,
}

impl Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScaleType::Fixed => "fixed",
            ScaleType::Linear => "linear",
            ScaleType::Logarithmic => "logarithmic",
            ScaleType::RoughLogarithmic => "rough-logarithmic",
        };
        f.write_str(s)
    }
}

/// Maps sample values to bucket indices.
///
/// Scales are immutable once built, so a histogram reads its scale from
/// any number of threads without synchronisation.
pub trait Scale: Debug + Send + Sync {
    /// The sample type.
    type Value: Value;

    /// Which variant this is.
    fn scale_type(&self) -> ScaleType;

    /// Lower bound of the normal range.
    fn low(&self) -> Self::Value;

    /// Upper bound of the normal range.
    fn high(&self) -> Self::Value;

    /// The `n - 1` ascending bucket delimiters.
    fn delimiters(&self) -> &[Self::Value];

    /// Returns the bucket index for `value`, always in `[0, n - 1]`.
    fn pos(&self, value: Self::Value) -> usize;

    /// Number of buckets.
    #[inline]
    fn n(&self) -> usize {
        self.delimiters().len() + 1
    }

    /// The `le` label of bucket `i`: its delimiter, or `+Inf` for the last bucket.
    fn delimiter_label(&self, i: usize) -> String {
        match self.delimiters().get(i) {
            Some(d) => d.to_string(),
            None => "+Inf".to_string(),
        }
    }
}

/// Range and delimiters shared by every variant.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bounds<T> {
    pub(crate) low: T,
    pub(crate) high: T,
    pub(crate) delimiters: Vec<T>,
}

impl<T: Value> Bounds<T> {
    #[inline]
    pub(crate) fn last(&self) -> usize {
        self.delimiters.len()
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>, scale_type: ScaleType) -> fmt::Result {
        write!(
            f,
            "lowest value: {}, highest value: {}, type: {}, range: [",
            self.low, self.high, scale_type
        )?;
        for (i, d) in self.delimiters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{d}")?;
        }
        f.write_str("]")
    }
}

pub(crate) fn check_buckets(n: usize) -> Result<()> {
    if n < 2 {
        return Err(ScaleError::TooFewBuckets { n });
    }
    Ok(())
}

pub(crate) fn check_range<T: Value>(low: T, high: T) -> Result<()> {
    // Negated so NaN bounds are rejected too.
    if !(low < high) {
        return Err(empty_range(low, high));
    }
    Ok(())
}

pub(crate) fn check_ascending<T: Value>(delimiters: &[T]) -> Result<()> {
    for (i, pair) in delimiters.windows(2).enumerate() {
        if !(pair[0] < pair[1]) {
            return Err(ScaleError::UnsortedDelimiters { index: i + 1 });
        }
    }
    Ok(())
}

pub(crate) fn empty_range<T: Value>(low: T, high: T) -> ScaleError {
    ScaleError::EmptyRange {
        low: as_f64(low),
        high: as_f64(high),
    }
}

#[inline]
pub(crate) fn as_f64<T: Value>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}
