//! Scale with an explicit list of delimiters.

use std::fmt::{self, Display};

use crate::error::Result;
use crate::scales::{check_ascending, check_buckets, empty_range, Bounds, Scale, ScaleType};
use crate::value::Value;

/// A scale whose delimiters are given explicitly.
///
/// Each delimiter is an inclusive upper bound: `pos(v)` is the index of the
/// first delimiter `>= v`, or `n - 1` when `v` exceeds all of them. `low` and
/// `high` are descriptive only and do not affect bucketing.
///
/// # Examples
///
/// ```rust
/// use misure::scales::{Fixed, Scale};
///
/// let latency = Fixed::new(0.0, 10.0, [0.005, 0.05, 0.5, 5.0]).unwrap();
/// assert_eq!(latency.n(), 5);
/// assert_eq!(latency.pos(0.05), 1);
/// assert_eq!(latency.pos(0.051), 2);
/// assert_eq!(latency.delimiter_label(4), "+Inf");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Fixed<T> {
    bounds: Bounds<T>,
}

impl<T: Value> Fixed<T> {
    /// Builds a fixed scale with `delimiters.len() + 1` buckets.
    ///
    /// # Errors
    ///
    /// Fails when the list is empty or not strictly ascending.
    pub fn new(low: T, high: T, delimiters: impl Into<Vec<T>>) -> Result<Self> {
        let delimiters = delimiters.into();
        check_buckets(delimiters.len() + 1)?;
        check_ascending(&delimiters)?;
        if !(low <= high) {
            return Err(empty_range(low, high));
        }
        tracing::debug!(n = delimiters.len() + 1, %low, %high, "fixed scale built");
        Ok(Self {
            bounds: Bounds {
                low,
                high,
                delimiters,
            },
        })
    }
}

impl<T: Value> Scale for Fixed<T> {
    type Value = T;

    fn scale_type(&self) -> ScaleType {
        ScaleType::Fixed
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
        self.bounds
            .delimiters
            .iter()
            .position(|d| value <= *d)
            .unwrap_or(self.bounds.last())
    }
}

impl<T: Value> Display for Fixed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bounds.describe(f, ScaleType::Fixed)
    }
}
