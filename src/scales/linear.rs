//! Scale with equal-width buckets.

use std::fmt::{self, Display};

use num_traits::{NumCast, ToPrimitive};

use crate::error::Result;
use crate::scales::{as_f64, check_buckets, check_range, empty_range, Bounds, Scale, ScaleType};
use crate::value::Value;

/// `n` equal-width buckets over `[low, high)`.
///
/// The bucket width is `(high - low) / n`, computed in the value type, so an
/// integer scale truncates the width and the last bucket absorbs the
/// remainder. A value equal to a delimiter opens the next bucket. Signed
/// ranges wider than the type's maximum compute the width, and offsets that
/// do not fit, in `f64`.
///
/// # Examples
///
/// ```rust
/// use misure::scales::{Linear, Scale};
///
/// let scale = Linear::new(0u64, 100, 4).unwrap();
/// assert_eq!(scale.delimiters(), &[25, 50, 75]);
/// assert_eq!(scale.pos(24), 0);
/// assert_eq!(scale.pos(25), 1);
/// assert_eq!(scale.pos(1_000), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Linear<T> {
    bounds: Bounds<T>,
    width: T,
}

impl<T: Value> Linear<T> {
    /// Builds a linear scale with `n` buckets.
    ///
    /// # Errors
    ///
    /// Fails when `n < 2` or the bucket width is not positive.
    pub fn new(low: T, high: T, n: usize) -> Result<Self> {
        check_buckets(n)?;
        check_range(low, high)?;
        let count = <T as NumCast>::from(n).ok_or_else(|| empty_range(low, high))?;
        let width = match high.checked_offset(low) {
            Some(span) => span / count,
            // the span does not fit in T, but span / n does
            None => <T as NumCast>::from(((as_f64(high) - as_f64(low)) / n as f64).floor())
                .unwrap_or_else(T::max_value),
        };
        if !(width > T::zero()) {
            return Err(empty_range(low, high));
        }

        let mut delimiters = Vec::with_capacity(n - 1);
        let mut le = low;
        for _ in 1..n {
            le = le + width;
            delimiters.push(le);
        }

        tracing::debug!(n, %low, %high, %width, "linear scale built");
        Ok(Self {
            bounds: Bounds {
                low,
                high,
                delimiters,
            },
            width,
        })
    }

    /// Width of each bucket.
    pub fn width(&self) -> T {
        self.width
    }
}

impl<T: Value> Scale for Linear<T> {
    type Value = T;

    fn scale_type(&self) -> ScaleType {
        ScaleType::Linear
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
        let Bounds { low, high, .. } = self.bounds;
        if !(value > low) {
            return 0;
        }
        if value >= high {
            return self.bounds.last();
        }
        let index = match value.checked_offset(low) {
            Some(offset) => (offset / self.width).to_usize(),
            None => ((as_f64(value) - as_f64(low)) / as_f64(self.width)).to_usize(),
        };
        index.unwrap_or(0).min(self.bounds.last())
    }
}

impl<T: Value> Display for Linear<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bounds.describe(f, ScaleType::Linear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaleError;
    use crate::scales::tests::assert_scale_properties;

    #[test]
    fn test_new() {
        let scale = Linear::new(0.0, 10.0, 5).unwrap();
        assert_eq!(scale.n(), 5);
        assert_eq!(scale.width(), 2.0);
        assert_eq!(scale.delimiters(), &[2.0, 4.0, 6.0, 8.0]);
        assert_eq!(scale.scale_type(), ScaleType::Linear);
    }

    #[test]
    fn test_rejects_empty_width() {
        assert_eq!(
            Linear::new(0u32, 3, 4),
            Err(ScaleError::EmptyRange { low: 0.0, high: 3.0 })
        );
        assert!(Linear::new(5.0, 5.0, 4).is_err());
        assert!(Linear::new(5.0, 1.0, 4).is_err());
        assert_eq!(
            Linear::new(0.0, 1.0, 1),
            Err(ScaleError::TooFewBuckets { n: 1 })
        );
    }

    #[test]
    fn test_pos_boundaries() {
        let scale = Linear::new(0.0, 10.0, 5).unwrap();
        assert_eq!(scale.pos(0.0), 0);
        assert_eq!(scale.pos(1.9), 0);
        assert_eq!(scale.pos(2.0), 1);
        assert_eq!(scale.pos(5.5), 2);
        assert_eq!(scale.pos(9.9), 4);
        assert_eq!(scale.pos(10.0), 4);
    }

    #[test]
    fn test_pos_clamps() {
        let scale = Linear::new(-1.0, 1.0, 4).unwrap();
        assert_eq!(scale.pos(-1.0 - f64::EPSILON), 0);
        assert_eq!(scale.pos(f64::MIN), 0);
        assert_eq!(scale.pos(f64::NEG_INFINITY), 0);
        assert_eq!(scale.pos(1e300), 3);
        assert_eq!(scale.pos(f64::INFINITY), 3);
        assert_eq!(scale.pos(f64::NAN), 0);
    }

    #[test]
    fn test_unsigned_below_low_does_not_underflow() {
        let scale = Linear::new(10u64, 20, 2).unwrap();
        assert_eq!(scale.pos(0), 0);
        assert_eq!(scale.pos(14), 0);
        assert_eq!(scale.pos(15), 1);
        assert_eq!(scale.pos(u64::MAX), 1);
    }

    #[test]
    fn test_integer_remainder_goes_to_last_bucket() {
        let scale = Linear::new(0i32, 10, 3).unwrap();
        assert_eq!(scale.delimiters(), &[3, 6]);
        assert_eq!(scale.pos(9), 2);
    }

    #[test]
    fn test_signed_full_range() {
        let scale = Linear::new(i64::MIN, i64::MAX, 4).unwrap();
        assert_eq!(scale.delimiters(), &[-(1i64 << 62), 0, 1i64 << 62]);
        assert_eq!(scale.pos(i64::MIN), 0);
        assert_eq!(scale.pos(-(1i64 << 62)), 1);
        assert_eq!(scale.pos(-1), 1);
        assert_eq!(scale.pos(0), 2);
        assert_eq!(scale.pos(1i64 << 62), 3);
        assert_eq!(scale.pos(i64::MAX - 1), 3);
        assert_eq!(scale.pos(i64::MAX), 3);
    }

    #[test]
    fn test_signed_negative_low_properties() {
        let scale = Linear::new(-100i32, i32::MAX, 4).unwrap();
        assert_eq!(scale.width(), 536_870_936);
        let samples = [
            i32::MIN,
            -101,
            -100,
            -99,
            0,
            536_870_835,
            536_870_836,
            1_610_612_708,
            i32::MAX - 1,
            i32::MAX,
        ];
        assert_scale_properties(&scale, &samples);
        assert_eq!(scale.pos(536_870_835), 0);
        assert_eq!(scale.pos(536_870_836), 1);
        assert_eq!(scale.pos(1_610_612_708), 3);
        assert_eq!(scale.pos(i32::MAX), 3);
    }

    #[test]
    fn test_properties() {
        let scale = Linear::new(0.0f32, 1.0, 10).unwrap();
        let samples: Vec<f32> = (-20..40).map(|i| i as f32 * 0.05).collect();
        assert_scale_properties(&scale, &samples);
    }
}
