//! Closed sum over the scale variants and the parameters that build them.

use std::fmt::{self, Display};

use crate::error::Result;
use crate::scales::{Fixed, Linear, Logarithmic, RoughLogarithmic, Scale, ScaleType};
use crate::value::Value;

/// Any of the four scale variants.
///
/// Use this when the bucket layout is chosen at run time, e.g. from a
/// [`ScaleConfig`]. When the variant is known statically, a
/// [`Histogram`](crate::metrics::histogram::Histogram) over the concrete
/// type avoids the `match` in `pos`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyScale<T> {
    /// See [`Fixed`].
    Fixed(Fixed<T>),
    /// See [`Linear`].
    Linear(Linear<T>),
    /// See [`Logarithmic`].
    Logarithmic(Logarithmic<T>),
    /// See [`RoughLogarithmic`].
    RoughLogarithmic(RoughLogarithmic<T>),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            AnyScale::Fixed($s) => $body,
            AnyScale::Linear($s) => $body,
            AnyScale::Logarithmic($s) => $body,
            AnyScale::RoughLogarithmic($s) => $body,
        }
    };
}

impl<T: Value> Scale for AnyScale<T> {
    type Value = T;

    fn scale_type(&self) -> ScaleType {
        dispatch!(self, s => s.scale_type())
    }

    fn low(&self) -> T {
        dispatch!(self, s => s.low())
    }

    fn high(&self) -> T {
        dispatch!(self, s => s.high())
    }

    fn delimiters(&self) -> &[T] {
        dispatch!(self, s => s.delimiters())
    }

    #[inline]
    fn pos(&self, value: T) -> usize {
        dispatch!(self, s => s.pos(value))
    }
}

impl<T: Value> Display for AnyScale<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, s => Display::fmt(s, f))
    }
}

impl<T> From<Fixed<T>> for AnyScale<T> {
    fn from(s: Fixed<T>) -> Self {
        AnyScale::Fixed(s)
    }
}

impl<T> From<Linear<T>> for AnyScale<T> {
    fn from(s: Linear<T>) -> Self {
        AnyScale::Linear(s)
    }
}

impl<T> From<Logarithmic<T>> for AnyScale<T> {
    fn from(s: Logarithmic<T>) -> Self {
        AnyScale::Logarithmic(s)
    }
}

impl<T> From<RoughLogarithmic<T>> for AnyScale<T> {
    fn from(s: RoughLogarithmic<T>) -> Self {
        AnyScale::RoughLogarithmic(s)
    }
}

/// Construction parameters for a scale.
///
/// With the `serde` feature this is (de)serialisable, tagged by `type`:
///
/// ```json
/// { "type": "rough-logarithmic", "base": 2.0, "low": 0.0, "high": 1024.0, "n": 10 }
/// ```
///
/// # Examples
///
/// ```rust
/// use misure::scales::{Scale, ScaleConfig, ScaleType};
///
/// let config = ScaleConfig::Linear { low: 0.0, high: 1.0, n: 4 };
/// let scale = config.build().unwrap();
/// assert_eq!(scale.scale_type(), ScaleType::Linear);
/// assert_eq!(scale.n(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case"))]
pub enum ScaleConfig<T> {
    /// Explicit delimiters; `n` is `delimiters.len() + 1`.
    Fixed {
        /// Lower bound of the normal range.
        low: T,
        /// Upper bound of the normal range.
        high: T,
        /// Ascending bucket delimiters.
        delimiters: Vec<T>,
    },
    /// `n` equal-width buckets over `[low, high)`.
    Linear {
        /// Lower bound of the normal range.
        low: T,
        /// Upper bound of the normal range.
        high: T,
        /// Bucket count.
        n: usize,
    },
    /// `n` geometric buckets, exact logarithm.
    Logarithmic {
        /// Ratio between consecutive bucket widths, `> 1`.
        base: T,
        /// Lower bound of the normal range.
        low: T,
        /// Upper bound of the normal range.
        high: T,
        /// Bucket count.
        n: usize,
    },
    /// `n` geometric buckets, logarithm from the exponent bits.
    RoughLogarithmic {
        /// 2 or 8.
        base: T,
        /// Lower bound of the normal range.
        low: T,
        /// Upper bound of the normal range.
        high: T,
        /// Bucket count.
        n: usize,
    },
}

impl<T: Value> ScaleConfig<T> {
    /// The variant this configuration builds.
    pub fn scale_type(&self) -> ScaleType {
        match self {
            ScaleConfig::Fixed { .. } => ScaleType::Fixed,
            ScaleConfig::Linear { .. } => ScaleType::Linear,
            ScaleConfig::Logarithmic { .. } => ScaleType::Logarithmic,
            ScaleConfig::RoughLogarithmic { .. } => ScaleType::RoughLogarithmic,
        }
    }

    /// Builds the scale.
    ///
    /// # Errors
    ///
    /// Returns the variant's construction error.
    pub fn build(self) -> Result<AnyScale<T>> {
        let scale_type = self.scale_type();
        let built = match self {
            ScaleConfig::Fixed {
                low,
                high,
                delimiters,
            } => Fixed::new(low, high, delimiters).map(AnyScale::from),
            ScaleConfig::Linear { low, high, n } => Linear::new(low, high, n).map(AnyScale::from),
            ScaleConfig::Logarithmic { base, low, high, n } => {
                Logarithmic::new(base, low, high, n).map(AnyScale::from)
            }
            ScaleConfig::RoughLogarithmic { base, low, high, n } => {
                RoughLogarithmic::new(base, low, high, n).map(AnyScale::from)
            }
        };
        if let Err(err) = &built {
            tracing::warn!(%scale_type, %err, "scale configuration rejected");
        }
        built
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaleError;

    #[test]
    fn test_build_every_variant() {
        let configs = vec![
            ScaleConfig::Fixed {
                low: 0.0,
                high: 10.0,
                delimiters: vec![1.0, 5.0],
            },
            ScaleConfig::Linear {
                low: 0.0,
                high: 10.0,
                n: 5,
            },
            ScaleConfig::Logarithmic {
                base: 10.0,
                low: 0.0,
                high: 1000.0,
                n: 4,
            },
            ScaleConfig::RoughLogarithmic {
                base: 8.0,
                low: 0.0,
                high: 4096.0,
                n: 4,
            },
        ];

        let expected = [
            (ScaleType::Fixed, 3),
            (ScaleType::Linear, 5),
            (ScaleType::Logarithmic, 4),
            (ScaleType::RoughLogarithmic, 4),
        ];

        for (config, (scale_type, n)) in configs.into_iter().zip(expected) {
            assert_eq!(config.scale_type(), scale_type);
            let scale = config.build().unwrap();
            assert_eq!(scale.scale_type(), scale_type);
            assert_eq!(scale.n(), n);
            assert_eq!(scale.pos(-1.0), 0);
            assert_eq!(scale.pos(1e12), n - 1);
        }
    }

    #[test]
    fn test_build_error() {
        let config = ScaleConfig::RoughLogarithmic {
            base: 3u64,
            low: 0,
            high: 100,
            n: 4,
        };
        assert_eq!(config.build(), Err(ScaleError::InvalidBase { base: 3.0 }));
    }

    #[test]
    fn test_dispatch_matches_inner() {
        let inner = Linear::new(0u32, 100, 10).unwrap();
        let any = AnyScale::from(inner.clone());
        for v in [0, 9, 10, 55, 99, 100, 1000] {
            assert_eq!(any.pos(v), inner.pos(v));
        }
        assert_eq!(any.delimiters(), inner.delimiters());
        assert_eq!(any.low(), 0);
        assert_eq!(any.high(), 100);
        assert_eq!(any.to_string(), inner.to_string());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_config() {
        let json = r#"{"type":"rough-logarithmic","base":2.0,"low":0.0,"high":1024.0,"n":10}"#;
        let config: ScaleConfig<f64> = serde_json::from_str(json).unwrap();
        assert_eq!(
            config,
            ScaleConfig::RoughLogarithmic {
                base: 2.0,
                low: 0.0,
                high: 1024.0,
                n: 10
            }
        );

        let json = r#"{"type":"fixed","low":0,"high":100,"delimiters":[1,10]}"#;
        let config: ScaleConfig<u64> = serde_json::from_str(json).unwrap();
        assert_eq!(config.build().unwrap().n(), 3);
    }
}
