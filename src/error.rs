//! Error type for scale construction.
//!
//! Recording, loading and rendering never fail. The only fallible step in
//! the crate is building a [`Scale`](crate::scales::Scale) from parameters
//! that violate its preconditions, and every such violation is reported
//! through [`ScaleError`] before any part of the scale becomes observable.
//!
//! # Example
//!
//! ```rust
//! use misure::scales::Linear;
//! use misure::ScaleError;
//!
//! let err = Linear::<f64>::new(10.0, 10.0, 4).unwrap_err();
//! assert!(matches!(err, ScaleError::EmptyRange { .. }));
//! ```

use thiserror::Error;

/// Precondition violations detected while building a scale.
///
/// Bounds and bases are carried as `f64` so the same error type serves
/// every value type a scale can be instantiated with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    /// A scale needs at least one internal delimiter, so at least 2 buckets.
    #[error("scale needs at least 2 buckets, got {n}")]
    TooFewBuckets {
        /// The requested bucket count.
        n: usize,
    },

    /// The bucket width computed from `low`, `high` and `n` is not positive.
    #[error("empty range: low {low} is not below high {high} with a positive bucket width")]
    EmptyRange {
        /// Lower bound of the normal range.
        low: f64,
        /// Upper bound of the normal range.
        high: f64,
    },

    /// The base is unusable for the requested logarithmic variant.
    #[error("invalid logarithmic base {base}")]
    InvalidBase {
        /// The rejected base.
        base: f64,
    },

    /// Explicit delimiters must be strictly ascending.
    #[error("delimiters are not strictly ascending at index {index}")]
    UnsortedDelimiters {
        /// Index of the first delimiter that is not above its predecessor.
        index: usize,
    },

    /// The smallest logarithmic delimiter collapsed onto `low`.
    #[error("first delimiter {first} does not lie above low {low}")]
    NonPositiveFirstDelimiter {
        /// The computed first delimiter.
        first: f64,
        /// Lower bound of the normal range.
        low: f64,
    },
}

/// Result type for scale construction.
pub type Result<T> = std::result::Result<T, ScaleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScaleError::TooFewBuckets { n: 1 };
        assert_eq!(format!("{}", err), "scale needs at least 2 buckets, got 1");

        let err = ScaleError::InvalidBase { base: 3.0 };
        assert_eq!(format!("{}", err), "invalid logarithmic base 3");

        let err = ScaleError::UnsortedDelimiters { index: 2 };
        assert_eq!(
            format!("{}", err),
            "delimiters are not strictly ascending at index 2"
        );
    }
}
