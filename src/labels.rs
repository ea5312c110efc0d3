//! Builder for the label fragment stored in a metric's descriptor.
//!
//! Metrics keep their labels as one pre-formatted string such as
//! `method="GET",code="200"`, so rendering never formats key/value pairs on
//! the scrape path. [`Labels`] produces that string with values escaped the
//! way the exposition format expects.
//!
//! # Example
//!
//! ```rust
//! use misure::{Counter, Labels};
//!
//! let counter = Counter::new("http_requests", "").with_labels(
//!     Labels::new()
//!         .with_label("method", "GET")
//!         .with_label("path", "/api/users"),
//! );
//! counter.increment();
//! assert_eq!(counter.to_string(), "http_requests{method=\"GET\",path=\"/api/users\"} 1");
//! ```

use std::fmt::{self, Display};

/// An ordered set of label pairs.
///
/// Keys keep their insertion order. Setting an existing key replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    pairs: Vec<(String, String)>,
}

impl Labels {
    /// Creates an empty label set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label, or updates it if the key already exists.
    ///
    /// # Example
    ///
    /// ```rust
    /// use misure::Labels;
    ///
    /// let labels = Labels::new()
    ///     .with_label("region", "us-east-1")
    ///     .with_label("region", "eu-west-1");
    /// assert_eq!(labels.get("region"), Some("eu-west-1"));
    /// assert_eq!(labels.len(), 1);
    /// ```
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Adds or updates a label in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        if let Some(pos) = self.pairs.iter().position(|(k, _)| k == &key) {
            self.pairs[pos].1 = value;
        } else {
            self.pairs.push((key, value));
        }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no labels.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Display for Labels {
    /// Writes `k1="v1",k2="v2"` with `\`, `"` and newlines escaped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}=\"")?;
            for c in value.chars() {
                match c {
                    '\\' => f.write_str("\\\\")?,
                    '"' => f.write_str("\\\"")?,
                    '\n' => f.write_str("\\n")?,
                    c => write!(f, "{c}")?,
                }
            }
            f.write_str("\"")?;
        }
        Ok(())
    }
}

impl From<Labels> for String {
    fn from(labels: Labels) -> Self {
        labels.to_string()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut labels = Labels::new();
        for (k, v) in iter {
            labels.set(k, v);
        }
        labels
    }
}
