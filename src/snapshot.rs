//! Snapshot types for serializing metric state.
//!
//! # Feature Flag
//!
//! This module requires the `serde` feature:
//!
//! ```toml
//! [dependencies]
//! misure = { version = "0.1", features = ["serde"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use misure::snapshot::MetricSnapshot;
//! use misure::Counter;
//!
//! let counter = Counter::new("requests", "");
//! counter.increment_by(42);
//!
//! let snapshot = MetricSnapshot::from_metric(&counter);
//! let json = serde_json::to_string(&snapshot).unwrap();
//! assert_eq!(json, r#"{"name":"requests","value":{"kind":"counter","value":42}}"#);
//! ```

use serde::{Deserialize, Serialize};

use crate::metrics::{Metric, MetricKind, MetricValue};

/// A point-in-time copy of one metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSnapshot {
    /// The metric name, `(unnamed)` if it had none.
    pub name: String,
    /// The label fragment.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub labels: String,
    /// The value read.
    pub value: MetricValue,
}

impl MetricSnapshot {
    /// Creates a snapshot without labels.
    pub fn new(name: impl Into<String>, value: MetricValue) -> Self {
        Self {
            name: name.into(),
            labels: String::new(),
            value,
        }
    }

    /// Reads `metric`.
    pub fn from_metric(metric: &dyn Metric) -> Self {
        Self {
            name: if metric.name().is_empty() {
                "(unnamed)".to_string()
            } else {
                metric.name().to_string()
            },
            labels: metric.labels().to_string(),
            value: metric.value(),
        }
    }

    /// The kind of metric the snapshot was taken from.
    pub fn kind(&self) -> MetricKind {
        self.value.kind()
    }
}

/// A collection of metric snapshots taken together.
///
/// # Examples
///
/// ```rust
/// use misure::snapshot::{MetricSnapshot, MetricsSnapshot};
/// use misure::MetricValue;
///
/// let snapshot = MetricsSnapshot::with_timestamp(
///     vec![
///         MetricSnapshot::new("requests", MetricValue::Counter(1000)),
///         MetricSnapshot::new("load", MetricValue::Gauge(0.5)),
///     ],
///     1_700_000_000_000,
/// );
/// assert_eq!(snapshot.get("load").map(|m| &m.value), Some(&MetricValue::Gauge(0.5)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    /// Optional timestamp in milliseconds since Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// The metric snapshots.
    pub metrics: Vec<MetricSnapshot>,
}

impl MetricsSnapshot {
    /// Creates a snapshot collection without a timestamp.
    pub fn new(metrics: Vec<MetricSnapshot>) -> Self {
        Self {
            timestamp_ms: None,
            metrics,
        }
    }

    /// Creates a snapshot collection with a timestamp.
    pub fn with_timestamp(metrics: Vec<MetricSnapshot>, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            metrics,
        }
    }

    /// Finds the first snapshot named `name`.
    pub fn get(&self, name: &str) -> Option<&MetricSnapshot> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Reads every metric of the iterator.
    pub fn collect<'a>(metrics: impl Iterator<Item = &'a dyn Metric>) -> Self {
        Self::new(metrics.map(MetricSnapshot::from_metric).collect())
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Returns `true` if there are no snapshots.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Counter, Gauge, Histogram};
    use crate::scales::Fixed;

    #[test]
    fn test_from_metric() {
        let gauge = Gauge::<i64>::new("g", "").with_labels("a=\"b\"").with_value(-3);
        let snapshot = MetricSnapshot::from_metric(&gauge);
        assert_eq!(snapshot.name, "g");
        assert_eq!(snapshot.labels, "a=\"b\"");
        assert_eq!(snapshot.value, MetricValue::Gauge(-3.0));
        assert_eq!(snapshot.kind(), MetricKind::Gauge);
    }

    #[test]
    fn test_unnamed() {
        let counter = Counter::new("", "");
        assert_eq!(MetricSnapshot::from_metric(&counter).name, "(unnamed)");
    }

    #[test]
    fn test_collect() {
        let counter = Counter::new("c", "").with_value(2);
        let histogram = Histogram::new("h", "", Fixed::new(0u64, 10, [5]).unwrap());
        histogram.record(7);

        let metrics: Vec<&dyn Metric> = vec![&counter, &histogram];
        let snapshot = MetricsSnapshot::collect(metrics.into_iter());

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("c").unwrap().value, MetricValue::Counter(2));
        assert_eq!(
            snapshot.get("h").unwrap().value,
            MetricValue::Histogram(vec![0, 1])
        );
        assert!(snapshot.get("missing").is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let snapshot = MetricsSnapshot::with_timestamp(
            vec![
                MetricSnapshot::new("c", MetricValue::Counter(5)),
                MetricSnapshot::new("h", MetricValue::Histogram(vec![1, 2])),
            ],
            123,
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(
            json,
            r#"{"timestamp_ms":123,"metrics":[{"name":"c","value":{"kind":"counter","value":5}},{"name":"h","value":{"kind":"histogram","value":[1,2]}}]}"#
        );
        let back: MetricsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
