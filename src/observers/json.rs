//! JSON observer for serializing metric values.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! misure = { version = "0.1", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use misure::observers::json::JsonObserver;
//! use misure::{Counter, Metric};
//!
//! let requests = Counter::new("http_requests", "");
//! let errors = Counter::new("http_errors", "");
//! requests.increment_by(1000);
//! errors.increment_by(5);
//!
//! let metrics: Vec<&dyn Metric> = vec![&requests, &errors];
//! let json = JsonObserver::new().to_json(metrics.into_iter()).unwrap();
//! assert_eq!(
//!     json,
//!     r#"[{"name":"http_requests","value":{"kind":"counter","value":1000}},{"name":"http_errors","value":{"kind":"counter","value":5}}]"#
//! );
//! ```

use crate::metrics::Metric;
use crate::snapshot::{MetricSnapshot, MetricsSnapshot};

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to include a timestamp in the output.
    pub include_timestamp: bool,
    /// Whether to wrap metrics in a [`MetricsSnapshot`] object.
    pub wrap_in_snapshot: bool,
}

/// An observer that serializes metric values to JSON.
///
/// Without wrapping the output is an array of [`MetricSnapshot`]; with
/// [`wrap_in_snapshot`](Self::wrap_in_snapshot) it is a [`MetricsSnapshot`]
/// object, optionally timestamped.
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    /// Creates a new JSON observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JSON observer with the specified configuration.
    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables timestamp inclusion.
    ///
    /// Only has effect when `wrap_in_snapshot` is also enabled.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    /// Enables or disables wrapping the output in a [`MetricsSnapshot`].
    pub fn wrap_in_snapshot(mut self, enabled: bool) -> Self {
        self.config.wrap_in_snapshot = enabled;
        self
    }

    /// Reads every metric into a [`MetricSnapshot`].
    pub fn collect<'a>(&self, metrics: impl Iterator<Item = &'a dyn Metric>) -> Vec<MetricSnapshot> {
        metrics.map(MetricSnapshot::from_metric).collect()
    }

    /// Serializes metrics to a JSON string.
    pub fn to_json<'a>(
        &self,
        metrics: impl Iterator<Item = &'a dyn Metric>,
    ) -> Result<String, serde_json::Error> {
        let snapshots = self.collect(metrics);

        match (self.config.wrap_in_snapshot, self.config.pretty) {
            (true, true) => serde_json::to_string_pretty(&self.wrap(snapshots)),
            (true, false) => serde_json::to_string(&self.wrap(snapshots)),
            (false, true) => serde_json::to_string_pretty(&snapshots),
            (false, false) => serde_json::to_string(&snapshots),
        }
    }

    /// Serializes metrics to a JSON byte vector.
    pub fn to_json_bytes<'a>(
        &self,
        metrics: impl Iterator<Item = &'a dyn Metric>,
    ) -> Result<Vec<u8>, serde_json::Error> {
        let snapshots = self.collect(metrics);

        if self.config.wrap_in_snapshot {
            serde_json::to_vec(&self.wrap(snapshots))
        } else {
            serde_json::to_vec(&snapshots)
        }
    }

    fn wrap(&self, snapshots: Vec<MetricSnapshot>) -> MetricsSnapshot {
        if self.config.include_timestamp {
            MetricsSnapshot::with_timestamp(snapshots, current_timestamp_ms())
        } else {
            MetricsSnapshot::new(snapshots)
        }
    }
}

/// Returns the current timestamp in milliseconds since Unix epoch.
fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
