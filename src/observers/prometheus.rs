//! Prometheus observer concatenating metric expositions into a scrape body.
//!
//! Each metric renders itself through [`Metric::to_prometheus`];
//! [`PrometheusObserver`] only walks a set of metrics and appends their
//! output, in iteration order, to one buffer that an HTTP layer can serve
//! verbatim.
//!
//! # Integration with Prometheus
//!
//! 1. Keep the metrics in long-lived storage (statics, `Arc`s, a registry)
//! 2. On each scrape call [`render`](PrometheusObserver::render) or
//!    [`render_bytes`](PrometheusObserver::render_bytes)
//! 3. Serve the result on the `/metrics` endpoint
//!
//! # Examples
//!
//! ```rust
//! use misure::observers::prometheus::PrometheusObserver;
//! use misure::{Counter, Gauge, Metric};
//!
//! let requests = Counter::new("http_requests_total", "Requests served");
//! let inflight = Gauge::<i64>::new("http_inflight", "");
//! requests.increment_by(100);
//! inflight.set(3);
//!
//! let metrics: Vec<&dyn Metric> = vec![&requests, &inflight];
//! let body = PrometheusObserver::new().render(metrics.into_iter());
//!
//! assert_eq!(
//!     body,
//!     "\n#TYPE http_requests_total counter\n#HELP http_requests_total Requests served\n\
//!      http_requests_total 100\n\
//!      \n#TYPE http_inflight gauge\n#HELP http_inflight \n\
//!      http_inflight 3\n"
//! );
//! ```

use crate::metrics::Metric;

/// Observer that renders metrics in the text exposition format.
///
/// Metrics with an empty name cannot be scraped; they are logged with
/// `tracing::warn!` and skipped unless [`keep_unnamed`](Self::keep_unnamed)
/// is set.
#[derive(Debug, Clone, Default)]
pub struct PrometheusObserver {
    keep_unnamed: bool,
}

impl PrometheusObserver {
    /// Creates an observer that skips unnamed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders unnamed metrics too instead of skipping them.
    pub fn keep_unnamed(mut self, enabled: bool) -> Self {
        self.keep_unnamed = enabled;
        self
    }

    /// Renders `metrics` into a new string.
    pub fn render<'a>(&self, metrics: impl Iterator<Item = &'a dyn Metric>) -> String {
        let mut out = String::new();
        self.render_into(metrics, &mut out);
        out
    }

    /// Appends the rendering of `metrics` to `out`.
    ///
    /// Lets a caller reuse one buffer across scrapes.
    pub fn render_into<'a>(&self, metrics: impl Iterator<Item = &'a dyn Metric>, out: &mut String) {
        for metric in metrics {
            if metric.name().is_empty() {
                tracing::warn!(
                    kind = %metric.kind(),
                    labels = metric.labels(),
                    skipped = !self.keep_unnamed,
                    "metric without a name"
                );
                if !self.keep_unnamed {
                    continue;
                }
            }
            metric.to_prometheus(out);
        }
    }

    /// Renders `metrics` to bytes (useful for HTTP responses).
    pub fn render_bytes<'a>(&self, metrics: impl Iterator<Item = &'a dyn Metric>) -> Vec<u8> {
        self.render(metrics).into_bytes()
    }
}
