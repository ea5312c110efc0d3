//! # Misure - Lock-Free Counters, Gauges and Histograms
//!
//! A Rust library of metric primitives meant to be updated on every request
//! of a server by any number of threads, and rendered periodically into the
//! Prometheus text exposition format for scraping.
//!
//! ## The Problem
//!
//! A latency histogram sits on the hot path it is measuring. Each sample has
//! to be assigned to a bucket and counted without locks, without allocating,
//! and without a call to `ln` dominating the cost of the request. Samples
//! far outside the expected range must still be counted, never rejected.
//!
//! ## The Solution
//!
//! 1. **Scales**: a [`Scale`](scales::Scale) maps a sample to a bucket index
//!    in `[0, n)`, clamping out-of-range values to the first or last bucket.
//!    [`RoughLogarithmic`](scales::RoughLogarithmic) computes a base 2 or 8
//!    logarithm by reading the IEEE-754 exponent bits of the sample (see
//!    [`log2`]).
//!
//! 2. **Atomics only**: counters, gauges and histogram buckets are
//!    cache-line padded atomics updated with `Ordering::Relaxed`. Integral
//!    gauges use hardware `fetch_add`; floating gauges use a
//!    compare-and-swap loop over the bit pattern.
//!
//! 3. **Self-rendering metrics**: every metric appends its own exposition to
//!    a `String` through [`Metric::to_prometheus`], so a scrape handler only
//!    concatenates.
//!
//! ## Available Types
//!
//! | Type | Description | Use Case |
//! |------|-------------|----------|
//! | [`Counter`] | Monotone `u64` with push-and-reset delta | Request totals, delta reporting |
//! | [`Gauge<T>`](Gauge) | Integral or floating value, add/sub/mul/div/set | Queue depth, temperature |
//! | [`Histogram<S>`](Histogram) | One atomic bucket per bucket of scale `S` | Latency and size distributions |
//! | [`Fixed`](scales::Fixed) | Explicit delimiter list | SLO thresholds |
//! | [`Linear`](scales::Linear) | Equal-width buckets | Bounded ratios |
//! | [`Logarithmic`](scales::Logarithmic) | Geometric buckets, exact | Wide ranges, any base |
//! | [`RoughLogarithmic`](scales::RoughLogarithmic) | Geometric buckets, exponent bits | Wide ranges on the hot path |
//!
//! ## Quick Start
//!
//! ```rust
//! use misure::scales::RoughLogarithmic;
//! use misure::observers::prometheus::PrometheusObserver;
//! use misure::{Counter, Histogram, Labels, Metric};
//!
//! let requests = Counter::new("requests_total", "Requests served")
//!     .with_labels(Labels::new().with_label("service", "api"));
//! let latency = Histogram::new(
//!     "latency_us",
//!     "Request latency",
//!     RoughLogarithmic::new(2.0, 0.0, 65_536.0, 16)?,
//! );
//!
//! // On the request path, from any thread.
//! requests.increment();
//! latency.record(730.0);
//!
//! // On the scrape path.
//! let metrics: Vec<&dyn Metric> = vec![&requests, &latency];
//! let body = PrometheusObserver::new().render(metrics.into_iter());
//! assert!(body.contains("requests_total{service=\"api\"} 1\n"));
//! assert!(body.contains("latency_us_bucket{le=\"1024\"} 1\n"));
//! # Ok::<(), misure::ScaleError>(())
//! ```
//!
//! ## Thread Safety
//!
//! All metric types are `Send + Sync` and are shared with `Arc` or kept in
//! statics. Each atomic is linearizable on its own; nothing is consistent
//! across fields, so a render overlapping with writers reflects some recent
//! state per bucket rather than a frozen snapshot.
//!
//! ## Features
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `serde` | [`snapshot`] types, `Serialize`/`Deserialize` on [`ScaleConfig`](scales::ScaleConfig) and value types |
//! | `json` | [`observers::json`] |
//! | `extremes` | Running min/max tracking in [`Histogram`] |
//! | `full` | All of the above |
//!
//! ## Logging
//!
//! The crate emits `tracing` events when scales and histograms are built,
//! when a [`ScaleConfig`](scales::ScaleConfig) is rejected, and when an
//! unnamed metric reaches the Prometheus observer. Nothing is logged on the
//! recording path. No subscriber is installed.

mod error;
pub mod labels;
pub mod log2;
pub mod metrics;
pub mod observers;
pub mod scales;
pub mod value;

#[cfg(feature = "serde")]
pub mod snapshot;

pub use error::{Result, ScaleError};
pub use labels::Labels;
pub use metrics::{
    BucketMode, Counter, Descriptor, Gauge, Histogram, Metric, MetricKind, MetricValue,
};
pub use value::Value;
