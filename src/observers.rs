//! Observers that export a set of metrics in one go.
//!
//! - [`prometheus`] - Concatenate the text exposition of many metrics
//! - [`json`] - Serialize metric values to JSON (feature `json`)
//!
//! # Example
//!
//! ```rust
//! use misure::observers::prometheus::PrometheusObserver;
//! use misure::{Counter, Metric};
//!
//! let requests = Counter::new("requests", "");
//! requests.increment();
//!
//! let metrics: [&dyn Metric; 1] = [&requests];
//! let body = PrometheusObserver::new().render(metrics.into_iter());
//! assert!(body.ends_with("requests 1\n"));
//! ```

pub mod prometheus;

#[cfg(feature = "json")]
pub mod json;
