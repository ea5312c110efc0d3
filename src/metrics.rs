//! Metric primitives and the text exposition they render.
//!
//! Every metric owns a [`Descriptor`] (name, help and a pre-formatted label
//! fragment) and a set of atomics that application threads update without
//! locking. A scrape handler later asks each metric to append itself to a
//! response body through [`Metric::to_prometheus`].
//!
//! ```text
//!   request path                          scrape path
//!   ────────────                          ───────────
//!   counter.increment() ──┐
//!   gauge.add(1.5)      ──┼──► atomics ──► to_prometheus(&mut body)
//!   histogram.record(v) ──┘               (no lock, per-field consistent)
//! ```
//!
//! # Available Metric Types
//!
//! | Type | Storage | Update | Rendered as |
//! |------|---------|--------|-------------|
//! | [`Counter`] | two `AtomicU64` (total, delta since push) | `fetch_add` | `counter` |
//! | [`Gauge<T>`](Gauge) | one [`Value`](crate::value::Value) cell | `fetch_add` or CAS loop | `gauge` |
//! | [`Histogram<S>`](Histogram) | one `AtomicU64` per bucket of `S` | `fetch_add` | `histogram` |
//!
//! # Exposition Format
//!
//! ```text
//! \n#TYPE <name> <kind>\n
//! #HELP <name> <help>\n
//! <body>
//! ```
//!
//! The body is one `name{labels} value` line for counters and gauges. The
//! label block is omitted when there are no labels. Histograms emit one
//! `name_bucket{labels,le="bound"} count` line per bucket and a trailing
//! `name_count{labels} total` line.
//!
//! # Consistency
//!
//! Each atomic is linearizable on its own. Nothing is consistent across
//! fields: a render that overlaps with writers may see one bucket of a
//! histogram already incremented and another not yet, or a counter's total
//! ahead of its push delta.

pub mod counter;
pub mod gauge;
pub mod histogram;

pub use counter::Counter;
pub use gauge::Gauge;
pub use histogram::{BucketMode, Histogram};

use std::fmt::{self, Debug, Display, Write};

/// Which exposition type a metric renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MetricKind {
    /// Monotone total.
    Counter,
    /// Arbitrary-direction value.
    Gauge,
    /// Per-bucket sample counts.
    Histogram,
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        })
    }
}

/// The current value of a metric, independent of its concrete type.
///
/// # Examples
///
/// ```rust
/// use misure::MetricValue;
///
/// assert_eq!(MetricValue::Counter(3).to_string(), "3");
/// assert_eq!(MetricValue::Gauge(-1.5).to_string(), "-1.5");
/// assert_eq!(MetricValue::Histogram(vec![2, 0, 1]).to_string(), "[2, 0, 1]");
/// assert!(MetricValue::Histogram(vec![0, 0]).is_zero());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "value", rename_all = "lowercase")
)]
pub enum MetricValue {
    /// A counter total.
    Counter(u64),
    /// A gauge reading, widened to `f64`.
    Gauge(f64),
    /// Histogram bucket counts in index order.
    Histogram(Vec<u64>),
}

impl MetricValue {
    /// Returns `true` if the value is zero (every bucket, for histograms).
    pub fn is_zero(&self) -> bool {
        match self {
            MetricValue::Counter(v) => *v == 0,
            MetricValue::Gauge(v) => *v == 0.0,
            MetricValue::Histogram(buckets) => buckets.iter().all(|b| *b == 0),
        }
    }

    /// The kind of metric this value was read from.
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Counter(_) => MetricKind::Counter,
            MetricValue::Gauge(_) => MetricKind::Gauge,
            MetricValue::Histogram(_) => MetricKind::Histogram,
        }
    }
}

impl Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Counter(v) => write!(f, "{v}"),
            MetricValue::Gauge(v) => write!(f, "{v}"),
            MetricValue::Histogram(buckets) => {
                f.write_str("[")?;
                for (i, b) in buckets.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{b}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Name, help text and label fragment of a metric.
///
/// Fixed at construction. The label fragment is stored as given, e.g.
/// `method="GET",code="200"`; build one with [`Labels`](crate::Labels) to
/// get escaping, or pass a pre-formatted string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    name: String,
    help: String,
    labels: String,
}

impl Descriptor {
    /// Creates a descriptor without labels.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            labels: String::new(),
        }
    }

    /// Replaces the label fragment.
    pub fn with_labels(self, labels: impl Into<String>) -> Self {
        Self {
            labels: labels.into(),
            ..self
        }
    }

    /// The exposition name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help text, possibly empty.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The label fragment, possibly empty.
    pub fn labels(&self) -> &str {
        &self.labels
    }

    /// Appends the `#TYPE` / `#HELP` header.
    pub(crate) fn write_header(&self, kind: MetricKind, out: &mut String) {
        // fmt::Write for String is infallible.
        let _ = write!(
            out,
            "\n#TYPE {name} {kind}\n#HELP {name} {help}\n",
            name = self.name,
            help = self.help
        );
    }

    /// Appends `name{labels} value`, omitting the braces without labels.
    pub(crate) fn write_sample(&self, suffix: &str, value: impl Display, out: &mut String) {
        out.push_str(&self.name);
        out.push_str(suffix);
        if !self.labels.is_empty() {
            out.push('{');
            out.push_str(&self.labels);
            out.push('}');
        }
        let _ = writeln!(out, " {value}");
    }

    /// Appends `name_bucket{labels,le="bound"} value`.
    pub(crate) fn write_bucket(&self, le: &str, value: u64, out: &mut String) {
        out.push_str(&self.name);
        out.push_str("_bucket{");
        out.push_str(&self.labels);
        if !self.labels.is_empty() && !self.labels.ends_with(',') {
            out.push(',');
        }
        let _ = writeln!(out, "le=\"{le}\"}} {value}");
    }

    /// Formats `name{labels} value` for `Display` impls.
    pub(crate) fn fmt_sample(&self, f: &mut fmt::Formatter<'_>, value: impl Display) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.labels.is_empty() {
            write!(f, "{{{}}}", self.labels)?;
        }
        write!(f, " {value}")
    }
}

/// A metric that can be read and rendered without knowing its concrete type.
///
/// Implemented by [`Counter`], [`Gauge`] and [`Histogram`], so a scrape
/// handler can hold a heterogeneous `&[&dyn Metric]`.
///
/// # Examples
///
/// ```rust
/// use misure::{Counter, Gauge, Metric};
///
/// let requests = Counter::new("requests_total", "Requests served");
/// let load = Gauge::<f64>::new("load", "");
/// requests.increment();
/// load.set(0.75);
///
/// let metrics: [&dyn Metric; 2] = [&requests, &load];
/// let mut body = String::new();
/// for m in metrics {
///     m.to_prometheus(&mut body);
/// }
/// assert!(body.contains("requests_total 1\n"));
/// assert!(body.contains("load 0.75\n"));
/// ```
pub trait Metric: Debug + Send + Sync {
    /// Identity of the metric.
    fn descriptor(&self) -> &Descriptor;

    /// The exposition type.
    fn kind(&self) -> MetricKind;

    /// Reads the current value.
    fn value(&self) -> MetricValue;

    /// Appends the header and body of this metric to `out`.
    fn to_prometheus(&self, out: &mut String);

    /// The exposition name.
    fn name(&self) -> &str {
        self.descriptor().name()
    }

    /// The help text.
    fn help(&self) -> &str {
        self.descriptor().help()
    }

    /// The label fragment.
    fn labels(&self) -> &str {
        self.descriptor().labels()
    }
}

impl Display for dyn Metric + '_ {
    /// Formats the metric as `name:value`, or just `value` when unnamed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name().is_empty() {
            write!(f, "{}:{}", self.name(), self.value())
        } else {
            write!(f, "{}", self.value())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        let d = Descriptor::new("up", "Whether the target is up");
        let mut out = String::new();
        d.write_header(MetricKind::Gauge, &mut out);
        assert_eq!(out, "\n#TYPE up gauge\n#HELP up Whether the target is up\n");
    }

    #[test]
    fn test_sample_without_labels() {
        let d = Descriptor::new("up", "");
        let mut out = String::new();
        d.write_sample("", 1, &mut out);
        assert_eq!(out, "up 1\n");
    }

    #[test]
    fn test_sample_with_labels() {
        let d = Descriptor::new("rpc", "").with_labels("method=\"get\"");
        let mut out = String::new();
        d.write_sample("_count", 4, &mut out);
        assert_eq!(out, "rpc_count{method=\"get\"} 4\n");
    }

    #[test]
    fn test_bucket_separator() {
        let mut out = String::new();
        Descriptor::new("h", "").write_bucket("+Inf", 1, &mut out);
        Descriptor::new("h", "")
            .with_labels("a=\"1\"")
            .write_bucket("2", 0, &mut out);
        Descriptor::new("h", "")
            .with_labels("a=\"1\",")
            .write_bucket("4", 3, &mut out);
        assert_eq!(
            out,
            "h_bucket{le=\"+Inf\"} 1\nh_bucket{a=\"1\",le=\"2\"} 0\nh_bucket{a=\"1\",le=\"4\"} 3\n"
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MetricKind::Counter.to_string(), "counter");
        assert_eq!(MetricKind::Gauge.to_string(), "gauge");
        assert_eq!(MetricKind::Histogram.to_string(), "histogram");
        assert_eq!(MetricValue::Gauge(1.0).kind(), MetricKind::Gauge);
    }

    #[test]
    fn test_dyn_format() {
        let counter = Counter::new("test_counter", "");
        counter.increment();
        assert_eq!(format!("{}", &counter as &dyn Metric), "test_counter:1");

        let unnamed = Counter::new("", "").with_value(7);
        assert_eq!(format!("{}", &unnamed as &dyn Metric), "7");
    }
}
