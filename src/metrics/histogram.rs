//! Bucketed histogram over a [`Scale`].
//!
//! A [`Histogram`] owns one scale and `scale.n()` cache-padded bucket
//! counters. Recording is a single `pos` evaluation followed by one relaxed
//! `fetch_add` on the selected bucket:
//!
//! ```text
//!   record(v) ──► scale.pos(v) = i ──► buckets[i].fetch_add(1)
//!
//!   buckets:  [0] ████  [1] ██  [2] █  ...  [n-1] ███
//!                   │
//!                   ▼
//!   render:   name_bucket{le="d[0]"} 4 ... name_bucket{le="+Inf"} 3
//!             name_count 10
//! ```
//!
//! # Bucket Lines
//!
//! By default each `le` line carries the count of that bucket alone
//! ([`BucketMode::PerBucket`]), which is what existing scrapers of this
//! format read. [`BucketMode::Cumulative`] emits the running sum instead, as
//! standard Prometheus histograms do.
//!
//! # Extremes
//!
//! With the `extremes` feature the histogram also tracks the smallest and
//! largest value ever recorded, for diagnostics. They are shown by
//! `Display` and never rendered into the exposition text.

use std::fmt::{self, Debug, Display};
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

use crate::metrics::{Descriptor, Metric, MetricKind, MetricValue};
use crate::scales::Scale;
#[cfg(feature = "extremes")]
use crate::value::Value;

/// How bucket lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BucketMode {
    /// Each `le` line holds its own bucket's count.
    #[default]
    PerBucket,
    /// Each `le` line holds the sum of all buckets up to and including it.
    Cumulative,
}

/// A histogram with one atomic counter per bucket of `S`.
///
/// # Examples
///
/// ```rust
/// use misure::scales::Linear;
/// use misure::{Histogram, Metric};
///
/// let latency = Histogram::new("latency_ms", "", Linear::new(0.0, 10.0, 5).unwrap());
/// for v in [0.0, 1.9, 2.0, 5.5, 9.9, 10.0, 100.0] {
///     latency.record(v);
/// }
/// assert_eq!(latency.snapshot(), vec![2, 1, 1, 0, 3]);
///
/// let mut body = String::new();
/// latency.to_prometheus(&mut body);
/// assert!(body.ends_with("latency_ms_bucket{le=\"+Inf\"} 3\nlatency_ms_count 7\n"));
/// ```
pub struct Histogram<S: Scale> {
    descriptor: Descriptor,
    scale: S,
    buckets: Box<[CachePadded<AtomicU64>]>,
    mode: BucketMode,
    #[cfg(feature = "extremes")]
    min: <S::Value as Value>::Cell,
    #[cfg(feature = "extremes")]
    max: <S::Value as Value>::Cell,
}

impl<S: Scale> Histogram<S> {
    /// Creates a histogram with all buckets at zero.
    pub fn new(name: impl Into<String>, help: impl Into<String>, scale: S) -> Self {
        let n = scale.n();
        let buckets = (0..n)
            .map(|_| CachePadded::new(AtomicU64::new(0)))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        let descriptor = Descriptor::new(name, help);
        tracing::debug!(name = descriptor.name(), n, scale_type = %scale.scale_type(), "histogram created");
        Self {
            descriptor,
            scale,
            buckets,
            mode: BucketMode::default(),
            #[cfg(feature = "extremes")]
            min: <S::Value as num_traits::Bounded>::max_value().new_cell(),
            #[cfg(feature = "extremes")]
            max: <S::Value as num_traits::Bounded>::min_value().new_cell(),
        }
    }

    /// Sets the label fragment, returning `self` for chaining.
    pub fn with_labels(self, labels: impl Into<String>) -> Self {
        Self {
            descriptor: self.descriptor.with_labels(labels),
            ..self
        }
    }

    /// Selects per-bucket or cumulative bucket lines.
    pub fn with_bucket_mode(self, mode: BucketMode) -> Self {
        Self { mode, ..self }
    }

    /// Records one sample.
    #[inline]
    pub fn record(&self, value: S::Value) {
        self.record_many(value, 1);
    }

    /// Records `count` samples of the same value.
    #[inline]
    pub fn record_many(&self, value: S::Value, count: u64) {
        let i = self.scale.pos(value);
        self.buckets[i].fetch_add(count, Ordering::Relaxed);
        #[cfg(feature = "extremes")]
        self.update_extremes(value);
    }

    /// The bucket `value` would be recorded in.
    #[inline]
    pub fn pos(&self, value: S::Value) -> usize {
        self.scale.pos(value)
    }

    /// Reads bucket `i`, or `None` if `i >= size()`.
    #[inline]
    pub fn bucket_load(&self, i: usize) -> Option<u64> {
        self.buckets.get(i).map(|b| b.load(Ordering::Relaxed))
    }

    /// Reads every bucket in index order.
    ///
    /// Each read is atomic, the vector as a whole is not: under concurrent
    /// writers it need not match any single point in time.
    pub fn snapshot(&self) -> Vec<u64> {
        self.buckets
            .iter()
            .map(|b| b.load(Ordering::Relaxed))
            .collect()
    }

    /// Sum of all buckets.
    pub fn count(&self) -> u64 {
        self.buckets.iter().map(|b| b.load(Ordering::Relaxed)).sum()
    }

    /// The scale samples are bucketed with.
    pub fn scale(&self) -> &S {
        &self.scale
    }

    /// Number of buckets.
    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    /// Lower bound of the scale's normal range.
    pub fn low(&self) -> S::Value {
        self.scale.low()
    }

    /// Upper bound of the scale's normal range.
    pub fn high(&self) -> S::Value {
        self.scale.high()
    }

    /// The bucket line mode.
    pub fn bucket_mode(&self) -> BucketMode {
        self.mode
    }

    /// Smallest value recorded so far.
    #[cfg(feature = "extremes")]
    pub fn min(&self) -> Option<S::Value> {
        self.extremes().map(|(min, _)| min)
    }

    /// Largest value recorded so far.
    #[cfg(feature = "extremes")]
    pub fn max(&self) -> Option<S::Value> {
        self.extremes().map(|(_, max)| max)
    }

    #[cfg(feature = "extremes")]
    fn extremes(&self) -> Option<(S::Value, S::Value)> {
        let min = <S::Value as Value>::load(&self.min, Ordering::Relaxed);
        let max = <S::Value as Value>::load(&self.max, Ordering::Relaxed);
        (min <= max).then_some((min, max))
    }

    #[cfg(feature = "extremes")]
    #[inline]
    fn update_extremes(&self, value: S::Value) {
        update_if::<S::Value>(&self.min, value, |v, current| v < current);
        update_if::<S::Value>(&self.max, value, |v, current| v > current);
    }
}

/// Stores `value` while `better(value, current)` holds, retrying on contention.
#[cfg(feature = "extremes")]
#[inline]
fn update_if<T: Value>(cell: &T::Cell, value: T, better: impl Fn(T, T) -> bool) {
    use atomic_traits::Atomic;

    let mut current = cell.load(Ordering::Relaxed);
    while better(value, T::from_bits(current)) {
        match cell.compare_exchange_weak(current, value.to_bits(), Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return,
            Err(actual) => current = actual,
        }
    }
}

impl<S: Scale> Metric for Histogram<S> {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Histogram
    }

    fn value(&self) -> MetricValue {
        MetricValue::Histogram(self.snapshot())
    }

    fn to_prometheus(&self, out: &mut String) {
        self.descriptor.write_header(MetricKind::Histogram, out);
        let mut total = 0u64;
        for (i, bucket) in self.buckets.iter().enumerate() {
            let n = bucket.load(Ordering::Relaxed);
            total += n;
            let shown = match self.mode {
                BucketMode::PerBucket => n,
                BucketMode::Cumulative => total,
            };
            self.descriptor
                .write_bucket(&self.scale.delimiter_label(i), shown, out);
        }
        self.descriptor.write_sample("_count", total, out);
    }
}

impl<S: Scale + Display> Display for Histogram<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.descriptor.name(), self.scale)?;
        #[cfg(feature = "extremes")]
        {
            if let Some((min, max)) = self.extremes() {
                write!(f, ", observed: [{min}, {max}]")?;
            }
        }
        Ok(())
    }
}

impl<S: Scale> Debug for Histogram<S> {
    /// Output format: `name{ [bucket]:count ... }`, non-empty buckets only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.descriptor.name())?;
        for (i, bucket) in self.buckets.iter().enumerate() {
            let n = bucket.load(Ordering::Relaxed);
            if n != 0 {
                write!(f, " [{i}]:{n}")?;
            }
        }
        write!(f, " }}")
    }
}
