//! Monotone counter with a push-and-reset delta.
//!
//! [`Counter`] keeps two independent atomics updated by every increment:
//!
//! ```text
//!   increment(n) ──┬──► total  (read by load(), rendered)
//!                  └──► delta  (swapped to zero by push())
//! ```
//!
//! `push` is a single `swap(0)`, so an increment racing with it lands either
//! in the returned delta or in the next one, never both and never neither.

use std::fmt::{self, Debug, Display};
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

use crate::metrics::{Descriptor, Metric, MetricKind, MetricValue};

/// A 64-bit monotone counter.
///
/// Both atomics are cache-line padded so that a scraper calling [`push`]
/// does not bounce the line that writers increment.
///
/// [`push`]: Counter::push
///
/// # Examples
///
/// ```rust
/// use misure::{Counter, Metric};
///
/// let counter = Counter::new("requests_total", "");
/// counter.increment();
/// counter.increment();
/// counter.increment();
///
/// let mut body = String::new();
/// counter.to_prometheus(&mut body);
/// assert_eq!(body, "\n#TYPE requests_total counter\n#HELP requests_total \nrequests_total 3\n");
/// ```
///
/// Delta reporting:
///
/// ```rust
/// use misure::Counter;
///
/// let counter = Counter::new("bytes_sent", "");
/// counter.increment_by(100);
/// assert_eq!(counter.push(), 100);
/// counter.increment_by(20);
/// assert_eq!(counter.push(), 20);
/// assert_eq!(counter.push(), 0);
/// assert_eq!(counter.load(), 120);
/// ```
pub struct Counter {
    descriptor: Descriptor,
    total: CachePadded<AtomicU64>,
    delta: CachePadded<AtomicU64>,
}

impl Counter {
    /// Creates a counter at zero.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            descriptor: Descriptor::new(name, help),
            total: CachePadded::new(AtomicU64::new(0)),
            delta: CachePadded::new(AtomicU64::new(0)),
        }
    }

    /// Sets the label fragment, returning `self` for chaining.
    pub fn with_labels(self, labels: impl Into<String>) -> Self {
        Self {
            descriptor: self.descriptor.with_labels(labels),
            ..self
        }
    }

    /// Sets the initial total. The push delta stays at zero.
    pub fn with_value(self, value: u64) -> Self {
        self.total.store(value, Ordering::Relaxed);
        self
    }

    /// Adds one.
    #[inline]
    pub fn increment(&self) {
        self.increment_by(1);
    }

    /// Adds `n` to both the total and the push delta.
    #[inline]
    pub fn increment_by(&self, n: u64) {
        self.total.fetch_add(n, Ordering::Relaxed);
        self.delta.fetch_add(n, Ordering::Relaxed);
    }

    /// Same as [`increment`](Self::increment).
    #[inline]
    pub fn count(&self) {
        self.increment_by(1);
    }

    /// Same as [`increment_by`](Self::increment_by).
    #[inline]
    pub fn count_by(&self, n: u64) {
        self.increment_by(n);
    }

    /// Reads the total.
    #[inline]
    pub fn load(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Overwrites the total.
    ///
    /// The push delta is not touched, so delta reporting is unaffected by a
    /// correction of the exposed value.
    #[inline]
    pub fn store(&self, value: u64) {
        self.total.store(value, Ordering::Relaxed);
    }

    /// Returns the increments since the previous push and resets the delta.
    #[inline]
    pub fn push(&self) -> u64 {
        self.delta.swap(0, Ordering::Relaxed)
    }
}

impl Metric for Counter {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Counter
    }

    fn value(&self) -> MetricValue {
        MetricValue::Counter(self.load())
    }

    fn to_prometheus(&self, out: &mut String) {
        self.descriptor.write_header(MetricKind::Counter, out);
        self.descriptor.write_sample("", self.load(), out);
    }
}

impl Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.descriptor.fmt_sample(f, self.load())
    }
}

impl Debug for Counter {
    /// Output format: `name{ total:N delta:N }`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{{ total:{} delta:{} }}",
            self.descriptor.name(),
            self.load(),
            self.delta.load(Ordering::Relaxed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new() {
        let counter = Counter::new("c", "help");
        assert_eq!(counter.load(), 0);
        assert_eq!(counter.push(), 0);
        assert_eq!(counter.name(), "c");
        assert_eq!(counter.help(), "help");
        assert_eq!(counter.labels(), "");
    }

    #[test]
    fn test_increment() {
        let counter = Counter::new("c", "");
        counter.increment();
        counter.count();
        counter.count_by(3);
        counter.increment_by(5);
        assert_eq!(counter.load(), 10);
        assert_eq!(counter.value(), MetricValue::Counter(10));
    }

    #[test]
    fn test_store_does_not_touch_delta() {
        let counter = Counter::new("c", "");
        counter.increment_by(7);
        counter.store(100);
        assert_eq!(counter.load(), 100);
        assert_eq!(counter.push(), 7);
        counter.store(0);
        assert_eq!(counter.load(), 0);
        assert_eq!(counter.push(), 0);
    }

    #[test]
    fn test_with_value() {
        let counter = Counter::new("c", "").with_value(42);
        counter.increment();
        assert_eq!(counter.load(), 43);
        assert_eq!(counter.push(), 1);
    }

    #[test]
    fn test_render_exact() {
        let counter = Counter::new("requests_total", "");
        counter.increment();
        counter.increment();
        counter.increment();
        let mut out = String::new();
        counter.to_prometheus(&mut out);
        assert_eq!(
            out,
            "\n#TYPE requests_total counter\n#HELP requests_total \nrequests_total 3\n"
        );
    }

    #[test]
    fn test_render_with_labels() {
        let counter = Counter::new("http_requests", "HTTP requests")
            .with_labels("method=\"GET\"")
            .with_value(9);
        let mut out = String::new();
        counter.to_prometheus(&mut out);
        assert_eq!(
            out,
            "\n#TYPE http_requests counter\n#HELP http_requests HTTP requests\nhttp_requests{method=\"GET\"} 9\n"
        );
    }

    #[test]
    fn test_display_and_debug() {
        let counter = Counter::new("c", "").with_labels("a=\"b\"");
        counter.increment_by(2);
        assert_eq!(counter.to_string(), "c{a=\"b\"} 2");
        assert_eq!(format!("{counter:?}"), "c{ total:2 delta:2 }");
    }

    #[test]
    fn test_multiple_threads() {
        let counter = Arc::new(Counter::new("c", ""));
        let mut handles = vec![];

        for _ in 0..4 {
            let counter_clone = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    counter_clone.increment();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.load(), 4000);
    }

    #[test]
    fn test_push_under_contention_loses_nothing() {
        const WRITERS: u64 = 4;
        const PER_WRITER: u64 = 20_000;

        let counter = Arc::new(Counter::new("c", ""));
        let mut writers = vec![];
        for _ in 0..WRITERS {
            let c = Arc::clone(&counter);
            writers.push(thread::spawn(move || {
                for _ in 0..PER_WRITER {
                    c.increment();
                }
            }));
        }

        let mut pushed = 0;
        while writers.iter().any(|w| !w.is_finished()) {
            pushed += counter.push();
        }
        for w in writers {
            w.join().unwrap();
        }
        pushed += counter.push();

        assert_eq!(pushed, WRITERS * PER_WRITER);
        assert_eq!(counter.load(), WRITERS * PER_WRITER);
    }
}
