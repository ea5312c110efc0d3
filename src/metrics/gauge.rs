//! Arbitrary-direction numeric gauge.

use std::fmt::{self, Debug, Display};
use std::sync::atomic::Ordering;

use crossbeam_utils::CachePadded;

use crate::metrics::{Descriptor, Metric, MetricKind, MetricValue};
use crate::value::Value;

/// A gauge over any [`Value`] type.
///
/// Integral gauges add and subtract with the hardware `fetch_add` /
/// `fetch_sub`. Floating gauges, and multiply/divide for every type, use a
/// compare-and-swap retry loop. The strategy is fixed per type at compile
/// time by the [`Value`] impl.
///
/// All read-modify-write operations return the value held *before* the
/// update.
///
/// # Examples
///
/// ```rust
/// use misure::Gauge;
///
/// let temperature = Gauge::<f64>::new("temperature", "Celsius").with_value(20.0);
/// assert_eq!(temperature.add(1.5), 20.0);
/// assert_eq!(temperature.multiply(2.0), 21.5);
/// assert_eq!(temperature.load(), 43.0);
///
/// let connections = Gauge::<i64>::new("connections", "");
/// connections.increment();
/// connections.increment();
/// connections.decrement();
/// assert_eq!(connections.load(), 1);
/// ```
pub struct Gauge<T: Value> {
    descriptor: Descriptor,
    cell: CachePadded<T::Cell>,
}

impl<T: Value> Gauge<T> {
    /// Creates a gauge at zero.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            descriptor: Descriptor::new(name, help),
            cell: CachePadded::new(T::zero().new_cell()),
        }
    }

    /// Sets the label fragment, returning `self` for chaining.
    pub fn with_labels(self, labels: impl Into<String>) -> Self {
        Self {
            descriptor: self.descriptor.with_labels(labels),
            ..self
        }
    }

    /// Sets the initial value.
    pub fn with_value(self, value: T) -> Self {
        self.set(value);
        self
    }

    /// Adds `t`, returning the previous value.
    #[inline]
    pub fn add(&self, t: T) -> T {
        T::fetch_add(&self.cell, t, Ordering::Relaxed)
    }

    /// Subtracts `t`, returning the previous value.
    #[inline]
    pub fn subtract(&self, t: T) -> T {
        T::fetch_sub(&self.cell, t, Ordering::Relaxed)
    }

    /// Same as [`add`](Self::add).
    #[inline]
    pub fn fetch_add(&self, t: T) -> T {
        self.add(t)
    }

    /// Same as [`subtract`](Self::subtract).
    #[inline]
    pub fn fetch_sub(&self, t: T) -> T {
        self.subtract(t)
    }

    /// Adds one, returning the previous value.
    #[inline]
    pub fn increment(&self) -> T {
        self.add(T::one())
    }

    /// Subtracts one, returning the previous value.
    #[inline]
    pub fn decrement(&self) -> T {
        self.subtract(T::one())
    }

    /// Multiplies by `t`, returning the previous value.
    #[inline]
    pub fn multiply(&self, t: T) -> T {
        T::fetch_mul(&self.cell, t, Ordering::Relaxed)
    }

    /// Divides by `t`, returning the previous value.
    ///
    /// `t` must not be zero. Debug builds assert it. In release builds a
    /// floating gauge becomes infinite or NaN and an integral gauge panics on
    /// the division.
    #[inline]
    pub fn divide(&self, t: T) -> T {
        debug_assert!(t != T::zero(), "gauge divided by zero");
        T::fetch_div(&self.cell, t, Ordering::Relaxed)
    }

    /// Stores `t` unconditionally.
    #[inline]
    pub fn set(&self, t: T) {
        T::store(&self.cell, t, Ordering::Relaxed)
    }

    /// Reads the current value.
    #[inline]
    pub fn load(&self) -> T {
        T::load(&self.cell, Ordering::Relaxed)
    }
}

impl<T: Value> Metric for Gauge<T> {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Gauge
    }

    fn value(&self) -> MetricValue {
        MetricValue::Gauge(self.load().to_f64().unwrap_or(f64::NAN))
    }

    fn to_prometheus(&self, out: &mut String) {
        self.descriptor.write_header(MetricKind::Gauge, out);
        self.descriptor.write_sample("", self.load(), out);
    }
}

impl<T: Value> Display for Gauge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.descriptor.fmt_sample(f, self.load())
    }
}

impl<T: Value> Debug for Gauge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{ {:?} }}", self.descriptor.name(), self.load())
    }
}
