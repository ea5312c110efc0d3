//! Numeric value types that gauges and scales can be built over.
//!
//! [`Value`] ties each primitive number to the atomic cell that stores it
//! and to the strategy used to update that cell concurrently:
//!
//! | Type | Cell | `fetch_add` / `fetch_sub` | `fetch_mul` / `fetch_div` |
//! |------|------|---------------------------|---------------------------|
//! | `u32`, `u64`, `usize`, `i32`, `i64` | matching `Atomic*` | native hardware op | CAS loop |
//! | `f32` | `AtomicU32` (bit pattern) | CAS loop | CAS loop |
//! | `f64` | `AtomicU64` (bit pattern) | CAS loop | CAS loop |
//!
//! The strategy is selected per type by the macros below, so there is no
//! runtime branching on "integral or floating".
//!
//! Floating values are moved in and out of their integer cell with
//! [`bytemuck::cast`], a checked bit reinterpretation between `Pod` types.

use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicI32, AtomicI64, AtomicU32, AtomicU64, AtomicUsize, Ordering};

use atomic_traits::Atomic;
use num_traits::{Bounded, Num, NumCast, ToPrimitive};

use crate::log2::Log2Rough;

/// A number that can live in an atomic cell and be bucketed by a scale.
pub trait Value:
    Num + NumCast + ToPrimitive + Bounded + Copy + PartialOrd + Debug + Display + Send + Sync + 'static
{
    /// Raw representation stored in the atomic cell.
    type Bits: Copy + PartialEq + Send + Sync;

    /// The atomic cell type.
    type Cell: Atomic<Type = Self::Bits> + Send + Sync;

    /// Converts to the representation stored in the cell.
    fn to_bits(self) -> Self::Bits;

    /// Converts back from the representation stored in the cell.
    fn from_bits(bits: Self::Bits) -> Self;

    /// Creates a new cell holding `self`.
    #[inline]
    fn new_cell(self) -> Self::Cell {
        Self::Cell::new(self.to_bits())
    }

    /// Atomically loads the value.
    #[inline]
    fn load(cell: &Self::Cell, order: Ordering) -> Self {
        Self::from_bits(cell.load(order))
    }

    /// Atomically stores the value.
    #[inline]
    fn store(cell: &Self::Cell, value: Self, order: Ordering) {
        cell.store(value.to_bits(), order)
    }

    /// Applies `f` with a compare-and-swap retry loop, returning the previous value.
    ///
    /// Lock-free: a failed exchange means another thread made progress.
    #[inline]
    fn fetch_update_cas(cell: &Self::Cell, order: Ordering, f: impl Fn(Self) -> Self) -> Self {
        let mut current = cell.load(Ordering::Relaxed);
        loop {
            let next = f(Self::from_bits(current)).to_bits();
            match cell.compare_exchange_weak(current, next, order, Ordering::Relaxed) {
                Ok(previous) => return Self::from_bits(previous),
                Err(actual) => current = actual,
            }
        }
    }

    /// Atomically adds `value`, returning the previous value.
    fn fetch_add(cell: &Self::Cell, value: Self, order: Ordering) -> Self;

    /// Atomically subtracts `value`, returning the previous value.
    fn fetch_sub(cell: &Self::Cell, value: Self, order: Ordering) -> Self;

    /// Atomically multiplies by `value`, returning the previous value.
    ///
    /// Integers wrap on overflow, like `fetch_add` and `fetch_sub`.
    fn fetch_mul(cell: &Self::Cell, value: Self, order: Ordering) -> Self;

    /// Atomically divides by `value`, returning the previous value.
    ///
    /// Integers wrap on `MIN / -1`. Division by zero is not checked here.
    fn fetch_div(cell: &Self::Cell, value: Self, order: Ordering) -> Self;

    /// `self - origin`, or `None` if the difference does not fit in `Self`.
    ///
    /// Floats never overflow here and always return `Some`.
    fn checked_offset(self, origin: Self) -> Option<Self>;

    /// Approximate `floor(log2(self * mul))` for a positive product.
    ///
    /// Floating types extract the exponent of the product computed in their
    /// own width. Integer types compute the product in `f64` and, when it is
    /// at least one, truncate and bit-scan the integer part, which has the
    /// same floor logarithm.
    fn scaled_log2(self, mul: f64) -> i32;
}

macro_rules! impl_integral_value {
    ($($t:ty => $cell:ty),* $(,)?) => {
        $(
            impl Value for $t {
                type Bits = $t;
                type Cell = $cell;

                #[inline]
                fn to_bits(self) -> $t {
                    self
                }

                #[inline]
                fn from_bits(bits: $t) -> $t {
                    bits
                }

                #[inline]
                fn fetch_add(cell: &$cell, value: $t, order: Ordering) -> $t {
                    cell.fetch_add(value, order)
                }

                #[inline]
                fn fetch_sub(cell: &$cell, value: $t, order: Ordering) -> $t {
                    cell.fetch_sub(value, order)
                }

                #[inline]
                fn fetch_mul(cell: &$cell, value: $t, order: Ordering) -> $t {
                    Self::fetch_update_cas(cell, order, |v| v.wrapping_mul(value))
                }

                #[inline]
                fn fetch_div(cell: &$cell, value: $t, order: Ordering) -> $t {
                    Self::fetch_update_cas(cell, order, |v| v.wrapping_div(value))
                }

                #[inline]
                fn checked_offset(self, origin: $t) -> Option<$t> {
                    self.checked_sub(origin)
                }

                #[inline]
                fn scaled_log2(self, mul: f64) -> i32 {
                    let product = self as f64 * mul;
                    if product >= 1.0 && product < u64::MAX as f64 {
                        (product as u64).log2_rough()
                    } else {
                        product.log2_rough()
                    }
                }
            }
        )*
    };
}

macro_rules! impl_floating_value {
    ($($t:ty => $bits:ty, $cell:ty),* $(,)?) => {
        $(
            impl Value for $t {
                type Bits = $bits;
                type Cell = $cell;

                #[inline]
                fn to_bits(self) -> $bits {
                    bytemuck::cast(self)
                }

                #[inline]
                fn from_bits(bits: $bits) -> $t {
                    bytemuck::cast(bits)
                }

                #[inline]
                fn fetch_add(cell: &$cell, value: $t, order: Ordering) -> $t {
                    Self::fetch_update_cas(cell, order, |v| v + value)
                }

                #[inline]
                fn fetch_sub(cell: &$cell, value: $t, order: Ordering) -> $t {
                    Self::fetch_update_cas(cell, order, |v| v - value)
                }

                #[inline]
                fn fetch_mul(cell: &$cell, value: $t, order: Ordering) -> $t {
                    Self::fetch_update_cas(cell, order, |v| v * value)
                }

                #[inline]
                fn fetch_div(cell: &$cell, value: $t, order: Ordering) -> $t {
                    Self::fetch_update_cas(cell, order, |v| v / value)
                }

                #[inline]
                fn checked_offset(self, origin: $t) -> Option<$t> {
                    Some(self - origin)
                }

                #[inline]
                fn scaled_log2(self, mul: f64) -> i32 {
                    (self * mul as $t).log2_rough()
                }
            }
        )*
    };
}

impl_integral_value!(
    u32 => AtomicU32,
    u64 => AtomicU64,
    usize => AtomicUsize,
    i32 => AtomicI32,
    i64 => AtomicI64,
);

impl_floating_value!(
    f32 => u32, AtomicU32,
    f64 => u64, AtomicU64,
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_float_bits_roundtrip() {
        for v in [0.0f64, -1.5, 3.25, f64::MAX, f64::MIN_POSITIVE] {
            assert_eq!(f64::from_bits(Value::to_bits(v)), v);
        }
        assert_eq!(Value::to_bits(1.0f32), 0x3f80_0000u32);
    }

    #[test]
    fn test_integral_fetch_ops() {
        let cell = 10i64.new_cell();
        assert_eq!(i64::fetch_add(&cell, 5, Ordering::Relaxed), 10);
        assert_eq!(i64::fetch_sub(&cell, 20, Ordering::Relaxed), 15);
        assert_eq!(i64::load(&cell, Ordering::Relaxed), -5);
        assert_eq!(i64::fetch_mul(&cell, -3, Ordering::Relaxed), -5);
        assert_eq!(i64::fetch_div(&cell, 5, Ordering::Relaxed), 15);
        assert_eq!(i64::load(&cell, Ordering::Relaxed), 3);
    }

    #[test]
    fn test_floating_fetch_ops() {
        let cell = 1.5f64.new_cell();
        assert_eq!(f64::fetch_add(&cell, 1.0, Ordering::Relaxed), 1.5);
        assert_eq!(f64::fetch_mul(&cell, 4.0, Ordering::Relaxed), 2.5);
        assert_eq!(f64::fetch_div(&cell, 2.0, Ordering::Relaxed), 10.0);
        assert_eq!(f64::fetch_sub(&cell, 0.5, Ordering::Relaxed), 5.0);
        assert_eq!(f64::load(&cell, Ordering::Relaxed), 4.5);
    }

    #[test]
    fn test_cas_loop_under_contention() {
        let cell = Arc::new(0.0f32.new_cell());
        let mut handles = vec![];

        for _ in 0..4 {
            let cell = Arc::clone(&cell);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    f32::fetch_add(&cell, 1.0, Ordering::Relaxed);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(f32::load(&cell, Ordering::Relaxed), 4000.0);
    }

    #[test]
    fn test_integral_mul_div_wrap() {
        let cell = i32::MAX.new_cell();
        assert_eq!(i32::fetch_mul(&cell, 2, Ordering::Relaxed), i32::MAX);
        assert_eq!(i32::load(&cell, Ordering::Relaxed), -2);

        let cell = i64::MIN.new_cell();
        assert_eq!(i64::fetch_div(&cell, -1, Ordering::Relaxed), i64::MIN);
        assert_eq!(i64::load(&cell, Ordering::Relaxed), i64::MIN);

        let cell = u64::MAX.new_cell();
        u64::fetch_mul(&cell, 3, Ordering::Relaxed);
        assert_eq!(u64::load(&cell, Ordering::Relaxed), u64::MAX.wrapping_mul(3));
    }

    #[test]
    fn test_checked_offset() {
        assert_eq!(5i64.checked_offset(-3), Some(8));
        assert_eq!(i64::MAX.checked_offset(-1), None);
        assert_eq!(0i32.checked_offset(i32::MIN), None);
        assert_eq!(3u32.checked_offset(5), None);
        assert_eq!(f64::MAX.checked_offset(-f64::MAX), Some(f64::INFINITY));
    }

    #[test]
    fn test_scaled_log2() {
        assert_eq!(3.0f64.scaled_log2(1.0), 1);
        assert_eq!(3.0f32.scaled_log2(4.0), 3);
        assert_eq!(1000u64.scaled_log2(1.0), 9);
        assert_eq!(3u32.scaled_log2(0.25), -1);
        assert_eq!(5i64.scaled_log2(2.0), 3);
    }
}
