//! Rough base-2 logarithms without transcendental calls.
//!
//! [`Log2Rough::log2_rough`] returns `floor(log2(x))` in constant time:
//!
//! - For `f32` and `f64` the biased exponent field is read straight out of
//!   the IEEE-754 bit pattern (bits 23..30 with bias 127, bits 52..62 with
//!   bias 1023). This is exact for positive, normal, finite inputs. Zero,
//!   subnormals, negatives, infinities and NaN give meaningless results;
//!   callers clamp their input first.
//! - For `u32` and `u64` the highest set bit is smeared downwards with
//!   cascading shifts and mapped to its index through a de Bruijn
//!   multiply-and-shift lookup. The input must be non-zero.
//!
//! ```text
//!   f64:  | s | exponent (11) |            mantissa (52)             |
//!           63  62         52  51                                   0
//!                   └── (bits >> 52) & 0x7ff  -  1023  =  floor(log2)
//! ```

/// De Bruijn lookup for 64-bit values, indexed by the isolated top bit.
const DEBRUIJN_64: [i32; 64] = [
    63, 0, 58, 1, 59, 47, 53, 2, 60, 39, 48, 27, 54, 33, 42, 3, 61, 51, 37, 40, 49, 18, 28, 20,
    55, 30, 34, 11, 43, 14, 22, 4, 62, 57, 46, 52, 38, 26, 32, 41, 50, 36, 17, 19, 29, 10, 13, 21,
    56, 45, 25, 31, 35, 16, 9, 12, 44, 24, 15, 8, 23, 7, 6, 5,
];

const DEBRUIJN_64_MUL: u64 = 0x07ED_D5E5_9A4E_28C2;

/// De Bruijn lookup for 32-bit values, indexed by the smeared mask `2^(k+1) - 1`.
const DEBRUIJN_32: [i32; 32] = [
    0, 9, 1, 10, 13, 21, 2, 29, 11, 14, 16, 18, 22, 25, 3, 30, 8, 12, 20, 28, 15, 17, 24, 7, 19,
    27, 23, 6, 26, 5, 4, 31,
];

const DEBRUIJN_32_MUL: u32 = 0x07C4_ACDD;

const F64_EXPONENT_BIAS: i32 = 1023;
const F32_EXPONENT_BIAS: i32 = 127;

/// Constant-time `floor(log2(x))`.
pub trait Log2Rough: Copy {
    /// Returns `floor(log2(self))` for inputs within the documented domain.
    fn log2_rough(self) -> i32;
}

impl Log2Rough for f64 {
    #[inline]
    fn log2_rough(self) -> i32 {
        let bits: u64 = bytemuck::cast(self);
        ((bits >> 52) & 0x7ff) as i32 - F64_EXPONENT_BIAS
    }
}

impl Log2Rough for f32 {
    #[inline]
    fn log2_rough(self) -> i32 {
        let bits: u32 = bytemuck::cast(self);
        ((bits >> 23) & 0xff) as i32 - F32_EXPONENT_BIAS
    }
}

impl Log2Rough for u64 {
    #[inline]
    fn log2_rough(self) -> i32 {
        let mut v = self;
        v |= v >> 1;
        v |= v >> 2;
        v |= v >> 4;
        v |= v >> 8;
        v |= v >> 16;
        v |= v >> 32;
        let top = v - (v >> 1);
        DEBRUIJN_64[(top.wrapping_mul(DEBRUIJN_64_MUL) >> 58) as usize]
    }
}

impl Log2Rough for u32 {
    #[inline]
    fn log2_rough(self) -> i32 {
        let mut v = self;
        v |= v >> 1;
        v |= v >> 2;
        v |= v >> 4;
        v |= v >> 8;
        v |= v >> 16;
        DEBRUIJN_32[(v.wrapping_mul(DEBRUIJN_32_MUL) >> 27) as usize]
    }
}
