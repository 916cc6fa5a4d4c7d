#![forbid(unsafe_code)]

//! Q14 fixed-point arithmetic.
//!
//! A real number is encoded as a signed 32-bit integer with [`FIX_BITS`]
//! fractional bits. The format is shared by the noise field and the
//! partition engine so that shard classification is deterministic integer
//! arithmetic with no float rounding in the hot path.
//!
//! # Range
//!
//! There is no overflow checking. Squared-distance sums in the classifier
//! must fit in `i32`, which holds as long as normalized coordinates stay in
//! `(-FIX_ONE, FIX_ONE)` — see [`crate::partition::Partition::set_bounds`]
//! for the resulting image-dimension limit.

use crate::rng::Rng;

/// Number of fractional bits.
pub const FIX_BITS: u32 = 14;

/// The fixed-point encoding of `1.0`.
pub const FIX_ONE: i32 = 1 << FIX_BITS;

/// A real number in Q14 fixed-point form.
pub type Fixed = i32;

/// Encode a float, truncating toward the representable grid.
#[inline]
pub fn to_fixed(x: f64) -> Fixed {
    (x * FIX_ONE as f64) as Fixed
}

/// Decode a fixed-point value to a float.
#[inline]
pub fn to_f64(x: Fixed) -> f64 {
    x as f64 / FIX_ONE as f64
}

/// Draw a random fixed value covering `[-1.0, 1.0)`.
///
/// The draw has 10-bit magnitude resolution: 11 bits are taken from the
/// stream, re-centered, then shifted into the Q14 format. The coarser
/// granularity mirrors the legacy implementation and is load-bearing for
/// reproducing its value distribution; do not widen it.
#[inline]
pub fn rand_signed(rng: &mut Rng) -> Fixed {
    (((rng.next() & 0x7FF) as i32) - 0x400) << 4
}

/// Draw a random fixed value covering `[0.0, 1.0)` at 10-bit resolution.
#[inline]
pub fn rand_unsigned(rng: &mut Rng) -> Fixed {
    ((rng.next() & 0x3FF) as i32) << 4
}
