#![forbid(unsafe_code)]

//! Seeded 2D lattice noise.
//!
//! Produces deterministic, smoothly interpolated pseudo-random values used
//! to perturb shard boundaries. Instead of a 2D table sized to the image,
//! each lattice point hashes its coordinates and a channel index through
//! five small tables and XORs the results into an index over a single value
//! table. The result is position- and channel-dependent without any
//! per-image storage.
//!
//! # Invariants
//!
//! 1. Tables are fully regenerated by [`Noise::reseed`] and read-only after
//! 2. Sampling never fails; hash indices wrap via masking
//! 3. Outputs stay within the value-table range `[-FIX_ONE, FIX_ONE)`

use crate::fixed::{self, FIX_BITS, FIX_ONE, Fixed};
use crate::rng::Rng;

const TABLE_SIZE: usize = 256;
const TABLE_MASK: u32 = 0xFF;
const NUM_HASH_TABLES: usize = 5;

/// A reseedable noise field over five hash tables and one value table.
#[derive(Debug, Clone)]
pub struct Noise {
    hash: [[u8; TABLE_SIZE]; NUM_HASH_TABLES],
    values: [Fixed; TABLE_SIZE],
}

impl Noise {
    /// Create a zeroed field. Meaningless until [`Noise::reseed`] runs.
    pub const fn new() -> Self {
        Self {
            hash: [[0; TABLE_SIZE]; NUM_HASH_TABLES],
            values: [0; TABLE_SIZE],
        }
    }

    /// Regenerate every table from the stream.
    ///
    /// Fill order is fixed (hash tables 0..5, then the value table) so a
    /// given stream position always produces the same field.
    pub fn reseed(&mut self, rng: &mut Rng) {
        for table in &mut self.hash {
            for entry in table.iter_mut() {
                *entry = (rng.next() & TABLE_MASK) as u8;
            }
        }
        for value in &mut self.values {
            *value = fixed::rand_signed(rng);
        }
    }

    /// Sample the lattice point `(x, y)` on `channel`.
    ///
    /// Hashes the low 16 bits of `x`, the next 8 bits of `x`, the low
    /// 16 bits of `y`, the next 8 bits of `y`, and the low 8 bits of
    /// `channel`, each through its own table, XOR-combines them, and indexes
    /// the value table. Coordinates beyond the hashed bits wrap.
    #[inline]
    pub fn discrete(&self, x: u32, y: u32, channel: u32) -> Fixed {
        let h = self.hash[0][((x & 0xFFFF) & TABLE_MASK) as usize]
            ^ self.hash[1][((x >> 16) & TABLE_MASK) as usize]
            ^ self.hash[2][((y & 0xFFFF) & TABLE_MASK) as usize]
            ^ self.hash[3][((y >> 16) & TABLE_MASK) as usize]
            ^ self.hash[4][(channel & TABLE_MASK) as usize];
        self.values[h as usize]
    }

    /// Bilinearly interpolated sample at fixed-point coordinates.
    ///
    /// Interpolates [`Noise::discrete`] at the four surrounding lattice
    /// points using the Q14 fractional parts as weights. Interpolation runs
    /// along Y first for both X neighbors, then along X; the order pins the
    /// rounding sequence, so sampled values are bit-stable.
    pub fn smooth(&self, fx: Fixed, fy: Fixed, channel: u32) -> Fixed {
        let x0 = (fx >> FIX_BITS) as u32;
        let y0 = (fy >> FIX_BITS) as u32;
        let x1 = x0.wrapping_add(1);
        let y1 = y0.wrapping_add(1);
        let tx = fx & (FIX_ONE - 1);
        let ty = fy & (FIX_ONE - 1);

        let s00 = self.discrete(x0, y0, channel);
        let s01 = self.discrete(x0, y1, channel);
        let s10 = self.discrete(x1, y0, channel);
        let s11 = self.discrete(x1, y1, channel);

        let left = s00 + (((s01 - s00) * ty) >> FIX_BITS);
        let right = s10 + (((s11 - s10) * ty) >> FIX_BITS);
        left + (((right - left) * tx) >> FIX_BITS)
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new()
    }
}
