#![forbid(unsafe_code)]

//! Shard partition engine.
//!
//! Owns a fixed set of shards, each a rigid fragment of the source image
//! with a seed-derived anchor point in normalized space and a pixel offset
//! in destination space. Classification assigns every source pixel to its
//! nearest shard anchor, with a signed noise penalty that bends the
//! otherwise-straight Voronoi boundaries into jagged edges.
//!
//! # State machine
//!
//! Constructed at 1x1 bounds, radius 1.0, [`DEFAULT_SEED`]. Transforms are
//! well-defined in any state but only meaningful once [`Partition::set_bounds`]
//! has run with real source dimensions.
//!
//! # Invariants
//!
//! 1. Exactly [`NUM_SHARDS`] shards exist at all times
//! 2. `dst >= src` per axis; equality iff `radius == 1.0`
//! 3. All randomness is consumed during [`Partition::set_seed`]; the
//!    transform paths are pure functions of immutable state
//! 4. Failed reconfiguration leaves prior state untouched

use crate::fixed::{self, FIX_ONE, Fixed};
use crate::noise::Noise;
use crate::rng::Rng;

/// Number of shards the source image is split into.
pub const NUM_SHARDS: usize = 10;

/// Seed used by a freshly constructed engine.
pub const DEFAULT_SEED: u32 = 0x29A;

/// Largest possible magnitude of the signed-square noise penalty.
///
/// `smooth` output is below `FIX_ONE` in magnitude, shifted right by 2 and
/// squared, so no penalty can move a distance score by more than this. A
/// candidate whose raw distance is already this far behind the current
/// winner's adjusted score can never win, which lets [`Partition::lookup`]
/// skip the noise evaluation for it.
const NOISE_CUTOFF: i32 = (FIX_ONE >> 2) * (FIX_ONE >> 2);

/// One rigid fragment of the source image.
#[derive(Debug, Clone, Copy, Default)]
struct Shard {
    /// Anchor point in `[0,1)` x `[0,1)`, float form.
    norm_x: f64,
    norm_y: f64,
    /// Anchor point in Q14 form, used by the classifier.
    fix_x: Fixed,
    fix_y: Fixed,
    /// Displacement applied to every pixel owned by this shard.
    off_x: i32,
    off_y: i32,
}

/// Invalid reconfiguration of the partition engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartitionError {
    /// Radius below 1.0 (or NaN); the destination must contain the source.
    RadiusOutOfRange(f64),
    /// A source dimension was zero.
    EmptySource { width: u32, height: u32 },
}

impl std::fmt::Display for PartitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RadiusOutOfRange(radius) => {
                write!(f, "explosion radius must be >= 1.0, got {radius}")
            }
            Self::EmptySource { width, height } => {
                write!(f, "source dimensions must be nonzero, got {width}x{height}")
            }
        }
    }
}

impl std::error::Error for PartitionError {}

/// The explode partition engine.
///
/// # Example
///
/// ```
/// use shatter_core::Partition;
///
/// let mut partition = Partition::new();
/// partition.set_seed(0x29A);
/// let (dst_w, dst_h) = partition.set_bounds(1.5, 100, 100).unwrap();
/// assert_eq!((dst_w, dst_h), (150, 150));
///
/// let (dx, dy) = partition.transform(10, 20);
/// assert!(dx < dst_w && dy < dst_h);
/// ```
#[derive(Debug, Clone)]
pub struct Partition {
    shards: [Shard; NUM_SHARDS],
    noise: Noise,
    seed: u32,
    radius: f64,
    src_w: u32,
    src_h: u32,
    dst_w: u32,
    dst_h: u32,
    /// Per-axis ratios `FIX_ONE / src_dim` mapping pixel coordinates into
    /// the normalized Q14 domain shared with shard anchors.
    scale_x: Fixed,
    scale_y: Fixed,
}

impl Partition {
    /// Create an engine at degenerate 1x1 bounds, radius 1.0, default seed.
    pub fn new() -> Self {
        let mut partition = Self {
            shards: [Shard::default(); NUM_SHARDS],
            noise: Noise::new(),
            seed: DEFAULT_SEED,
            radius: 1.0,
            src_w: 1,
            src_h: 1,
            dst_w: 1,
            dst_h: 1,
            scale_x: FIX_ONE,
            scale_y: FIX_ONE,
        };
        partition.set_seed(DEFAULT_SEED);
        partition
    }

    /// Current seed.
    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Current explosion radius.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Source dimensions from the last successful [`Partition::set_bounds`].
    #[inline]
    pub fn source_size(&self) -> (u32, u32) {
        (self.src_w, self.src_h)
    }

    /// Destination dimensions from the last successful [`Partition::set_bounds`].
    #[inline]
    pub fn dest_size(&self) -> (u32, u32) {
        (self.dst_w, self.dst_h)
    }

    /// Per-axis shift centering the source frame inside the destination.
    #[inline]
    pub fn center_shift(&self) -> (u32, u32) {
        ((self.dst_w - self.src_w) / 2, (self.dst_h - self.src_h) / 2)
    }

    /// Reseed the noise field and redraw every shard anchor.
    ///
    /// Consumes the stream in a fixed order: noise tables first, then x and
    /// y per shard in shard-index order. Offsets are recomputed against the
    /// stored radius and source size so they stay consistent with the new
    /// anchors.
    pub fn set_seed(&mut self, seed: u32) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("partition_seed", seed).entered();

        let mut rng = Rng::new(seed);
        self.noise.reseed(&mut rng);
        for shard in &mut self.shards {
            shard.fix_x = fixed::rand_unsigned(&mut rng);
            shard.fix_y = fixed::rand_unsigned(&mut rng);
            shard.norm_x = fixed::to_f64(shard.fix_x);
            shard.norm_y = fixed::to_f64(shard.fix_y);
        }
        self.seed = seed;
        self.recompute_offsets();

        #[cfg(feature = "tracing")]
        tracing::trace!("shard anchors reseeded");
    }

    /// Set the explosion radius and source dimensions.
    ///
    /// Returns the destination dimensions `(src * radius)` per axis
    /// (truncating cast, matching the legacy effect) and recomputes every
    /// shard's pixel offset. On error no state changes.
    ///
    /// Sources wider or taller than `FIX_ONE` (16384) are outside the Q14
    /// format's usable range: the per-axis scale ratio truncates to zero and
    /// classification degrades. This is a format constant, not a runtime
    /// check.
    pub fn set_bounds(
        &mut self,
        radius: f64,
        src_w: u32,
        src_h: u32,
    ) -> Result<(u32, u32), PartitionError> {
        if !(radius >= 1.0) {
            return Err(PartitionError::RadiusOutOfRange(radius));
        }
        if src_w == 0 || src_h == 0 {
            return Err(PartitionError::EmptySource {
                width: src_w,
                height: src_h,
            });
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("partition_bounds", radius, src_w, src_h).entered();

        self.radius = radius;
        self.src_w = src_w;
        self.src_h = src_h;
        self.dst_w = (src_w as f64 * radius) as u32;
        self.dst_h = (src_h as f64 * radius) as u32;
        self.scale_x = FIX_ONE / src_w as i32;
        self.scale_y = FIX_ONE / src_h as i32;
        self.recompute_offsets();

        #[cfg(feature = "tracing")]
        tracing::trace!(dst_w = self.dst_w, dst_h = self.dst_h, "bounds updated");

        Ok((self.dst_w, self.dst_h))
    }

    /// Map a source pixel to its destination pixel.
    #[inline]
    pub fn transform(&self, x: u32, y: u32) -> (u32, u32) {
        let shard = &self.shards[self.lookup(x, y)];
        (
            (x as i64 + shard.off_x as i64) as u32,
            (y as i64 + shard.off_y as i64) as u32,
        )
    }

    /// Map a destination pixel back to the source pixel that produced it.
    ///
    /// For each shard the candidate `dest - offset` is kept only if it lies
    /// inside the source frame and the classifier agrees it belongs to that
    /// shard. Among consistent candidates the largest y wins, tie-broken by
    /// largest x: shards painted later (lower, then righter) overwrite
    /// earlier ones, and the inverse must pick the visible pixel. `None`
    /// means no shard reaches this destination pixel, i.e. it was never
    /// written and stays transparent.
    pub fn inverse_transform(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        let mut best: Option<(u32, u32)> = None;
        for (index, shard) in self.shards.iter().enumerate() {
            let cand_x = x as i64 - shard.off_x as i64;
            let cand_y = y as i64 - shard.off_y as i64;
            if cand_x < 0
                || cand_y < 0
                || cand_x >= self.src_w as i64
                || cand_y >= self.src_h as i64
            {
                continue;
            }
            let (cand_x, cand_y) = (cand_x as u32, cand_y as u32);
            if self.lookup(cand_x, cand_y) != index {
                continue;
            }
            match best {
                Some((best_x, best_y)) if (cand_y, cand_x) <= (best_y, best_x) => {}
                _ => best = Some((cand_x, cand_y)),
            }
        }
        best
    }

    /// Classify a source pixel to its owning shard.
    ///
    /// Squared Q14 distance to each anchor, plus a signed-square noise
    /// penalty per shard: the smooth sample keeps its sign while its
    /// magnitude is squared, so negative noise pulls a boundary inward and
    /// positive noise pushes it outward. Minimum adjusted distance wins;
    /// ties keep the lowest shard index. Pure: no RNG draws here.
    fn lookup(&self, x: u32, y: u32) -> usize {
        let px = x as i32 * self.scale_x;
        let py = y as i32 * self.scale_y;

        let mut winner = 0;
        let mut best = i32::MAX;
        for (index, shard) in self.shards.iter().enumerate() {
            let dx = px - shard.fix_x;
            let dy = py - shard.fix_y;
            let dist = dx * dx + dy * dy;

            // No noise value could close this gap; skip the smooth sample.
            if dist.saturating_sub(NOISE_CUTOFF) > best {
                continue;
            }

            let n = self
                .noise
                .smooth((x << 4) as Fixed, (y << 4) as Fixed, index as u32)
                >> 2;
            let penalty = if n < 0 { -(n * n) } else { n * n };
            let adjusted = dist + penalty;
            if adjusted < best {
                best = adjusted;
                winner = index;
            }
        }
        winner
    }

    fn recompute_offsets(&mut self) {
        let spread = self.radius - 1.0;
        let center_x = ((self.dst_w - self.src_w) / 2) as i32;
        let center_y = ((self.dst_h - self.src_h) / 2) as i32;
        for shard in &mut self.shards {
            shard.off_x =
                ((shard.norm_x - 0.5) * spread * self.src_w as f64).round() as i32 + center_x;
            shard.off_y =
                ((shard.norm_y - 0.5) * spread * self.src_h as f64).round() as i32 + center_y;
        }
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self::new()
    }
}
