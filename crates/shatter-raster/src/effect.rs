#![forbid(unsafe_code)]

//! The explode effect driver.
//!
//! Owns the partition engine and a typed configuration, and drives the
//! per-pixel data flow: compute destination bounds from radius and source
//! size, allocate the (larger) transparent destination, forward-map every
//! source pixel through the partition, and answer inverse point queries for
//! hit-testing. Point-space helpers work in 1/96-inch units for callers
//! that position the output in a DPI-aware coordinate system.

use crate::pixel::{PixelBuffer, PixelReader, PixelWriter};
use shatter_core::{DEFAULT_SEED, Partition, PartitionError};

/// Invalid effect property assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Radius below 1.0 (or NaN).
    RadiusOutOfRange(f64),
    /// Seed number must be nonzero.
    ZeroSeed,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RadiusOutOfRange(radius) => {
                write!(f, "radius must be >= 1.0, got {radius}")
            }
            Self::ZeroSeed => write!(f, "seed number must be nonzero"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while applying the effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExplodeError {
    Partition(PartitionError),
}

impl From<PartitionError> for ExplodeError {
    fn from(err: PartitionError) -> Self {
        Self::Partition(err)
    }
}

impl std::fmt::Display for ExplodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Partition(err) => write!(f, "partition rejected configuration: {err}"),
        }
    }
}

impl std::error::Error for ExplodeError {}

/// Effect properties: explosion radius and seed number.
///
/// The strongly-typed replacement for the legacy string-keyed property bag.
/// Both setters validate; invalid values are rejected, never coerced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplodeConfig {
    radius: f64,
    seed_number: u32,
}

impl ExplodeConfig {
    /// Default configuration: radius 1.5, the engine's default seed.
    pub const fn new() -> Self {
        Self {
            radius: 1.5,
            seed_number: DEFAULT_SEED,
        }
    }

    /// Explosion radius (>= 1.0).
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Seed number (nonzero).
    #[inline]
    pub fn seed_number(&self) -> u32 {
        self.seed_number
    }

    /// Set the radius; rejects values below 1.0 and NaN.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), ConfigError> {
        if !(radius >= 1.0) {
            return Err(ConfigError::RadiusOutOfRange(radius));
        }
        self.radius = radius;
        Ok(())
    }

    /// Set the seed number; zero is rejected.
    pub fn set_seed_number(&mut self, seed_number: u32) -> Result<(), ConfigError> {
        if seed_number == 0 {
            return Err(ConfigError::ZeroSeed);
        }
        self.seed_number = seed_number;
        Ok(())
    }
}

impl Default for ExplodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The explode effect: scatters an image into noise-bounded shards.
///
/// # Example
///
/// ```
/// use shatter_raster::{ExplodeConfig, ExplodeEffect, PixelBuffer};
///
/// let mut effect = ExplodeEffect::new(ExplodeConfig::new());
/// let src = PixelBuffer::new(100, 100);
/// let dst = effect.apply(&src).unwrap();
/// assert_eq!((dst.width(), dst.height()), (150, 150));
/// ```
#[derive(Debug, Clone)]
pub struct ExplodeEffect {
    partition: Partition,
    config: ExplodeConfig,
}

impl ExplodeEffect {
    /// Create an effect with the given configuration.
    pub fn new(config: ExplodeConfig) -> Self {
        let mut partition = Partition::new();
        partition.set_seed(config.seed_number());
        Self { partition, config }
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &ExplodeConfig {
        &self.config
    }

    /// Set the explosion radius. Takes effect on the next [`ExplodeEffect::apply`].
    pub fn set_radius(&mut self, radius: f64) -> Result<(), ConfigError> {
        self.config.set_radius(radius)
    }

    /// Set the seed number, reseeding the partition immediately.
    pub fn set_seed_number(&mut self, seed_number: u32) -> Result<(), ConfigError> {
        self.config.set_seed_number(seed_number)?;
        self.partition.set_seed(seed_number);
        Ok(())
    }

    /// Explode `src` into a freshly allocated destination buffer.
    ///
    /// Destination dimensions are `src * radius` per axis; pixels no shard
    /// lands on stay transparent.
    pub fn apply(&mut self, src: &PixelBuffer) -> Result<PixelBuffer, ExplodeError> {
        let (dst_w, dst_h) =
            self.partition
                .set_bounds(self.config.radius(), src.width(), src.height())?;

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "explode_apply",
            src_w = src.width(),
            src_h = src.height(),
            dst_w,
            dst_h,
            radius = self.config.radius(),
        )
        .entered();

        let mut dst = PixelBuffer::new(dst_w, dst_h);
        let mut out = PixelWriter::new(&mut dst, 0, 0);

        let mut row = PixelReader::new(src, 0, 0, false);
        for y in 0..src.height() {
            let mut col = row;
            for x in 0..src.width() {
                let pixel = col.pixel();
                let (dx, dy) = self.partition.transform(x, y);
                out.set_coordinates(dx as i64, dy as i64);
                out.set_pixel(pixel);
                col.step_right();
            }
            row.step_down();
        }
        drop(out);

        #[cfg(feature = "tracing")]
        tracing::trace!("frame exploded");

        Ok(dst)
    }

    /// Map a destination pixel back to its source pixel, if any shard put
    /// one there.
    ///
    /// Meaningful after [`ExplodeEffect::apply`] (or any successful bounds
    /// computation). Radius 1.0 is the degenerate no-explosion case and maps
    /// identically.
    pub fn map_point_inverse(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        if self.config.radius() == 1.0 {
            let (src_w, src_h) = self.partition.source_size();
            return (x < src_w && y < src_h).then_some((x, y));
        }
        self.partition.inverse_transform(x, y)
    }

    /// Centering shift of the source frame inside the destination, in
    /// 1/96-inch points at the given output DPI.
    pub fn center_shift_points(&self, dpi_x: f64, dpi_y: f64) -> (f64, f64) {
        let (shift_x, shift_y) = self.partition.center_shift();
        (
            shift_x as f64 * 96.0 / dpi_x,
            shift_y as f64 * 96.0 / dpi_y,
        )
    }

    /// Forward-transform a point-space rect `(x, y, w, h)`: the frame grows
    /// by the radius and shifts by the centering offset.
    pub fn transform_rect(
        &self,
        rect: (f64, f64, f64, f64),
        dpi_x: f64,
        dpi_y: f64,
    ) -> (f64, f64, f64, f64) {
        let (x, y, w, h) = rect;
        let radius = self.config.radius();
        let (shift_x, shift_y) = self.center_shift_points(dpi_x, dpi_y);
        (x - shift_x, y - shift_y, w * radius, h * radius)
    }
}

impl Default for ExplodeEffect {
    fn default() -> Self {
        Self::new(ExplodeConfig::new())
    }
}
