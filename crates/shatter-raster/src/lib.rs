#![forbid(unsafe_code)]

//! BGRA pixel surface and the explode effect driver.
//!
//! [`pixel`] holds the buffer and the clamped cursor views the effect loop
//! reads and writes through; [`effect`] owns the per-pixel data flow:
//! compute destination bounds, allocate, forward-map every source pixel,
//! and answer inverse point queries for hit-testing.

pub mod effect;
pub mod pixel;

pub use effect::{ConfigError, ExplodeConfig, ExplodeEffect, ExplodeError};
pub use pixel::{PackedBgra, PixelBuffer, PixelReader, PixelWriter};
