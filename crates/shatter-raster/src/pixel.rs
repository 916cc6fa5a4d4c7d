#![forbid(unsafe_code)]

//! BGRA pixel storage and clamped cursor views.
//!
//! The buffer is a row-major grid of 4-byte pixels. Reads and writes in the
//! effect loop go through cursor views rather than raw indexing: a view
//! borrows the buffer, carries its own signed coordinates, and encodes the
//! edge policy (clamp on read, drop on write). Views are cheap to create
//! and never shared; a parallel caller gives each worker its own view over
//! a disjoint region.
//!
//! # Invariants
//!
//! 1. `pixels.len() == width * height`; dimensions never change
//! 2. Reads always succeed (edge clamp); writes outside bounds are dropped
//! 3. Views never allocate

/// A 32bpp BGRA pixel, packed little-endian (b, g, r, a low to high byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PackedBgra(pub u32);

impl PackedBgra {
    /// Fully transparent (all channels 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create a pixel from BGRA channels.
    #[inline]
    pub const fn bgra(b: u8, g: u8, r: u8, a: u8) -> Self {
        Self((b as u32) | ((g as u32) << 8) | ((r as u32) << 16) | ((a as u32) << 24))
    }

    /// Create an opaque pixel from RGB channels.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::bgra(b, g, r, 255)
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Same color with the alpha channel replaced.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((a as u32) << 24))
    }
}

/// A 2D grid of BGRA pixels.
///
/// # Example
///
/// ```
/// use shatter_raster::pixel::{PackedBgra, PixelBuffer};
///
/// let mut buffer = PixelBuffer::new(16, 16);
/// buffer.set(3, 4, PackedBgra::rgb(255, 0, 0));
/// assert_eq!(buffer.get(3, 4), Some(PackedBgra::rgb(255, 0, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<PackedBgra>,
}

impl PixelBuffer {
    /// Create a transparent buffer with the given dimensions.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![PackedBgra::TRANSPARENT; size],
        }
    }

    /// Buffer width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Convert (x, y) to a linear index, or `None` if out of bounds.
    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<PackedBgra> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write the pixel at (x, y); out-of-bounds writes are dropped.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, pixel: PackedBgra) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = pixel;
        }
    }

    /// Raw pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[PackedBgra] {
        &self.pixels
    }
}

/// A read cursor over a [`PixelBuffer`] with edge-clamp semantics.
///
/// The cursor may step or be positioned outside the buffer; [`PixelReader::pixel`]
/// clamps to the nearest edge pixel. With `zero_alpha_on_clamp`, a clamped
/// read returns the edge color with alpha forced to zero, so consumers
/// blend toward transparent at the boundary instead of smearing edge color.
#[derive(Debug, Clone, Copy)]
pub struct PixelReader<'a> {
    buf: &'a PixelBuffer,
    x: i64,
    y: i64,
    zero_alpha_on_clamp: bool,
}

impl<'a> PixelReader<'a> {
    /// Create a reader positioned at (x, y).
    pub fn new(buf: &'a PixelBuffer, x: i64, y: i64, zero_alpha_on_clamp: bool) -> Self {
        Self {
            buf,
            x,
            y,
            zero_alpha_on_clamp,
        }
    }

    /// Jump to absolute coordinates.
    #[inline]
    pub fn set_coordinates(&mut self, x: i64, y: i64) {
        self.x = x;
        self.y = y;
    }

    /// Current coordinates (may be outside the buffer).
    #[inline]
    pub fn coordinates(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    #[inline]
    pub fn step_left(&mut self) {
        self.x -= 1;
    }

    #[inline]
    pub fn step_right(&mut self) {
        self.x += 1;
    }

    #[inline]
    pub fn step_up(&mut self) {
        self.y -= 1;
    }

    #[inline]
    pub fn step_down(&mut self) {
        self.y += 1;
    }

    /// Read the pixel under the cursor, clamping to the nearest edge.
    pub fn pixel(&self) -> PackedBgra {
        let cx = self.x.clamp(0, self.buf.width as i64 - 1) as u32;
        let cy = self.y.clamp(0, self.buf.height as i64 - 1) as u32;
        let clamped = cx as i64 != self.x || cy as i64 != self.y;
        let pixel = self.buf.pixels[cy as usize * self.buf.width as usize + cx as usize];
        if clamped && self.zero_alpha_on_clamp {
            pixel.with_alpha(0)
        } else {
            pixel
        }
    }
}

/// A write cursor over a [`PixelBuffer`].
///
/// Out-of-bounds writes are silently dropped; the cursor never writes
/// outside the buffer.
#[derive(Debug)]
pub struct PixelWriter<'a> {
    buf: &'a mut PixelBuffer,
    x: i64,
    y: i64,
}

impl<'a> PixelWriter<'a> {
    /// Create a writer positioned at (x, y).
    pub fn new(buf: &'a mut PixelBuffer, x: i64, y: i64) -> Self {
        Self { buf, x, y }
    }

    /// Jump to absolute coordinates.
    #[inline]
    pub fn set_coordinates(&mut self, x: i64, y: i64) {
        self.x = x;
        self.y = y;
    }

    #[inline]
    pub fn step_left(&mut self) {
        self.x -= 1;
    }

    #[inline]
    pub fn step_right(&mut self) {
        self.x += 1;
    }

    #[inline]
    pub fn step_up(&mut self) {
        self.y -= 1;
    }

    #[inline]
    pub fn step_down(&mut self) {
        self.y += 1;
    }

    /// Write the pixel under the cursor; a no-op when out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, pixel: PackedBgra) {
        if (0..self.buf.width as i64).contains(&self.x)
            && (0..self.buf.height as i64).contains(&self.y)
        {
            let i = self.y as usize * self.buf.width as usize + self.x as usize;
            self.buf.pixels[i] = pixel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_buffer(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                buf.set(x, y, PackedBgra::bgra(x as u8, y as u8, 7, 255));
            }
        }
        buf
    }

    #[test]
    fn packed_bgra_roundtrips_channels() {
        let p = PackedBgra::bgra(1, 2, 3, 4);
        assert_eq!((p.b(), p.g(), p.r(), p.a()), (1, 2, 3, 4));
    }

    #[test]
    fn rgb_is_opaque() {
        let p = PackedBgra::rgb(10, 20, 30);
        assert_eq!((p.r(), p.g(), p.b(), p.a()), (10, 20, 30, 255));
    }

    #[test]
    fn with_alpha_keeps_color() {
        let p = PackedBgra::rgb(10, 20, 30).with_alpha(0);
        assert_eq!((p.r(), p.g(), p.b(), p.a()), (10, 20, 30, 0));
    }

    #[test]
    fn new_buffer_is_transparent() {
        let buf = PixelBuffer::new(4, 4);
        assert!(buf.pixels().iter().all(|&p| p == PackedBgra::TRANSPARENT));
    }

    #[test]
    #[should_panic(expected = "width must be > 0")]
    fn zero_width_panics() {
        PixelBuffer::new(0, 4);
    }

    #[test]
    #[should_panic(expected = "height must be > 0")]
    fn zero_height_panics() {
        PixelBuffer::new(4, 0);
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let buf = PixelBuffer::new(4, 4);
        assert_eq!(buf.get(4, 0), None);
        assert_eq!(buf.get(0, 4), None);
    }

    #[test]
    fn set_out_of_bounds_is_dropped() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.set(4, 0, PackedBgra::WHITE);
        buf.set(0, 4, PackedBgra::WHITE);
        assert!(buf.pixels().iter().all(|&p| p == PackedBgra::TRANSPARENT));
    }

    #[test]
    fn reader_clamps_to_edges() {
        let buf = gradient_buffer(8, 8);
        let mut reader = PixelReader::new(&buf, -3, -5, false);
        assert_eq!(reader.pixel(), buf.get(0, 0).unwrap());
        reader.set_coordinates(100, 3);
        assert_eq!(reader.pixel(), buf.get(7, 3).unwrap());
        reader.set_coordinates(2, 100);
        assert_eq!(reader.pixel(), buf.get(2, 7).unwrap());
    }

    #[test]
    fn reader_zero_alpha_mode_only_affects_clamped_reads() {
        let buf = gradient_buffer(8, 8);
        let mut reader = PixelReader::new(&buf, 2, 2, true);
        assert_eq!(reader.pixel().a(), 255);
        reader.set_coordinates(-1, 2);
        let clamped = reader.pixel();
        assert_eq!(clamped.a(), 0);
        // Color channels still come from the edge pixel.
        let edge = buf.get(0, 2).unwrap();
        assert_eq!((clamped.b(), clamped.g(), clamped.r()), (edge.b(), edge.g(), edge.r()));
    }

    #[test]
    fn reader_steps_move_one_pixel() {
        let buf = gradient_buffer(8, 8);
        let mut reader = PixelReader::new(&buf, 4, 4, false);
        reader.step_right();
        assert_eq!(reader.coordinates(), (5, 4));
        reader.step_down();
        assert_eq!(reader.coordinates(), (5, 5));
        reader.step_left();
        reader.step_up();
        assert_eq!(reader.coordinates(), (4, 4));
    }

    #[test]
    fn row_column_iteration_visits_every_pixel() {
        // The effect loop's pattern: a row reader stepped down, a column
        // copy stepped right.
        let buf = gradient_buffer(5, 3);
        let mut row = PixelReader::new(&buf, 0, 0, false);
        for y in 0..3 {
            let mut col = row;
            for x in 0..5 {
                assert_eq!(col.pixel(), buf.get(x, y).unwrap());
                col.step_right();
            }
            row.step_down();
        }
    }

    #[test]
    fn writer_drops_out_of_bounds_writes() {
        let mut buf = PixelBuffer::new(4, 4);
        let mut writer = PixelWriter::new(&mut buf, -1, 0);
        writer.set_pixel(PackedBgra::WHITE);
        writer.set_coordinates(4, 4);
        writer.set_pixel(PackedBgra::WHITE);
        assert!(buf.pixels().iter().all(|&p| p == PackedBgra::TRANSPARENT));
    }

    #[test]
    fn writer_writes_in_bounds() {
        let mut buf = PixelBuffer::new(4, 4);
        let mut writer = PixelWriter::new(&mut buf, 1, 2);
        writer.set_pixel(PackedBgra::WHITE);
        assert_eq!(buf.get(1, 2), Some(PackedBgra::WHITE));
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn reads_never_panic(
                w in 1u32..32,
                h in 1u32..32,
                x in -100i64..100,
                y in -100i64..100,
            ) {
                let buf = gradient_buffer(w, h);
                let reader = PixelReader::new(&buf, x, y, false);
                let _ = reader.pixel();
            }

            #[test]
            fn clamped_read_matches_clamped_get(
                w in 1u32..32,
                h in 1u32..32,
                x in -100i64..100,
                y in -100i64..100,
            ) {
                let buf = gradient_buffer(w, h);
                let reader = PixelReader::new(&buf, x, y, false);
                let cx = x.clamp(0, w as i64 - 1) as u32;
                let cy = y.clamp(0, h as i64 - 1) as u32;
                prop_assert_eq!(reader.pixel(), buf.get(cx, cy).unwrap());
            }

            #[test]
            fn writes_never_escape_bounds(
                w in 1u32..16,
                h in 1u32..16,
                x in -20i64..40,
                y in -20i64..40,
            ) {
                let mut buf = PixelBuffer::new(w, h);
                let mut writer = PixelWriter::new(&mut buf, x, y);
                writer.set_pixel(PackedBgra::WHITE);
                let in_bounds = (0..w as i64).contains(&x) && (0..h as i64).contains(&y);
                let written = buf.pixels().iter().filter(|&&p| p == PackedBgra::WHITE).count();
                prop_assert_eq!(written, usize::from(in_bounds));
            }
        }
    }
}
