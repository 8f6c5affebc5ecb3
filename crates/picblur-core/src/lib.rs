//! Core primitives for blurring RGB pictures in parallel.
//!
//! # Overview
//!
//! This crate exposes the building blocks of the parallel blur engine:
//!
//! - [`kernel`] – the 3×3 mean-blur stencil with boundary pass-through.
//! - [`partition`] – column, row, pixel and sector decompositions of an image
//!   into independent [`Task`]s.
//! - [`pool`] – a fixed-size, scoped worker pool with `submit`/`drain`.
//! - [`engine`] – ties the three together and swaps the blurred result into
//!   the caller's [`Picture`].
//! - [`compare`] – per-channel tolerance comparison against a baseline.
//! - [`transform`] – pointwise transforms (invert, grayscale, rotate, flip).
//!
//! Pictures are plain row-major RGB buffers; decoding and encoding files is
//! left to callers (see the `picblur` crate for `image` integration).
//!
//! # Features
//!
//! - `rayon` – adds [`BlurStrategy::Rayon`], which blurs rows on rayon's
//!   global pool. Numerical results are identical to the sequential path;
//!   it exists as a reference point for benchmarks.
//! - `tracing` – instruments the engine entry points with `tracing` spans.

pub mod canvas;
pub mod compare;
pub mod engine;
pub mod error;
pub mod kernel;
pub mod partition;
pub mod pool;
pub mod transform;

pub use crate::canvas::{Canvas, PixelSink};
pub use crate::compare::{compare_pictures, Comparison, DEFAULT_TOLERANCE};
pub use crate::engine::{blur_sequential, BlurEngine, BlurStrategy, DEFAULT_WORKERS};
pub use crate::error::BlurError;
pub use crate::partition::{Partition, Task, Tasks};
pub use crate::pool::WorkerPool;

/// Largest value a single channel can hold.
pub const MAX_INTENSITY: u8 = 255;

/// An RGB pixel with three independent 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);

    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    #[inline]
    pub const fn to_rgb(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// True when every channel differs from `other` by at most `tolerance`.
    #[inline]
    pub fn within(self, other: Pixel, tolerance: u8) -> bool {
        self.red.abs_diff(other.red) <= tolerance
            && self.green.abs_diff(other.green) <= tolerance
            && self.blue.abs_diff(other.blue) <= tolerance
    }
}

impl From<[u8; 3]> for Pixel {
    #[inline]
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

/// Owned RGB picture in row-major layout, 3 bytes per pixel.
///
/// Coordinates are `(x, y)` from the top-left corner; `x` indexes columns and
/// `y` indexes rows. Both dimensions are always non-zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picture {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Picture {
    /// Allocate a black picture.
    pub fn new(width: u32, height: u32) -> Result<Self, BlurError> {
        Self::from_pixel(width, height, Pixel::BLACK)
    }

    /// Allocate a picture filled with `pixel`.
    pub fn from_pixel(width: u32, height: u32, pixel: Pixel) -> Result<Self, BlurError> {
        let len = buffer_len(width, height)?;
        let data = pixel.to_rgb().iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap an existing interleaved RGB buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BlurError> {
        let expected = buffer_len(width, height)?;
        if data.len() != expected {
            return Err(BlurError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a picture from a buffer whose length already matches.
    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw interleaved RGB bytes.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Pixel at `(x, y)`, or `None` outside the picture.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if !self.contains(x, y) {
            return None;
        }
        let i = self.offset(x, y);
        Some(Pixel::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the picture.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        match self.get(x, y) {
            Some(p) => p,
            None => panic!(
                "pixel ({x}, {y}) out of bounds for {}x{} picture",
                self.width, self.height
            ),
        }
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the picture.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        assert!(
            self.contains(x, y),
            "pixel ({x}, {y}) out of bounds for {}x{} picture",
            self.width,
            self.height
        );
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&pixel.to_rgb());
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.data
            .chunks_exact(3)
            .map(|c| Pixel::new(c[0], c[1], c[2]))
    }

    /// Apply `f` to every pixel in place.
    pub fn map_pixels(&mut self, mut f: impl FnMut(Pixel) -> Pixel) {
        for c in self.data.chunks_exact_mut(3) {
            let p = f(Pixel::new(c[0], c[1], c[2]));
            c.copy_from_slice(&p.to_rgb());
        }
    }

    /// Replace this picture with `next`, dropping the previous buffer.
    ///
    /// Handles to `self` stay valid; only the dimensions and the pixel buffer
    /// change.
    pub fn overwrite(&mut self, next: Picture) {
        *self = next;
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }
}

pub(crate) fn buffer_len(width: u32, height: u32) -> Result<usize, BlurError> {
    if width == 0 || height == 0 {
        return Err(BlurError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(BlurError::InvalidDimensions { width, height })
}
