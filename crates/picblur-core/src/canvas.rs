//! Output buffers that workers write into concurrently.

use crate::{buffer_len, BlurError, Picture, Pixel};
use std::sync::atomic::{AtomicU32, Ordering};

/// Destination of kernel writes.
///
/// Implementations take `&self` so several workers can share one sink; the
/// partitioner guarantees that no two tasks write the same coordinate.
pub trait PixelSink: Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn put(&self, x: u32, y: u32, pixel: Pixel);
}

/// Shared output picture with one atomic cell per pixel.
///
/// Cells hold `0x00RRGGBB`. Writes use relaxed stores: every cell has a single
/// writer, and the pool's drain plus the worker join order them before
/// [`Canvas::into_picture`].
pub struct Canvas {
    width: u32,
    height: u32,
    cells: Vec<AtomicU32>,
}

impl Canvas {
    /// Black canvas of the given size. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> Result<Self, BlurError> {
        buffer_len(width, height)?;
        Ok(Self::black(width, height))
    }

    /// Canvas with the same dimensions as `picture`.
    pub fn like(picture: &Picture) -> Self {
        Self::black(picture.width(), picture.height())
    }

    fn black(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        let cells = (0..len).map(|_| AtomicU32::new(0)).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Read back a single cell.
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(unpack(self.cells[self.index(x, y)].load(Ordering::Relaxed)))
    }

    /// Convert into an owned picture.
    ///
    /// Taking `self` by value means no worker can still hold a reference.
    pub fn into_picture(self) -> Picture {
        let mut data = Vec::with_capacity(self.cells.len() * 3);
        for cell in self.cells {
            data.extend_from_slice(&unpack(cell.into_inner()).to_rgb());
        }
        Picture::from_parts(self.width, self.height, data)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl PixelSink for Canvas {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn put(&self, x: u32, y: u32, pixel: Pixel) {
        assert!(
            x < self.width && y < self.height,
            "canvas write ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        self.cells[self.index(x, y)].store(pack(pixel), Ordering::Relaxed);
    }
}

#[inline]
fn pack(p: Pixel) -> u32 {
    (u32::from(p.red) << 16) | (u32::from(p.green) << 8) | u32::from(p.blue)
}

#[inline]
fn unpack(v: u32) -> Pixel {
    Pixel::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_land_at_xy() {
        let canvas = Canvas::new(3, 2).unwrap();
        canvas.put(1, 1, Pixel::new(200, 100, 7));
        assert_eq!(canvas.get(1, 1), Some(Pixel::new(200, 100, 7)));
        assert_eq!(canvas.get(0, 0), Some(Pixel::BLACK));
        assert_eq!(canvas.get(3, 0), None);

        let pic = canvas.into_picture();
        assert_eq!(pic.dimensions(), (3, 2));
        assert_eq!(pic.pixel(1, 1), Pixel::new(200, 100, 7));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_bounds_write_panics() {
        Canvas::new(2, 2).unwrap().put(0, 2, Pixel::BLACK);
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        assert!(matches!(
            Canvas::new(0, 3),
            Err(BlurError::InvalidDimensions {
                width: 0,
                height: 3
            })
        ));
        assert!(Canvas::new(3, 0).is_err());

        let pic = Canvas::like(&Picture::new(2, 5).unwrap()).into_picture();
        assert_eq!(pic.dimensions(), (2, 5));
    }
}
