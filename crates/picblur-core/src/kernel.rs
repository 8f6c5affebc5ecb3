//! 3×3 mean-blur stencil.

use crate::canvas::PixelSink;
use crate::{Picture, Pixel};

/// Number of samples in the blur neighborhood.
pub const BLUR_REGION_SIZE: u32 = 9;

/// True for pixels in the first/last row or column.
#[inline]
pub fn is_boundary(x: u32, y: u32, width: u32, height: u32) -> bool {
    x == 0 || y == 0 || x + 1 == width || y + 1 == height
}

/// Blurred value of `(x, y)` in `input`.
///
/// Boundary pixels are returned unchanged. Interior pixels become the
/// per-channel mean of the 3×3 neighborhood (center included), truncated
/// toward zero.
#[inline]
pub fn blurred_pixel(x: u32, y: u32, input: &Picture) -> Pixel {
    let (w, h) = input.dimensions();
    if is_boundary(x, y, w, h) {
        return input.pixel(x, y);
    }

    let mut sum = [0u32; 3];
    for ny in y - 1..=y + 1 {
        for nx in x - 1..=x + 1 {
            let p = input.pixel(nx, ny);
            sum[0] += u32::from(p.red);
            sum[1] += u32::from(p.green);
            sum[2] += u32::from(p.blue);
        }
    }

    // mean of 9 u8 samples always fits in u8
    Pixel::new(
        (sum[0] / BLUR_REGION_SIZE) as u8,
        (sum[1] / BLUR_REGION_SIZE) as u8,
        (sum[2] / BLUR_REGION_SIZE) as u8,
    )
}

/// Compute the blurred pixel at `(x, y)` and write it into `output`.
///
/// The boundary test uses `output`'s dimensions, which match `input`'s for
/// every caller in this crate.
#[inline]
pub fn blur_pixel<S>(x: u32, y: u32, input: &Picture, output: &S)
where
    S: PixelSink + ?Sized,
{
    let pixel = if is_boundary(x, y, output.width(), output.height()) {
        input.pixel(x, y)
    } else {
        blurred_pixel(x, y, input)
    };
    output.put(x, y, pixel);
}
