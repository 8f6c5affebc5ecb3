//! Tolerance comparison between a baseline picture and a candidate.

use crate::{Picture, Pixel};
use core::fmt;

/// Per-channel tolerance used by the benchmark and the compare tool.
pub const DEFAULT_TOLERANCE: u8 = 1;

/// Outcome of [`compare_pictures`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Identical,
    DimensionMismatch {
        baseline: (u32, u32),
        candidate: (u32, u32),
    },
    /// First coordinate (scanning column by column) whose pixels differ by
    /// more than the tolerance on some channel.
    PixelMismatch {
        x: u32,
        y: u32,
        baseline: Pixel,
        candidate: Pixel,
    },
}

impl Comparison {
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Identical)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Identical => f.write_str("success - pictures identical!"),
            Comparison::DimensionMismatch {
                baseline,
                candidate,
            } => write!(
                f,
                "[!] fail - pictures do not have equal dimensions ({}x{} vs {}x{})",
                baseline.0, baseline.1, candidate.0, candidate.1
            ),
            Comparison::PixelMismatch {
                x,
                y,
                baseline: a,
                candidate: b,
            } => write!(
                f,
                "[!] fail - pictures not equal at cell ({x},{y})\n    \
                 pixel1 RGB = \t({},\t {},\t {})\n    \
                 pixel2 RGB = \t({},\t {},\t {})",
                a.red, a.green, a.blue, b.red, b.green, b.blue
            ),
        }
    }
}

/// Compare `candidate` against `baseline`, allowing each channel to differ by
/// up to `tolerance`.
pub fn compare_pictures(baseline: &Picture, candidate: &Picture, tolerance: u8) -> Comparison {
    if baseline.dimensions() != candidate.dimensions() {
        return Comparison::DimensionMismatch {
            baseline: baseline.dimensions(),
            candidate: candidate.dimensions(),
        };
    }

    let (w, h) = baseline.dimensions();
    for x in 0..w {
        for y in 0..h {
            let a = baseline.pixel(x, y);
            let b = candidate.pixel(x, y);
            if !a.within(b, tolerance) {
                return Comparison::PixelMismatch {
                    x,
                    y,
                    baseline: a,
                    candidate: b,
                };
            }
        }
    }
    Comparison::Identical
}
