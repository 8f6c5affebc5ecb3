//! Pointwise and geometric picture transforms.

use crate::{BlurError, Picture, Pixel, MAX_INTENSITY};
use core::fmt;
use core::str::FromStr;

/// Clockwise rotation angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Angle {
    Deg90,
    Deg180,
    Deg270,
}

impl Angle {
    pub fn degrees(self) -> u32 {
        match self {
            Angle::Deg90 => 90,
            Angle::Deg180 => 180,
            Angle::Deg270 => 270,
        }
    }
}

impl FromStr for Angle {
    type Err = BlurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i32>() {
            Ok(90) => Ok(Angle::Deg90),
            Ok(180) => Ok(Angle::Deg180),
            Ok(270) => Ok(Angle::Deg270),
            _ => Err(BlurError::InvalidAngle(s.to_string())),
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Mirror plane for [`flip`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
    /// Top and bottom swap.
    Vertical,
    /// Left and right swap.
    Horizontal,
}

impl FromStr for Plane {
    type Err = BlurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "V" => Ok(Plane::Vertical),
            "H" => Ok(Plane::Horizontal),
            _ => Err(BlurError::InvalidPlane(s.to_string())),
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Plane::Vertical => "V",
            Plane::Horizontal => "H",
        })
    }
}

/// Replace every channel `c` with `255 - c`.
pub fn invert(picture: &mut Picture) {
    picture.map_pixels(|p| {
        Pixel::new(
            MAX_INTENSITY - p.red,
            MAX_INTENSITY - p.green,
            MAX_INTENSITY - p.blue,
        )
    });
}

/// Set every channel to the truncated mean of the three channels.
pub fn grayscale(picture: &mut Picture) {
    picture.map_pixels(|p| {
        let avg = ((u16::from(p.red) + u16::from(p.green) + u16::from(p.blue)) / 3) as u8;
        Pixel::new(avg, avg, avg)
    });
}

/// Rotate clockwise; 90 and 270 swap width and height.
pub fn rotate(picture: &mut Picture, angle: Angle) {
    let (w, h) = picture.dimensions();
    let (nw, nh) = match angle {
        Angle::Deg180 => (w, h),
        Angle::Deg90 | Angle::Deg270 => (h, w),
    };

    let mut out = Picture::from_parts(nw, nh, vec![0; picture.as_raw().len()]);
    for x in 0..nw {
        for y in 0..nh {
            let p = match angle {
                Angle::Deg90 => picture.pixel(y, nw - 1 - x),
                Angle::Deg180 => picture.pixel(nw - 1 - x, nh - 1 - y),
                Angle::Deg270 => picture.pixel(nh - 1 - y, x),
            };
            out.put_pixel(x, y, p);
        }
    }
    picture.overwrite(out);
}

/// Mirror across `plane`.
pub fn flip(picture: &mut Picture, plane: Plane) {
    let (w, h) = picture.dimensions();
    let mut out = Picture::from_parts(w, h, vec![0; picture.as_raw().len()]);
    for x in 0..w {
        for y in 0..h {
            let p = match plane {
                Plane::Vertical => picture.pixel(x, h - 1 - y),
                Plane::Horizontal => picture.pixel(w - 1 - x, y),
            };
            out.put_pixel(x, y, p);
        }
    }
    picture.overwrite(out);
}
