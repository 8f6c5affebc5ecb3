//! `image`-crate integration: decode files into [`Picture`]s and back.

use anyhow::{Context, Result};
use image::{ImageReader, RgbImage};
use picblur_core::Picture;
use std::path::Path;

/// Decode any format `image` understands into an RGB picture.
pub fn load_picture(path: &Path) -> Result<Picture> {
    let img = ImageReader::open(path)
        .with_context(|| format!("opening picture {}", path.display()))?
        .decode()
        .with_context(|| format!("decoding picture {}", path.display()))?
        .to_rgb8();
    picture_from_rgb(img)
}

/// Encode `picture`; the format follows the file extension.
pub fn save_picture(picture: &Picture, path: &Path) -> Result<()> {
    rgb_from_picture(picture)?
        .save(path)
        .with_context(|| format!("saving picture {}", path.display()))
}

pub fn picture_from_rgb(img: RgbImage) -> Result<Picture> {
    let (w, h) = img.dimensions();
    Ok(Picture::from_raw(w, h, img.into_raw())?)
}

pub fn rgb_from_picture(picture: &Picture) -> Result<RgbImage> {
    RgbImage::from_raw(
        picture.width(),
        picture.height(),
        picture.as_raw().to_vec(),
    )
    .context("picture buffer does not match its dimensions")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use picblur_core::Pixel;

    #[test]
    fn rgb_image_conversion_keeps_xy() {
        let mut img = RgbImage::from_pixel(4, 3, Rgb([1, 2, 3]));
        img.put_pixel(3, 2, Rgb([200, 100, 50]));
        let pic = picture_from_rgb(img.clone()).unwrap();
        assert_eq!(pic.dimensions(), (4, 3));
        assert_eq!(pic.pixel(3, 2), Pixel::new(200, 100, 50));
        assert_eq!(rgb_from_picture(&pic).unwrap(), img);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_picture(Path::new("does/not/exist.png")).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.png"));
    }
}
