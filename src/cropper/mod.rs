//! Thumbnail cropping.
//!
//! Video thumbnails are almost always wider than tall; cover art wants
//! a square. The cropper takes the largest centered square of the
//! source image, resizes it to a fixed resolution and writes the
//! result as a JPEG next to the original.

use image::imageops::FilterType;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Canonical side length of the produced cover art.
pub const COVER_SIZE: u32 = 720;

/// MIME type of the cropper's output, used by the tag writer.
pub const COVER_MIME: &str = "image/jpeg";

/// Center-crop an image to a square and resize it to
/// [`COVER_SIZE`]×[`COVER_SIZE`].
///
/// The result is written as `<stem>.jpg` alongside the input and its
/// path returned. Decode failures on corrupt files propagate as-is.
pub fn crop_to_square(thumbnail: &Path) -> Result<PathBuf> {
    let img = image::open(thumbnail)?;

    let (width, height) = (img.width(), img.height());
    let side = width.min(height);
    let left = (width - side) / 2;
    let top = (height - side) / 2;

    let square = img
        .crop_imm(left, top, side, side)
        .resize_exact(COVER_SIZE, COVER_SIZE, FilterType::Lanczos3);

    let out_path = thumbnail.with_extension("jpg");
    // `save` picks the JPEG encoder from the extension
    square.to_rgb8().save(&out_path)?;

    tracing::debug!(
        src = %thumbnail.display(),
        out = %out_path.display(),
        side,
        "Cropped thumbnail"
    );
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    /// A wide image: black with a white centered square of side `h`.
    fn wide_test_image(w: u32, h: u32) -> RgbImage {
        let mut img = RgbImage::from_pixel(w, h, Rgb([0, 0, 0]));
        let left = (w - h) / 2;
        for y in 0..h {
            for x in left..left + h {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        img
    }

    #[test]
    fn test_output_is_canonical_size() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("thumb.png");
        wide_test_image(1280, 720).save(&src).unwrap();

        let out = crop_to_square(&src).unwrap();
        let result = image::open(&out).unwrap();
        assert_eq!(result.width(), COVER_SIZE);
        assert_eq!(result.height(), COVER_SIZE);
    }

    #[test]
    fn test_crop_takes_centered_square() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("thumb.png");
        // White centered square exactly matches the crop window, so a
        // centered crop produces an (almost) all-white result.
        wide_test_image(1280, 720).save(&src).unwrap();

        let out = crop_to_square(&src).unwrap();
        let result = image::open(&out).unwrap().to_rgb8();
        let center = result.get_pixel(COVER_SIZE / 2, COVER_SIZE / 2);
        let corner = result.get_pixel(2, 2);
        assert!(center.0[0] > 200, "center should be white: {:?}", center);
        assert!(corner.0[0] > 200, "corner should be white: {:?}", corner);
    }

    #[test]
    fn test_tall_image_is_cropped_vertically() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("tall.png");
        RgbImage::from_pixel(200, 600, Rgb([50, 60, 70]))
            .save(&src)
            .unwrap();

        let out = crop_to_square(&src).unwrap();
        let result = image::open(&out).unwrap();
        assert_eq!((result.width(), result.height()), (COVER_SIZE, COVER_SIZE));
    }

    #[test]
    fn test_output_lands_next_to_input_as_jpg() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("cover.webp");
        RgbImage::from_pixel(100, 100, Rgb([1, 2, 3]))
            .save_with_format(&src, image::ImageFormat::WebP)
            .unwrap();

        let out = crop_to_square(&src).unwrap();
        assert_eq!(out, temp.path().join("cover.jpg"));
        assert!(out.exists());
    }

    #[test]
    fn test_corrupt_image_propagates_error() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("broken.jpg");
        std::fs::write(&src, b"definitely not an image").unwrap();

        assert!(crop_to_square(&src).is_err());
    }
}
