use image::RgbImage;
use ndarray::Array2;

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};

/// Compute luminance from an RGB image using ITU-R BT.601 weights.
///
/// Values stay on the 0-255 scale of the source so edge thresholds can be
/// expressed in familiar 8-bit units. Shape = (height, width).
pub fn luminance(image: &RgbImage) -> Array2<f32> {
    let (w, h) = image.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for (col, row, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        data[[row as usize, col as usize]] =
            LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_luminance_of_gray_is_identity() {
        let img = RgbImage::from_pixel(4, 3, Rgb([120, 120, 120]));
        let lum = luminance(&img);
        assert_eq!(lum.dim(), (3, 4));
        for v in lum.iter() {
            assert!((*v - 120.0).abs() < 1e-3, "got {v}");
        }
    }

    #[test]
    fn test_luminance_weights() {
        let img = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        let lum = luminance(&img);
        assert!((lum[[0, 0]] - 0.299 * 255.0).abs() < 1e-3);
    }
}
