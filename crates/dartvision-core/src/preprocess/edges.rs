use image::RgbImage;

use crate::color::luminance;
use crate::error::Result;
use crate::filters::sobel::{edge_map, gradient_magnitude_array};
use crate::frame::EncodedImage;
use crate::pipeline::config::PreprocessConfig;

use super::encode::encode_jpeg_gray;

/// Luminance, Sobel magnitude, threshold, compress.
///
/// Runs on the resampled but unenhanced frame. Border pixels stay black.
pub fn extract_edges(resized: &RgbImage, config: &PreprocessConfig) -> Result<EncodedImage> {
    let gray = luminance(resized);
    let magnitude = gradient_magnitude_array(&gray);
    let map = edge_map(&magnitude, config.edge_threshold, &config.edge_rendering);
    encode_jpeg_gray(&map, config.edge_quality)
}
