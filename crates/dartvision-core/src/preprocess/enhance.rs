use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::error::Result;
use crate::filters::levels::enhance;
use crate::frame::EncodedImage;
use crate::pipeline::config::PreprocessConfig;

use super::encode::encode_jpeg_rgb;

/// Aspect-preserving output size for a `width`x`height` source.
///
/// Height is rounded to the nearest pixel and never drops below 1.
pub fn target_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    let w = width.max(1) as u64;
    let scaled = (height as u64 * target_width as u64 + w / 2) / w;
    (target_width, scaled.clamp(1, u32::MAX as u64) as u32)
}

/// Resample to `target_width` with a triangle filter.
pub fn resample_to_width(image: &RgbImage, target_width: u32) -> RgbImage {
    let (tw, th) = target_dimensions(image.width(), image.height(), target_width);
    if (tw, th) == image.dimensions() {
        return image.clone();
    }
    imageops::resize(image, tw, th, FilterType::Triangle)
}

/// Boost contrast, saturation and brightness of an already resampled frame and compress it.
pub fn enhance_frame(resized: &RgbImage, config: &PreprocessConfig) -> Result<EncodedImage> {
    let boosted = enhance(resized, config.contrast, config.saturation, config.brightness);
    encode_jpeg_rgb(&boosted, config.enhanced_quality)
}
