use image::codecs::jpeg::JpegEncoder;
use image::{GrayImage, RgbImage};

use crate::error::Result;
use crate::frame::EncodedImage;

/// Compress an RGB image as baseline JPEG.
pub fn encode_jpeg_rgb(image: &RgbImage, quality: u8) -> Result<EncodedImage> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(image)?;
    Ok(EncodedImage::jpeg(bytes, image.width(), image.height()))
}

/// Compress a single-channel image as baseline JPEG.
pub fn encode_jpeg_gray(image: &GrayImage, quality: u8) -> Result<EncodedImage> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(image)?;
    Ok(EncodedImage::jpeg(bytes, image.width(), image.height()))
}
