use image::{Rgb, RgbImage};

use crate::consts::{SATURATE_B, SATURATE_G, SATURATE_R};

/// Adjust contrast around the 0.5 midpoint.
///
/// `amount` is multiplied around mid-grey (1.0 = no change, >1.0 = more contrast).
pub fn contrast(px: [f32; 3], amount: f32) -> [f32; 3] {
    px.map(|v| ((v - 0.5) * amount + 0.5).clamp(0.0, 1.0))
}

/// Scale saturation with the luminance-preserving saturation matrix.
///
/// `amount` of 0.0 yields grey, 1.0 leaves the pixel unchanged.
pub fn saturate(px: [f32; 3], amount: f32) -> [f32; 3] {
    let [r, g, b] = px;
    let s = amount;
    let out = [
        (SATURATE_R + (1.0 - SATURATE_R) * s) * r
            + (SATURATE_G - SATURATE_G * s) * g
            + (SATURATE_B - SATURATE_B * s) * b,
        (SATURATE_R - SATURATE_R * s) * r
            + (SATURATE_G + (1.0 - SATURATE_G) * s) * g
            + (SATURATE_B - SATURATE_B * s) * b,
        (SATURATE_R - SATURATE_R * s) * r
            + (SATURATE_G - SATURATE_G * s) * g
            + (SATURATE_B + (1.0 - SATURATE_B) * s) * b,
    ];
    out.map(|v| v.clamp(0.0, 1.0))
}

/// Multiply every channel by `amount`.
pub fn brightness(px: [f32; 3], amount: f32) -> [f32; 3] {
    px.map(|v| (v * amount).clamp(0.0, 1.0))
}

/// Apply contrast, then saturation, then brightness to every pixel.
///
/// Each step clamps to [0, 1] before the next one runs.
pub fn enhance(image: &RgbImage, contrast_amount: f32, saturation: f32, brightness_amount: f32) -> RgbImage {
    let mut out = RgbImage::new(image.width(), image.height());

    for (dst, src) in out.pixels_mut().zip(image.pixels()) {
        let px = src.0.map(|c| c as f32 / 255.0);
        let px = contrast(px, contrast_amount);
        let px = saturate(px, saturation);
        let px = brightness(px, brightness_amount);
        *dst = Rgb(px.map(|v| (v * 255.0).round() as u8));
    }

    out
}
