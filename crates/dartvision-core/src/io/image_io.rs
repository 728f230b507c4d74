use std::path::Path;

use crate::error::Result;
use crate::frame::{EncodedImage, Frame};

/// Load an image file into an RGB frame.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    Ok(Frame::new(img.to_rgb8()))
}

/// Write already-encoded bytes to disk unchanged.
pub fn save_encoded(image: &EncodedImage, path: &Path) -> Result<()> {
    std::fs::write(path, &image.bytes)?;
    Ok(())
}
