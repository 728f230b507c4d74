mod edges;
mod encode;
mod enhance;

pub use edges::extract_edges;
pub use encode::{encode_jpeg_gray, encode_jpeg_rgb};
pub use enhance::{enhance_frame, resample_to_width, target_dimensions};

use tracing::debug;

use crate::error::{DartError, Result};
use crate::frame::{Frame, PreparedInput};
use crate::pipeline::config::PreprocessConfig;

/// Turn a raw frame into the enhanced (and optionally edge) bitmaps sent to the oracle.
///
/// Output dimensions depend only on the input dimensions and `target_width`,
/// and identical inputs produce byte-identical outputs.
pub fn prepare(frame: &Frame, config: &PreprocessConfig) -> Result<PreparedInput> {
    if frame.is_empty() || config.target_width == 0 {
        return Err(DartError::InvalidFrame {
            width: frame.width(),
            height: frame.height(),
        });
    }

    let resized = resample_to_width(&frame.image, config.target_width);
    let enhanced = enhance_frame(&resized, config)?;
    let edges = if config.emit_edges {
        Some(extract_edges(&resized, config)?)
    } else {
        None
    };

    debug!(
        frame = frame.metadata.index,
        width = enhanced.width,
        height = enhanced.height,
        enhanced_bytes = enhanced.bytes.len(),
        edge_bytes = edges.as_ref().map(|e| e.bytes.len()).unwrap_or(0),
        "Frame prepared"
    );

    Ok(PreparedInput { enhanced, edges })
}
