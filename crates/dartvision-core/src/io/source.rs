use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::frame::{Frame, FrameMetadata};

use super::image_io::load_frame;

/// Extensions recognised as still images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Live frame provider. Device open/close is the caller's business.
pub trait FrameSource: Send {
    /// The next ready frame, or `None` when no frame is ready yet.
    fn acquire(&mut self) -> Result<Option<Frame>>;

    /// No frame will ever be ready again. Live sources never run dry.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Replays still images from a directory in lexical order.
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    cursor: usize,
    looping: bool,
    opened_at: Instant,
    served: usize,
}

impl ImageSequenceSource {
    /// Collect every image file directly inside `dir`.
    pub fn open(dir: &Path, looping: bool) -> Result<Self> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_image(p))
            .collect();
        paths.sort();
        info!(dir = %dir.display(), frames = paths.len(), looping, "Opened image sequence");
        Ok(Self::from_paths(paths, looping))
    }

    pub fn from_paths(paths: Vec<PathBuf>, looping: bool) -> Self {
        Self {
            paths,
            cursor: 0,
            looping,
            opened_at: Instant::now(),
            served: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceSource {
    fn acquire(&mut self) -> Result<Option<Frame>> {
        if self.cursor >= self.paths.len() {
            if !self.looping || self.paths.is_empty() {
                return Ok(None);
            }
            self.cursor = 0;
        }

        let path = &self.paths[self.cursor];
        self.cursor += 1;
        debug!(path = %path.display(), "Acquiring frame");

        let frame = load_frame(path)?;
        let metadata = FrameMetadata {
            index: self.served,
            captured_at_ms: Some(self.opened_at.elapsed().as_millis() as u64),
        };
        self.served += 1;
        Ok(Some(Frame::with_metadata(frame.image, metadata)))
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.paths.len() && (!self.looping || self.paths.is_empty())
    }
}
