use base64::Engine;
use image::RgbImage;

/// A single captured camera frame.
///
/// Frames are immutable once captured and are consumed by exactly one
/// preprocessing pass.
#[derive(Clone, Debug)]
pub struct Frame {
    /// 8-bit RGB pixels, row-major.
    pub image: RgbImage,
    /// Optional per-frame metadata
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image,
            metadata: FrameMetadata::default(),
        }
    }

    pub fn with_metadata(image: RgbImage, metadata: FrameMetadata) -> Self {
        Self { image, metadata }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    /// Sequence number assigned by the frame source.
    pub index: usize,
    /// Capture time in milliseconds since the source was opened.
    pub captured_at_ms: Option<u64>,
}

/// A compressed bitmap ready to be shipped to the oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub mime_type: &'static str,
}

impl EncodedImage {
    pub fn jpeg(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
            mime_type: "image/jpeg",
        }
    }

    /// Standard base64 rendering used for inline request payloads.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Derived bitmaps for one analysis call.
///
/// Owned by a single in-flight cycle and dropped once the oracle call
/// resolves or fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedInput {
    /// Contrast/saturation boosted frame.
    pub enhanced: EncodedImage,
    /// White-on-black edge map, when edge extraction is enabled.
    pub edges: Option<EncodedImage>,
}

impl PreparedInput {
    pub fn width(&self) -> u32 {
        self.enhanced.width
    }

    pub fn height(&self) -> u32 {
        self.enhanced.height
    }

    /// Images in the order they are sent: enhanced first, then edges.
    pub fn images(&self) -> impl Iterator<Item = &EncodedImage> {
        std::iter::once(&self.enhanced).chain(self.edges.iter())
    }
}
