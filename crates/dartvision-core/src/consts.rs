/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Red weight of the luminance-preserving saturation matrix.
pub const SATURATE_R: f32 = 0.213;

/// Green weight of the luminance-preserving saturation matrix.
pub const SATURATE_G: f32 = 0.715;

/// Blue weight of the luminance-preserving saturation matrix.
pub const SATURATE_B: f32 = 0.072;

/// Width (in pixels) frames are resampled to before analysis.
pub const DEFAULT_TARGET_WIDTH: u32 = 1024;

/// Contrast multiplier around mid-grey for the enhanced frame.
pub const DEFAULT_CONTRAST: f32 = 1.4;

/// Saturation factor for the enhanced frame (1.0 = unchanged).
pub const DEFAULT_SATURATION: f32 = 1.8;

/// Brightness multiplier for the enhanced frame.
pub const DEFAULT_BRIGHTNESS: f32 = 1.1;

/// JPEG quality of the enhanced frame.
pub const DEFAULT_ENHANCED_QUALITY: u8 = 80;

/// JPEG quality of the edge map.
pub const DEFAULT_EDGE_QUALITY: u8 = 60;

/// Sobel magnitude (on the 0-255 luminance scale) above which a pixel is an edge.
pub const DEFAULT_EDGE_THRESHOLD: f32 = 40.0;

/// Gain of the proportional edge rendering.
pub const DEFAULT_EDGE_GAIN: f32 = 2.0;

/// Sampling period while calibrating.
pub const DEFAULT_CALIBRATION_PERIOD_MS: u64 = 1_000;

/// Sampling period while scoring.
pub const DEFAULT_ACTIVE_PERIOD_MS: u64 = 2_000;

/// Consecutive non-detections in the active phase that force recalibration.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Number of most recent readings that must agree before a score commits.
pub const DEFAULT_VOTE_WINDOW: usize = 2;

/// Side length of the normalized projectile coordinate grid.
pub const GRID_MAX: f32 = 1000.0;

/// Grid position used when the oracle omits a projectile's coordinates.
pub const GRID_CENTER: f32 = 500.0;

/// Default model used for calibration checks.
pub const DEFAULT_CALIBRATION_MODEL: &str = "gemini-3-flash-preview";

/// Default model used for scoring.
pub const DEFAULT_SCORING_MODEL: &str = "gemini-3-pro-preview";

/// Default environment variable holding the oracle API key.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default base URL of the generative-language REST API.
pub const DEFAULT_ORACLE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Reasoning budget granted to the scoring model.
pub const DEFAULT_THINKING_BUDGET: u32 = 16_000;
