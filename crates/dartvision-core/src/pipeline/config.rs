use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ACTIVE_PERIOD_MS, DEFAULT_API_KEY_ENV, DEFAULT_BRIGHTNESS,
    DEFAULT_CALIBRATION_MODEL, DEFAULT_CALIBRATION_PERIOD_MS, DEFAULT_CONTRAST,
    DEFAULT_EDGE_GAIN, DEFAULT_EDGE_QUALITY, DEFAULT_EDGE_THRESHOLD, DEFAULT_ENHANCED_QUALITY,
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_ORACLE_ENDPOINT, DEFAULT_SATURATION,
    DEFAULT_SCORING_MODEL, DEFAULT_TARGET_WIDTH, DEFAULT_THINKING_BUDGET, DEFAULT_VOTE_WINDOW,
};
use crate::error::{DartError, Result};
use crate::session::SessionPhase;

/// Top-level configuration, loadable from TOML.
///
/// Every section and field is optional; anything missing takes its default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DartConfig {
    pub scheduler: SchedulerConfig,
    pub preprocess: PreprocessConfig,
    pub session: SessionConfig,
    pub stability: StabilityConfig,
    pub oracle: OracleConfig,
}

impl DartConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| DartError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DartError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(DartError::Config(msg.to_string()));

        if self.scheduler.calibration_period_ms == 0 || self.scheduler.active_period_ms == 0 {
            return fail("sampling periods must be non-zero");
        }
        if self.preprocess.target_width == 0 {
            return fail("target_width must be non-zero");
        }
        if !(1..=100).contains(&self.preprocess.enhanced_quality)
            || !(1..=100).contains(&self.preprocess.edge_quality)
        {
            return fail("JPEG quality must be within 1..=100");
        }
        if self.preprocess.edge_threshold.is_nan() || self.preprocess.edge_threshold < 0.0 {
            return fail("edge_threshold must be non-negative");
        }
        if self.session.failure_threshold == 0 {
            return fail("failure_threshold must be at least 1");
        }
        if self.stability.vote_window == 0 {
            return fail("vote_window must be at least 1");
        }
        Ok(())
    }
}

/// Sampling cadence of the capture loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Period between ticks while calibrating, in milliseconds.
    pub calibration_period_ms: u64,
    /// Period between ticks while scoring, in milliseconds.
    pub active_period_ms: u64,
}

impl SchedulerConfig {
    /// Tick period for the given phase. Idle ticks at the active cadence.
    pub fn period_for(&self, phase: SessionPhase) -> Duration {
        match phase {
            SessionPhase::Calibrating => Duration::from_millis(self.calibration_period_ms),
            SessionPhase::Idle | SessionPhase::Active => {
                Duration::from_millis(self.active_period_ms)
            }
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            calibration_period_ms: DEFAULT_CALIBRATION_PERIOD_MS,
            active_period_ms: DEFAULT_ACTIVE_PERIOD_MS,
        }
    }
}

/// How edge pixels above the threshold are drawn.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum EdgeRendering {
    /// Full white above the threshold.
    #[default]
    Binary,
    /// `min(255, magnitude * gain)` above the threshold.
    Proportional { gain: f32 },
}

impl EdgeRendering {
    /// Proportional rendering with the default gain.
    pub fn proportional() -> Self {
        Self::Proportional {
            gain: DEFAULT_EDGE_GAIN,
        }
    }
}

impl std::fmt::Display for EdgeRendering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary => write!(f, "Binary"),
            Self::Proportional { gain } => write!(f, "Proportional (gain={gain})"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Output width in pixels; height follows the source aspect ratio.
    pub target_width: u32,
    pub contrast: f32,
    pub saturation: f32,
    pub brightness: f32,
    /// JPEG quality of the enhanced frame (1-100).
    pub enhanced_quality: u8,
    /// Produce the edge map as a second channel.
    pub emit_edges: bool,
    /// Sobel magnitude cutoff on the 0-255 luminance scale.
    pub edge_threshold: f32,
    /// JPEG quality of the edge map (1-100).
    pub edge_quality: u8,
    pub edge_rendering: EdgeRendering,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            contrast: DEFAULT_CONTRAST,
            saturation: DEFAULT_SATURATION,
            brightness: DEFAULT_BRIGHTNESS,
            enhanced_quality: DEFAULT_ENHANCED_QUALITY,
            emit_edges: true,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            edge_quality: DEFAULT_EDGE_QUALITY,
            edge_rendering: EdgeRendering::Binary,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Consecutive non-detections while scoring before falling back to calibration.
    pub failure_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }
}

/// When projectile markers follow the newest reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerPolicy {
    /// Refresh whenever the vote window agrees, even if the score is unchanged.
    #[default]
    OnAgreement,
    /// Refresh on every reading, including ones rejected as noise.
    Always,
    /// Refresh only together with a score commit.
    OnCommit,
}

impl std::fmt::Display for MarkerPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnAgreement => write!(f, "On Agreement"),
            Self::Always => write!(f, "Always"),
            Self::OnCommit => write!(f, "On Commit"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Number of most recent readings that must agree (k).
    pub vote_window: usize,
    pub marker_policy: MarkerPolicy,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            vote_window: DEFAULT_VOTE_WINDOW,
            marker_policy: MarkerPolicy::OnAgreement,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL of the generative-language REST API.
    pub endpoint: String,
    pub calibration_model: String,
    pub scoring_model: String,
    /// Environment variable the API key is read from.
    pub api_key_env: String,
    /// Reasoning budget for the scoring model (0 disables).
    pub thinking_budget: u32,
    /// Attach the edge map to scoring requests when available.
    pub send_edges: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ORACLE_ENDPOINT.to_string(),
            calibration_model: DEFAULT_CALIBRATION_MODEL.to_string(),
            scoring_model: DEFAULT_SCORING_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            thinking_budget: DEFAULT_THINKING_BUDGET,
            send_edges: true,
        }
    }
}
