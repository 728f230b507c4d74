//! # Analysis oracle boundary
//!
//! The external visual-analysis service sits behind [`AnalysisOracle`]: two
//! fallible async capabilities, one per session phase. The core never sees
//! prompts, schemas or HTTP; it only sees typed reports and
//! [`DartError::OracleTransport`](crate::error::DartError::OracleTransport) /
//! [`DartError::OracleFormat`](crate::error::DartError::OracleFormat) failures.

mod gemini;
mod scripted;
pub mod wire;

pub use gemini::GeminiOracle;
pub use scripted::{ScriptStep, ScriptedOracle};

use async_trait::async_trait;

use crate::detection::{CalibrationReport, Detection};
use crate::error::Result;
use crate::frame::PreparedInput;

/// Visual-analysis service that turns prepared frames into typed readings.
///
/// Calls may take arbitrarily long and may fail; no ordering is promised
/// between calls beyond what the capture loop's single-flight rule imposes.
#[async_trait]
pub trait AnalysisOracle: Send + Sync {
    /// Oracle name, for logs.
    fn name(&self) -> &str;

    /// Is the surface in view and are its sectors readable?
    async fn check_calibration(&self, input: &PreparedInput) -> Result<CalibrationReport>;

    /// Locate projectiles and total the score.
    async fn score_frame(&self, input: &PreparedInput) -> Result<Detection>;
}
