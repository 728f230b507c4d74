use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::detection::{CalibrationReport, Detection};
use crate::error::{DartError, Result};
use crate::frame::PreparedInput;

use super::AnalysisOracle;

/// One canned oracle answer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptStep {
    Calibration(CalibrationReport),
    Detection(Detection),
    TransportFailure { message: String },
    FormatFailure { message: String },
}

impl ScriptStep {
    fn into_calibration(self) -> Result<CalibrationReport> {
        match self {
            Self::Calibration(report) => Ok(report),
            Self::Detection(d) => Ok(CalibrationReport {
                surface_present: d.surface_present,
                sectors_resolved: d.sectors_resolved,
                status_text: d.status_text,
            }),
            Self::TransportFailure { message } => Err(DartError::OracleTransport(message)),
            Self::FormatFailure { message } => Err(DartError::OracleFormat(message)),
        }
    }

    fn into_detection(self) -> Result<Detection> {
        match self {
            Self::Detection(d) => Ok(d),
            Self::Calibration(report) => Ok(Detection {
                surface_present: report.surface_present,
                status_text: report.status_text,
                projectiles: Vec::new(),
                aggregate_score: 0,
                sectors_resolved: report.sectors_resolved,
            }),
            Self::TransportFailure { message } => Err(DartError::OracleTransport(message)),
            Self::FormatFailure { message } => Err(DartError::OracleFormat(message)),
        }
    }
}

/// Deterministic oracle replaying a fixed sequence of answers.
///
/// Steps are consumed in call order regardless of which capability is asked;
/// a detection answers a calibration check with its surface/sector flags and
/// vice versa. Once the script runs out every call fails with a transport error.
pub struct ScriptedOracle {
    steps: Mutex<VecDeque<ScriptStep>>,
    latency: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Load a JSON array of steps.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let steps: Vec<ScriptStep> = serde_json::from_str(&contents)
            .map_err(|e| DartError::Config(format!("{}: {e}", path.display())))?;
        Ok(Self::new(steps))
    }

    /// Delay every answer by `latency` (tokio time).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Total calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were ever outstanding at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn remaining(&self) -> usize {
        self.steps.lock().map(|s| s.len()).unwrap_or(0)
    }

    async fn next_step(&self) -> Result<ScriptStep> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let step = self.steps.lock().ok().and_then(|mut steps| steps.pop_front());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        step.ok_or_else(|| DartError::OracleTransport("script exhausted".to_string()))
    }
}

#[async_trait]
impl AnalysisOracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn check_calibration(&self, _input: &PreparedInput) -> Result<CalibrationReport> {
        self.next_step().await?.into_calibration()
    }

    async fn score_frame(&self, _input: &PreparedInput) -> Result<Detection> {
        self.next_step().await?.into_detection()
    }
}
