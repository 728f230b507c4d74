use tracing::{debug, info, warn};

use crate::detection::{CalibrationReport, Detection};
use crate::error::DartError;
use crate::feedback::SessionEvent;
use crate::pipeline::config::DartConfig;
use crate::pipeline::{CycleOutcome, SessionCommand};
use crate::stability::{ConfirmedState, StabilityAggregator, Vote};

use super::phase::{SessionPhase, TransitionCause};

const CALIBRATION_OK_STATUS: &str = "Target locked";
const CALIBRATION_DEFAULT_STATUS: &str = "Center the target...";

/// Explicit session context: phase, failure counter and the stability aggregator.
///
/// Every pipeline stage receives this object instead of reaching for shared
/// globals. All mutation happens on the capture loop between ticks, so no
/// locking is needed. Each operation returns the events it produced, in
/// order, for the caller to hand to a feedback sink.
#[derive(Clone, Debug)]
pub struct Session {
    phase: SessionPhase,
    failures: u32,
    failure_threshold: u32,
    aggregator: StabilityAggregator,
}

impl Session {
    pub fn new(config: &DartConfig) -> Self {
        Self {
            phase: SessionPhase::Idle,
            failures: 0,
            failure_threshold: config.session.failure_threshold.max(1),
            aggregator: StabilityAggregator::new(&config.stability),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Consecutive non-detections observed while active.
    pub fn failure_count(&self) -> u32 {
        self.failures
    }

    pub fn confirmed(&self) -> &ConfirmedState {
        self.aggregator.confirmed()
    }

    pub fn aggregator(&self) -> &StabilityAggregator {
        &self.aggregator
    }

    /// Apply a player command.
    pub fn handle(&mut self, command: SessionCommand) -> Vec<SessionEvent> {
        match command {
            SessionCommand::StartCalibration => self.start_calibration(),
            SessionCommand::SkipCalibration => self.skip_calibration(),
            SessionCommand::Recalibrate => self.recalibrate(),
            SessionCommand::ResetScore => self.reset_score(),
        }
    }

    /// Player starts the setup. Only valid from `Idle`.
    pub fn start_calibration(&mut self) -> Vec<SessionEvent> {
        if self.phase != SessionPhase::Idle {
            debug!(phase = %self.phase, "Ignoring start request outside Idle");
            return Vec::new();
        }
        self.failures = 0;
        vec![self.transition(SessionPhase::Calibrating, TransitionCause::UserRequest)]
    }

    /// Player skips the setup and goes straight to scoring.
    pub fn skip_calibration(&mut self) -> Vec<SessionEvent> {
        if self.phase != SessionPhase::Calibrating {
            debug!(phase = %self.phase, "Ignoring skip request outside Calibrating");
            return Vec::new();
        }
        self.failures = 0;
        vec![self.transition(SessionPhase::Active, TransitionCause::UserRequest)]
    }

    /// Player asks to recalibrate; the game state is discarded.
    pub fn recalibrate(&mut self) -> Vec<SessionEvent> {
        if self.phase != SessionPhase::Active {
            debug!(phase = %self.phase, "Ignoring recalibrate request outside Active");
            return Vec::new();
        }
        self.failures = 0;
        self.aggregator.reset();
        vec![
            SessionEvent::StateCleared,
            self.transition(SessionPhase::Calibrating, TransitionCause::UserRequest),
        ]
    }

    /// Player resets the score without leaving the current phase.
    pub fn reset_score(&mut self) -> Vec<SessionEvent> {
        self.aggregator.reset();
        info!(phase = %self.phase, "Score reset");
        vec![SessionEvent::StateCleared]
    }

    /// Apply the result of a finished cycle.
    pub fn apply_outcome(&mut self, outcome: CycleOutcome) -> Vec<SessionEvent> {
        match outcome {
            CycleOutcome::Calibration(report) => self.apply_calibration(&report),
            CycleOutcome::Detection(detection) => self.apply_detection(&detection),
            CycleOutcome::OracleFailed(err) => self.apply_oracle_failure(&err),
            CycleOutcome::Abandoned(err) => {
                warn!(error = %err, "Cycle abandoned");
                vec![SessionEvent::CycleFailed(err.reason().to_string())]
            }
        }
    }

    /// Inspect a calibration check. Ignored unless calibrating.
    pub fn apply_calibration(&mut self, report: &CalibrationReport) -> Vec<SessionEvent> {
        if self.phase != SessionPhase::Calibrating {
            debug!(phase = %self.phase, "Discarding calibration report outside Calibrating");
            return Vec::new();
        }

        if report.is_ready() {
            self.failures = 0;
            return vec![
                SessionEvent::CalibrationStatus(CALIBRATION_OK_STATUS.to_string()),
                self.transition(SessionPhase::Active, TransitionCause::Calibrated),
            ];
        }

        let status = if report.status_text.trim().is_empty() {
            CALIBRATION_DEFAULT_STATUS.to_string()
        } else {
            report.status_text.clone()
        };
        debug!(
            surface = report.surface_present,
            sectors = report.sectors_resolved,
            %status,
            "Calibration pending"
        );
        vec![SessionEvent::CalibrationStatus(status)]
    }

    /// Gate a scoring detection on surface presence, then vote. Ignored unless active.
    pub fn apply_detection(&mut self, detection: &Detection) -> Vec<SessionEvent> {
        if self.phase != SessionPhase::Active {
            debug!(phase = %self.phase, "Discarding detection outside Active");
            return Vec::new();
        }

        if !detection.surface_present {
            return self.record_failure();
        }

        self.failures = 0;
        match self.aggregator.observe(detection) {
            Vote::Committed => vec![SessionEvent::ScoreCommitted(self.confirmed().clone())],
            vote if vote.markers_refreshed() => vec![SessionEvent::MarkersRefreshed(
                self.confirmed().projectiles.clone(),
            )],
            _ => Vec::new(),
        }
    }

    /// A failed oracle call. Counts as a non-detection while active.
    pub fn apply_oracle_failure(&mut self, err: &DartError) -> Vec<SessionEvent> {
        warn!(phase = %self.phase, error = %err, "Oracle call failed");
        let mut events = vec![SessionEvent::CycleFailed(err.reason().to_string())];
        if self.phase == SessionPhase::Active && err.is_oracle_failure() {
            events.extend(self.record_failure());
        }
        events
    }

    fn record_failure(&mut self) -> Vec<SessionEvent> {
        self.failures += 1;
        if self.failures < self.failure_threshold {
            debug!(
                failures = self.failures,
                threshold = self.failure_threshold,
                "Surface not detected"
            );
            return Vec::new();
        }

        warn!(failures = self.failures, "Surface lost, falling back to calibration");
        self.failures = 0;
        self.aggregator.reset();
        vec![
            SessionEvent::StateCleared,
            self.transition(SessionPhase::Calibrating, TransitionCause::SignalLost),
        ]
    }

    fn transition(&mut self, to: SessionPhase, cause: TransitionCause) -> SessionEvent {
        let from = self.phase;
        self.phase = to;
        info!(%from, %to, %cause, "Phase changed");
        SessionEvent::PhaseChanged { from, to, cause }
    }
}
