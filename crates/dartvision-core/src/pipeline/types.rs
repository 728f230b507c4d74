use crate::detection::{CalibrationReport, Detection};
use crate::error::DartError;
use crate::frame::Frame;
use crate::session::SessionPhase;

use super::single_flight::FlightGuard;

/// Which oracle capability a cycle calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleKind {
    Calibration,
    Scoring,
}

impl CycleKind {
    /// `None` while idle: nothing is sampled before setup starts.
    pub fn for_phase(phase: SessionPhase) -> Option<Self> {
        match phase {
            SessionPhase::Idle => None,
            SessionPhase::Calibrating => Some(Self::Calibration),
            SessionPhase::Active => Some(Self::Scoring),
        }
    }
}

impl std::fmt::Display for CycleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calibration => write!(f, "Calibration"),
            Self::Scoring => write!(f, "Scoring"),
        }
    }
}

/// Why a tick did not start a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// A previous cycle is still waiting on the oracle.
    InFlight,
    /// The frame source had nothing ready.
    NotReady,
    /// The session has not started.
    Idle,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InFlight => write!(f, "Cycle in flight"),
            Self::NotReady => write!(f, "No frame ready"),
            Self::Idle => write!(f, "Session idle"),
        }
    }
}

/// Result of a scheduler tick.
pub enum TickDecision {
    /// A frame was taken and the single-flight slot is held by `guard`.
    Accepted {
        frame: Frame,
        kind: CycleKind,
        guard: FlightGuard,
    },
    Dropped(DropReason),
}

/// Result of one preprocess + oracle cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    Calibration(CalibrationReport),
    Detection(Detection),
    /// The oracle call failed with a transport or format error.
    OracleFailed(DartError),
    /// The cycle never reached the oracle (unusable frame).
    Abandoned(DartError),
}

/// Player-issued session commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    StartCalibration,
    SkipCalibration,
    Recalibrate,
    ResetScore,
}

/// Counters reported when the capture loop stops.
#[derive(Clone, Debug, Default)]
pub struct LoopSummary {
    pub ticks: usize,
    pub cycles: usize,
    pub dropped_in_flight: usize,
    pub dropped_not_ready: usize,
    pub dropped_idle: usize,
    /// Cycles or acquisitions that ended in an error.
    pub failures: usize,
    pub final_phase: SessionPhase,
    pub final_score: u32,
}
