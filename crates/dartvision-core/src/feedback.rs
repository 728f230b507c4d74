use std::sync::Mutex;

use crate::detection::Projectile;
use crate::session::{SessionPhase, TransitionCause};
use crate::stability::ConfirmedState;

/// Something the session did that the outside world should hear about.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    PhaseChanged {
        from: SessionPhase,
        to: SessionPhase,
        cause: TransitionCause,
    },
    /// The confirmed score changed.
    ScoreCommitted(ConfirmedState),
    /// Marker positions moved without a score change.
    MarkersRefreshed(Vec<Projectile>),
    /// Confirmed state and vote window were wiped.
    StateCleared,
    /// Guidance while calibrating.
    CalibrationStatus(String),
    /// A cycle produced no usable result. Reason only, details are logged.
    CycleFailed(String),
}

/// Receiver of session events: renders, logs, plays cues.
///
/// The core only pushes to the sink, it never polls it. All methods have
/// default no-op implementations.
pub trait FeedbackSink: Send + Sync {
    fn on_phase_changed(&self, _from: SessionPhase, _to: SessionPhase, _cause: TransitionCause) {}

    fn on_score_committed(&self, _state: &ConfirmedState) {}

    fn on_calibration_status(&self, _text: &str) {}

    fn on_cycle_failed(&self, _reason: &str) {}

    fn on_markers_refreshed(&self, _projectiles: &[Projectile]) {}

    fn on_state_cleared(&self) {}
}

/// Route events to the matching sink callbacks, in order.
pub fn dispatch(sink: &dyn FeedbackSink, events: &[SessionEvent]) {
    for event in events {
        match event {
            SessionEvent::PhaseChanged { from, to, cause } => sink.on_phase_changed(*from, *to, *cause),
            SessionEvent::ScoreCommitted(state) => sink.on_score_committed(state),
            SessionEvent::MarkersRefreshed(projectiles) => sink.on_markers_refreshed(projectiles),
            SessionEvent::StateCleared => sink.on_state_cleared(),
            SessionEvent::CalibrationStatus(text) => sink.on_calibration_status(text),
            SessionEvent::CycleFailed(reason) => sink.on_cycle_failed(reason),
        }
    }
}

/// No-op sink.
pub struct NullSink;
impl FeedbackSink for NullSink {}

/// Sink that keeps every event it receives, for inspection.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of score commits seen so far.
    pub fn commits(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::ScoreCommitted(_)))
            .count()
    }

    fn push(&self, event: SessionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl FeedbackSink for RecordingSink {
    fn on_phase_changed(&self, from: SessionPhase, to: SessionPhase, cause: TransitionCause) {
        self.push(SessionEvent::PhaseChanged { from, to, cause });
    }

    fn on_score_committed(&self, state: &ConfirmedState) {
        self.push(SessionEvent::ScoreCommitted(state.clone()));
    }

    fn on_calibration_status(&self, text: &str) {
        self.push(SessionEvent::CalibrationStatus(text.to_string()));
    }

    fn on_cycle_failed(&self, reason: &str) {
        self.push(SessionEvent::CycleFailed(reason.to_string()));
    }

    fn on_markers_refreshed(&self, projectiles: &[Projectile]) {
        self.push(SessionEvent::MarkersRefreshed(projectiles.to_vec()));
    }

    fn on_state_cleared(&self) {
        self.push(SessionEvent::StateCleared);
    }
}
