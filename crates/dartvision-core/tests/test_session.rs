#[allow(dead_code)]
mod common;

use dartvision_core::error::DartError;
use dartvision_core::feedback::{dispatch, RecordingSink, SessionEvent};
use dartvision_core::pipeline::config::DartConfig;
use dartvision_core::pipeline::{CycleOutcome, SessionCommand};
use dartvision_core::session::{Session, SessionPhase, TransitionCause};

use common::{calibration, detection, miss};

fn active_session() -> Session {
    let mut session = Session::new(&DartConfig::default());
    session.start_calibration();
    session.skip_calibration();
    assert_eq!(session.phase(), SessionPhase::Active);
    session
}

fn demotion() -> SessionEvent {
    SessionEvent::PhaseChanged {
        from: SessionPhase::Active,
        to: SessionPhase::Calibrating,
        cause: TransitionCause::SignalLost,
    }
}

// ---------------------------------------------------------------------------
// Failure threshold
// ---------------------------------------------------------------------------

#[test]
fn test_three_misses_demote_and_clear() {
    let mut session = active_session();
    session.apply_detection(&detection(26));
    assert_eq!(session.confirmed().score, 26);

    assert!(session.apply_detection(&miss()).is_empty());
    assert!(session.apply_detection(&miss()).is_empty());
    assert_eq!(session.failure_count(), 2);

    let events = session.apply_detection(&miss());
    assert_eq!(events, vec![SessionEvent::StateCleared, demotion()]);
    assert_eq!(session.phase(), SessionPhase::Calibrating);
    assert_eq!(session.failure_count(), 0);
    assert_eq!(session.confirmed().score, 0);
    assert!(session.confirmed().projectiles.is_empty());
    assert!(session.aggregator().buffer().is_empty());
}

#[test]
fn test_two_misses_then_hit_keeps_active() {
    let mut session = active_session();
    session.apply_detection(&detection(26));
    session.apply_detection(&miss());
    session.apply_detection(&miss());
    session.apply_detection(&detection(26));
    assert_eq!(session.failure_count(), 0);

    session.apply_detection(&miss());
    session.apply_detection(&miss());
    assert_eq!(session.phase(), SessionPhase::Active);
    assert_eq!(session.confirmed().score, 26);
}

#[test]
fn test_oracle_failures_count_as_misses_while_active() {
    let mut session = active_session();
    let err = || DartError::OracleTransport("timed out".into());

    let events = session.apply_oracle_failure(&err());
    assert_eq!(events, vec![SessionEvent::CycleFailed("connection error".into())]);
    session.apply_outcome(CycleOutcome::OracleFailed(DartError::OracleFormat("bad".into())));
    let events = session.apply_oracle_failure(&err());

    assert!(events.contains(&demotion()));
    assert_eq!(session.phase(), SessionPhase::Calibrating);
}

#[test]
fn test_abandoned_cycle_leaves_counter_alone() {
    let mut session = active_session();
    for _ in 0..5 {
        let events = session.apply_outcome(CycleOutcome::Abandoned(DartError::InvalidFrame {
            width: 0,
            height: 0,
        }));
        assert_eq!(events, vec![SessionEvent::CycleFailed("invalid frame".into())]);
    }
    assert_eq!(session.failure_count(), 0);
    assert_eq!(session.phase(), SessionPhase::Active);
}

#[test]
fn test_custom_failure_threshold() {
    let mut config = DartConfig::default();
    config.session.failure_threshold = 1;
    let mut session = Session::new(&config);
    session.start_calibration();
    session.skip_calibration();

    session.apply_detection(&miss());
    assert_eq!(session.phase(), SessionPhase::Calibrating);
}

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------

#[test]
fn test_calibration_success_activates() {
    let mut session = Session::new(&DartConfig::default());
    session.start_calibration();

    let events = session.apply_calibration(&calibration(true, ""));
    assert_eq!(
        events,
        vec![
            SessionEvent::CalibrationStatus("Target locked".into()),
            SessionEvent::PhaseChanged {
                from: SessionPhase::Calibrating,
                to: SessionPhase::Active,
                cause: TransitionCause::Calibrated,
            },
        ]
    );
    assert_eq!(session.phase(), SessionPhase::Active);
}

#[test]
fn test_calibration_pending_surfaces_guidance() {
    let mut session = Session::new(&DartConfig::default());
    session.start_calibration();

    let events = session.apply_calibration(&calibration(false, "Move closer"));
    assert_eq!(events, vec![SessionEvent::CalibrationStatus("Move closer".into())]);

    let events = session.apply_calibration(&calibration(false, "  "));
    assert_eq!(events, vec![SessionEvent::CalibrationStatus("Center the target...".into())]);
    assert_eq!(session.phase(), SessionPhase::Calibrating);
}

#[test]
fn test_calibration_requires_sectors() {
    let mut session = Session::new(&DartConfig::default());
    session.start_calibration();

    let mut report = calibration(true, "Board found");
    report.sectors_resolved = false;
    session.apply_calibration(&report);
    assert_eq!(session.phase(), SessionPhase::Calibrating);
}

#[test]
fn test_stale_results_are_ignored() {
    let mut session = Session::new(&DartConfig::default());
    assert!(session.apply_detection(&detection(60)).is_empty());
    assert!(session.apply_calibration(&calibration(true, "")).is_empty());
    assert_eq!(session.phase(), SessionPhase::Idle);

    session.start_calibration();
    assert!(session.apply_detection(&detection(60)).is_empty());
    assert_eq!(session.confirmed().score, 0);

    session.skip_calibration();
    assert!(session.apply_calibration(&calibration(true, "")).is_empty());
    assert_eq!(session.phase(), SessionPhase::Active);
}

#[test]
fn test_calibration_failures_do_not_count() {
    let mut session = Session::new(&DartConfig::default());
    session.start_calibration();
    for _ in 0..5 {
        session.apply_oracle_failure(&DartError::OracleTransport("down".into()));
    }
    assert_eq!(session.failure_count(), 0);
    assert_eq!(session.phase(), SessionPhase::Calibrating);
}

// ---------------------------------------------------------------------------
// Player commands
// ---------------------------------------------------------------------------

#[test]
fn test_start_only_from_idle() {
    let mut session = Session::new(&DartConfig::default());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.handle(SessionCommand::StartCalibration).len(), 1);
    assert!(session.handle(SessionCommand::StartCalibration).is_empty());
    assert_eq!(session.phase(), SessionPhase::Calibrating);
}

#[test]
fn test_skip_requires_calibrating() {
    let mut session = Session::new(&DartConfig::default());
    assert!(session.handle(SessionCommand::SkipCalibration).is_empty());
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn test_recalibrate_clears_before_transition() {
    let mut session = active_session();
    session.apply_detection(&detection(41));

    let events = session.handle(SessionCommand::Recalibrate);
    assert_eq!(
        events,
        vec![
            SessionEvent::StateCleared,
            SessionEvent::PhaseChanged {
                from: SessionPhase::Active,
                to: SessionPhase::Calibrating,
                cause: TransitionCause::UserRequest,
            },
        ]
    );
    assert_eq!(session.confirmed().score, 0);
}

#[test]
fn test_reset_score_keeps_phase() {
    let mut session = active_session();
    session.apply_detection(&detection(41));

    let events = session.handle(SessionCommand::ResetScore);
    assert_eq!(events, vec![SessionEvent::StateCleared]);
    assert_eq!(session.phase(), SessionPhase::Active);
    assert_eq!(session.confirmed().score, 0);

    session.apply_detection(&detection(20));
    assert_eq!(session.confirmed().score, 20);
}

// ---------------------------------------------------------------------------
// Events reach the sink in order
// ---------------------------------------------------------------------------

#[test]
fn test_dispatch_preserves_order() {
    let sink = RecordingSink::new();
    let mut session = Session::new(&DartConfig::default());

    dispatch(&sink, &session.start_calibration());
    dispatch(&sink, &session.apply_calibration(&calibration(true, "")));
    dispatch(&sink, &session.apply_detection(&detection(26)));
    dispatch(&sink, &session.apply_detection(&detection(26)));

    let events = sink.events();
    assert_eq!(events.len(), 4);
    assert!(matches!(
        events[0],
        SessionEvent::PhaseChanged { to: SessionPhase::Calibrating, .. }
    ));
    assert!(matches!(events[1], SessionEvent::CalibrationStatus(_)));
    assert!(matches!(
        events[2],
        SessionEvent::PhaseChanged { to: SessionPhase::Active, .. }
    ));
    assert!(matches!(&events[3], SessionEvent::ScoreCommitted(state) if state.score == 26));
    assert_eq!(sink.commits(), 1);
}
