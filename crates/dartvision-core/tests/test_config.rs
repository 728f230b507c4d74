use dartvision_core::error::DartError;
use dartvision_core::pipeline::config::{DartConfig, EdgeRendering, MarkerPolicy};
use dartvision_core::session::SessionPhase;

#[test]
fn test_defaults() {
    let config = DartConfig::default();
    assert_eq!(config.scheduler.calibration_period_ms, 1000);
    assert_eq!(config.scheduler.active_period_ms, 2000);
    assert_eq!(config.preprocess.target_width, 1024);
    assert_eq!(config.preprocess.enhanced_quality, 80);
    assert_eq!(config.preprocess.edge_quality, 60);
    assert_eq!(config.preprocess.edge_rendering, EdgeRendering::Binary);
    assert!(config.preprocess.emit_edges);
    assert_eq!(config.session.failure_threshold, 3);
    assert_eq!(config.stability.vote_window, 2);
    assert_eq!(config.stability.marker_policy, MarkerPolicy::OnAgreement);
    assert_eq!(config.oracle.api_key_env, "GEMINI_API_KEY");
    assert!(config.validate().is_ok());
}

#[test]
fn test_idle_uses_active_period() {
    let config = DartConfig::default();
    assert_eq!(
        config.scheduler.period_for(SessionPhase::Idle),
        config.scheduler.period_for(SessionPhase::Active)
    );
}

#[test]
fn test_toml_roundtrip() {
    let mut config = DartConfig::default();
    config.stability.vote_window = 3;
    config.stability.marker_policy = MarkerPolicy::Always;
    config.preprocess.edge_rendering = EdgeRendering::proportional();

    let text = config.to_toml_string().unwrap();
    let parsed = DartConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed.stability.vote_window, 3);
    assert_eq!(parsed.stability.marker_policy, MarkerPolicy::Always);
    assert_eq!(parsed.preprocess.edge_rendering, EdgeRendering::Proportional { gain: 2.0 });
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config = DartConfig::from_toml_str(
        r#"
[session]
failure_threshold = 5

[preprocess]
target_width = 800
"#,
    )
    .unwrap();
    assert_eq!(config.session.failure_threshold, 5);
    assert_eq!(config.preprocess.target_width, 800);
    assert_eq!(config.preprocess.edge_quality, 60);
    assert!(config.preprocess.emit_edges);
    assert_eq!(config.stability.vote_window, 2);
    assert_eq!(config.scheduler.active_period_ms, 2000);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dartvision.toml");
    std::fs::write(&path, "[scheduler]\ncalibration_period_ms = 500\nactive_period_ms = 1500\n").unwrap();

    let config = DartConfig::load(&path).unwrap();
    assert_eq!(config.scheduler.calibration_period_ms, 500);
    assert_eq!(config.scheduler.active_period_ms, 1500);
}

fn rejects(mutate: impl FnOnce(&mut DartConfig)) -> bool {
    let mut config = DartConfig::default();
    mutate(&mut config);
    matches!(config.validate(), Err(DartError::Config(_)))
}

#[test]
fn test_validation_failures() {
    assert!(rejects(|c| c.scheduler.active_period_ms = 0));
    assert!(rejects(|c| c.scheduler.calibration_period_ms = 0));
    assert!(rejects(|c| c.preprocess.target_width = 0));
    assert!(rejects(|c| c.preprocess.enhanced_quality = 0));
    assert!(rejects(|c| c.preprocess.edge_quality = 101));
    assert!(rejects(|c| c.preprocess.edge_threshold = -1.0));
    assert!(rejects(|c| c.preprocess.edge_threshold = f32::NAN));
    assert!(rejects(|c| c.session.failure_threshold = 0));
    assert!(rejects(|c| c.stability.vote_window = 0));
    assert!(!rejects(|c| c.preprocess.edge_threshold = 0.0));
}

#[test]
fn test_invalid_toml_is_config_error() {
    assert!(matches!(
        DartConfig::from_toml_str("[stability]\nvote_window = 0\n"),
        Err(DartError::Config(_))
    ));
    assert!(matches!(
        DartConfig::from_toml_str("[stability\n"),
        Err(DartError::Config(_))
    ));
}

#[test]
fn test_display() {
    assert_eq!(MarkerPolicy::OnAgreement.to_string(), "On Agreement");
    assert_eq!(MarkerPolicy::OnCommit.to_string(), "On Commit");
    assert_eq!(EdgeRendering::Binary.to_string(), "Binary");
    assert_eq!(
        EdgeRendering::Proportional { gain: 2.0 }.to_string(),
        "Proportional (gain=2)"
    );
}
