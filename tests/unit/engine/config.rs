use super::*;

#[test]
fn defaults_are_valid() {
    EngineConfig::default().validate().unwrap();
}

#[test]
fn partial_json_keeps_remaining_defaults() {
    let cfg = EngineConfig::from_json(
        r#"{ "timing": { "char_delay": 0.02 }, "cycle_policy": "skip" }"#,
    )
    .unwrap();
    assert_eq!(cfg.timing.char_delay, 0.02);
    assert_eq!(cfg.timing.root_base_delay, 0.3);
    assert_eq!(cfg.cycle_policy, CyclePolicy::Skip);
    assert_eq!(cfg.view_box, Canvas::default());
}

#[test]
fn line_duration_scales_with_length_within_bounds() {
    let t = TimingConfig::default();
    assert_eq!(t.line_duration(0.0), 0.3);
    assert!((t.line_duration(250.0) - 0.5).abs() < 1e-9);
    assert_eq!(t.line_duration(10_000.0), 0.7);
    assert!(t.line_duration(100.0) < t.line_duration(200.0));
}

#[test]
fn negative_durations_are_rejected() {
    let mut cfg = EngineConfig::default();
    cfg.timing.connection_gap = -0.1;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("timing.connection_gap"));
}

#[test]
fn inverted_line_bounds_are_rejected() {
    let mut cfg = EngineConfig::default();
    cfg.timing.line_max_duration = 0.1;
    assert!(cfg.validate().is_err());
}

#[test]
fn zero_view_box_is_rejected() {
    let err = EngineConfig::from_json(r#"{ "view_box": { "width": 0, "height": 10 } }"#)
        .unwrap_err();
    assert!(matches!(err, ConstellationError::Config(_)));
}
