use super::*;

#[test]
fn defaults_validate() {
    EngineConfig::default().validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{ "rhythm": { "base_duration": 3.0 }, "threading": { "threads": 2 } }"#;
    let cfg = EngineConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.rhythm.base_duration, 3.0);
    assert_eq!(cfg.rhythm.complexity_gain, 1.5);
    assert_eq!(cfg.threading.threads, Some(2));
    assert_eq!(cfg.matcher.rules.len(), MatcherConfig::default().rules.len());
    assert_eq!(cfg.morph.threshold_for("face"), 0.8);
}

#[test]
fn out_of_range_values_are_rejected() {
    let json = r#"{ "matcher": { "motion_weight": 1.5 } }"#;
    let err = EngineConfig::from_reader(json.as_bytes()).unwrap_err();
    assert!(matches!(err, SegueError::Validation(_)));

    let mut cfg = EngineConfig::default();
    cfg.threading.threads = Some(0);
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.morph.frame_rate = f64::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn custom_rules_round_trip() {
    let json = r#"{
        "matcher": {
            "rules": [
                { "name": "always_zoom", "priority": 1, "kind": "zoom",
                  "condition": { "when": "scores", "motion": { "min": 0.0, "max": 1.0 } } }
            ]
        }
    }"#;
    let cfg = EngineConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.matcher.rules.len(), 1);
    let back: EngineConfig =
        serde_json::from_str(&serde_json::to_string(&cfg).unwrap()).unwrap();
    assert_eq!(back.matcher.rules, cfg.matcher.rules);
}

#[test]
fn inverted_score_range_is_rejected() {
    let json = r#"{
        "matcher": {
            "rules": [
                { "name": "bad", "priority": 1, "kind": "fade",
                  "condition": { "when": "scores", "color": { "min": 0.9, "max": 0.1 } } }
            ]
        }
    }"#;
    assert!(EngineConfig::from_reader(json.as_bytes()).is_err());
}
