#![allow(clippy::float_cmp)]

use super::*;
use crate::mapping::TextAlign;

#[test]
fn empty_object_gives_defaults() {
    let config = EditorConfig::from_json("{}").unwrap();
    assert_eq!(config, EditorConfig::default());
    assert_eq!(config.blink_interval_ms, 600.0);
    assert_eq!(config.double_click_arm_ms, 300.0);
    assert_eq!(config.triple_click_window_ms, 300.0);
    assert!(config.styled_text);
    assert!(config.accurate_char_positions);
}

#[test]
fn partial_override() {
    let config = EditorConfig::from_json(
        r#"{"blink_interval_ms": 250, "styled_text": false, "default_style": {"align": "right", "size": 20}}"#,
    )
    .unwrap();
    assert_eq!(config.blink_interval_ms, 250.0);
    assert!(!config.styled_text);
    assert_eq!(config.default_style.align, TextAlign::Right);
    assert_eq!(config.default_style.size, 20.0);
    assert_eq!(config.default_style.family, "Arial");
    assert_eq!(config.click_slop_px, 2.0);
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(EditorConfig::from_json("{"), Err(ConfigError::Json(_))));
    assert!(matches!(
        EditorConfig::from_json(r#"{"blink_interval_ms": "fast"}"#),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn non_positive_timing_is_rejected() {
    let err = EditorConfig::from_json(r#"{"blink_interval_ms": 0}"#).unwrap_err();
    assert!(matches!(err, ConfigError::NotPositive { field: "blink_interval_ms", .. }));
}

#[test]
fn non_positive_font_size_is_rejected() {
    let err = EditorConfig::from_json(r#"{"default_style": {"size": -4}}"#).unwrap_err();
    assert!(err.to_string().contains("default_style.size"));
}

#[test]
fn default_config_validates() {
    assert!(EditorConfig::default().validate().is_ok());
}
