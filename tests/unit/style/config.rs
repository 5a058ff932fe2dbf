use super::*;
use crate::style::color::ShadowColor;

#[test]
fn empty_object_yields_defaults() {
    let cfg = ShadowConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, ShadowConfig::default());
    assert_eq!(cfg.base, 128);
    assert_eq!(cfg.style.radius, 16);
    assert_eq!(cfg.style.alpha, 255);
    assert_eq!(cfg.max_blur_radius, 25);
}

#[test]
fn partial_style_keeps_other_defaults() {
    let cfg = ShadowConfig::from_json_str(r##"{"style": {"color": "#ff000080"}}"##).unwrap();
    assert_eq!(cfg.style.color, ShadowColor::rgba(255, 0, 0, 128));
    assert_eq!(cfg.style.radius, 16);
}

#[test]
fn zero_base_is_rejected() {
    let err = ShadowConfig::from_json_str(r#"{"base": 0}"#).unwrap_err();
    assert!(matches!(err, ShadowError::Config(_)));
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(ShadowConfig::from_json_str(r#"{"bse": 64}"#).is_err());
}

#[test]
fn missing_file_is_config_error() {
    let err = ShadowConfig::from_path("definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open shadow config"));
}
