use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: ShadowColor = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, ShadowColor::rgba(255, 0, 0, 255));

    let c: ShadowColor = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert_eq!(c, ShadowColor::rgba(0, 0, 255, 128));
}

#[test]
fn parses_packed_object_and_array() {
    let c: ShadowColor = serde_json::from_value(json!(0x8000_00ffu32)).unwrap();
    assert_eq!(c, ShadowColor::rgba(0, 0, 255, 128));

    let c: ShadowColor = serde_json::from_value(json!({"r": 10, "g": 20, "b": 30})).unwrap();
    assert_eq!(c, ShadowColor::rgba(10, 20, 30, 255));

    let c: ShadowColor = serde_json::from_value(json!([10, 20, 30, 40])).unwrap();
    assert_eq!(c, ShadowColor::rgba(10, 20, 30, 40));
}

#[test]
fn rejects_bad_shapes() {
    assert!(serde_json::from_value::<ShadowColor>(json!("#12345")).is_err());
    assert!(serde_json::from_value::<ShadowColor>(json!([1, 2])).is_err());
    assert!("zzzzzz".parse::<ShadowColor>().is_err());
}

#[test]
fn display_and_argb_agree() {
    let c = ShadowColor::from_argb(0xff11_2233);
    assert_eq!(c.to_argb(), 0xff11_2233);
    assert_eq!(c.to_string(), "#112233ff");
    assert_eq!(c.to_string().parse::<ShadowColor>().unwrap(), c);
    let v = serde_json::to_value(c).unwrap();
    assert_eq!(v, json!("#112233ff"));
}

#[test]
fn default_is_opaque_black() {
    assert_eq!(ShadowColor::default(), ShadowColor::BLACK);
    assert_eq!(ShadowColor::BLACK.to_premul().to_array(), [0, 0, 0, 255]);
}
