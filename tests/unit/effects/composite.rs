use super::*;
use crate::foundation::core::Point;

#[test]
fn over_transparent_src_is_noop_and_opaque_replaces() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [0, 0, 0, 0]), dst);
    assert_eq!(over(dst, [1, 2, 3, 255]), [1, 2, 3, 255]);
}

#[test]
fn over_twice_is_darker_below_saturation() {
    let px = [0, 0, 0, 100];
    let once = over([0, 0, 0, 0], px);
    let twice = over(once, px);
    assert!(twice[3] > once[3]);

    let full = [0, 0, 0, 255];
    assert_eq!(over(over([0, 0, 0, 0], full), full)[3], 255);
}

#[test]
fn over_in_place_blends_every_pixel() {
    let mut dst = [[0, 0, 0, 0], [0, 0, 200, 200]].concat();
    let src = [[0, 0, 0, 128], [0, 0, 0, 0]].concat();
    over_in_place(&mut dst, &src).unwrap();
    assert_eq!(&dst[0..4], &[0, 0, 0, 128]);
    assert_eq!(&dst[4..8], &[0, 0, 200, 200]);
}

#[test]
fn over_in_place_rejects_mismatched_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    assert!(over_in_place(&mut dst[..6], &[0u8; 6]).is_err());
}

#[test]
fn src_to_dst_maps_corners() {
    let map = src_to_dst(PixelRect::new(0, 10, 128, 138), PixelRect::new(5, 5, 261, 133));
    assert_eq!(map * Point::new(0.0, 10.0), Point::new(5.0, 5.0));
    assert_eq!(map * Point::new(128.0, 138.0), Point::new(261.0, 133.0));
}

#[test]
fn tinted_paint_filters_with_src_atop() {
    let color = ShadowColor::rgba(1, 2, 3, 4);
    let paint = Paint::tinted(color);
    assert!(paint.filter_bitmap);
    assert_eq!(paint.color_filter, Some(ColorFilter::SrcAtop(color)));
    assert_eq!(Paint::default().color_filter, None);
}
