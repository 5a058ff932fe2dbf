use super::*;
use crate::foundation::core::{Rgba8Premul, Size};
use crate::style::color::ShadowColor;

fn snapshot_with_block() -> PixelSurface {
    let mut s = PixelSurface::new(Size::new(10, 10)).unwrap();
    s.fill_rect(
        PixelRect::new(0, 0, 10, 5),
        Rgba8Premul::from_straight_rgba(0, 200, 255, 255),
    );
    s
}

#[test]
fn composite_recolors_and_rescales() {
    let snapshot = snapshot_with_block();
    let mut shadow = PixelSurface::new(Size::new(20, 20)).unwrap();
    let style = ShadowStyle {
        color: ShadowColor::rgba(255, 0, 0, 255),
        ..ShadowStyle::default()
    };

    let rect = shadow.rect();
    ShadowCompositor
        .composite(&snapshot, &mut shadow, rect, &style)
        .unwrap();

    // Top half of the silhouette, scaled 2x, tinted red.
    assert_eq!(shadow.pixel(10, 2), Some([255, 0, 0, 255]));
    assert_eq!(shadow.pixel(10, 17), Some([0, 0, 0, 0]));
}

#[test]
fn composite_clears_previous_content() {
    let snapshot = PixelSurface::new(Size::new(4, 4)).unwrap();
    let mut shadow = PixelSurface::new(Size::new(8, 8)).unwrap();
    shadow.fill_rect(
        shadow.rect(),
        Rgba8Premul::from_straight_rgba(9, 9, 9, 255),
    );
    let rect = shadow.rect();
    ShadowCompositor
        .composite(&snapshot, &mut shadow, rect, &ShadowStyle::default())
        .unwrap();
    assert_eq!(shadow.mean_alpha(), 0.0);
}

#[test]
fn shifted_destination_moves_silhouette_down() {
    let mut snapshot = PixelSurface::new(Size::new(8, 8)).unwrap();
    snapshot.fill_rect(
        snapshot.rect(),
        Rgba8Premul::from_straight_rgba(0, 0, 0, 255),
    );
    let mut shadow = PixelSurface::new(Size::new(8, 8)).unwrap();
    let rect = shadow.rect().translated(0, 3);
    ShadowCompositor
        .composite(&snapshot, &mut shadow, rect, &ShadowStyle::default())
        .unwrap();
    for y in 0..8 {
        let a = shadow.pixel(0, y).unwrap()[3];
        assert_eq!(a == 255, y >= 3, "row {y}");
    }
}

#[test]
fn paint_uses_style_tint_with_filtering() {
    let paint = ShadowCompositor::paint(&ShadowStyle::default());
    assert!(paint.filter_bitmap);
    assert_eq!(
        paint.color_filter,
        Some(crate::effects::composite::ColorFilter::SrcAtop(
            ShadowColor::BLACK
        ))
    );
}
