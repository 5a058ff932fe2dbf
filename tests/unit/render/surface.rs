use super::*;
use crate::effects::composite::ColorFilter;
use crate::style::color::ShadowColor;

#[test]
fn new_surface_is_transparent() {
    let s = PixelSurface::new(Size::new(3, 2)).unwrap();
    assert_eq!(s.size(), Size::new(3, 2));
    assert_eq!(s.rect(), PixelRect::new(0, 0, 3, 2));
    assert_eq!(s.data().len(), 24);
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn empty_or_oversized_surfaces_fail_to_allocate() {
    for size in [Size::new(0, 4), Size::new(4, 0), Size::new(70_000, 1)] {
        let err = PixelSurface::new(size).unwrap_err();
        assert!(matches!(err, ShadowError::AllocationFailure(_)), "{size:?}");
    }
}

#[test]
fn fill_rect_clips_and_clear_resets() {
    let mut s = PixelSurface::new(Size::new(4, 4)).unwrap();
    s.fill_rect(
        PixelRect::new(2, 2, 10, 10),
        Rgba8Premul::from_straight_rgba(0, 0, 0, 255),
    );
    assert_eq!(s.pixel(3, 3), Some([0, 0, 0, 255]));
    assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(4, 0), None);
    assert!((s.mean_alpha() - 255.0 / 4.0).abs() < 1e-9);

    s.clear();
    assert_eq!(s.mean_alpha(), 0.0);
}

#[test]
fn draw_target_scales_image() {
    let mut img = PixelSurface::new(Size::new(1, 1)).unwrap();
    img.fill_rect(img.rect(), Rgba8Premul::from_straight_rgba(0, 0, 0, 255));
    let mut dst = PixelSurface::new(Size::new(5, 5)).unwrap();
    let dst_rect = dst.rect();
    dst.draw_image(&img, img.rect(), dst_rect, &Paint::default())
        .unwrap();
    assert_eq!(dst.mean_alpha(), 255.0);
}

#[test]
fn from_premul_bytes_checks_length() {
    let s = PixelSurface::from_premul_bytes(Size::new(1, 1), &[1, 2, 3, 4]).unwrap();
    assert_eq!(s.pixel(0, 0), Some([1, 2, 3, 4]));
    assert!(PixelSurface::from_premul_bytes(Size::new(1, 1), &[1, 2, 3]).is_err());
}

fn surface_from(size: Size, pixels: &[[u8; 4]]) -> PixelSurface {
    PixelSurface::from_premul_bytes(size, &pixels.concat()).unwrap()
}

#[test]
fn identity_draw_copies_pixels() {
    let size = Size::new(4, 1);
    let src = surface_from(
        size,
        &[[0, 0, 0, 255], [10, 20, 30, 255], [0, 0, 0, 0], [40, 40, 40, 255]],
    );
    let mut dst = PixelSurface::new(size).unwrap();
    let paint = Paint {
        filter_bitmap: false,
        ..Paint::default()
    };
    dst.draw_image(&src, src.rect(), dst.rect(), &paint).unwrap();
    assert_eq!(dst.data(), src.data());
}

#[test]
fn scaled_draw_fills_destination_rect_only() {
    let src = surface_from(Size::new(2, 2), &[[0, 0, 0, 255]; 4]);
    let mut dst = PixelSurface::new(Size::new(8, 8)).unwrap();
    dst.draw_image(&src, src.rect(), PixelRect::new(2, 2, 6, 6), &Paint::default())
        .unwrap();

    for y in 0..8 {
        for x in 0..8 {
            let a = dst.pixel(x, y).unwrap()[3];
            let inside = (2..6).contains(&x) && (2..6).contains(&y);
            assert_eq!(a == 255, inside, "pixel ({x},{y}) alpha {a}");
            if !inside {
                assert_eq!(a, 0, "pixel ({x},{y})");
            }
        }
    }
}

#[test]
fn tinted_draw_recolors_silhouette() {
    let size = Size::new(3, 1);
    let src = surface_from(size, &[[255, 255, 255, 255], [0, 0, 0, 0], [0, 100, 0, 100]]);
    let mut dst = PixelSurface::new(size).unwrap();
    let paint = Paint {
        color_filter: Some(ColorFilter::SrcAtop(ShadowColor::rgba(255, 0, 0, 255))),
        filter_bitmap: false,
    };
    dst.draw_image(&src, src.rect(), dst.rect(), &paint).unwrap();

    assert_eq!(dst.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(dst.pixel(1, 0), Some([0, 0, 0, 0]));
    let [r, g, b, a] = dst.pixel(2, 0).unwrap();
    assert_eq!((g, b, a), (0, 0, 100));
    assert!(r.abs_diff(100) <= 1, "red {r}");
}

#[test]
fn draw_blends_over_existing_content() {
    let src = surface_from(Size::new(1, 1), &[[0, 0, 0, 128]]);
    let mut dst = PixelSurface::new(Size::new(2, 2)).unwrap();
    dst.fill_rect(dst.rect(), Rgba8Premul::from_straight_rgba(255, 255, 255, 255));
    let dst_rect = dst.rect();
    dst.draw_image(&src, src.rect(), dst_rect, &Paint::default())
        .unwrap();

    for y in 0..2 {
        let [r, _, _, a] = dst.pixel(0, y).unwrap();
        assert_eq!(a, 255);
        assert!(r.abs_diff(127) <= 1, "red {r}");
    }
}

#[test]
fn offscreen_destination_is_clipped() {
    let src = surface_from(Size::new(4, 4), &[[0, 0, 0, 255]; 16]);
    let mut dst = PixelSurface::new(Size::new(4, 4)).unwrap();
    dst.draw_image(&src, src.rect(), PixelRect::new(0, 2, 4, 6), &Paint::default())
        .unwrap();
    let covered = dst.data().chunks_exact(4).filter(|px| px[3] == 255).count();
    assert_eq!(covered, 8);

    let mut untouched = PixelSurface::new(Size::new(4, 4)).unwrap();
    untouched
        .draw_image(&src, src.rect(), PixelRect::new(10, 10, 20, 20), &Paint::default())
        .unwrap();
    assert_eq!(untouched.mean_alpha(), 0.0);
}
