use super::*;

fn two_pixel_image() -> image::RgbaImage {
    image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 255, 255, 255, 128]).unwrap()
}

#[test]
fn from_rgba_image_premultiplies() {
    let view = ImageView::from_rgba_image(two_pixel_image());
    assert_eq!(view.measure(), Size::new(2, 1));
    assert_eq!(view.rgba8_premul(), &[255, 0, 0, 255, 128, 128, 128, 128]);
}

#[test]
fn paint_into_overwrites_surface() {
    let view = ImageView::from_rgba_image(two_pixel_image());
    let mut surface = PixelSurface::new(view.measure()).unwrap();
    surface.data_mut().fill(7);
    view.paint_into(&mut surface);
    assert_eq!(surface.data(), view.rgba8_premul());
}

#[test]
fn surface_round_trips_to_straight_alpha() {
    let view = ImageView::from_rgba_image(two_pixel_image());
    let surface = PixelSurface::from_premul_bytes(view.measure(), view.rgba8_premul()).unwrap();
    let img = surface_to_rgba_image(&surface);
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [255, 255, 255, 128]);
}

#[test]
fn decode_rejects_garbage() {
    assert!(ImageView::decode(b"not an image").is_err());
}
