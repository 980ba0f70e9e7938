use super::*;

#[test]
fn viewport_geometry() {
    let vp = Viewport::new(800, 600);
    assert!(!vp.is_empty());
    assert_eq!(vp.center(), Point::new(400.0, 300.0));
    assert_eq!(vp.bounds(), Rect::new(0.0, 0.0, 800.0, 600.0));
    assert!(Viewport::new(0, 600).is_empty());
}

#[test]
fn rgba_alpha_and_premultiply() {
    let c = Rgba8::with_alpha_f64(0, 123, 255, 0.8);
    assert_eq!(c.a, 204);
    assert_eq!(Rgba8::WHITE.premultiplied(), [255, 255, 255, 255]);
    assert_eq!(Rgba8::TRANSPARENT.premultiplied(), [0, 0, 0, 0]);
    assert_eq!(
        Rgba8::new(100, 50, 200, 128).premultiplied(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn alpha_is_clamped() {
    assert_eq!(Rgba8::with_alpha_f64(1, 2, 3, 7.0).a, 255);
    assert_eq!(Rgba8::with_alpha_f64(1, 2, 3, -1.0).a, 0);
}
