use super::*;

#[test]
fn zero_sized_canvas_is_rejected() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(4, 3).unwrap();
    assert_eq!((c.width_f64(), c.height_f64()), (4.0, 3.0));
}

#[test]
fn default_canvas_is_full_hd() {
    let c = Canvas::default();
    assert_eq!((c.width, c.height), (1920, 1080));
}
