use super::*;

#[test]
fn clamp01_handles_non_finite() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(f64::INFINITY), 0.0);
    assert_eq!(clamp01(-0.5), 0.0);
    assert_eq!(clamp01(1.5), 1.0);
    assert_eq!(clamp01(0.25), 0.25);
}

#[test]
fn rgb_distance_spans_cube_diagonal() {
    let black = Rgb8::new(0, 0, 0);
    let white = Rgb8::new(255, 255, 255);
    assert!((black.distance(white) - MAX_RGB_DISTANCE).abs() < 0.01);
    assert_eq!(black.distance(black), 0.0);
}

#[test]
fn hsv_primaries() {
    let (h, s, v) = Rgb8::new(255, 0, 0).hsv();
    assert_eq!((h, s, v), (0.0, 1.0, 1.0));
    let (h, _, _) = Rgb8::new(0, 255, 0).hsv();
    assert!((h - 120.0).abs() < 1e-9);
    let (h, _, _) = Rgb8::new(0, 0, 255).hsv();
    assert!((h - 240.0).abs() < 1e-9);
    let (_, s, _) = Rgb8::new(128, 128, 128).hsv();
    assert_eq!(s, 0.0);
}

#[test]
fn direction_buckets_wrap() {
    assert_eq!(Direction::from_angle_deg(0.0), Direction::Right);
    assert_eq!(Direction::from_angle_deg(44.0), Direction::UpRight);
    assert_eq!(Direction::from_angle_deg(90.0), Direction::Up);
    assert_eq!(Direction::from_angle_deg(-90.0), Direction::Down);
    assert_eq!(Direction::from_angle_deg(350.0), Direction::Right);
    assert_eq!(Direction::Static.unit(), Vec2::ZERO);
    assert!((Direction::DownLeft.unit().hypot() - 1.0).abs() < 1e-12);
}
