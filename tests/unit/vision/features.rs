use super::*;
use crate::foundation::core::Rgb8;
use crate::vision::raster::Raster;

fn square_on_black(size: u32, lo: u32, hi: u32) -> Raster {
    let mut px = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let inside = (lo..=hi).contains(&x) && (lo..=hi).contains(&y);
            px.push(if inside {
                Rgb8::new(255, 255, 255)
            } else {
                Rgb8::new(0, 0, 0)
            });
        }
    }
    Raster::from_rgb(size, size, px).unwrap()
}

#[test]
fn flat_frame_has_no_features_and_centered_focus() {
    let r = Raster::solid(32, 32, Rgb8::new(120, 10, 10)).unwrap();
    let f = detect_features(&GradientField::compute(&r), &HarrisConfig::default());
    assert!(f.is_empty());
    assert_eq!(focal_point(&f), Point::new(0.5, 0.5));
}

#[test]
fn square_corners_are_detected() {
    let r = square_on_black(48, 12, 35);
    let f = detect_features(&GradientField::compute(&r), &HarrisConfig::default());
    assert!(!f.is_empty());
    assert!(f.iter().all(|x| x.strength > 0.0 && x.strength <= 1.0));
    assert_eq!(f[0].strength, 1.0);

    for (cx, cy) in [(12.0, 12.0), (35.0, 12.0), (12.0, 35.0), (35.0, 35.0)] {
        let near = f.iter().any(|x| {
            let px = x.point.x * 48.0 - 0.5;
            let py = x.point.y * 48.0 - 0.5;
            (px - cx).abs() <= 3.0 && (py - cy).abs() <= 3.0
        });
        assert!(near, "no feature near ({cx}, {cy}): {f:?}");
    }

    let focus = focal_point(&f);
    assert!((focus.x - 0.5).abs() < 0.03, "{focus:?}");
    assert!((focus.y - 0.5).abs() < 0.03, "{focus:?}");
}

#[test]
fn max_features_caps_output() {
    let r = square_on_black(48, 12, 35);
    let cfg = HarrisConfig {
        max_features: 2,
        ..HarrisConfig::default()
    };
    assert!(detect_features(&GradientField::compute(&r), &cfg).len() <= 2);
}
