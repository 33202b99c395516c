use super::*;
use crate::foundation::core::Rgb8;
use crate::vision::VisionConfig;
use crate::vision::raster::Raster;

fn disk_and_box() -> Frame {
    let size = 96u32;
    let mut px = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let (dx, dy) = (x as f64 - 30.0, y as f64 - 48.0);
            let in_disk = dx * dx + dy * dy <= 15.0 * 15.0;
            let in_box = (55..=85).contains(&x) && (20..=40).contains(&y);
            px.push(if in_disk || in_box {
                Rgb8::new(250, 250, 250)
            } else {
                Rgb8::new(5, 5, 5)
            });
        }
    }
    Frame::analyze(
        Raster::from_rgb(size, size, px).unwrap(),
        &VisionConfig::default(),
    )
}

#[test]
fn disk_and_box_are_classified() {
    let shapes = detect_shapes(&disk_and_box(), &ShapeConfig::default());

    let circles: Vec<_> = shapes.iter().filter(|s| s.kind == ShapeKind::Circle).collect();
    assert_eq!(circles.len(), 1, "{shapes:?}");
    assert!((circles[0].center.x - 30.5 / 96.0).abs() < 0.01);
    assert!((circles[0].center.y - 48.5 / 96.0).abs() < 0.01);

    let rects: Vec<_> = shapes.iter().filter(|s| s.kind == ShapeKind::Rectangle).collect();
    assert_eq!(rects.len(), 1, "{shapes:?}");
    assert!((rects[0].center.x - 70.5 / 96.0).abs() < 0.01);
    assert!((rects[0].center.y - 30.5 / 96.0).abs() < 0.01);
    assert!(rects[0].angle_deg.abs() < 1.0 || (rects[0].angle_deg.abs() - 90.0).abs() < 1.0);

    assert!(shapes.iter().all(|s| (0.0..=1.0).contains(&s.confidence)));
    assert!(shapes.windows(2).all(|p| p[0].confidence >= p[1].confidence));
}

#[test]
fn solid_frame_has_no_shapes() {
    let f = Frame::analyze(
        Raster::solid(64, 64, Rgb8::new(0, 200, 0)).unwrap(),
        &VisionConfig::default(),
    );
    assert!(detect_shapes(&f, &ShapeConfig::default()).is_empty());
}

#[test]
fn polygon_area_of_unit_square() {
    let sq = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ];
    assert_eq!(polygon_area(&sq), 1.0);
    assert_eq!(polygon_area(&sq[..2]), 0.0);
}
