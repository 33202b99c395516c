use super::*;
use crate::foundation::core::Rgb8;

#[test]
fn solid_frame_yields_nothing() {
    let f = Frame::analyze(
        Raster::solid(48, 32, Rgb8::new(255, 0, 0)).unwrap(),
        &VisionConfig::default(),
    );
    assert!(f.lines.is_empty());
    assert!(f.features.is_empty());
    assert!(f.regions.is_empty());
    assert_eq!(f.edge_density(), 0.0);
    assert_eq!(f.pixel_count(), 48.0 * 32.0);
}

#[test]
fn half_split_frame_has_border_regions_only() {
    let mut px = Vec::new();
    for _ in 0..32 {
        for x in 0..32 {
            px.push(if x < 16 {
                Rgb8::new(0, 0, 0)
            } else {
                Rgb8::new(255, 255, 255)
            });
        }
    }
    let f = Frame::analyze(Raster::from_rgb(32, 32, px).unwrap(), &VisionConfig::default());
    assert_eq!(f.regions.len(), 2);
    assert_eq!(f.enclosed_regions().count(), 0);
    assert!(f.edge_density() > 0.0);
    assert!(!f.lines.is_empty());
}
