use super::*;
use crate::foundation::core::Rgb8;
use crate::vision::VisionConfig;
use crate::vision::raster::Raster;

fn frame(fg: u8, bg: u8, inside: impl Fn(f64, f64) -> bool) -> Frame {
    let size = 96u32;
    let mut px = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let v = if inside(x as f64, y as f64) { fg } else { bg };
            px.push(Rgb8::new(v, v, v));
        }
    }
    Frame::analyze(
        Raster::from_rgb(size, size, px).unwrap(),
        &VisionConfig::default(),
    )
}

fn disk(cx: f64, cy: f64, r: f64) -> impl Fn(f64, f64) -> bool {
    move |x, y| (x - cx).powi(2) + (y - cy).powi(2) <= r * r
}

fn portal(shape: PortalShape, cx: f64, side: f64) -> Portal {
    Portal {
        shape,
        center: Point::new(cx, 0.5),
        size: Size::new(side, side),
        confidence: 0.9,
        darkness_ratio: 0.8,
        edge_strength: 0.7,
    }
}

#[test]
fn dark_disk_is_a_circle_portal() {
    let p = PortalMatcher::default().detect(&frame(10, 240, disk(48.0, 48.0, 16.0)));
    assert_eq!(p.len(), 1, "{p:?}");
    assert_eq!(p[0].shape, PortalShape::Circle);
    assert!(p[0].darkness_ratio > 0.9);
    assert!(p[0].edge_strength > 0.5);
    assert!((p[0].center.x - 0.5).abs() < 0.02);
    let q = p[0].quality_score();
    assert!(q > 0.0 && q <= 1.0);
}

#[test]
fn bright_disk_is_accepted_on_edges_alone() {
    let p = PortalMatcher::default().detect(&frame(240, 10, disk(48.0, 48.0, 16.0)));
    assert_eq!(p.len(), 1);
    assert_eq!(p[0].darkness_ratio, 0.0);
    assert!(p[0].edge_strength > 0.5);
}

#[test]
fn dark_box_and_tall_ellipse() {
    let boxed = frame(10, 240, |x, y| (30.0..=65.0).contains(&x) && (20.0..=60.0).contains(&y));
    let p = PortalMatcher::default().detect(&boxed);
    assert_eq!(p.len(), 1);
    assert_eq!(p[0].shape, PortalShape::Rectangle);

    let tall = frame(10, 240, |x, y| {
        ((x - 48.0) / 12.0).powi(2) + ((y - 48.0) / 24.0).powi(2) <= 1.0
    });
    let p = PortalMatcher::default().detect(&tall);
    assert_eq!(p.len(), 1);
    assert_eq!(p[0].shape, PortalShape::Arch);
}

#[test]
fn flat_frame_has_no_portals() {
    let f = frame(0, 128, |_, _| false);
    let r = PortalMatcher::default().analyze(&f, &f);
    assert!(r.portals_shot1.is_empty());
    assert!(r.best_match.is_none());
    assert!(r.recommended_effect.is_none());
}

#[test]
fn size_score_peaks_at_a_quarter() {
    assert_eq!(portal(PortalShape::Arch, 0.5, 0.5).size_score(), 1.0);
    assert_eq!(portal(PortalShape::Arch, 0.5, 0.0).size_score(), 0.0);
    assert!(portal(PortalShape::Arch, 0.5, 0.3).size_score() < 1.0);
}

#[test]
fn matches_are_one_to_one() {
    let m = PortalMatcher::default();
    let p1 = vec![
        portal(PortalShape::Circle, 0.5, 0.5),
        portal(PortalShape::Circle, 0.52, 0.5),
        portal(PortalShape::Rectangle, 0.4, 0.4),
    ];
    let p2 = vec![portal(PortalShape::Circle, 0.5, 0.5)];
    let r = m.pair(p1, p2);
    assert_eq!(r.all_matches.len(), 1);
    let best = r.best_match.unwrap();
    assert_eq!((best.source, best.target), (0, 0));
    assert_eq!(r.recommended_effect, Some(PortalEffect::ZoomSpiral));
    assert!((0.0..=1.0).contains(&best.overall_score));
}

#[test]
fn effect_decision_tree() {
    let m = PortalMatcher::default();
    let r = m.pair(
        vec![portal(PortalShape::Rectangle, 0.5, 0.5)],
        vec![portal(PortalShape::Circle, 0.5, 0.5)],
    );
    assert_eq!(r.recommended_effect, Some(PortalEffect::DirectPortal));

    let r = m.pair(
        vec![portal(PortalShape::Rectangle, 0.3, 0.5)],
        vec![portal(PortalShape::Rectangle, 0.6, 0.4)],
    );
    assert_eq!(r.recommended_effect, Some(PortalEffect::PortalWipe));

    let r = m.pair(
        vec![portal(PortalShape::Rectangle, 0.0, 0.05)],
        vec![portal(PortalShape::Rectangle, 1.0, 0.5)],
    );
    assert!(r.all_matches.is_empty());
    assert!(r.recommended_effect.is_none());
}
