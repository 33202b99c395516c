use super::*;
use crate::foundation::core::Rgb8;
use crate::vision::VisionConfig;
use crate::vision::raster::Raster;

fn frame(f: impl Fn(u32, u32) -> bool) -> Frame {
    let size = 96u32;
    let mut px = Vec::new();
    for y in 0..size {
        for x in 0..size {
            px.push(if f(x, y) {
                Rgb8::new(240, 240, 240)
            } else {
                Rgb8::new(10, 10, 10)
            });
        }
    }
    Frame::analyze(
        Raster::from_rgb(size, size, px).unwrap(),
        &VisionConfig::default(),
    )
}

fn disk_at(cx: f64) -> MatchCutFeatures {
    let f = frame(move |x, y| {
        let (dx, dy) = (x as f64 - cx, y as f64 - 48.0);
        dx * dx + dy * dy <= 15.0 * 15.0
    });
    MatchCutFeatures::extract(&f, &MatchCutConfig::default())
}

fn bar_at(x0: u32) -> MatchCutFeatures {
    let f = frame(move |x, y| (x0..x0 + 40).contains(&x) && (44..52).contains(&y));
    MatchCutFeatures::extract(&f, &MatchCutConfig::default())
}

fn solid() -> MatchCutFeatures {
    MatchCutFeatures::extract(&frame(|_, _| false), &MatchCutConfig::default())
}

#[test]
fn classify_prefers_unique_winner() {
    assert_eq!(classify(0, 0, 0.0), MatchType::Composite);
    assert_eq!(classify(3, 0, 0.5), MatchType::Motion);
    assert_eq!(classify(0, 2, 0.5), MatchType::Shape);
    assert_eq!(classify(0, 0, 0.5), MatchType::Action);
    assert_eq!(classify(1, 1, 0.2), MatchType::Composite);
}

#[test]
fn greedy_assignment_is_order_dependent() {
    // Both sources prefer target 0; the first source wins it.
    let scores = [[0.9, 0.8], [0.95, 0.1]];
    let m = greedy(2, 2, |i, j| Some(scores[i][j]));
    assert_eq!(m, vec![(0, 0, 0.9), (1, 1, 0.1)]);

    let m = greedy(3, 1, |_, _| Some(1.0));
    assert_eq!(m.len(), 1);
    assert!(greedy(2, 2, |_, _| None).is_empty());
}

#[test]
fn featureless_frames_have_no_evidence() {
    let a = ShapeMotionMatcher::default().analyze(&solid(), &solid());
    assert!(a.motion_matches.is_empty());
    assert!(a.shape_matches.is_empty());
    assert_eq!(a.action_continuity, 0.0);
    assert_eq!(a.match_type, MatchType::Composite);
    assert_eq!(a.confidence, 0.0);
}

#[test]
fn motion_similarity_bounds() {
    let m = ShapeMotionMatcher::default();
    let v = |x: f64, y: f64| LocalMotion {
        direction: Vec2::new(x, y),
        magnitude: 0.5,
        center: Point::new(0.5, 0.5),
        confidence: 1.0,
    };
    assert!((m.motion_similarity(&v(1.0, 0.0), &v(-1.0, 0.0)) - 1.0).abs() < 1e-12);
    assert!(m.motion_similarity(&v(1.0, 0.0), &v(0.0, 1.0)) <= 0.5 + 1e-12);
}

#[test]
fn shapes_only_match_within_kind() {
    let m = ShapeMotionMatcher::default();
    let s = |kind| DetectedShape {
        kind,
        center: Point::new(0.5, 0.5),
        size: 0.1,
        angle_deg: 0.0,
        confidence: 1.0,
    };
    assert!(m.shape_similarity(&s(ShapeKind::Circle), &s(ShapeKind::Line)).is_none());
    let same = m.shape_similarity(&s(ShapeKind::Line), &s(ShapeKind::Line)).unwrap();
    assert!((same - 1.0).abs() < 1e-9);
}

#[test]
fn shifted_disk_is_a_shape_match() {
    let a = disk_at(30.0);
    let b = disk_at(36.0);
    assert!(a.motions.is_empty());
    let r = ShapeMotionMatcher::default().analyze(&a, &b);
    assert_eq!(r.shape_matches.len(), 1);
    assert_eq!(r.shape_matches[0].kind, ShapeKind::Circle);
    assert_eq!(r.match_type, MatchType::Shape);
    assert!(r.confidence >= 0.25 && r.confidence <= 1.0);
}

#[test]
fn parallel_bars_match_motion() {
    let r = ShapeMotionMatcher::default().analyze(&bar_at(20), &bar_at(26));
    assert_eq!(r.motion_matches.len(), 1);
    assert!(r.motion_matches[0].similarity > 0.9);
    assert!(r.confidence > 0.0);
}

#[test]
fn sequence_scan_respects_window() {
    let shots = vec![disk_at(30.0), solid(), disk_at(34.0)];
    let found = ShapeMotionMatcher::default().find_match_cuts(&shots);
    assert_eq!(found.len(), 1);
    assert_eq!((found[0].source, found[0].target), (0, 2));

    let narrow = ShapeMotionMatcher::new(MatchCutConfig {
        window: 1,
        ..MatchCutConfig::default()
    });
    assert!(narrow.find_match_cuts(&shots).is_empty());
}
