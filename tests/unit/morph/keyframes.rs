use super::*;
use crate::foundation::core::norm_rect;

fn pair() -> (SubjectRegion, SubjectRegion) {
    (
        SubjectRegion::new("face", 0.6, norm_rect(0.1, 0.1, 0.3, 0.4)),
        SubjectRegion::new("face", 0.6, norm_rect(0.6, 0.5, 1.0, 0.9)),
    )
}

#[test]
fn endpoints_are_exact_for_every_curve() {
    let (a, b) = pair();
    for ease in Ease::ALL {
        let k = synthesize(&a, &b, 10, ease, 1.5, 0.3);
        assert_eq!(k.len(), 10);
        assert_eq!(k[0].point, a.center, "{ease:?}");
        assert_eq!(k[9].point, b.center, "{ease:?}");
        assert_eq!(k[0].time, 0.0);
        assert_eq!(k[9].time, 1.5);
        assert!(k.windows(2).all(|w| w[0].time <= w[1].time), "{ease:?}");
    }
}

#[test]
fn only_interior_keyframes_have_handles() {
    let (a, b) = pair();
    let k = synthesize(&a, &b, 5, Ease::Linear, 1.0, 0.3);
    assert!(k[0].control_in.is_none() && k[0].control_out.is_none());
    assert!(k[4].control_in.is_none() && k[4].control_out.is_none());
    for i in 1..4 {
        let secant = k[i + 1].point - k[i - 1].point;
        let out = k[i].control_out.unwrap();
        assert!((out - k[i].point - secant * 0.3).hypot() < 1e-12);
    }
}

#[test]
fn scale_and_opacity_follow_progress() {
    let (a, b) = pair();
    let k = synthesize(&a, &b, 3, Ease::Linear, 1.0, 0.3);
    let end = (b.area / a.area).sqrt();
    assert_eq!(k[0].scale, 1.0);
    assert!((k[2].scale - end).abs() < 1e-12);
    assert_eq!(k[0].opacity, 1.0);
    assert_eq!(k[2].opacity, 0.0);
}

#[test]
fn count_is_at_least_two() {
    let (a, b) = pair();
    assert_eq!(synthesize(&a, &b, 0, Ease::Bounce, 1.0, 0.3).len(), 2);
}
