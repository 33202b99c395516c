use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in Ease::ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{}", ease.name());
        assert_eq!(ease.apply(1.0), 1.0, "{}", ease.name());
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in [Ease::Linear, Ease::EaseIn, Ease::EaseOut, Ease::EaseInOut] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn elastic_overshoots_and_settles() {
    let peak = (1..100)
        .map(|i| Ease::Elastic.apply(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
    assert!((Ease::Elastic.apply(0.99) - 1.0).abs() < 0.01);
    assert!(Ease::Elastic.overshoots());
}

#[test]
fn bounce_stays_in_unit_range() {
    for i in 0..=100 {
        let v = Ease::Bounce.apply(f64::from(i) / 100.0);
        assert!((0.0..=1.0).contains(&v), "bounce({i}) = {v}");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::EaseIn.apply(-1.0), 0.0);
    assert_eq!(Ease::EaseOut.apply(2.0), 1.0);
}

#[test]
fn serde_names_match_export_names() {
    for ease in Ease::ALL {
        let json = serde_json::to_string(&ease).unwrap();
        assert_eq!(json, format!("\"{}\"", ease.name()));
    }
}
