use super::*;
use crate::foundation::core::{Rgb8, Vec2};
use crate::morph::subjects::SubjectRegion;
use crate::vision::raster::Raster;
use std::path::Path;

fn solid(c: Rgb8) -> ShotAnalysis {
    let raster = Raster::solid(48, 32, c).unwrap();
    ShotAnalyzer::default().analyze_raster(raster, Path::new("solid.png"))
}

fn shot<'a>(index: usize, analysis: &'a ShotAnalysis, subjects: &'a [SubjectRegion]) -> ShotRef<'a> {
    ShotRef {
        index,
        path: Path::new("solid.png"),
        analysis,
        subjects,
    }
}

fn no_evidence() -> (MatchCutAnalysis, PortalEffectAnalysis, MorphTransition) {
    let morph = MorphTransition {
        ease: crate::animation::ease::Ease::Linear,
        duration: 1.0,
        morphs: Vec::new(),
    };
    (MatchCutAnalysis::default(), PortalEffectAnalysis::default(), morph)
}

fn pick(
    m: &TransitionMatcher,
    motion: f64,
    color: f64,
    composition: f64,
    heading: Direction,
) -> Option<TransitionKind> {
    let (mc, portal, morph) = no_evidence();
    let ctx = RuleContext {
        overall: 0.4 * motion + 0.3 * color + 0.3 * composition,
        motion,
        color,
        composition,
        heading,
        match_cut: &mc,
        portal: &portal,
        morph: &morph,
    };
    m.select_rule(&ctx).map(|(r, _)| r.kind)
}

#[test]
fn fallback_follows_score_thresholds() {
    let m = TransitionMatcher::default();
    assert_eq!(m.fallback(0.1, 0.9, 0.9).0, TransitionKind::Cut);
    assert_eq!(m.fallback(0.5, 0.85, 0.9).0, TransitionKind::WhipPan);
    assert_eq!(m.fallback(0.5, 0.5, 0.85).0, TransitionKind::Dissolve);
    assert_eq!(m.fallback(0.5, 0.5, 0.5).0, TransitionKind::Fade);
}

#[test]
fn duration_scales_with_overall() {
    let m = TransitionMatcher::default();
    assert!((m.duration_for(TransitionKind::Dissolve, 0.9) - 1.2).abs() < 1e-12);
    assert!((m.duration_for(TransitionKind::Dissolve, 0.5) - 1.0).abs() < 1e-12);
    assert!((m.duration_for(TransitionKind::Dissolve, 0.1) - 0.7).abs() < 1e-12);
    assert_eq!(m.duration_for(TransitionKind::Cut, 0.9), 0.0);
}

#[test]
fn higher_priority_rule_wins() {
    let m = TransitionMatcher::default();
    // Horizontal momentum (70) and related palette (50) both hold.
    assert_eq!(pick(&m, 0.7, 0.6, 0.2, Direction::Right), Some(TransitionKind::WhipPan));
    assert_eq!(pick(&m, 0.7, 0.6, 0.2, Direction::Static), Some(TransitionKind::GradientWipe));
    assert_eq!(pick(&m, 0.45, 0.2, 0.2, Direction::Down), Some(TransitionKind::Wipe));
    assert_eq!(pick(&m, 0.1, 0.1, 0.1, Direction::Static), None);
}

#[test]
fn portal_rule_reads_best_match() {
    let m = TransitionMatcher::default();
    let (mc, mut portal, morph) = no_evidence();
    portal.best_match = Some(crate::portal::PortalMatch {
        source: 0,
        target: 0,
        alignment: 1.0,
        size_compatibility: 1.0,
        overall_score: 0.8,
    });
    let ctx = RuleContext {
        overall: 0.9,
        motion: 0.9,
        color: 0.9,
        composition: 0.9,
        heading: Direction::Right,
        match_cut: &mc,
        portal: &portal,
        morph: &morph,
    };
    let (rule, evidence) = m.select_rule(&ctx).unwrap();
    assert_eq!(rule.kind, TransitionKind::Portal);
    assert_eq!(evidence, 0.8);
}

#[test]
fn red_to_green_falls_through_to_cut() {
    let m = TransitionMatcher::default();
    let red = solid(Rgb8::new(255, 0, 0));
    let green = solid(Rgb8::new(0, 255, 0));
    let s = m.suggest(shot(0, &red, &[]), shot(1, &green, &[]));
    assert_eq!(s.transition, TransitionKind::Cut);
    assert_eq!(s.duration, 0.0);
    let c = s.compatibility.as_ref().unwrap();
    assert!(c.overall < 0.3);
    assert_eq!(c.motion_continuity, 0.0);
    assert_eq!(c.composition_match, 0.0);
    assert!(c.notes[0].starts_with("fallback"));
    assert!((s.confidence - (1.0 - c.overall)).abs() < 1e-12);
    assert!(matches!(s.effects[0], EffectParam::ColorFlow { .. }));
}

#[test]
fn identical_solids_dissolve() {
    let m = TransitionMatcher::default();
    let red = solid(Rgb8::new(255, 0, 0));
    let s = m.suggest(shot(0, &red, &[]), shot(1, &red, &[]));
    let c = s.compatibility.as_ref().unwrap();
    assert!((c.color_harmony - 1.0).abs() < 1e-12);
    assert_eq!(s.transition, TransitionKind::Dissolve);
}

#[test]
fn matching_subjects_attach_morph_export() {
    let m = TransitionMatcher::default();
    let red = solid(Rgb8::new(255, 0, 0));
    let bbox = crate::foundation::core::norm_rect(0.3, 0.1, 0.7, 0.9);
    let subjects = [SubjectRegion::new("person", 0.5, bbox)];
    let s = m.suggest(shot(0, &red, &subjects), shot(1, &red, &subjects));
    assert_eq!(s.transition, TransitionKind::Morph);
    assert!(s.effects.iter().any(|e| matches!(e, EffectParam::Morph { .. })));
}

#[test]
fn weak_pair_morph_uses_short_duration() {
    let m = TransitionMatcher::default();
    let a = solid(Rgb8::new(200, 120, 80));
    let b = solid(Rgb8::new(190, 110, 90));
    let bbox = crate::foundation::core::norm_rect(0.3, 0.1, 0.7, 0.9);
    let subjects = [SubjectRegion::new("person", 0.5, bbox)];
    let s = m.suggest(shot(0, &a, &subjects), shot(1, &b, &subjects));

    let c = s.compatibility.as_ref().unwrap();
    assert!(c.overall > 0.2 && c.overall < 0.3);
    assert_eq!(s.transition, TransitionKind::Morph);
    assert!((s.duration - 0.7).abs() < 1e-12);
    assert_eq!(c.duration, s.duration);

    let export = s
        .effects
        .iter()
        .find_map(|e| match e {
            EffectParam::Morph { export } => Some(export),
            _ => None,
        })
        .unwrap();
    assert_eq!(export.duration_frames, 21);
    assert_eq!(export.layers[0].keyframes.last().unwrap().frame, 21);
}

#[test]
fn shared_tags_do_not_morph_incompatible_shots() {
    let m = TransitionMatcher::default();
    let red = solid(Rgb8::new(255, 0, 0));
    let green = solid(Rgb8::new(0, 255, 0));
    let full = crate::foundation::core::norm_rect(0.0, 0.0, 1.0, 1.0);
    let subjects = [SubjectRegion::new("landscape", 0.3, full)];
    let s = m.suggest(shot(0, &red, &subjects), shot(1, &green, &subjects));
    assert_eq!(s.transition, TransitionKind::Cut);
    assert!(s.compatibility.as_ref().unwrap().notes[0].starts_with("fallback"));
}

#[test]
fn effect_params_serialize_with_kind_tag() {
    let effects = vec![
        EffectParam::Portal {
            effect: crate::portal::PortalEffect::ZoomSpiral,
            source_center: Point::new(0.5, 0.5),
            target_center: Point::new(0.4, 0.5),
            score: 0.8,
        },
        EffectParam::Heading {
            heading: Direction::Left,
        },
    ];
    let json = serde_json::to_value(&effects).unwrap();
    assert_eq!(json[0]["kind"], "portal");
    assert_eq!(json[0]["effect"], "zoom_spiral");
    assert_eq!(json[1]["kind"], "heading");
    let back: Vec<EffectParam> = serde_json::from_value(json).unwrap();
    assert_eq!(back, effects);
}

#[test]
fn vector_continuity_needs_confident_motion() {
    let mut a = MotionVector {
        direction: Vec2::new(1.0, 0.0),
        heading: Direction::Right,
        speed: 0.5,
        confidence: 1.0,
        ..MotionVector::default()
    };
    let b = a.clone();
    assert!((vector_continuity(&a, &b) - 1.0).abs() < 1e-12);
    a.confidence = 0.0;
    assert_eq!(vector_continuity(&a, &b), 0.0);
}

#[test]
fn thirds_overlap_is_jaccard() {
    let p = |x, y| Point::new(x, y);
    let a = [p(1.0 / 3.0, 1.0 / 3.0), p(2.0 / 3.0, 1.0 / 3.0)];
    let b = [p(1.0 / 3.0, 1.0 / 3.0)];
    assert!((thirds_overlap(&a, &b) - 0.5).abs() < 1e-12);
    assert_eq!(thirds_overlap(&[], &[]), 0.0);
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert!(build_thread_pool(Some(1)).is_ok());
}
