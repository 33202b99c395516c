use super::*;

fn flat_metrics() -> VisualMetrics {
    VisualMetrics {
        brightness: 0.5,
        ..VisualMetrics::default()
    }
}

#[test]
fn bpm_snaps_to_whole_beats() {
    assert_eq!(snap_to_beats(1.3, 120.0), (1.5, 3));
    assert_eq!(snap_to_beats(0.1, 120.0), (0.5, 1));
    assert_eq!(snap_to_beats(2.0, 60.0), (2.0, 2));
}

#[test]
fn cut_styles_follow_thresholds() {
    let cfg = RhythmConfig::default();
    assert_eq!(CutStyle::for_duration(0.5, &cfg), CutStyle::Quick);
    assert_eq!(CutStyle::for_duration(1.0, &cfg), CutStyle::Standard);
    assert_eq!(CutStyle::for_duration(2.5, &cfg), CutStyle::Long);
    assert_eq!(CutStyle::for_duration(4.0, &cfg), CutStyle::Hold);
}

#[test]
fn raw_duration_formula() {
    let a = VisualRhythmAnalyzer::default();
    assert_eq!(a.raw_duration(0.0, 0.0), 2.0);
    assert!((a.raw_duration(1.0, 1.0) - 2.0 * 2.5 * 0.7).abs() < 1e-12);
}

#[test]
fn single_shot_has_one_entry_and_full_balance() {
    let a = VisualRhythmAnalyzer::default();
    let r = a.analyze(&[flat_metrics().into()], None, None);
    assert_eq!(r.pacing.len(), 1);
    assert_eq!(r.complexity.len(), 1);
    assert_eq!(r.energy.len(), 1);
    assert_eq!(r.rhythm_curve, vec![1.0]);
    assert_eq!(r.balance_score, 1.0);
}

#[test]
fn empty_sequence_is_empty() {
    let r = VisualRhythmAnalyzer::default().analyze(&[], Some(10.0), Some(120.0));
    assert!(r.pacing.is_empty());
    assert_eq!(r.balance_score, 1.0);
}

#[test]
fn target_rescales_after_snapping() {
    let a = VisualRhythmAnalyzer::default();
    let busy = VisualMetrics {
        edge_density: 0.8,
        color_variance: 0.6,
        texture_complexity: 0.7,
        region_count: 12,
        ..flat_metrics()
    };
    let shots: Vec<RhythmInput> = vec![flat_metrics().into(), busy.into(), flat_metrics().into()];
    let r = a.analyze(&shots, Some(9.0), Some(120.0));
    assert!((r.total_duration() - 9.0).abs() < 1e-9);
    assert!(r.pacing.iter().all(|p| p.beats.is_some()));
    assert!(r.pacing[1].duration > r.pacing[0].duration);
    assert!(r.complexity[1] > r.complexity[0]);
}

#[test]
fn original_durations_are_reported() {
    let shots = [RhythmInput {
        index: None,
        metrics: flat_metrics(),
        original_duration: Some(3.2),
    }];
    let r = VisualRhythmAnalyzer::default().analyze(&shots, None, None);
    assert_eq!(r.pacing[0].original_duration, Some(3.2));
    assert_eq!(r.pacing[0].index, 0);
}

#[test]
fn pacing_reports_caller_indices() {
    let shots = [
        RhythmInput {
            index: Some(1),
            ..RhythmInput::from(flat_metrics())
        },
        RhythmInput {
            index: Some(4),
            ..RhythmInput::from(flat_metrics())
        },
    ];
    let r = VisualRhythmAnalyzer::default().analyze(&shots, None, None);
    let indices: Vec<usize> = r.pacing.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1, 4]);
}

#[test]
fn scores_stay_in_range() {
    let a = VisualRhythmAnalyzer::default();
    let extreme = VisualMetrics {
        edge_density: 1.0,
        color_variance: 1.0,
        texture_complexity: 1.0,
        region_count: 100,
        movement_potential: 1.0,
        brightness: 1.0,
        saturation: 1.0,
        sharpness: 0.0,
        warm_weight: 1.0,
    };
    for m in [extreme, VisualMetrics::default()] {
        assert!((0.0..=1.0).contains(&a.complexity(&m)));
        assert!((0.0..=1.0).contains(&a.energy(&m)));
    }
}

#[test]
fn alternating_holds_score_higher_balance() {
    let e = [0.5, 0.5, 0.5, 0.5];
    let alternating = balance_score(&[1.0, 3.0, 1.0, 3.0], &e);
    let monotone = balance_score(&[1.0, 1.0, 3.0, 3.0], &e);
    assert!(alternating > monotone);
    assert!((0.0..=1.0).contains(&alternating));
    assert_eq!(balance_score(&[2.0, 2.0], &[0.1, 0.1]), 0.0);
}

#[test]
fn warmth_peaks_at_orange() {
    assert!((hue_warmth(30.0) - 1.0).abs() < 1e-12);
    assert!(hue_warmth(210.0).abs() < 1e-12);
    assert!(hue_warmth(0.0) > hue_warmth(120.0));
}
