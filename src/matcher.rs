//! Pairwise orchestration: compatibility scores, the transition rule table and the
//! sequence-level pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::cache::DescriptorCache;
use crate::color_flow::{
    BlendCurve, ColorEffect, ColorFlowAnalysis, ColorFlowAnalyzer, GradientKind, color_similarity,
};
use crate::config::{EngineConfig, ThreadingConfig};
use crate::descriptor::{CompositionAnalysis, MotionVector, ShotDescriptor};
use crate::foundation::core::{Direction, Point, clamp01, norm_distance};
use crate::foundation::error::{SegueError, SegueResult};
use crate::foundation::math::{closeness, correlation01};
use crate::match_cut::{MatchCutAnalysis, MatchCutFeatures, MatchType, ShapeMotionMatcher};
use crate::morph::export::MorphExport;
use crate::morph::subjects::SubjectRegion;
use crate::morph::{MorphTransition, SubjectMorpher};
use crate::plan::{EditPlan, SequenceRequest, ShotFailure};
use crate::portal::{PortalEffect, PortalEffectAnalysis, PortalMatcher};
use crate::rhythm::{RhythmInput, VisualRhythmAnalyzer};
use crate::shot::{ShotAnalysis, ShotAnalyzer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Cut,
    Dissolve,
    Fade,
    WhipPan,
    MatchCut,
    Wipe,
    Zoom,
    Morph,
    Portal,
    GradientWipe,
}

impl TransitionKind {
    /// Nominal duration in seconds before compatibility scaling.
    pub fn base_duration(self) -> f64 {
        match self {
            Self::Cut | Self::MatchCut => 0.0,
            Self::WhipPan => 0.3,
            Self::Zoom => 0.6,
            Self::Wipe => 0.8,
            Self::Dissolve | Self::Fade | Self::Morph | Self::GradientWipe => 1.0,
            Self::Portal => 1.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneCompatibility {
    pub overall: f64,
    pub motion_continuity: f64,
    pub color_harmony: f64,
    pub composition_match: f64,
    pub transition: TransitionKind,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Open-ended side-channel parameters of a suggestion.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectParam {
    Heading {
        heading: Direction,
    },
    ColorFlow {
        gradient: GradientKind,
        blend: BlendCurve,
        compatibility: f64,
        effects: Vec<ColorEffect>,
    },
    MatchCut {
        match_type: MatchType,
        confidence: f64,
        motion_matches: usize,
        shape_matches: usize,
    },
    Portal {
        effect: PortalEffect,
        source_center: Point,
        target_center: Point,
        score: f64,
    },
    Morph {
        export: Box<MorphExport>,
    },
    Other {
        key: String,
        value: String,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionSuggestion {
    /// Request index of the outgoing shot.
    pub source: usize,
    /// Request index of the incoming shot.
    pub target: usize,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub transition: TransitionKind,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<EffectParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<SceneCompatibility>,
    pub confidence: f64,
}

/// Inclusive score interval.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl ScoreRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self { min, max: 1.0 }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum RuleCondition {
    Scores {
        #[serde(default)]
        motion: ScoreRange,
        #[serde(default)]
        color: ScoreRange,
        #[serde(default)]
        composition: ScoreRange,
    },
    /// Outgoing shot heads in one of `headings` with enough motion continuity.
    Heading {
        headings: Vec<Direction>,
        min_motion: f64,
    },
    MatchCut {
        min_confidence: f64,
    },
    Portal {
        min_score: f64,
    },
    /// Matched subjects, gated on the pair's overall score so tags alone never force a morph.
    Morph {
        min_similarity: f64,
        #[serde(default)]
        min_overall: f64,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionRule {
    pub name: String,
    pub priority: i32,
    pub kind: TransitionKind,
    pub condition: RuleCondition,
}

impl TransitionRule {
    fn new(name: &str, priority: i32, kind: TransitionKind, condition: RuleCondition) -> Self {
        Self {
            name: name.to_string(),
            priority,
            kind,
            condition,
        }
    }
}

/// Everything a rule condition can look at for one pair.
#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a> {
    pub overall: f64,
    pub motion: f64,
    pub color: f64,
    pub composition: f64,
    pub heading: Direction,
    pub match_cut: &'a MatchCutAnalysis,
    pub portal: &'a PortalEffectAnalysis,
    pub morph: &'a MorphTransition,
}

impl RuleCondition {
    /// Evidence in `[0, 1]` when the condition holds.
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<f64> {
        match self {
            Self::Scores {
                motion,
                color,
                composition,
            } => (motion.contains(ctx.motion)
                && color.contains(ctx.color)
                && composition.contains(ctx.composition))
            .then(|| (ctx.motion + ctx.color + ctx.composition) / 3.0),
            Self::Heading {
                headings,
                min_motion,
            } => (headings.contains(&ctx.heading) && ctx.motion >= *min_motion).then_some(ctx.motion),
            Self::MatchCut { min_confidence } => (ctx.match_cut.has_matches()
                && ctx.match_cut.confidence >= *min_confidence)
                .then_some(ctx.match_cut.confidence),
            Self::Portal { min_score } => ctx
                .portal
                .best_match
                .map(|m| m.overall_score)
                .filter(|s| s >= min_score),
            Self::Morph {
                min_similarity,
                min_overall,
            } => ctx
                .morph
                .morphs
                .iter()
                .map(|m| m.similarity)
                .max_by(f64::total_cmp)
                .filter(|s| s >= min_similarity && ctx.overall >= *min_overall),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub motion_weight: f64,
    pub color_weight: f64,
    pub composition_weight: f64,
    /// Share of motion continuity taken from the descriptors' motion vectors; the rest comes
    /// from match-cut action continuity.
    pub vector_share: f64,
    pub harmony_similarity_weight: f64,
    pub harmony_temperature_weight: f64,
    pub composition_center_weight: f64,
    pub composition_thirds_weight: f64,
    pub composition_quadrant_weight: f64,
    pub cut_below: f64,
    pub momentum_above: f64,
    pub dissolve_above: f64,
    pub long_above: f64,
    pub long_scale: f64,
    pub short_scale: f64,
    /// Frames handed to the color-flow recipe.
    pub transition_frames: usize,
    /// Best portal score that attaches portal parameters to any suggestion.
    pub portal_effect_min: f64,
    pub rules: Vec<TransitionRule>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        use TransitionKind as K;
        Self {
            motion_weight: 0.4,
            color_weight: 0.3,
            composition_weight: 0.3,
            vector_share: 0.7,
            harmony_similarity_weight: 0.7,
            harmony_temperature_weight: 0.3,
            composition_center_weight: 0.4,
            composition_thirds_weight: 0.3,
            composition_quadrant_weight: 0.3,
            cut_below: 0.3,
            momentum_above: 0.8,
            dissolve_above: 0.8,
            long_above: 0.8,
            long_scale: 1.2,
            short_scale: 0.7,
            transition_frames: 30,
            portal_effect_min: 0.6,
            rules: vec![
                TransitionRule::new("portal", 90, K::Portal, RuleCondition::Portal { min_score: 0.75 }),
                TransitionRule::new(
                    "subject_morph",
                    85,
                    K::Morph,
                    RuleCondition::Morph {
                        min_similarity: 0.75,
                        min_overall: 0.2,
                    },
                ),
                TransitionRule::new(
                    "match_cut",
                    80,
                    K::MatchCut,
                    RuleCondition::MatchCut {
                        min_confidence: 0.6,
                    },
                ),
                TransitionRule::new(
                    "horizontal_momentum",
                    70,
                    K::WhipPan,
                    RuleCondition::Heading {
                        headings: vec![Direction::Left, Direction::Right],
                        min_motion: 0.6,
                    },
                ),
                TransitionRule::new(
                    "aligned_push",
                    60,
                    K::Zoom,
                    RuleCondition::Scores {
                        motion: ScoreRange::at_least(0.5),
                        color: ScoreRange::default(),
                        composition: ScoreRange::at_least(0.7),
                    },
                ),
                TransitionRule::new(
                    "related_palette",
                    50,
                    K::GradientWipe,
                    RuleCondition::Scores {
                        motion: ScoreRange::default(),
                        color: ScoreRange::new(0.5, 0.8),
                        composition: ScoreRange::new(0.0, 0.5),
                    },
                ),
                TransitionRule::new(
                    "vertical_momentum",
                    40,
                    K::Wipe,
                    RuleCondition::Heading {
                        headings: vec![Direction::Up, Direction::Down],
                        min_motion: 0.4,
                    },
                ),
                TransitionRule::new(
                    "shared_look",
                    30,
                    K::Dissolve,
                    RuleCondition::Scores {
                        motion: ScoreRange::default(),
                        color: ScoreRange::at_least(0.7),
                        composition: ScoreRange::at_least(0.5),
                    },
                ),
            ],
        }
    }
}

/// One side of a pair as the matcher sees it.
#[derive(Clone, Copy, Debug)]
pub struct ShotRef<'a> {
    pub index: usize,
    pub path: &'a std::path::Path,
    pub analysis: &'a ShotAnalysis,
    pub subjects: &'a [SubjectRegion],
}

#[derive(Clone, Debug, Default)]
pub struct TransitionMatcher {
    cfg: MatcherConfig,
    threading: ThreadingConfig,
    shots: ShotAnalyzer,
    color_flow: ColorFlowAnalyzer,
    match_cut: ShapeMotionMatcher,
    portal: PortalMatcher,
    morph: SubjectMorpher,
    rhythm: VisualRhythmAnalyzer,
}

impl TransitionMatcher {
    pub fn new(cfg: EngineConfig) -> Self {
        let EngineConfig {
            vision,
            descriptor,
            color_flow,
            match_cut,
            portal,
            morph,
            rhythm,
            matcher,
            threading,
        } = cfg;
        Self {
            shots: ShotAnalyzer::new(
                vision,
                descriptor,
                match_cut.clone(),
                portal.clone(),
                rhythm.clone(),
            ),
            color_flow: ColorFlowAnalyzer::new(color_flow),
            match_cut: ShapeMotionMatcher::new(match_cut),
            portal: PortalMatcher::new(portal),
            morph: SubjectMorpher::new(morph),
            rhythm: VisualRhythmAnalyzer::new(rhythm),
            cfg: matcher,
            threading,
        }
    }

    /// Swap the subject morpher, e.g. for one backed by a real region estimator.
    pub fn with_morpher(mut self, morph: SubjectMorpher) -> Self {
        self.morph = morph;
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.cfg
    }

    pub fn shot_analyzer(&self) -> &ShotAnalyzer {
        &self.shots
    }

    pub fn motion_continuity(&self, a: &ShotAnalysis, b: &ShotAnalysis, mc: &MatchCutAnalysis) -> f64 {
        let share = clamp01(self.cfg.vector_share);
        clamp01(
            share * vector_continuity(&a.descriptor.motion, &b.descriptor.motion)
                + (1.0 - share) * mc.action_continuity,
        )
    }

    pub fn color_harmony(&self, a: &ShotDescriptor, b: &ShotDescriptor) -> f64 {
        let top = self.color_flow.config().top_colors;
        let similarity =
            (color_similarity(&a.palette, &b.palette, top) + color_similarity(&b.palette, &a.palette, top))
                / 2.0;
        let temp = closeness(a.palette.temperature, b.palette.temperature);
        clamp01(
            self.cfg.harmony_similarity_weight * similarity
                + self.cfg.harmony_temperature_weight * temp,
        )
    }

    pub fn composition_match(&self, a: &CompositionAnalysis, b: &CompositionAnalysis) -> f64 {
        let center = if a.structure > 0.0 && b.structure > 0.0 {
            1.0 - norm_distance(a.visual_weight_center, b.visual_weight_center)
        } else {
            0.0
        };
        clamp01(
            self.cfg.composition_center_weight * center
                + self.cfg.composition_thirds_weight * thirds_overlap(&a.thirds_hits, &b.thirds_hits)
                + self.cfg.composition_quadrant_weight
                    * correlation01(&a.quadrant_brightness, &b.quadrant_brightness),
        )
    }

    /// Highest-priority matching rule; earlier entries win ties.
    pub fn select_rule<'r>(&'r self, ctx: &RuleContext<'_>) -> Option<(&'r TransitionRule, f64)> {
        let mut best: Option<(&TransitionRule, f64)> = None;
        for rule in &self.cfg.rules {
            if let Some(evidence) = rule.condition.evaluate(ctx)
                && best.is_none_or(|(b, _)| rule.priority > b.priority)
            {
                best = Some((rule, evidence));
            }
        }
        best
    }

    /// Score-threshold default used when no rule matches.
    pub fn fallback(&self, overall: f64, motion: f64, color: f64) -> (TransitionKind, f64, &'static str) {
        if overall < self.cfg.cut_below {
            (TransitionKind::Cut, 1.0 - overall, "low overall compatibility")
        } else if motion > self.cfg.momentum_above {
            (TransitionKind::WhipPan, motion, "strong motion continuity")
        } else if color > self.cfg.dissolve_above {
            (TransitionKind::Dissolve, color, "strong color harmony")
        } else {
            (TransitionKind::Fade, overall, "moderate compatibility")
        }
    }

    pub fn duration_for(&self, kind: TransitionKind, overall: f64) -> f64 {
        let scale = if overall > self.cfg.long_above {
            self.cfg.long_scale
        } else if overall < self.cfg.cut_below {
            self.cfg.short_scale
        } else {
            1.0
        };
        kind.base_duration() * scale
    }

    #[tracing::instrument(skip_all, fields(source = a.index, target = b.index))]
    pub fn suggest(&self, a: ShotRef<'_>, b: ShotRef<'_>) -> TransitionSuggestion {
        let (sa, sb) = (a.analysis, b.analysis);
        let flow = self
            .color_flow
            .analyze(&sa.descriptor, &sb.descriptor, self.cfg.transition_frames);
        let mc = self.match_cut.analyze(&sa.match_cut, &sb.match_cut);
        let portal = self.portal.pair(sa.portals.clone(), sb.portals.clone());

        let motion = self.motion_continuity(sa, sb, &mc);
        let color = self.color_harmony(&sa.descriptor, &sb.descriptor);
        let composition = self.composition_match(&sa.descriptor.composition, &sb.descriptor.composition);
        let overall = clamp01(
            self.cfg.motion_weight * motion
                + self.cfg.color_weight * color
                + self.cfg.composition_weight * composition,
        );
        let morph = self.morph.build_transition(
            a.subjects,
            b.subjects,
            self.duration_for(TransitionKind::Morph, overall),
        );

        let heading = sa.descriptor.motion.heading;
        let ctx = RuleContext {
            overall,
            motion,
            color,
            composition,
            heading,
            match_cut: &mc,
            portal: &portal,
            morph: &morph,
        };
        let mut notes = Vec::new();
        let (kind, confidence) = match self.select_rule(&ctx) {
            Some((rule, evidence)) => {
                notes.push(format!("rule '{}' (priority {})", rule.name, rule.priority));
                (rule.kind, evidence)
            }
            None => {
                let (kind, confidence, why) = self.fallback(overall, motion, color);
                notes.push(format!("fallback: {why}"));
                (kind, confidence)
            }
        };
        let duration = self.duration_for(kind, overall);
        tracing::debug!(?kind, overall, duration, "transition selected");

        let effects = self.effects(kind, heading, &flow, &mc, &portal, &morph);
        let compatibility = SceneCompatibility {
            overall,
            motion_continuity: motion,
            color_harmony: color,
            composition_match: composition,
            transition: kind,
            duration,
            notes,
        };
        TransitionSuggestion {
            source: a.index,
            target: b.index,
            source_path: a.path.to_path_buf(),
            target_path: b.path.to_path_buf(),
            transition: kind,
            duration,
            effects,
            compatibility: Some(compatibility),
            confidence: clamp01(confidence),
        }
    }

    fn effects(
        &self,
        kind: TransitionKind,
        heading: Direction,
        flow: &ColorFlowAnalysis,
        mc: &MatchCutAnalysis,
        portal: &PortalEffectAnalysis,
        morph: &MorphTransition,
    ) -> Vec<EffectParam> {
        let mut out = vec![EffectParam::ColorFlow {
            gradient: flow.gradient_kind,
            blend: flow.blend_curve,
            compatibility: flow.compatibility,
            effects: flow.effects.iter().copied().collect(),
        }];
        if matches!(kind, TransitionKind::WhipPan | TransitionKind::Wipe) {
            let heading = if heading == Direction::Static {
                Direction::Right
            } else {
                heading
            };
            out.push(EffectParam::Heading { heading });
        }
        if mc.has_matches() {
            out.push(EffectParam::MatchCut {
                match_type: mc.match_type,
                confidence: mc.confidence,
                motion_matches: mc.motion_matches.len(),
                shape_matches: mc.shape_matches.len(),
            });
        }
        if let (Some(m), Some(effect)) = (portal.best_match, portal.recommended_effect)
            && m.overall_score > self.cfg.portal_effect_min
        {
            out.push(EffectParam::Portal {
                effect,
                source_center: portal.portals_shot1[m.source].center,
                target_center: portal.portals_shot2[m.target].center,
                score: m.overall_score,
            });
        }
        if !morph.is_empty() {
            out.push(EffectParam::Morph {
                export: Box::new(self.morph.export(morph)),
            });
        }
        out
    }

    pub fn analyze_sequence(&self, request: &SequenceRequest) -> SegueResult<EditPlan> {
        self.analyze_sequence_with_cancel(request, &AtomicBool::new(false))
    }

    /// Full pipeline: per-shot analysis, pairwise suggestions, match-cut scan, pacing.
    ///
    /// `cancel` is polled before every shot and pair; whatever finished stays in the plan.
    #[tracing::instrument(skip_all, fields(shots = request.shots.len()))]
    pub fn analyze_sequence_with_cancel(
        &self,
        request: &SequenceRequest,
        cancel: &AtomicBool,
    ) -> SegueResult<EditPlan> {
        request.validate()?;
        let pool = build_thread_pool(self.threading.threads)?;
        let cache = DescriptorCache::new();

        let results: Vec<Option<SegueResult<Arc<ShotAnalysis>>>> = pool.install(|| {
            request
                .shots
                .par_iter()
                .map(|shot| {
                    if cancel.load(Ordering::Relaxed) {
                        return None;
                    }
                    Some(cache.get_or_compute(&shot.path, |p| self.shots.analyze_path(p)))
                })
                .collect()
        });

        let mut ok: Vec<Analyzed> = Vec::new();
        let mut failures = Vec::new();
        for (index, (shot, result)) in request.shots.iter().zip(results).enumerate() {
            match result {
                Some(Ok(analysis)) => {
                    let subjects = self.morph.detect_subjects(&shot.tags, &analysis.hints());
                    ok.push((index, analysis, subjects));
                }
                Some(Err(err)) if !err.is_per_unit() => return Err(err),
                Some(Err(err)) => {
                    tracing::warn!(index, path = %shot.path.display(), error = %err, "shot failed");
                    failures.push(ShotFailure {
                        index,
                        path: shot.path.clone(),
                        error: err.to_string(),
                    });
                }
                None => {}
            }
        }

        let transitions: Vec<TransitionSuggestion> = pool.install(|| {
            ok.par_windows(2)
                .filter_map(|w| {
                    if cancel.load(Ordering::Relaxed) {
                        return None;
                    }
                    Some(self.suggest(shot_ref(request, &w[0]), shot_ref(request, &w[1])))
                })
                .collect()
        });

        let features: Vec<MatchCutFeatures> = ok.iter().map(|(_, a, _)| a.match_cut.clone()).collect();
        let match_cuts = self
            .match_cut
            .find_match_cuts(&features)
            .into_iter()
            .map(|mut m| {
                m.source = ok[m.source].0;
                m.target = ok[m.target].0;
                m
            })
            .collect();

        let rhythm_inputs: Vec<RhythmInput> = ok
            .iter()
            .map(|(index, analysis, _)| RhythmInput {
                index: Some(*index),
                metrics: analysis.metrics,
                original_duration: request.shots[*index].timing.map(|t| t.duration()),
            })
            .collect();
        let rhythm = self
            .rhythm
            .analyze(&rhythm_inputs, request.target_duration, request.bpm);

        let shots: Vec<(usize, PathBuf)> = ok
            .iter()
            .map(|(index, _, _)| (*index, request.shots[*index].path.clone()))
            .collect();
        let mut plan = EditPlan::assemble(&shots, transitions, match_cuts, rhythm, failures);
        plan.cancelled = cancel.load(Ordering::Relaxed);
        if plan.cancelled {
            tracing::warn!(completed = plan.shots.len(), "sequence analysis cancelled");
        }
        tracing::debug!(
            decoded = cache.computed(),
            failures = plan.failures.len(),
            "sequence analyzed"
        );
        Ok(plan)
    }
}

type Analyzed = (usize, Arc<ShotAnalysis>, Vec<SubjectRegion>);

fn shot_ref<'a>(request: &'a SequenceRequest, entry: &'a Analyzed) -> ShotRef<'a> {
    let (index, analysis, subjects) = entry;
    ShotRef {
        index: *index,
        path: &request.shots[*index].path,
        analysis: analysis.as_ref(),
        subjects,
    }
}

/// Descriptor-level motion agreement, scaled by how sure both descriptors are.
pub fn vector_continuity(a: &MotionVector, b: &MotionVector) -> f64 {
    let sure = (clamp01(a.confidence) * clamp01(b.confidence)).sqrt();
    if sure <= 0.0 {
        return 0.0;
    }
    let (la, lb) = (a.direction.hypot(), b.direction.hypot());
    let direction = if la > 1e-9 && lb > 1e-9 {
        (1.0 + a.direction.dot(b.direction) / (la * lb)) / 2.0
    } else {
        0.0
    };
    clamp01(
        (0.5 * direction
            + 0.3 * closeness(a.speed, b.speed)
            + 0.2 * (1.0 - norm_distance(a.focal_point, b.focal_point)))
            * sure,
    )
}

/// Jaccard overlap of rule-of-thirds hits; two empty sets share nothing.
pub fn thirds_overlap(a: &[Point], b: &[Point]) -> f64 {
    let same = |p: &Point, q: &Point| p.distance(*q) < 1e-6;
    let shared = a.iter().filter(|p| b.iter().any(|q| same(p, q))).count();
    let union = a.len() + b.len() - shared;
    if union == 0 {
        return 0.0;
    }
    shared as f64 / union as f64
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> SegueResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SegueError::validation(
            "threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SegueError::analysis(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/analysis/matcher.rs"]
mod tests;
