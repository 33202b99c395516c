//! Subject morphing: pair labelled regions across two shots and animate between them.

pub mod export;
pub mod keyframes;
pub mod subjects;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::animation::ease::Ease;
use crate::foundation::core::clamp01;
use crate::foundation::math::ratio;
use crate::match_cut::greedy;

use self::export::MorphExport;
use self::keyframes::{MorphKeyframe, synthesize};
use self::subjects::{
    FrameHints, KeywordRegionEstimator, RegionEstimator, SubjectRegion, label_score,
    normalize_label,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    pub keyframes: usize,
    pub ease: Ease,
    pub frame_rate: f64,
    pub control_scale: f64,
    /// Label score for distinct labels from one synonym group.
    pub synonym_score: f64,
    pub default_threshold: f64,
    pub label_thresholds: BTreeMap<String, f64>,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            keyframes: 10,
            ease: Ease::EaseInOut,
            frame_rate: 30.0,
            control_scale: 0.3,
            synonym_score: 0.7,
            default_threshold: 0.5,
            label_thresholds: BTreeMap::from([("face".to_string(), 0.8)]),
        }
    }
}

impl MorphConfig {
    pub fn threshold_for(&self, label: &str) -> f64 {
        self.label_thresholds
            .get(&normalize_label(label))
            .copied()
            .unwrap_or(self.default_threshold)
    }
}

/// One matched subject pair and its animation path.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubjectMorph {
    pub source: SubjectRegion,
    pub target: SubjectRegion,
    pub similarity: f64,
    pub keyframes: Vec<MorphKeyframe>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MorphTransition {
    pub ease: Ease,
    pub duration: f64,
    pub morphs: Vec<SubjectMorph>,
}

impl MorphTransition {
    pub fn is_empty(&self) -> bool {
        self.morphs.is_empty()
    }
}

#[derive(Clone)]
pub struct SubjectMorpher {
    cfg: MorphConfig,
    estimator: Arc<dyn RegionEstimator>,
}

impl std::fmt::Debug for SubjectMorpher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubjectMorpher")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl Default for SubjectMorpher {
    fn default() -> Self {
        Self::new(MorphConfig::default())
    }
}

impl SubjectMorpher {
    pub fn new(cfg: MorphConfig) -> Self {
        Self::with_estimator(cfg, Arc::new(KeywordRegionEstimator))
    }

    pub fn with_estimator(cfg: MorphConfig, estimator: Arc<dyn RegionEstimator>) -> Self {
        Self { cfg, estimator }
    }

    pub fn config(&self) -> &MorphConfig {
        &self.cfg
    }

    /// Candidate subjects for one shot. Without tags there is nothing to estimate.
    pub fn detect_subjects(&self, tags: &[String], hints: &FrameHints) -> Vec<SubjectRegion> {
        self.estimator.estimate(tags, hints)
    }

    pub fn similarity(&self, a: &SubjectRegion, b: &SubjectRegion) -> Option<f64> {
        let label = label_score(&a.label, &b.label, self.cfg.synonym_score)?;
        Some(clamp01(
            0.5 * label
                + 0.3 * (1.0 - clamp01(a.center.distance(b.center)))
                + 0.2 * ratio(a.area, b.area),
        ))
    }

    /// Greedy one-to-one pairing; each source takes its best remaining eligible target.
    pub fn match_subjects(
        &self,
        a: &[SubjectRegion],
        b: &[SubjectRegion],
    ) -> Vec<(SubjectRegion, SubjectRegion, f64)> {
        greedy(a.len(), b.len(), |i, j| {
            let s = self.similarity(&a[i], &b[j])?;
            (s > self.cfg.threshold_for(&a[i].label)).then_some(s)
        })
        .into_iter()
        .map(|(i, j, s)| (a[i].clone(), b[j].clone(), s))
        .collect()
    }

    /// Morph animation lasting `duration` seconds for every matched pair.
    pub fn build_transition(
        &self,
        a: &[SubjectRegion],
        b: &[SubjectRegion],
        duration: f64,
    ) -> MorphTransition {
        let cfg = &self.cfg;
        let duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        let morphs = self
            .match_subjects(a, b)
            .into_iter()
            .map(|(source, target, similarity)| SubjectMorph {
                keyframes: synthesize(
                    &source,
                    &target,
                    cfg.keyframes,
                    cfg.ease,
                    duration,
                    cfg.control_scale,
                ),
                source,
                target,
                similarity,
            })
            .collect();
        MorphTransition {
            ease: cfg.ease,
            duration,
            morphs,
        }
    }

    pub fn export(&self, t: &MorphTransition) -> MorphExport {
        MorphExport::from_transition(t, self.cfg.frame_rate)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/morph/morpher.rs"]
mod tests;
