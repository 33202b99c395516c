//! Match-cut detection: local motion and primitive shapes correlated across two frames.

use crate::foundation::core::{Point, Vec2, clamp01};
use crate::foundation::math::{closeness, correlation01, mean, ratio};
use crate::vision::Frame;
use crate::vision::contours::fit_ellipse;
use crate::vision::shapes::{DetectedShape, ShapeConfig, ShapeKind, detect_shapes};

/// Motion cue of one significant region: the axis it is stretched along.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocalMotion {
    /// Unit axis in image space. The sign carries no meaning.
    pub direction: Vec2,
    pub magnitude: f64,
    pub center: Point,
    pub confidence: f64,
}

/// Per-frame inputs to match-cut scoring; computed once per shot.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatchCutFeatures {
    pub motions: Vec<LocalMotion>,
    pub shapes: Vec<DetectedShape>,
    pub edge_histogram: Vec<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionMatch {
    pub source: usize,
    pub target: usize,
    pub similarity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapeMatch {
    pub source: usize,
    pub target: usize,
    pub kind: ShapeKind,
    pub similarity: f64,
    pub confidence: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Motion,
    Shape,
    Action,
    #[default]
    Composite,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatchCutAnalysis {
    pub motion_matches: Vec<MotionMatch>,
    pub shape_matches: Vec<ShapeMatch>,
    pub action_continuity: f64,
    pub match_type: MatchType,
    pub confidence: f64,
}

impl MatchCutAnalysis {
    pub fn has_matches(&self) -> bool {
        !self.motion_matches.is_empty() || !self.shape_matches.is_empty()
    }
}

/// Best match-cut partner found for a shot inside the look-ahead window.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatchCutOpportunity {
    pub source: usize,
    pub target: usize,
    pub analysis: MatchCutAnalysis,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MatchCutConfig {
    pub shapes: ShapeConfig,
    /// Regions outside this band of the frame area produce no motion vector.
    pub min_region_fraction: f64,
    pub max_region_fraction: f64,
    /// Rounder regions carry no usable axis.
    pub min_elongation: f64,
    pub motion_threshold: f64,
    pub shape_threshold: f64,
    pub direction_weight: f64,
    pub magnitude_weight: f64,
    pub position_weight: f64,
    pub histogram_bins: usize,
    pub edge_threshold: f32,
    /// Look-ahead for sequence scans.
    pub window: usize,
    pub min_confidence: f64,
}

impl Default for MatchCutConfig {
    fn default() -> Self {
        Self {
            shapes: ShapeConfig::default(),
            min_region_fraction: 0.005,
            max_region_fraction: 0.6,
            min_elongation: 0.15,
            motion_threshold: 0.7,
            shape_threshold: 0.8,
            direction_weight: 0.5,
            magnitude_weight: 0.3,
            position_weight: 0.2,
            histogram_bins: 8,
            edge_threshold: 100.0,
            window: 5,
            min_confidence: 0.25,
        }
    }
}

impl MatchCutFeatures {
    pub fn extract(frame: &Frame, cfg: &MatchCutConfig) -> Self {
        let (w, h) = (f64::from(frame.width()), f64::from(frame.height()));
        let total = frame.pixel_count();
        let mut motions = Vec::new();
        for region in &frame.regions {
            let frac = region.area / total;
            if frac < cfg.min_region_fraction || frac > cfg.max_region_fraction {
                continue;
            }
            let Some(ellipse) = fit_ellipse(&region.boundary) else {
                continue;
            };
            let elongation = ellipse.elongation();
            if elongation < cfg.min_elongation {
                continue;
            }
            motions.push(LocalMotion {
                direction: Vec2::new(ellipse.angle.cos(), ellipse.angle.sin()),
                magnitude: clamp01(elongation),
                center: Point::new((region.centroid.x + 0.5) / w, (region.centroid.y + 0.5) / h),
                confidence: clamp01(elongation / 0.5),
            });
        }
        Self {
            motions,
            shapes: detect_shapes(frame, &cfg.shapes),
            edge_histogram: frame
                .gradient
                .orientation_histogram(cfg.histogram_bins, cfg.edge_threshold),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShapeMotionMatcher {
    cfg: MatchCutConfig,
}

impl ShapeMotionMatcher {
    pub fn new(cfg: MatchCutConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &MatchCutConfig {
        &self.cfg
    }

    pub fn motion_similarity(&self, a: &LocalMotion, b: &LocalMotion) -> f64 {
        let cos = a.direction.dot(b.direction).abs();
        clamp01(
            self.cfg.direction_weight * clamp01(cos)
                + self.cfg.magnitude_weight * closeness(a.magnitude, b.magnitude)
                + self.cfg.position_weight * (1.0 - clamp01(a.center.distance(b.center))),
        )
    }

    /// Same-kind shape similarity; `None` across kinds.
    pub fn shape_similarity(&self, a: &DetectedShape, b: &DetectedShape) -> Option<f64> {
        if a.kind != b.kind {
            return None;
        }
        let angle = match a.kind {
            ShapeKind::Circle => 1.0,
            ShapeKind::Line | ShapeKind::Rectangle => {
                let d = (a.angle_deg - b.angle_deg).rem_euclid(180.0);
                1.0 - d.min(180.0 - d) / 90.0
            }
        };
        Some(clamp01(
            0.4 * (1.0 - clamp01(a.center.distance(b.center)))
                + 0.3 * ratio(a.size, b.size)
                + 0.3 * angle,
        ))
    }

    pub fn analyze(&self, a: &MatchCutFeatures, b: &MatchCutFeatures) -> MatchCutAnalysis {
        let motion_matches: Vec<MotionMatch> = greedy(a.motions.len(), b.motions.len(), |i, j| {
            let s = self.motion_similarity(&a.motions[i], &b.motions[j]);
            (s > self.cfg.motion_threshold).then_some(s)
        })
        .into_iter()
        .map(|(source, target, similarity)| MotionMatch {
            source,
            target,
            similarity,
        })
        .collect();

        let shape_matches: Vec<ShapeMatch> = greedy(a.shapes.len(), b.shapes.len(), |i, j| {
            self.shape_similarity(&a.shapes[i], &b.shapes[j])
                .filter(|&s| s > self.cfg.shape_threshold)
        })
        .into_iter()
        .map(|(source, target, similarity)| {
            let (sa, sb) = (&a.shapes[source], &b.shapes[target]);
            ShapeMatch {
                source,
                target,
                kind: sa.kind,
                similarity,
                confidence: clamp01(similarity * (sa.confidence * sb.confidence).sqrt()),
            }
        })
        .collect();

        let motion_mean = mean(&motion_matches.iter().map(|m| m.similarity).collect::<Vec<_>>());
        let shape_mean = mean(&shape_matches.iter().map(|m| m.confidence).collect::<Vec<_>>());
        let edge_corr = correlation01(&a.edge_histogram, &b.edge_histogram);
        let action_continuity = clamp01(0.5 * motion_mean + 0.3 * shape_mean + 0.2 * edge_corr);

        let match_type = classify(motion_matches.len(), shape_matches.len(), action_continuity);
        let mut out = MatchCutAnalysis {
            motion_matches,
            shape_matches,
            action_continuity,
            match_type,
            confidence: 0.0,
        };
        if out.has_matches() {
            out.confidence = action_continuity;
        }
        out
    }

    /// Scan each shot against the next `window` shots and keep its strongest partner.
    pub fn find_match_cuts(&self, shots: &[MatchCutFeatures]) -> Vec<MatchCutOpportunity> {
        let window = self.cfg.window.max(1);
        let mut out = Vec::new();
        for i in 0..shots.len() {
            let mut best: Option<MatchCutOpportunity> = None;
            for j in i + 1..shots.len().min(i + 1 + window) {
                let analysis = self.analyze(&shots[i], &shots[j]);
                if analysis.confidence < self.cfg.min_confidence || !analysis.has_matches() {
                    continue;
                }
                if best
                    .as_ref()
                    .is_none_or(|b| analysis.confidence > b.analysis.confidence)
                {
                    best = Some(MatchCutOpportunity {
                        source: i,
                        target: j,
                        analysis,
                    });
                }
            }
            out.extend(best);
        }
        out
    }
}

/// Weighted vote between match categories; anything but a unique winner is composite.
pub fn classify(motion_matches: usize, shape_matches: usize, action_continuity: f64) -> MatchType {
    let scores = [
        (MatchType::Motion, motion_matches as f64 * 0.3),
        (MatchType::Shape, shape_matches as f64 * 0.3),
        (MatchType::Action, action_continuity * 0.4),
    ];
    let top = scores.iter().map(|s| s.1).fold(f64::MIN, f64::max);
    let mut winners = scores.iter().filter(|s| s.1 == top);
    match (winners.next(), winners.next()) {
        (Some(w), None) => w.0,
        _ => MatchType::Composite,
    }
}

/// Order-dependent one-to-one assignment: each source, in order, takes its best free target.
pub(crate) fn greedy(
    sources: usize,
    targets: usize,
    mut score: impl FnMut(usize, usize) -> Option<f64>,
) -> Vec<(usize, usize, f64)> {
    let mut used = vec![false; targets];
    let mut out = Vec::new();
    for i in 0..sources {
        let mut best: Option<(usize, f64)> = None;
        for (j, taken) in used.iter().enumerate() {
            if *taken {
                continue;
            }
            if let Some(s) = score(i, j)
                && best.is_none_or(|(_, bs)| s > bs)
            {
                best = Some((j, s));
            }
        }
        if let Some((j, s)) = best {
            used[j] = true;
            out.push((i, j, s));
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/unit/analysis/match_cut.rs"]
mod tests;
