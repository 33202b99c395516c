//! Portal detection: enclosed shapes that can act as a doorway into the next shot.

use crate::foundation::core::{Point, Size, clamp01};
use crate::foundation::math::ratio;
use crate::vision::Frame;
use crate::vision::contours::{Contour, fit_ellipse};
use crate::vision::gradient::MAX_SOBEL_MAGNITUDE;
use crate::vision::shapes::{ShapeConfig, rectangle_fit};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalShape {
    Circle,
    Rectangle,
    Arch,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Portal {
    pub shape: PortalShape,
    pub center: Point,
    /// Bounding size relative to the frame.
    pub size: Size,
    pub confidence: f64,
    /// How much darker the region is than its immediate surround.
    pub darkness_ratio: f64,
    pub edge_strength: f64,
}

impl Portal {
    pub fn area(&self) -> f64 {
        self.size.width * self.size.height
    }

    /// Peaks at a quarter of the frame area.
    pub fn size_score(&self) -> f64 {
        clamp01(1.0 - (self.area() - 0.25).abs() / 0.25)
    }

    pub fn quality_score(&self) -> f64 {
        clamp01(
            self.confidence
                * (0.3 * self.size_score() + 0.4 * self.darkness_ratio + 0.3 * self.edge_strength),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PortalMatch {
    /// Index into `portals_shot1`.
    pub source: usize,
    /// Index into `portals_shot2`.
    pub target: usize,
    pub alignment: f64,
    pub size_compatibility: f64,
    pub overall_score: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalEffect {
    ZoomSpiral,
    DirectPortal,
    PortalWipe,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PortalEffectAnalysis {
    pub portals_shot1: Vec<Portal>,
    pub portals_shot2: Vec<Portal>,
    pub best_match: Option<PortalMatch>,
    pub all_matches: Vec<PortalMatch>,
    pub recommended_effect: Option<PortalEffect>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub min_region_fraction: f64,
    pub darkness_threshold: f64,
    pub edge_threshold: f64,
    /// Mean boundary Sobel magnitude that maps to full edge strength.
    pub edge_scale: f64,
    pub min_circularity: f64,
    pub rectangle: ShapeConfig,
    /// Minimum height/width for an arch.
    pub arch_min_aspect: f64,
    /// Minimum region area relative to its fitted ellipse.
    pub arch_min_fill: f64,
    /// Width in pixels of the ring sampled around a region.
    pub surround_margin: u32,
    pub pair_threshold: f64,
    pub direct_alignment: f64,
    pub direct_size: f64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            min_region_fraction: 0.01,
            darkness_threshold: 0.3,
            edge_threshold: 0.5,
            edge_scale: f64::from(MAX_SOBEL_MAGNITUDE) * 0.5,
            min_circularity: 0.85,
            rectangle: ShapeConfig::default(),
            arch_min_aspect: 1.2,
            arch_min_fill: 0.75,
            surround_margin: 3,
            pair_threshold: 0.5,
            direct_alignment: 0.95,
            direct_size: 0.9,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PortalMatcher {
    cfg: PortalConfig,
}

impl PortalMatcher {
    pub fn new(cfg: PortalConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.cfg
    }

    /// Enclosed regions that look like a circle, rectangle or arch and are dark or well edged.
    pub fn detect(&self, frame: &Frame) -> Vec<Portal> {
        let cfg = &self.cfg;
        let total = frame.pixel_count();
        let (w, h) = (f64::from(frame.width()), f64::from(frame.height()));
        let mut out = Vec::new();
        for region in frame.enclosed_regions() {
            if region.area / total < cfg.min_region_fraction {
                continue;
            }
            let Some((shape, confidence)) = self.classify(region) else {
                continue;
            };
            let darkness_ratio = darkness(frame, region, cfg.surround_margin);
            let edge_strength = boundary_strength(frame, region, cfg.edge_scale);
            if darkness_ratio <= cfg.darkness_threshold && edge_strength <= cfg.edge_threshold {
                continue;
            }
            out.push(Portal {
                shape,
                center: Point::new((region.centroid.x + 0.5) / w, (region.centroid.y + 0.5) / h),
                size: Size::new(region.bbox_width() / w, region.bbox_height() / h),
                confidence: clamp01(confidence),
                darkness_ratio,
                edge_strength,
            });
        }
        out
    }

    fn classify(&self, region: &Contour) -> Option<(PortalShape, f64)> {
        let circularity = region.circularity();
        if circularity >= self.cfg.min_circularity {
            return Some((PortalShape::Circle, circularity));
        }
        if let Some((fill, _)) = rectangle_fit(region, &self.cfg.rectangle) {
            return Some((PortalShape::Rectangle, fill));
        }
        let ellipse = fit_ellipse(&region.boundary)?;
        let aspect = region.bbox_height() / region.bbox_width();
        let fill = ratio(region.area, ellipse.area());
        (aspect >= self.cfg.arch_min_aspect && fill >= self.cfg.arch_min_fill)
            .then_some((PortalShape::Arch, fill))
    }

    pub fn analyze(&self, a: &Frame, b: &Frame) -> PortalEffectAnalysis {
        self.pair(self.detect(a), self.detect(b))
    }

    /// Score every cross pair and assign greedily by overall score.
    pub fn pair(&self, p1: Vec<Portal>, p2: Vec<Portal>) -> PortalEffectAnalysis {
        let mut candidates = Vec::new();
        for (i, a) in p1.iter().enumerate() {
            for (j, b) in p2.iter().enumerate() {
                let alignment = 1.0 - clamp01(a.center.distance(b.center));
                let size_compatibility = ratio(a.area(), b.area());
                if (alignment + size_compatibility) / 2.0 <= self.cfg.pair_threshold {
                    continue;
                }
                candidates.push(PortalMatch {
                    source: i,
                    target: j,
                    alignment,
                    size_compatibility,
                    overall_score: clamp01(
                        0.3 * a.quality_score()
                            + 0.3 * b.quality_score()
                            + 0.2 * alignment
                            + 0.2 * size_compatibility,
                    ),
                });
            }
        }
        candidates.sort_by(|x, y| {
            y.overall_score
                .total_cmp(&x.overall_score)
                .then(x.source.cmp(&y.source))
                .then(x.target.cmp(&y.target))
        });

        let mut used1 = vec![false; p1.len()];
        let mut used2 = vec![false; p2.len()];
        let mut all_matches = Vec::new();
        for m in candidates {
            if used1[m.source] || used2[m.target] {
                continue;
            }
            used1[m.source] = true;
            used2[m.target] = true;
            all_matches.push(m);
        }

        let best_match = all_matches.first().copied();
        let recommended_effect = best_match.map(|m| self.recommend(&p1[m.source], &p2[m.target], &m));
        PortalEffectAnalysis {
            portals_shot1: p1,
            portals_shot2: p2,
            best_match,
            all_matches,
            recommended_effect,
        }
    }

    fn recommend(&self, a: &Portal, b: &Portal, m: &PortalMatch) -> PortalEffect {
        if a.shape == PortalShape::Circle && b.shape == PortalShape::Circle {
            PortalEffect::ZoomSpiral
        } else if m.alignment > self.cfg.direct_alignment
            && m.size_compatibility > self.cfg.direct_size
        {
            PortalEffect::DirectPortal
        } else {
            PortalEffect::PortalWipe
        }
    }
}

/// `1 - inside / surround` luma, using a ring of `margin` pixels around the bounding box.
fn darkness(frame: &Frame, region: &Contour, margin: u32) -> f64 {
    let (w, h) = (frame.width(), frame.height());
    let (x0, y0, x1, y1) = region.bbox;
    let ox0 = x0.saturating_sub(margin);
    let oy0 = y0.saturating_sub(margin);
    let ox1 = (x1 + margin).min(w - 1);
    let oy1 = (y1 + margin).min(h - 1);
    let mut sum = 0.0;
    let mut n = 0usize;
    for y in oy0..=oy1 {
        for x in ox0..=ox1 {
            if x >= x0 && x <= x1 && y >= y0 && y <= y1 {
                continue;
            }
            sum += f64::from(frame.raster.luma_at(x, y));
            n += 1;
        }
    }
    if n == 0 || sum <= 0.0 {
        return 0.0;
    }
    let surround = sum / n as f64;
    clamp01(1.0 - region.mean_luma / surround)
}

fn boundary_strength(frame: &Frame, region: &Contour, scale: f64) -> f64 {
    if region.boundary.is_empty() || scale <= 0.0 {
        return 0.0;
    }
    let sum: f64 = region
        .boundary
        .iter()
        .map(|&(x, y)| f64::from(frame.gradient.magnitude_at(x as u32, y as u32)))
        .sum();
    clamp01(sum / region.boundary.len() as f64 / scale)
}

#[cfg(test)]
#[path = "../tests/unit/analysis/portal.rs"]
mod tests;
