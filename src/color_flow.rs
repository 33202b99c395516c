//! Color-flow analysis: how two shots' palettes and lighting blend across a transition.

use std::collections::BTreeSet;

use crate::animation::ease::Ease;
use crate::descriptor::{ColorPalette, LightingInfo, LightingType, ShotDescriptor};
use crate::foundation::core::{MAX_RGB_DISTANCE, Rgb8, clamp01};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Diagonal,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BlendCurve {
    #[default]
    Linear,
    EaseInOut,
}

impl BlendCurve {
    pub fn ease(self) -> Ease {
        match self {
            Self::Linear => Ease::Linear,
            Self::EaseInOut => Ease::EaseInOut,
        }
    }
}

/// Grading effect a renderer may apply during the blend.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ColorEffect {
    ColorTemperatureShift,
    ExposureRamp,
    SaturationBlend,
    LightingMatch,
    /// Always suggested.
    ColorGrade,
    /// Always suggested.
    GradientBlend,
}

/// Interpolated palette for one frame of the transition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    pub frame: usize,
    /// Eased progress in `[0, 1]`.
    pub t: f64,
    pub colors: Vec<Rgb8>,
    pub brightness: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorFlowAnalysis {
    pub gradient_kind: GradientKind,
    pub blend_curve: BlendCurve,
    pub color_similarity: f64,
    pub lighting_compatibility: f64,
    pub compatibility: f64,
    pub effects: BTreeSet<ColorEffect>,
    pub stops: Vec<ColorStop>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorFlowConfig {
    /// Palette entries compared per shot.
    pub top_colors: usize,
    pub radial_brightness_delta: f64,
    pub ease_temperature_delta: f64,
    pub temperature_shift_delta: f64,
    pub exposure_ramp_delta: f64,
    pub saturation_blend_delta: f64,
    pub similarity_weight: f64,
    pub brightness_weight: f64,
    pub saturation_weight: f64,
    pub lighting_weight: f64,
}

impl Default for ColorFlowConfig {
    fn default() -> Self {
        Self {
            top_colors: 3,
            radial_brightness_delta: 0.3,
            ease_temperature_delta: 0.3,
            temperature_shift_delta: 0.5,
            exposure_ramp_delta: 0.4,
            saturation_blend_delta: 0.4,
            similarity_weight: 0.4,
            brightness_weight: 0.2,
            saturation_weight: 0.2,
            lighting_weight: 0.2,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ColorFlowAnalyzer {
    cfg: ColorFlowConfig,
}

impl ColorFlowAnalyzer {
    pub fn new(cfg: ColorFlowConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ColorFlowConfig {
        &self.cfg
    }

    pub fn analyze(
        &self,
        a: &ShotDescriptor,
        b: &ShotDescriptor,
        transition_frames: usize,
    ) -> ColorFlowAnalysis {
        let cfg = &self.cfg;
        let (pa, pb) = (&a.palette, &b.palette);
        let d_bright = (pa.brightness - pb.brightness).abs();
        let d_sat = (pa.saturation - pb.saturation).abs();
        let d_temp = (pa.temperature - pb.temperature).abs();

        let gradient_kind = if a.lighting.kind == LightingType::Directional
            && b.lighting.kind == LightingType::Directional
        {
            GradientKind::Diagonal
        } else if d_bright > cfg.radial_brightness_delta {
            GradientKind::Radial
        } else {
            GradientKind::Linear
        };
        let blend_curve = if d_temp > cfg.ease_temperature_delta {
            BlendCurve::EaseInOut
        } else {
            BlendCurve::Linear
        };

        let color_similarity = color_similarity(pa, pb, cfg.top_colors);
        let lighting_compatibility = lighting_compatibility(&a.lighting, &b.lighting);
        let compatibility = clamp01(
            cfg.similarity_weight * clamp01(color_similarity)
                + cfg.brightness_weight * clamp01(1.0 - d_bright)
                + cfg.saturation_weight * clamp01(1.0 - d_sat)
                + cfg.lighting_weight * clamp01(lighting_compatibility),
        );

        let mut effects = BTreeSet::new();
        if d_temp > cfg.temperature_shift_delta {
            effects.insert(ColorEffect::ColorTemperatureShift);
        }
        if d_bright > cfg.exposure_ramp_delta {
            effects.insert(ColorEffect::ExposureRamp);
        }
        if d_sat > cfg.saturation_blend_delta {
            effects.insert(ColorEffect::SaturationBlend);
        }
        if a.lighting.kind != b.lighting.kind {
            effects.insert(ColorEffect::LightingMatch);
        }
        effects.insert(ColorEffect::ColorGrade);
        effects.insert(ColorEffect::GradientBlend);

        ColorFlowAnalysis {
            gradient_kind,
            blend_curve,
            color_similarity,
            lighting_compatibility,
            compatibility,
            effects,
            stops: color_stops(pa, pb, transition_frames, blend_curve, cfg.top_colors),
        }
    }
}

/// How closely `a`'s top colors are matched somewhere in `b`'s top colors.
///
/// Weights come from `a` only, so the score is not symmetric.
pub fn color_similarity(a: &ColorPalette, b: &ColorPalette, top: usize) -> f64 {
    let (ta, tb) = (a.top(top), b.top(top));
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let total: f64 = ta.iter().map(|c| c.weight).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let mut acc = 0.0;
    for ca in ta {
        let nearest = tb
            .iter()
            .map(|cb| ca.color.distance(cb.color))
            .fold(f64::INFINITY, f64::min);
        acc += ca.weight * (1.0 - nearest / MAX_RGB_DISTANCE);
    }
    clamp01(acc / total)
}

pub fn lighting_compatibility(a: &LightingInfo, b: &LightingInfo) -> f64 {
    use LightingType::*;
    match (a.kind, b.kind) {
        (Directional, Directional) => {
            let (la, lb) = (a.direction.hypot(), b.direction.hypot());
            if la <= f64::EPSILON || lb <= f64::EPSILON {
                return 0.5;
            }
            0.5 + 0.5 * clamp01(a.direction.dot(b.direction) / (la * lb))
        }
        (x, y) if x == y => 1.0,
        (Ambient, Directional) | (Directional, Ambient) => 0.3,
        _ => 0.6,
    }
}

/// Per-frame palette interpolation between the two shots' heaviest colors.
pub fn color_stops(
    a: &ColorPalette,
    b: &ColorPalette,
    frames: usize,
    curve: BlendCurve,
    top: usize,
) -> Vec<ColorStop> {
    let (ta, tb) = (a.top(top), b.top(top));
    let n = ta.len().max(tb.len());
    let pick = |list: &[crate::descriptor::WeightedColor], i: usize| {
        list.get(i)
            .or_else(|| list.last())
            .map(|c| c.color)
            .unwrap_or_default()
    };
    let ease = curve.ease();
    (0..frames)
        .map(|frame| {
            let raw = if frames <= 1 {
                0.0
            } else {
                frame as f64 / (frames - 1) as f64
            };
            let t = ease.apply(raw);
            ColorStop {
                frame,
                t,
                colors: (0..n).map(|i| pick(ta, i).lerp(pick(tb, i), t)).collect(),
                brightness: a.brightness + (b.brightness - a.brightness) * t,
            }
        })
        .collect()
}

/// Row-major `[0, 1]` transition mask for `kind`.
pub fn gradient_mask(kind: GradientKind, width: u32, height: u32) -> Vec<f32> {
    let (w, h) = (width as usize, height as usize);
    let fx = |x: usize| if w > 1 { x as f64 / (w - 1) as f64 } else { 0.0 };
    let fy = |y: usize| if h > 1 { y as f64 / (h - 1) as f64 } else { 0.0 };
    let mut out = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let v = match kind {
                GradientKind::Linear => fx(x),
                GradientKind::Diagonal => (fx(x) + fy(y)) / 2.0,
                GradientKind::Radial => {
                    let (dx, dy) = (fx(x) - 0.5, fy(y) - 0.5);
                    (dx * dx + dy * dy).sqrt() / std::f64::consts::FRAC_1_SQRT_2
                }
            };
            out.push(clamp01(v) as f32);
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/unit/analysis/color_flow.rs"]
mod tests;
