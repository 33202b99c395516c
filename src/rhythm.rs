//! Visual rhythm: per-shot complexity and energy turned into hold durations.

use crate::descriptor::ShotDescriptor;
use crate::foundation::core::clamp01;
use crate::foundation::math::{mean, sigmoid, std_dev};
use crate::vision::color::color_variance;
use crate::vision::gradient::laplacian_variance;
use crate::vision::spectrum::texture_complexity;
use crate::vision::{Frame, VisionConfig};

/// Raw per-shot measurements feeding complexity and energy. All in `[0, 1]` except the count.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualMetrics {
    pub edge_density: f64,
    pub color_variance: f64,
    pub texture_complexity: f64,
    pub region_count: usize,
    pub movement_potential: f64,
    pub brightness: f64,
    pub saturation: f64,
    pub sharpness: f64,
    /// Saturation-weighted warmth of the palette hues.
    pub warm_weight: f64,
}

impl VisualMetrics {
    pub fn measure(
        frame: &Frame,
        descriptor: &ShotDescriptor,
        vision: &VisionConfig,
        cfg: &RhythmConfig,
    ) -> Self {
        let motion = &descriptor.motion;
        let palette = &descriptor.palette;
        let total: f64 = palette.colors.iter().map(|c| c.weight).sum();
        let warm_weight = if total > 0.0 {
            palette
                .colors
                .iter()
                .map(|c| {
                    let (h, s, _) = c.color.hsv();
                    c.weight * hue_warmth(h) * s
                })
                .sum::<f64>()
                / total
        } else {
            0.0
        };
        Self {
            edge_density: clamp01(frame.edge_density()),
            color_variance: color_variance(&frame.raster, cfg.color_samples),
            texture_complexity: texture_complexity(&frame.raster, vision.spectrum_size),
            region_count: frame.regions.len(),
            movement_potential: clamp01(0.5 * motion.confidence + 0.5 * motion.speed),
            brightness: palette.brightness,
            saturation: palette.saturation,
            sharpness: clamp01(laplacian_variance(&frame.raster) / cfg.sharpness_scale.max(1.0)),
            warm_weight: clamp01(warm_weight),
        }
    }
}

/// `1` at orange (30 degrees), `0` at cyan-blue (210 degrees).
pub fn hue_warmth(hue_deg: f64) -> f64 {
    (1.0 + (hue_deg - 30.0).to_radians().cos()) / 2.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutStyle {
    Quick,
    Standard,
    Long,
    Hold,
}

impl CutStyle {
    pub fn for_duration(seconds: f64, cfg: &RhythmConfig) -> Self {
        if seconds < cfg.quick_below {
            Self::Quick
        } else if seconds < cfg.standard_below {
            Self::Standard
        } else if seconds < cfg.long_below {
            Self::Long
        } else {
            Self::Hold
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RhythmInput {
    /// Shot index reported in the pacing; the input position when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub metrics: VisualMetrics,
    /// Existing hold, when the shot already carries start/end timing.
    pub original_duration: Option<f64>,
}

impl From<VisualMetrics> for RhythmInput {
    fn from(metrics: VisualMetrics) -> Self {
        Self {
            index: None,
            metrics,
            original_duration: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PacingSuggestion {
    pub index: usize,
    /// Final hold in seconds.
    pub duration: f64,
    /// Hold before beat snapping and rescaling.
    pub raw_duration: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub beats: Option<u32>,
    pub cut_style: CutStyle,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub original_duration: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RhythmAnalysis {
    pub complexity: Vec<f64>,
    pub energy: Vec<f64>,
    pub pacing: Vec<PacingSuggestion>,
    /// Smoothed cut intensity per shot (short holds read high).
    pub rhythm_curve: Vec<f64>,
    pub balance_score: f64,
}

impl RhythmAnalysis {
    pub fn total_duration(&self) -> f64 {
        self.pacing.iter().map(|p| p.duration).sum()
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RhythmConfig {
    pub base_duration: f64,
    pub complexity_gain: f64,
    pub energy_damping: f64,
    /// Laplacian variance that counts as fully sharp.
    pub sharpness_scale: f64,
    /// Slope of the brightness sigmoid around mid-grey.
    pub brightness_steepness: f64,
    pub color_samples: usize,
    pub quick_below: f64,
    pub standard_below: f64,
    pub long_below: f64,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            base_duration: 2.0,
            complexity_gain: 1.5,
            energy_damping: 0.3,
            sharpness_scale: 1000.0,
            brightness_steepness: 10.0,
            color_samples: 4096,
            quick_below: 1.0,
            standard_below: 2.5,
            long_below: 4.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct VisualRhythmAnalyzer {
    cfg: RhythmConfig,
}

impl VisualRhythmAnalyzer {
    pub fn new(cfg: RhythmConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &RhythmConfig {
        &self.cfg
    }

    pub fn complexity(&self, m: &VisualMetrics) -> f64 {
        clamp01(
            0.3 * clamp01(m.edge_density)
                + 0.2 * clamp01(m.color_variance)
                + 0.2 * clamp01(m.texture_complexity)
                + 0.2 * (m.region_count as f64 / 10.0).min(1.0)
                + 0.1 * clamp01(m.movement_potential),
        )
    }

    pub fn energy(&self, m: &VisualMetrics) -> f64 {
        let bright = sigmoid(self.cfg.brightness_steepness * (m.brightness - 0.5));
        clamp01(
            0.3 * bright
                + 0.3 * clamp01(m.saturation)
                + 0.2 * (1.0 - clamp01(m.sharpness))
                + 0.2 * clamp01(m.warm_weight),
        )
    }

    pub fn raw_duration(&self, complexity: f64, energy: f64) -> f64 {
        self.cfg.base_duration
            * (1.0 + complexity * self.cfg.complexity_gain)
            * (1.0 - energy * self.cfg.energy_damping)
    }

    pub fn analyze(
        &self,
        shots: &[RhythmInput],
        target_duration: Option<f64>,
        bpm: Option<f64>,
    ) -> RhythmAnalysis {
        let complexity: Vec<f64> = shots.iter().map(|s| self.complexity(&s.metrics)).collect();
        let energy: Vec<f64> = shots.iter().map(|s| self.energy(&s.metrics)).collect();
        let raw: Vec<f64> = complexity
            .iter()
            .zip(&energy)
            .map(|(&c, &e)| self.raw_duration(c, e))
            .collect();

        let mut durations = raw.clone();
        let mut beats = vec![None; shots.len()];
        if let Some(bpm) = bpm.filter(|b| b.is_finite() && *b > 0.0) {
            for (d, b) in durations.iter_mut().zip(beats.iter_mut()) {
                let (snapped, n) = snap_to_beats(*d, bpm);
                *d = snapped;
                *b = Some(n);
            }
        }
        if let Some(target) = target_duration.filter(|t| t.is_finite() && *t > 0.0) {
            let sum: f64 = durations.iter().sum();
            if sum > 0.0 {
                let k = target / sum;
                for d in &mut durations {
                    *d *= k;
                }
            }
        }

        let pacing = durations
            .iter()
            .enumerate()
            .map(|(i, &duration)| PacingSuggestion {
                index: shots[i].index.unwrap_or(i),
                duration,
                raw_duration: raw[i],
                beats: beats[i],
                cut_style: CutStyle::for_duration(duration, &self.cfg),
                original_duration: shots[i].original_duration,
            })
            .collect();

        RhythmAnalysis {
            rhythm_curve: rhythm_curve(&durations),
            balance_score: balance_score(&durations, &energy),
            complexity,
            energy,
            pacing,
        }
    }
}

/// Nearest whole number of beats, never fewer than one.
pub fn snap_to_beats(seconds: f64, bpm: f64) -> (f64, u32) {
    let beat = 60.0 / bpm;
    let n = (seconds / beat).round().max(1.0) as u32;
    (f64::from(n) * beat, n)
}

/// Inverse hold time normalized to the busiest shot, then a 3-tap moving average.
pub fn rhythm_curve(durations: &[f64]) -> Vec<f64> {
    let inv: Vec<f64> = durations
        .iter()
        .map(|&d| if d > 0.0 { 1.0 / d } else { 0.0 })
        .collect();
    let max = inv.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return vec![0.0; durations.len()];
    }
    let norm: Vec<f64> = inv.iter().map(|v| v / max).collect();
    (0..norm.len())
        .map(|i| {
            let lo = i.saturating_sub(1);
            let hi = (i + 1).min(norm.len() - 1);
            clamp01(mean(&norm[lo..=hi]))
        })
        .collect()
}

/// Duration spread, energy spread and long/short alternation. `1.0` below two shots.
pub fn balance_score(durations: &[f64], energy: &[f64]) -> f64 {
    if durations.len() < 2 {
        return 1.0;
    }
    let m = mean(durations);
    let cv = if m > 0.0 { std_dev(durations) / m } else { 0.0 };
    let crossings = durations
        .windows(2)
        .filter(|w| (w[0] - m) * (w[1] - m) < 0.0)
        .count();
    let alternation = crossings as f64 / (durations.len() - 1) as f64;
    clamp01(0.3 * cv.min(1.0) + 0.3 * (2.0 * std_dev(energy)).min(1.0) + 0.4 * alternation)
}

#[cfg(test)]
#[path = "../tests/unit/analysis/rhythm.rs"]
mod tests;
