//! Per-shot visual descriptor: motion cue, composition, palette and lighting.

use std::path::{Path, PathBuf};

use crate::foundation::core::{Direction, Point, Rect, Rgb8, Vec2, clamp01, norm_rect};
use crate::foundation::error::SegueResult;
use crate::vision::color::{ColorCluster, PaletteConfig, dominant_colors, sample_pixels};
use crate::vision::features::focal_point;
use crate::vision::gradient::MAX_SOBEL_MAGNITUDE;
use crate::vision::lines::LineSegment;
use crate::vision::raster::load_raster;
use crate::vision::{Frame, VisionConfig};

/// Weighted palette entry.
pub type WeightedColor = ColorCluster;

/// Implied motion of a still frame, read from its line structure.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionVector {
    /// Image-space direction (y down); zero when the frame is static.
    pub direction: Vec2,
    pub heading: Direction,
    pub speed: f64,
    pub focal_point: Point,
    pub lines: Vec<LineSegment>,
    pub confidence: f64,
}

impl MotionVector {
    pub fn is_static(&self) -> bool {
        self.heading == Direction::Static
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionAnalysis {
    /// Rule-of-thirds intersections with a feature nearby.
    pub thirds_hits: Vec<Point>,
    pub leading_lines: Vec<LineSegment>,
    /// Gradient-weighted center of visual mass.
    pub visual_weight_center: Point,
    /// Share of the frame carrying edges; zero for featureless frames.
    pub structure: f64,
    /// Grid cells with almost no gradient energy.
    pub empty_space: Vec<Rect>,
    pub dominant_colors: Vec<WeightedColor>,
    /// Mean brightness per quadrant: top-left, top-right, bottom-left, bottom-right.
    pub quadrant_brightness: [f64; 4],
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorPalette {
    /// Dominant colors, heaviest first; weights sum to ~1.
    pub colors: Vec<WeightedColor>,
    pub brightness: f64,
    pub saturation: f64,
    /// 0 is cool (blue), 1 is warm (red).
    pub temperature: f64,
}

impl ColorPalette {
    pub fn top(&self, n: usize) -> &[WeightedColor] {
        &self.colors[..self.colors.len().min(n)]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingType {
    #[default]
    Ambient,
    Directional,
    Mixed,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightingInfo {
    /// Image-space direction the light falls toward (dark to bright quadrant); zero when even.
    pub direction: Vec2,
    pub intensity: f64,
    #[serde(rename = "type")]
    pub kind: LightingType,
    pub shadow_density: f64,
}

/// Everything the pairwise analyzers need to know about one shot.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShotDescriptor {
    pub path: PathBuf,
    pub motion: MotionVector,
    pub composition: CompositionAnalysis,
    pub palette: ColorPalette,
    pub lighting: LightingInfo,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DescriptorConfig {
    pub palette: PaletteConfig,
    /// Share of line weight one orientation bucket needs to count as dominant.
    pub dominant_share: f64,
    /// Mean Sobel magnitude that maps to full speed.
    pub speed_scale: f64,
    pub thirds_tolerance: f64,
    pub leading_min_length: f64,
    /// Cells whose mean gradient falls below this count as empty space.
    pub empty_cell_magnitude: f64,
    pub ambient_std: f64,
    pub directional_std: f64,
    pub shadow_luma: f64,
    /// Minimum quadrant brightness spread for a light direction.
    pub light_spread: f64,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            palette: PaletteConfig::default(),
            dominant_share: 0.5,
            speed_scale: f64::from(MAX_SOBEL_MAGNITUDE) * 0.1,
            thirds_tolerance: 0.08,
            leading_min_length: 0.3,
            empty_cell_magnitude: 5.0,
            ambient_std: 30.0,
            directional_std: 70.0,
            shadow_luma: 50.0,
            light_spread: 0.05,
        }
    }
}

/// Decode `path` and describe it.
#[tracing::instrument(skip(vision, cfg), fields(path = %path.display()))]
pub fn describe_path(
    path: &Path,
    vision: &VisionConfig,
    cfg: &DescriptorConfig,
) -> SegueResult<ShotDescriptor> {
    let raster = load_raster(path, vision.max_dimension)?;
    let frame = Frame::analyze(raster, vision);
    Ok(describe(&frame, path, cfg))
}

pub fn describe(frame: &Frame, path: &Path, cfg: &DescriptorConfig) -> ShotDescriptor {
    let palette = extract_palette(frame, cfg);
    let motion = extract_motion(frame, cfg);
    let composition = extract_composition(frame, &palette, cfg);
    let lighting = extract_lighting(frame, &composition.quadrant_brightness, cfg);
    ShotDescriptor {
        path: path.to_path_buf(),
        motion,
        composition,
        palette,
        lighting,
    }
}

pub fn extract_palette(frame: &Frame, cfg: &DescriptorConfig) -> ColorPalette {
    let colors = dominant_colors(&frame.raster, &cfg.palette);
    let samples = sample_pixels(&frame.raster, cfg.palette.max_samples);
    let saturation = if samples.is_empty() {
        0.0
    } else {
        samples
            .iter()
            .map(|s| Rgb8::from_f64(*s).hsv().1)
            .sum::<f64>()
            / samples.len() as f64
    };
    ColorPalette {
        temperature: temperature(&colors),
        colors,
        brightness: clamp01(frame.raster.mean_luma() / 255.0),
        saturation: clamp01(saturation),
    }
}

/// Weight-averaged `((r - b) / 255 + 1) / 2`; neutral 0.5 for an empty palette.
pub fn temperature(colors: &[WeightedColor]) -> f64 {
    let total: f64 = colors.iter().map(|c| c.weight).sum();
    if total <= 0.0 {
        return 0.5;
    }
    let t = colors
        .iter()
        .map(|c| {
            let warm = (f64::from(c.color.r) - f64::from(c.color.b)) / 255.0;
            c.weight * (warm + 1.0) / 2.0
        })
        .sum::<f64>()
        / total;
    clamp01(t)
}

const ORIENTATION_BUCKETS: [f64; 4] = [0.0, 45.0, 90.0, 135.0];

pub fn extract_motion(frame: &Frame, cfg: &DescriptorConfig) -> MotionVector {
    let focal = focal_point(&frame.features);
    let speed = clamp01(frame.gradient.mean_magnitude() / cfg.speed_scale.max(f64::EPSILON));

    let mut hist = [0.0f64; 4];
    for line in &frame.lines {
        let a = line.angle_deg.rem_euclid(180.0);
        let idx = ((a / 45.0).round() as usize) % 4;
        hist[idx] += line.length * line.strength;
    }
    let total: f64 = hist.iter().sum();
    let mut best = 0usize;
    for i in 1..4 {
        if hist[i] > hist[best] {
            best = i;
        }
    }
    let share = if total > 0.0 { hist[best] / total } else { 0.0 };
    if share < cfg.dominant_share || total <= 0.0 {
        return MotionVector {
            speed,
            focal_point: focal,
            lines: frame.lines.clone(),
            ..MotionVector::default()
        };
    }

    let mut heading = Direction::from_angle_deg(ORIENTATION_BUCKETS[best]);
    // Lines carry no sign; point along the axis toward the focal side of the frame.
    let axis = heading.unit();
    let offset = Vec2::new(focal.x - 0.5, focal.y - 0.5);
    if axis.dot(offset) < -0.02 {
        heading = Direction::from_angle_deg(ORIENTATION_BUCKETS[best] + 180.0);
    }
    MotionVector {
        direction: heading.unit(),
        heading,
        speed,
        focal_point: focal,
        lines: frame.lines.clone(),
        confidence: clamp01(share * total.min(1.0)),
    }
}

pub fn extract_composition(
    frame: &Frame,
    palette: &ColorPalette,
    cfg: &DescriptorConfig,
) -> CompositionAnalysis {
    let mut thirds_hits = Vec::new();
    for ty in [1.0 / 3.0, 2.0 / 3.0] {
        for tx in [1.0 / 3.0, 2.0 / 3.0] {
            let p = Point::new(tx, ty);
            if frame
                .features
                .iter()
                .any(|f| f.point.distance(p) <= cfg.thirds_tolerance)
            {
                thirds_hits.push(p);
            }
        }
    }

    let leading_lines = frame
        .lines
        .iter()
        .filter(|l| l.length >= cfg.leading_min_length)
        .copied()
        .collect();

    let (w, h) = (frame.width(), frame.height());
    let mag = frame.gradient.magnitude();
    let (mut sx, mut sy, mut sm) = (0.0f64, 0.0f64, 0.0f64);
    for y in 0..h {
        for x in 0..w {
            let m = f64::from(mag[(y as usize) * (w as usize) + x as usize]);
            sx += m * (f64::from(x) + 0.5);
            sy += m * (f64::from(y) + 0.5);
            sm += m;
        }
    }
    let visual_weight_center = if sm > 0.0 {
        Point::new(sx / sm / f64::from(w), sy / sm / f64::from(h))
    } else {
        Point::new(0.5, 0.5)
    };

    let mut empty_space = Vec::new();
    for gy in 0..3u32 {
        for gx in 0..3u32 {
            let (x0, x1) = (gx * w / 3, ((gx + 1) * w / 3).max(gx * w / 3 + 1) - 1);
            let (y0, y1) = (gy * h / 3, ((gy + 1) * h / 3).max(gy * h / 3 + 1) - 1);
            if frame.gradient.region_mean_magnitude(x0, y0, x1, y1) < cfg.empty_cell_magnitude {
                empty_space.push(norm_rect(
                    f64::from(gx) / 3.0,
                    f64::from(gy) / 3.0,
                    f64::from(gx + 1) / 3.0,
                    f64::from(gy + 1) / 3.0,
                ));
            }
        }
    }

    CompositionAnalysis {
        thirds_hits,
        leading_lines,
        visual_weight_center,
        structure: frame.edge_density(),
        empty_space,
        dominant_colors: palette.colors.clone(),
        quadrant_brightness: quadrant_brightness(frame),
    }
}

fn quadrant_brightness(frame: &Frame) -> [f64; 4] {
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let luma = frame.raster.luma();
    let mut sums = [0.0f64; 4];
    let mut counts = [0usize; 4];
    for y in 0..h {
        for x in 0..w {
            let q = usize::from(x * 2 >= w) + 2 * usize::from(y * 2 >= h);
            sums[q] += f64::from(luma[y * w + x]);
            counts[q] += 1;
        }
    }
    let mut out = [0.0; 4];
    for q in 0..4 {
        if counts[q] > 0 {
            out[q] = clamp01(sums[q] / counts[q] as f64 / 255.0);
        }
    }
    out
}

const QUADRANT_CENTERS: [(f64, f64); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];

pub fn extract_lighting(frame: &Frame, quadrants: &[f64; 4], cfg: &DescriptorConfig) -> LightingInfo {
    let std = frame.raster.luma_std();
    let kind = if std < cfg.ambient_std {
        LightingType::Ambient
    } else if std > cfg.directional_std {
        LightingType::Directional
    } else {
        LightingType::Mixed
    };

    let (mut lo, mut hi) = (0usize, 0usize);
    for q in 1..4 {
        if quadrants[q] < quadrants[lo] {
            lo = q;
        }
        if quadrants[q] > quadrants[hi] {
            hi = q;
        }
    }
    let direction = if hi != lo && quadrants[hi] - quadrants[lo] >= cfg.light_spread {
        let v = Vec2::new(
            QUADRANT_CENTERS[hi].0 - QUADRANT_CENTERS[lo].0,
            QUADRANT_CENTERS[hi].1 - QUADRANT_CENTERS[lo].1,
        );
        v / v.hypot()
    } else {
        Vec2::ZERO
    };

    let luma = frame.raster.luma();
    let shadows = luma.iter().filter(|&&v| f64::from(v) < cfg.shadow_luma).count();
    LightingInfo {
        direction,
        intensity: clamp01(frame.raster.mean_luma() / 255.0),
        kind,
        shadow_density: shadows as f64 / luma.len().max(1) as f64,
    }
}

#[cfg(test)]
#[path = "../tests/unit/analysis/descriptor.rs"]
mod tests;
