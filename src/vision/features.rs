use crate::foundation::core::Point;
use crate::vision::gradient::{GradientField, MAX_SOBEL_MAGNITUDE};

/// Corner-like local feature, in normalized coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Feature {
    pub point: Point,
    /// Response relative to the strongest feature in the frame, in `(0, 1]`.
    pub strength: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HarrisConfig {
    /// Harris sensitivity `k` in `det(M) - k * trace(M)^2`.
    pub k: f64,
    /// Responses below this fraction of the frame maximum are discarded.
    pub relative_threshold: f64,
    /// Absolute response floor on unit-normalized gradients.
    pub min_response: f64,
    pub nms_radius: usize,
    pub max_features: usize,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            k: 0.04,
            relative_threshold: 0.1,
            min_response: 1e-4,
            nms_radius: 2,
            max_features: 64,
        }
    }
}

/// Harris corner detection over a precomputed gradient field.
///
/// Output is sorted by descending strength; equal strengths keep raster order.
pub fn detect_features(grad: &GradientField, cfg: &HarrisConfig) -> Vec<Feature> {
    let (w, h) = (grad.width() as usize, grad.height() as usize);
    if w < 5 || h < 5 {
        return Vec::new();
    }
    let scale = f64::from(MAX_SOBEL_MAGNITUDE);
    let (gx, gy) = (grad.gx(), grad.gy());

    let mut ixx = vec![0.0f64; w * h];
    let mut iyy = vec![0.0f64; w * h];
    let mut ixy = vec![0.0f64; w * h];
    for i in 0..w * h {
        let x = f64::from(gx[i]) / scale;
        let y = f64::from(gy[i]) / scale;
        ixx[i] = x * x;
        iyy[i] = y * y;
        ixy[i] = x * y;
    }

    let mut response = vec![0.0f64; w * h];
    let mut max_r = 0.0f64;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let (mut a, mut b, mut c) = (0.0, 0.0, 0.0);
            for yy in y - 1..=y + 1 {
                for xx in x - 1..=x + 1 {
                    let j = yy * w + xx;
                    a += ixx[j];
                    b += iyy[j];
                    c += ixy[j];
                }
            }
            let r = a * b - c * c - cfg.k * (a + b) * (a + b);
            response[y * w + x] = r;
            max_r = max_r.max(r);
        }
    }
    if max_r < cfg.min_response {
        return Vec::new();
    }

    let floor = (max_r * cfg.relative_threshold).max(cfg.min_response);
    let rad = cfg.nms_radius.max(1) as isize;
    let mut out = Vec::new();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            let r = response[i];
            if r < floor {
                continue;
            }
            if is_local_max(&response, w, h, x, y, rad) {
                out.push(Feature {
                    point: Point::new((x as f64 + 0.5) / w as f64, (y as f64 + 0.5) / h as f64),
                    strength: (r / max_r).clamp(0.0, 1.0),
                });
            }
        }
    }
    out.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    out.truncate(cfg.max_features);
    out
}

// Plateaus resolve to their first pixel in raster order.
fn is_local_max(resp: &[f64], w: usize, h: usize, x: usize, y: usize, rad: isize) -> bool {
    let i = y * w + x;
    let r = resp[i];
    for dy in -rad..=rad {
        for dx in -rad..=rad {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x as isize + dx, y as isize + dy);
            if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                continue;
            }
            let j = ny as usize * w + nx as usize;
            let other = resp[j];
            if other > r || (other == r && j < i) {
                return false;
            }
        }
    }
    true
}

/// Strength-weighted centroid of `features`; frame center when there are none.
pub fn focal_point(features: &[Feature]) -> Point {
    let total: f64 = features.iter().map(|f| f.strength).sum();
    if total <= 0.0 {
        return Point::new(0.5, 0.5);
    }
    let (x, y) = features.iter().fold((0.0, 0.0), |(x, y), f| {
        (x + f.point.x * f.strength, y + f.point.y * f.strength)
    });
    Point::new(x / total, y / total)
}

#[cfg(test)]
#[path = "../../tests/unit/vision/features.rs"]
mod tests;
