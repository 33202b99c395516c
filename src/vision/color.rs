use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::core::Rgb8;
use crate::vision::raster::Raster;

/// One color cluster and the fraction of sampled pixels assigned to it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorCluster {
    pub color: Rgb8,
    pub weight: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub k: usize,
    pub max_samples: usize,
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            k: 5,
            max_samples: 4096,
            max_iterations: 16,
            seed: 0x5e6e_c0de,
        }
    }
}

/// Evenly strided pixel samples, at most `max` of them.
pub fn sample_pixels(raster: &Raster, max: usize) -> Vec<[f64; 3]> {
    let px = raster.pixels();
    let step = px.len().div_ceil(max.max(1)).max(1);
    px.iter().step_by(step).map(|p| p.to_f64()).collect()
}

/// Fixed-seed k-means++ over sampled pixels.
///
/// Clusters that end up empty are dropped, so solid frames produce a single cluster. The result
/// is sorted by descending weight; equal weights keep seeding order.
pub fn dominant_colors(raster: &Raster, cfg: &PaletteConfig) -> Vec<ColorCluster> {
    let samples = sample_pixels(raster, cfg.max_samples);
    if samples.is_empty() || cfg.k == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut centers = seed_centers(&samples, cfg.k, &mut rng);

    let mut assignment = vec![usize::MAX; samples.len()];
    for _ in 0..cfg.max_iterations.max(1) {
        let mut changed = false;
        for (i, s) in samples.iter().enumerate() {
            let c = nearest(&centers, s);
            if assignment[i] != c {
                assignment[i] = c;
                changed = true;
            }
        }
        if !changed {
            break;
        }
        let mut sums = vec![[0.0f64; 3]; centers.len()];
        let mut counts = vec![0usize; centers.len()];
        for (s, &a) in samples.iter().zip(&assignment) {
            counts[a] += 1;
            for ch in 0..3 {
                sums[a][ch] += s[ch];
            }
        }
        for (c, (sum, &n)) in centers.iter_mut().zip(sums.iter().zip(&counts)) {
            if n > 0 {
                *c = sum.map(|v| v / n as f64);
            }
        }
    }

    let mut counts = vec![0usize; centers.len()];
    for &a in &assignment {
        counts[a] += 1;
    }
    let total = samples.len() as f64;
    let mut out: Vec<ColorCluster> = centers
        .iter()
        .zip(&counts)
        .filter(|&(_, &n)| n > 0)
        .map(|(c, &n)| ColorCluster {
            color: Rgb8::from_f64(*c),
            weight: n as f64 / total,
        })
        .collect();
    out.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    out
}

fn seed_centers(samples: &[[f64; 3]], k: usize, rng: &mut StdRng) -> Vec<[f64; 3]> {
    let mut centers = vec![samples[rng.random_range(0..samples.len())]];
    let mut d2: Vec<f64> = samples.iter().map(|s| dist2(s, &centers[0])).collect();
    while centers.len() < k {
        let total: f64 = d2.iter().sum();
        if total <= 0.0 {
            break;
        }
        let mut target = rng.random::<f64>() * total;
        let mut pick = samples.len() - 1;
        for (i, &d) in d2.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            if target < d {
                pick = i;
                break;
            }
            target -= d;
        }
        let c = samples[pick];
        centers.push(c);
        for (d, s) in d2.iter_mut().zip(samples) {
            *d = d.min(dist2(s, &c));
        }
    }
    centers
}

fn nearest(centers: &[[f64; 3]], s: &[f64; 3]) -> usize {
    let mut best = (0usize, f64::INFINITY);
    for (i, c) in centers.iter().enumerate() {
        let d = dist2(s, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best.0
}

fn dist2(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

/// RMS per-channel standard deviation over sampled pixels, scaled into `[0, 1]`.
pub fn color_variance(raster: &Raster, max_samples: usize) -> f64 {
    let samples = sample_pixels(raster, max_samples);
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mut var = 0.0;
    for ch in 0..3 {
        let m = samples.iter().map(|s| s[ch]).sum::<f64>() / n;
        var += samples.iter().map(|s| (s[ch] - m).powi(2)).sum::<f64>() / n;
    }
    ((var / 3.0).sqrt() / 127.5).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/vision/color.rs"]
mod tests;
