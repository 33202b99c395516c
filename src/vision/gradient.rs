use crate::vision::raster::Raster;

/// Largest Sobel magnitude reachable on a `[0, 255]` luma plane (`4 * 255 * sqrt(2)`).
pub const MAX_SOBEL_MAGNITUDE: f32 = 1442.5;

/// Per-pixel Sobel gradients of a raster's luma plane. Border pixels carry zero gradient.
#[derive(Clone, Debug)]
pub struct GradientField {
    width: u32,
    height: u32,
    gx: Vec<f32>,
    gy: Vec<f32>,
    magnitude: Vec<f32>,
}

impl GradientField {
    pub fn compute(raster: &Raster) -> Self {
        let (w, h) = (raster.width() as usize, raster.height() as usize);
        let luma = raster.luma();
        let mut gx = vec![0.0f32; w * h];
        let mut gy = vec![0.0f32; w * h];
        let mut magnitude = vec![0.0f32; w * h];

        if w >= 3 && h >= 3 {
            for y in 1..h - 1 {
                for x in 1..w - 1 {
                    let p = |dx: isize, dy: isize| {
                        luma[((y as isize + dy) as usize) * w + (x as isize + dx) as usize]
                    };
                    let sx = (p(1, -1) + 2.0 * p(1, 0) + p(1, 1))
                        - (p(-1, -1) + 2.0 * p(-1, 0) + p(-1, 1));
                    let sy = (p(-1, 1) + 2.0 * p(0, 1) + p(1, 1))
                        - (p(-1, -1) + 2.0 * p(0, -1) + p(1, -1));
                    let i = y * w + x;
                    gx[i] = sx;
                    gy[i] = sy;
                    magnitude[i] = (sx * sx + sy * sy).sqrt();
                }
            }
        }

        Self {
            width: raster.width(),
            height: raster.height(),
            gx,
            gy,
            magnitude,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn magnitude(&self) -> &[f32] {
        &self.magnitude
    }

    pub fn gx(&self) -> &[f32] {
        &self.gx
    }

    pub fn gy(&self) -> &[f32] {
        &self.gy
    }

    pub fn magnitude_at(&self, x: u32, y: u32) -> f32 {
        self.magnitude[(y as usize) * (self.width as usize) + (x as usize)]
    }

    pub fn mean_magnitude(&self) -> f64 {
        if self.magnitude.is_empty() {
            return 0.0;
        }
        self.magnitude.iter().map(|&m| f64::from(m)).sum::<f64>() / self.magnitude.len() as f64
    }

    pub fn edge_mask(&self, threshold: f32) -> Vec<bool> {
        self.magnitude.iter().map(|&m| m > threshold).collect()
    }

    /// Fraction of pixels whose gradient magnitude exceeds `threshold`.
    pub fn edge_density(&self, threshold: f32) -> f64 {
        if self.magnitude.is_empty() {
            return 0.0;
        }
        let n = self.magnitude.iter().filter(|&&m| m > threshold).count();
        n as f64 / self.magnitude.len() as f64
    }

    /// Magnitude-weighted histogram of edge orientations over `[0, 180)` degrees.
    ///
    /// Normalized to sum to one; all zeros when the frame has no edges above `threshold`.
    pub fn orientation_histogram(&self, bins: usize, threshold: f32) -> Vec<f64> {
        let bins = bins.max(1);
        let mut hist = vec![0.0f64; bins];
        for i in 0..self.magnitude.len() {
            let m = self.magnitude[i];
            if m <= threshold {
                continue;
            }
            let angle = f64::from(self.gy[i])
                .atan2(f64::from(self.gx[i]))
                .to_degrees()
                .rem_euclid(180.0);
            let bin = ((angle / 180.0) * bins as f64) as usize;
            hist[bin.min(bins - 1)] += f64::from(m);
        }
        let total: f64 = hist.iter().sum();
        if total > 0.0 {
            for v in &mut hist {
                *v /= total;
            }
        }
        hist
    }

    /// Mean gradient magnitude inside a pixel rectangle (inclusive bounds).
    pub fn region_mean_magnitude(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> f64 {
        let x1 = x1.min(self.width.saturating_sub(1));
        let y1 = y1.min(self.height.saturating_sub(1));
        if x0 > x1 || y0 > y1 {
            return 0.0;
        }
        let mut sum = 0.0;
        let mut n = 0usize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                sum += f64::from(self.magnitude_at(x, y));
                n += 1;
            }
        }
        sum / n as f64
    }
}

/// Variance of the 4-neighbour Laplacian of the luma plane; a standard focus/sharpness measure.
pub fn laplacian_variance(raster: &Raster) -> f64 {
    let (w, h) = (raster.width() as usize, raster.height() as usize);
    if w < 3 || h < 3 {
        return 0.0;
    }
    let luma = raster.luma();
    let mut values = Vec::with_capacity((w - 2) * (h - 2));
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let c = luma[y * w + x];
            let lap = luma[(y - 1) * w + x] + luma[(y + 1) * w + x] + luma[y * w + x - 1]
                + luma[y * w + x + 1]
                - 4.0 * c;
            values.push(f64::from(lap));
        }
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
#[path = "../../tests/unit/vision/gradient.rs"]
mod tests;
