use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

use crate::vision::raster::Raster;

/// Box-resample the luma plane onto an `n x n` grid.
fn resample_luma(raster: &Raster, n: usize) -> Vec<f32> {
    let (w, h) = (raster.width() as usize, raster.height() as usize);
    let luma = raster.luma();
    let mut out = vec![0.0f32; n * n];
    for gy in 0..n {
        let y0 = gy * h / n;
        let y1 = ((gy + 1) * h / n).max(y0 + 1).min(h);
        for gx in 0..n {
            let x0 = gx * w / n;
            let x1 = ((gx + 1) * w / n).max(x0 + 1).min(w);
            let mut sum = 0.0f32;
            for y in y0..y1 {
                for x in x0..x1 {
                    sum += luma[y * w + x];
                }
            }
            out[gy * n + gx] = sum / ((y1 - y0) * (x1 - x0)) as f32;
        }
    }
    out
}

/// Share of non-DC spectral energy above radius `n / 8` in the 2-D FFT of luma.
///
/// Smooth frames score near zero, fine texture and noise score high. Flat frames score zero.
pub fn texture_complexity(raster: &Raster, n: usize) -> f64 {
    let n = n.clamp(8, 512);
    let grid = resample_luma(raster, n);
    let mut buf: Vec<Complex<f32>> = grid.iter().map(|&v| Complex::new(v / 255.0, 0.0)).collect();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);
    for row in buf.chunks_exact_mut(n) {
        fft.process(row);
    }
    let mut column = vec![Complex::new(0.0f32, 0.0); n];
    for x in 0..n {
        for y in 0..n {
            column[y] = buf[y * n + x];
        }
        fft.process(&mut column);
        for y in 0..n {
            buf[y * n + x] = column[y];
        }
    }

    let cutoff = n as f64 / 8.0;
    let (mut high, mut total) = (0.0f64, 0.0f64);
    for v in 0..n {
        for u in 0..n {
            if u == 0 && v == 0 {
                continue;
            }
            let fu = u.min(n - u) as f64;
            let fv = v.min(n - v) as f64;
            let e = f64::from(buf[v * n + u].norm_sqr());
            total += e;
            if (fu * fu + fv * fv).sqrt() > cutoff {
                high += e;
            }
        }
    }
    // Float noise on flat input.
    if total <= 1e-6 {
        return 0.0;
    }
    (high / total).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/vision/spectrum.rs"]
mod tests;
