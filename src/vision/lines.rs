use crate::foundation::core::Point;

/// Straight segment found in an edge map. Coordinates are normalized to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
    /// Screen angle in degrees, counter-clockwise with y up, in `(-90, 90]`.
    pub angle_deg: f64,
    /// Segment length relative to the frame diagonal.
    pub length: f64,
    /// Accumulator support relative to the frame diagonal, in `[0, 1]`.
    pub strength: f64,
}

impl LineSegment {
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Angular resolution of the accumulator in degrees.
    pub theta_step_deg: f64,
    /// Minimum votes as a fraction of the shorter frame side.
    pub min_votes_fraction: f64,
    /// Suppression window around accepted peaks (accumulator cells).
    pub suppression_radius: usize,
    pub max_lines: usize,
    /// Minimum segment length relative to the frame diagonal.
    pub min_length: f64,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            theta_step_deg: 1.0,
            min_votes_fraction: 0.35,
            suppression_radius: 4,
            max_lines: 16,
            min_length: 0.1,
        }
    }
}

/// Detect straight lines with a standard (rho, theta) Hough transform.
///
/// Peaks are visited by descending vote count with ties broken by accumulator index, which keeps
/// the output deterministic.
pub fn detect_lines(edges: &[bool], width: u32, height: u32, cfg: &HoughConfig) -> Vec<LineSegment> {
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 || edges.len() != w * h {
        return Vec::new();
    }

    let edge_points: Vec<(usize, usize)> = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .filter(|&(x, y)| edges[y * w + x])
        .collect();
    if edge_points.is_empty() {
        return Vec::new();
    }

    let step = cfg.theta_step_deg.clamp(0.25, 10.0);
    let n_theta = (180.0 / step).round() as usize;
    let diag = ((w * w + h * h) as f64).sqrt();
    let n_rho = (2.0 * diag).ceil() as usize + 1;
    let trig: Vec<(f64, f64)> = (0..n_theta)
        .map(|t| {
            let th = (t as f64 * step).to_radians();
            (th.cos(), th.sin())
        })
        .collect();

    let mut acc = vec![0u32; n_theta * n_rho];
    for &(x, y) in &edge_points {
        for (t, &(c, s)) in trig.iter().enumerate() {
            let rho = (x as f64) * c + (y as f64) * s;
            let r = (rho + diag).round() as usize;
            acc[t * n_rho + r.min(n_rho - 1)] += 1;
        }
    }

    let min_votes = ((w.min(h) as f64) * cfg.min_votes_fraction).max(3.0) as u32;
    let mut peaks: Vec<(u32, usize)> = acc
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v >= min_votes)
        .map(|(i, &v)| (v, i))
        .collect();
    peaks.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let radius = cfg.suppression_radius as isize;
    let mut accepted: Vec<(usize, usize)> = Vec::new();
    let mut out = Vec::new();
    for (votes, idx) in peaks {
        if out.len() >= cfg.max_lines {
            break;
        }
        let (t, r) = (idx / n_rho, idx % n_rho);
        let suppressed = accepted.iter().any(|&(at, ar)| {
            let dt = (t as isize - at as isize).abs();
            let dt = dt.min(n_theta as isize - dt);
            dt <= radius && (r as isize - ar as isize).abs() <= radius
        });
        if suppressed {
            continue;
        }
        accepted.push((t, r));

        let (c, s) = trig[t];
        let rho = r as f64 - diag;
        if let Some(seg) = extent_along(&edge_points, c, s, rho, w, h, votes, diag)
            && seg.length >= cfg.min_length
        {
            out.push(seg);
        }
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn extent_along(
    points: &[(usize, usize)],
    c: f64,
    s: f64,
    rho: f64,
    w: usize,
    h: usize,
    votes: u32,
    diag: f64,
) -> Option<LineSegment> {
    // Direction along the line is perpendicular to the normal (c, s).
    let (dx, dy) = (-s, c);
    let mut lo = f64::MAX;
    let mut hi = f64::MIN;
    let mut support = 0usize;
    for &(x, y) in points {
        let (xf, yf) = (x as f64, y as f64);
        if (xf * c + yf * s - rho).abs() > 1.0 {
            continue;
        }
        let proj = xf * dx + yf * dy;
        lo = lo.min(proj);
        hi = hi.max(proj);
        support += 1;
    }
    if support < 2 {
        return None;
    }

    let base = (rho * c, rho * s);
    let to_norm = |p: f64| {
        let x = base.0 + p * dx;
        let y = base.1 + p * dy;
        Point::new((x + 0.5) / w as f64, (y + 0.5) / h as f64)
    };
    let mut start = to_norm(lo);
    let mut end = to_norm(hi);
    if (end.x, end.y) < (start.x, start.y) {
        std::mem::swap(&mut start, &mut end);
    }
    // Image y grows downwards; flip it to get a conventional screen angle.
    let mut angle_deg = (-(end.y - start.y) * h as f64)
        .atan2((end.x - start.x) * w as f64)
        .to_degrees();
    if angle_deg <= -90.0 {
        angle_deg += 180.0;
    } else if angle_deg > 90.0 {
        angle_deg -= 180.0;
    }

    Some(LineSegment {
        start,
        end,
        angle_deg,
        length: ((hi - lo) / diag).clamp(0.0, 1.0),
        strength: (f64::from(votes) / diag).clamp(0.0, 1.0),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/vision/lines.rs"]
mod tests;
