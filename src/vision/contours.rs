use std::collections::VecDeque;

use crate::foundation::core::Point;

/// One 8-connected foreground region with its traced outer boundary.
#[derive(Clone, Debug)]
pub struct Contour {
    /// Ordered outer boundary in pixel coordinates.
    pub boundary: Vec<(i32, i32)>,
    /// Pixel count of the region.
    pub area: f64,
    /// Inclusive pixel bounds `(min_x, min_y, max_x, max_y)`.
    pub bbox: (u32, u32, u32, u32),
    /// Region centroid in pixel coordinates.
    pub centroid: Point,
    /// Length of the traced boundary.
    pub perimeter: f64,
    /// Shoelace area enclosed by the traced boundary.
    pub polygon_area: f64,
    pub touches_border: bool,
    /// Mean luma of the region's pixels.
    pub mean_luma: f64,
}

impl Contour {
    pub fn bbox_width(&self) -> f64 {
        f64::from(self.bbox.2 - self.bbox.0 + 1)
    }

    pub fn bbox_height(&self) -> f64 {
        f64::from(self.bbox.3 - self.bbox.1 + 1)
    }

    /// Region area over bounding-box area.
    pub fn fill_ratio(&self) -> f64 {
        self.area / (self.bbox_width() * self.bbox_height())
    }

    /// Isoperimetric quotient `4*pi*A / P^2`, clamped to `[0, 1]`.
    pub fn circularity(&self) -> f64 {
        if self.perimeter <= 0.0 {
            return 0.0;
        }
        (4.0 * std::f64::consts::PI * self.polygon_area / (self.perimeter * self.perimeter))
            .clamp(0.0, 1.0)
    }
}

/// Label 8-connected components of `mask` and trace each one's outer boundary.
///
/// Components smaller than `min_area` pixels are dropped. Output order follows the raster scan
/// position of each component's first pixel.
pub fn find_contours(
    mask: &[bool],
    luma: &[f32],
    width: u32,
    height: u32,
    min_area: usize,
) -> Vec<Contour> {
    let (w, h) = (width as usize, height as usize);
    if mask.len() != w * h || luma.len() != w * h {
        return Vec::new();
    }

    let mut labels = vec![0u32; w * h];
    let mut next_label = 1u32;
    let mut out = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..w * h {
        if !mask[start] || labels[start] != 0 {
            continue;
        }
        let label = next_label;
        next_label += 1;
        labels[start] = label;
        queue.push_back(start);

        let mut area = 0usize;
        let (mut sx, mut sy, mut sl) = (0.0f64, 0.0f64, 0.0f64);
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (w, h, 0usize, 0usize);

        while let Some(i) = queue.pop_front() {
            let (x, y) = (i % w, i / w);
            area += 1;
            sx += x as f64;
            sy += y as f64;
            sl += f64::from(luma[i]);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            for (dx, dy) in NEIGHBOURS {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                if mask[j] && labels[j] == 0 {
                    labels[j] = label;
                    queue.push_back(j);
                }
            }
        }

        if area < min_area.max(1) {
            continue;
        }

        let boundary = trace_boundary(&labels, w, h, start, label);
        let perimeter = closed_length(&boundary);
        let polygon_area = shoelace(&boundary);
        out.push(Contour {
            boundary,
            area: area as f64,
            polygon_area,
            bbox: (min_x as u32, min_y as u32, max_x as u32, max_y as u32),
            centroid: Point::new(sx / area as f64, sy / area as f64),
            perimeter,
            touches_border: min_x == 0 || min_y == 0 || max_x == w - 1 || max_y == h - 1,
            mean_luma: sl / area as f64,
        });
    }
    out
}

// Clockwise starting west, as used by Moore-neighbour tracing.
const MOORE: [(i64, i64); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

const NEIGHBOURS: [(i64, i64); 8] = MOORE;

fn trace_boundary(labels: &[u32], w: usize, h: usize, start: usize, label: u32) -> Vec<(i32, i32)> {
    let inside = |x: i64, y: i64| {
        x >= 0 && y >= 0 && x < w as i64 && y < h as i64 && labels[y as usize * w + x as usize] == label
    };

    let start_pt = ((start % w) as i64, (start / w) as i64);
    let mut boundary = vec![(start_pt.0 as i32, start_pt.1 as i32)];
    // The first pixel in scan order always has its west neighbour outside the region.
    let mut current = start_pt;
    let mut backtrack_dir = 0usize;
    let max_steps = 4 * w * h + 8;

    for _ in 0..max_steps {
        let mut found = None;
        for k in 0..8 {
            let dir = (backtrack_dir + 1 + k) % 8;
            let (dx, dy) = MOORE[dir];
            let (nx, ny) = (current.0 + dx, current.1 + dy);
            if inside(nx, ny) {
                found = Some((dir, (nx, ny)));
                break;
            }
        }
        let Some((dir, next)) = found else {
            // Isolated pixel.
            break;
        };
        if next == start_pt {
            break;
        }
        boundary.push((next.0 as i32, next.1 as i32));
        // The last background pixel examined, seen from the new boundary pixel.
        backtrack_dir = if dir % 2 == 0 {
            (dir + 6) % 8
        } else {
            (dir + 5) % 8
        };
        current = next;
    }
    boundary
}

fn closed_length(points: &[(i32, i32)]) -> f64 {
    if points.len() < 2 {
        return if points.is_empty() { 0.0 } else { 1.0 };
    }
    let mut len = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        len += f64::from((a.0 - b.0).pow(2) + (a.1 - b.1).pow(2)).sqrt();
    }
    len
}

fn shoelace(points: &[(i32, i32)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0i64;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        twice += i64::from(a.0) * i64::from(b.1) - i64::from(b.0) * i64::from(a.1);
    }
    (twice as f64).abs() / 2.0
}

/// Douglas-Peucker simplification of a closed polygon.
pub fn approx_polygon(points: &[(i32, i32)], epsilon: f64) -> Vec<Point> {
    let pts: Vec<Point> = points
        .iter()
        .map(|&(x, y)| Point::new(f64::from(x), f64::from(y)))
        .collect();
    if pts.len() < 3 {
        return pts;
    }

    // Split the ring at the point farthest from the first one.
    let far = (1..pts.len())
        .max_by(|&a, &b| {
            pts[0]
                .distance(pts[a])
                .total_cmp(&pts[0].distance(pts[b]))
                .then(b.cmp(&a))
        })
        .unwrap_or(pts.len() / 2);

    let mut first = simplify(&pts[..=far], epsilon);
    let mut second_half: Vec<Point> = pts[far..].to_vec();
    second_half.push(pts[0]);
    let second = simplify(&second_half, epsilon);

    first.pop();
    first.extend(second);
    first.pop();
    first
}

fn simplify(pts: &[Point], epsilon: f64) -> Vec<Point> {
    if pts.len() < 3 {
        return pts.to_vec();
    }
    let (a, b) = (pts[0], pts[pts.len() - 1]);
    let mut max_d = 0.0;
    let mut idx = 0;
    for (i, &p) in pts.iter().enumerate().take(pts.len() - 1).skip(1) {
        let d = point_line_distance(p, a, b);
        if d > max_d {
            max_d = d;
            idx = i;
        }
    }
    if max_d > epsilon {
        let mut left = simplify(&pts[..=idx], epsilon);
        let right = simplify(&pts[idx..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![a, b]
    }
}

fn point_line_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len = ab.hypot();
    if len <= f64::EPSILON {
        return p.distance(a);
    }
    (ab.cross(p - a)).abs() / len
}

/// Ellipse summarizing a point set through its second-order moments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    /// Semi-axis lengths, `major >= minor`.
    pub major: f64,
    pub minor: f64,
    /// Orientation of the major axis in radians (image space).
    pub angle: f64,
}

impl Ellipse {
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.major * self.minor
    }

    /// `1 - minor/major`; zero for circles.
    pub fn elongation(&self) -> f64 {
        if self.major <= f64::EPSILON {
            return 0.0;
        }
        (1.0 - self.minor / self.major).clamp(0.0, 1.0)
    }
}

/// Fit an ellipse to boundary points (at least five are required).
///
/// For points spread uniformly on an ellipse the variance along an axis is half the squared
/// semi-axis, which gives the scale factor below.
pub fn fit_ellipse(points: &[(i32, i32)]) -> Option<Ellipse> {
    if points.len() < 5 {
        return None;
    }
    let n = points.len() as f64;
    let (mut mx, mut my) = (0.0, 0.0);
    for &(x, y) in points {
        mx += f64::from(x);
        my += f64::from(y);
    }
    mx /= n;
    my /= n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(x, y) in points {
        let dx = f64::from(x) - mx;
        let dy = f64::from(y) - my;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    sxx /= n;
    syy /= n;
    sxy /= n;

    let tr = sxx + syy;
    let det = sxx * syy - sxy * sxy;
    let disc = (tr * tr / 4.0 - det).max(0.0).sqrt();
    let l1 = tr / 2.0 + disc;
    let l2 = (tr / 2.0 - disc).max(0.0);
    if l1 <= f64::EPSILON {
        return None;
    }
    Some(Ellipse {
        center: Point::new(mx, my),
        major: (2.0 * l1).sqrt(),
        minor: (2.0 * l2).sqrt(),
        angle: 0.5 * (2.0 * sxy).atan2(sxx - syy),
    })
}

/// Otsu's threshold over a `[0, 255]` luma plane.
///
/// Returns the mean value for flat input so that `luma > threshold` selects nothing.
pub fn otsu_threshold(luma: &[f32]) -> f32 {
    if luma.is_empty() {
        return 0.0;
    }
    let mut hist = [0u64; 256];
    for &v in luma {
        hist[v.round().clamp(0.0, 255.0) as usize] += 1;
    }
    let total = luma.len() as f64;
    let sum_all: f64 = hist.iter().enumerate().map(|(i, &c)| i as f64 * c as f64).sum();

    let mut best = (0.0f64, sum_all / total);
    let mut w_b = 0.0;
    let mut sum_b = 0.0;
    for (t, &c) in hist.iter().enumerate() {
        w_b += c as f64;
        if w_b == 0.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f == 0.0 {
            break;
        }
        sum_b += t as f64 * c as f64;
        let m_b = sum_b / w_b;
        let m_f = (sum_all - sum_b) / w_f;
        let between = w_b * w_f * (m_b - m_f).powi(2);
        if between > best.0 {
            best = (between, t as f64);
        }
    }
    best.1 as f32
}

#[cfg(test)]
#[path = "../../tests/unit/vision/contours.rs"]
mod tests;
