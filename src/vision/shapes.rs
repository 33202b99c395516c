use crate::foundation::core::{Point, clamp01};
use crate::vision::Frame;
use crate::vision::contours::{Contour, approx_polygon};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Line,
    Rectangle,
}

/// Geometric primitive found in a frame, in normalized coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetectedShape {
    pub kind: ShapeKind,
    pub center: Point,
    /// Area fraction for closed shapes, diagonal-relative length for lines.
    pub size: f64,
    /// Screen angle in degrees (lines and rectangles); zero for circles.
    pub angle_deg: f64,
    pub confidence: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    pub min_circularity: f64,
    /// Minimum ratio between a region's area and its 4-vertex approximation.
    pub min_rectangle_fill: f64,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub polygon_epsilon: f64,
    pub max_shapes: usize,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            min_circularity: 0.85,
            min_rectangle_fill: 0.85,
            polygon_epsilon: 0.02,
            max_shapes: 24,
        }
    }
}

/// Classify enclosed regions as circles or rectangles and add the frame's straight lines.
pub fn detect_shapes(frame: &Frame, cfg: &ShapeConfig) -> Vec<DetectedShape> {
    let (w, h) = (f64::from(frame.width()), f64::from(frame.height()));
    let total = frame.pixel_count();
    let mut out = Vec::new();

    for region in frame.enclosed_regions() {
        let center = Point::new((region.centroid.x + 0.5) / w, (region.centroid.y + 0.5) / h);
        let size = clamp01(region.area / total);
        let circularity = region.circularity();
        if circularity >= cfg.min_circularity {
            out.push(DetectedShape {
                kind: ShapeKind::Circle,
                center,
                size,
                angle_deg: 0.0,
                confidence: circularity,
            });
        } else if let Some((fill, angle_deg)) = rectangle_fit(region, cfg) {
            out.push(DetectedShape {
                kind: ShapeKind::Rectangle,
                center,
                size,
                angle_deg,
                confidence: fill,
            });
        }
    }

    for line in &frame.lines {
        out.push(DetectedShape {
            kind: ShapeKind::Line,
            center: line.midpoint(),
            size: line.length,
            angle_deg: line.angle_deg,
            confidence: clamp01(line.strength * std::f64::consts::SQRT_2),
        });
    }

    out.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    out.truncate(cfg.max_shapes);
    out
}

/// Fill ratio and orientation when the region simplifies to a quadrilateral.
pub fn rectangle_fit(region: &Contour, cfg: &ShapeConfig) -> Option<(f64, f64)> {
    let quad = approx_polygon(&region.boundary, cfg.polygon_epsilon * region.perimeter);
    if quad.len() != 4 {
        return None;
    }
    let quad_area = polygon_area(&quad);
    if quad_area <= 0.0 || region.polygon_area <= 0.0 {
        return None;
    }
    let fill = (region.polygon_area.min(quad_area) / region.polygon_area.max(quad_area)).clamp(0.0, 1.0);
    if fill < cfg.min_rectangle_fill {
        return None;
    }
    let edge = quad[1] - quad[0];
    let mut angle = (-edge.y).atan2(edge.x).to_degrees();
    if angle <= -90.0 {
        angle += 180.0;
    } else if angle > 90.0 {
        angle -= 180.0;
    }
    Some((fill, angle))
}

pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    twice.abs() / 2.0
}

#[cfg(test)]
#[path = "../../tests/unit/vision/shapes.rs"]
mod tests;
