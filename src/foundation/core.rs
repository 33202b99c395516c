pub use kurbo::{Point, Rect, Size, Vec2};

/// Maximum Euclidean distance between two 8-bit RGB colors (`sqrt(3 * 255^2)`).
pub const MAX_RGB_DISTANCE: f64 = 441.67;

/// Clamp `v` into `[0, 1]`, mapping non-finite values to `0`.
pub fn clamp01(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Straight (non-premultiplied) 8-bit RGB color.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_array(px: [u8; 3]) -> Self {
        Self::new(px[0], px[1], px[2])
    }

    pub fn from_f64(rgb: [f64; 3]) -> Self {
        fn ch(v: f64) -> u8 {
            v.round().clamp(0.0, 255.0) as u8
        }
        Self::new(ch(rgb[0]), ch(rgb[1]), ch(rgb[2]))
    }

    pub fn to_f64(self) -> [f64; 3] {
        [f64::from(self.r), f64::from(self.g), f64::from(self.b)]
    }

    /// Euclidean distance in RGB space, in `[0, MAX_RGB_DISTANCE]`.
    pub fn distance(self, other: Self) -> f64 {
        let [r0, g0, b0] = self.to_f64();
        let [r1, g1, b1] = other.to_f64();
        ((r0 - r1).powi(2) + (g0 - g1).powi(2) + (b0 - b1).powi(2)).sqrt()
    }

    /// Rec.601 luma in `[0, 255]`.
    pub fn luma(self) -> f64 {
        let [r, g, b] = self.to_f64();
        0.299 * r + 0.587 * g + 0.114 * b
    }

    /// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
    pub fn hsv(self) -> (f64, f64, f64) {
        let [r, g, b] = self.to_f64().map(|c| c / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta <= f64::EPSILON {
            0.0
        } else if max == r {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if max == g {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };
        let sat = if max <= f64::EPSILON { 0.0 } else { delta / max };
        (hue, sat, max)
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        let a = self.to_f64();
        let b = other.to_f64();
        Self::from_f64([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
        ])
    }
}

/// Coarse motion direction: eight compass buckets plus "no dominant direction".
///
/// Directions are expressed in image space, so `Down` points toward increasing `y`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Static,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    Up,
    UpRight,
}

impl Direction {
    const BUCKETS: [Direction; 8] = [
        Direction::Right,
        Direction::UpRight,
        Direction::Up,
        Direction::UpLeft,
        Direction::Left,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    /// Bucket a screen-space angle (degrees, counter-clockwise, y up) into one of the 8 directions.
    pub fn from_angle_deg(angle: f64) -> Self {
        let idx = (angle.rem_euclid(360.0) / 45.0).round() as usize % 8;
        Self::BUCKETS[idx]
    }

    /// Unit vector in image space (y down). `Static` maps to the zero vector.
    pub fn unit(self) -> Vec2 {
        let d = std::f64::consts::FRAC_1_SQRT_2;
        match self {
            Self::Static => Vec2::ZERO,
            Self::Right => Vec2::new(1.0, 0.0),
            Self::DownRight => Vec2::new(d, d),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::DownLeft => Vec2::new(-d, d),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::UpLeft => Vec2::new(-d, -d),
            Self::Up => Vec2::new(0.0, -1.0),
            Self::UpRight => Vec2::new(d, -d),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Normalized (`[0, 1]` in both axes) axis-aligned box.
pub fn norm_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
    Rect::new(clamp01(x0), clamp01(y0), clamp01(x1), clamp01(y1))
}

/// Distance between two normalized points, clamped into `[0, 1]`.
pub fn norm_distance(a: Point, b: Point) -> f64 {
    clamp01(a.distance(b))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
