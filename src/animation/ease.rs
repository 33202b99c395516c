/// Easing curves used to shape morph paths and color blends.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    /// Linear interpolation.
    #[default]
    Linear,
    /// Quadratic ease-in.
    EaseIn,
    /// Quadratic ease-out.
    EaseOut,
    /// Quadratic ease-in/out.
    EaseInOut,
    /// Damped oscillation settling on the target (overshoots).
    Elastic,
    /// Decaying bounces landing on the target.
    Bounce,
}

impl Ease {
    /// Every supported curve, in declaration order.
    pub const ALL: [Ease; 6] = [
        Ease::Linear,
        Ease::EaseIn,
        Ease::EaseOut,
        Ease::EaseInOut,
        Ease::Elastic,
        Ease::Bounce,
    ];

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    ///
    /// Every curve maps `0 -> 0` and `1 -> 1` exactly.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::Elastic => {
                let c4 = (2.0 * std::f64::consts::PI) / 3.0;
                2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
            }
            Self::Bounce => bounce_out(t),
        }
    }

    /// Stable identifier used in exported documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Elastic => "elastic",
            Self::Bounce => "bounce",
        }
    }

    /// Whether the curve can leave `[0, 1]` or move backwards between samples.
    pub fn overshoots(self) -> bool {
        matches!(self, Self::Elastic)
    }
}

fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
