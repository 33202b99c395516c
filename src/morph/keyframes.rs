use crate::animation::ease::Ease;
use crate::foundation::core::{Point, clamp01};
use crate::morph::subjects::SubjectRegion;

/// One sample of a morph path.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MorphKeyframe {
    /// Seconds from the start of the transition.
    pub time: f64,
    pub source_point: Point,
    pub point: Point,
    /// Incoming Bezier handle; interior keyframes only.
    pub control_in: Option<Point>,
    /// Outgoing Bezier handle; interior keyframes only.
    pub control_out: Option<Point>,
    pub opacity: f64,
    pub scale: f64,
    pub rotation: f64,
}

/// Sample `ease` at `count` evenly spaced times and interpolate the subject path.
///
/// The first and last keyframes sit exactly on the source and target centers.
pub fn synthesize(
    source: &SubjectRegion,
    target: &SubjectRegion,
    count: usize,
    ease: Ease,
    duration: f64,
    control_scale: f64,
) -> Vec<MorphKeyframe> {
    let count = count.max(2);
    let duration = duration.max(0.0);
    let end_scale = if source.area > f64::EPSILON {
        (target.area / source.area).sqrt()
    } else {
        1.0
    };

    let mut frames: Vec<MorphKeyframe> = (0..count)
        .map(|i| {
            let t = i as f64 / (count - 1) as f64;
            let e = ease.apply(t);
            let point = if i == 0 {
                source.center
            } else if i == count - 1 {
                target.center
            } else {
                source.center.lerp(target.center, e)
            };
            MorphKeyframe {
                time: t * duration,
                source_point: source.center,
                point,
                control_in: None,
                control_out: None,
                opacity: clamp01(1.0 - e),
                scale: (1.0 + (end_scale - 1.0) * e).max(0.0),
                rotation: 0.0,
            }
        })
        .collect();

    for i in 1..count - 1 {
        let secant = frames[i + 1].point - frames[i - 1].point;
        let p = frames[i].point;
        frames[i].control_in = Some(p - secant * control_scale);
        frames[i].control_out = Some(p + secant * control_scale);
    }
    frames
}

#[cfg(test)]
#[path = "../../tests/unit/morph/keyframes.rs"]
mod tests;
