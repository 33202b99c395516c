use std::fmt::Write as _;

use crate::foundation::core::Point;
use crate::foundation::error::SegueResult;
use crate::morph::MorphTransition;

/// Hand-off document for an external animation tool.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MorphExport {
    pub version: u32,
    pub frame_rate: f64,
    pub duration_frames: u32,
    pub ease: String,
    pub layers: Vec<ExportLayer>,
    pub expressions: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportLayer {
    pub name: String,
    pub source_mask: Vec<Point>,
    pub target_mask: Vec<Point>,
    pub keyframes: Vec<ExportKeyframe>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportKeyframe {
    pub frame: u32,
    pub position: Point,
    pub scale: f64,
    pub opacity: f64,
    pub rotation: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub in_tangent: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub out_tangent: Option<Point>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Expression {
    pub name: String,
    pub property: String,
    pub code: String,
}

impl MorphExport {
    pub const VERSION: u32 = 1;

    pub fn from_transition(t: &MorphTransition, frame_rate: f64) -> Self {
        let fps = if frame_rate.is_finite() && frame_rate > 0.0 {
            frame_rate
        } else {
            30.0
        };
        let to_frame = |secs: f64| (secs * fps).round().max(0.0) as u32;
        let layers = t
            .morphs
            .iter()
            .enumerate()
            .map(|(i, m)| ExportLayer {
                name: format!("{}_{i}", m.source.label),
                source_mask: m.source.mask_polygon().to_vec(),
                target_mask: m.target.mask_polygon().to_vec(),
                keyframes: m
                    .keyframes
                    .iter()
                    .map(|k| ExportKeyframe {
                        frame: to_frame(k.time),
                        position: k.point,
                        scale: k.scale,
                        opacity: k.opacity,
                        rotation: k.rotation,
                        in_tangent: k.control_in,
                        out_tangent: k.control_out,
                    })
                    .collect(),
            })
            .collect();
        let duration_frames = to_frame(t.duration);

        Self {
            version: Self::VERSION,
            frame_rate: fps,
            duration_frames,
            ease: t.ease.name().to_string(),
            layers,
            expressions: vec![
                morph_amount(fps, duration_frames),
                Expression {
                    name: "auto_orient".to_string(),
                    property: "transform.rotation".to_string(),
                    code: "var v = position.velocityAtTime(time); radiansToDegrees(Math.atan2(v[1], v[0]))"
                        .to_string(),
                },
            ],
        }
    }

    /// Stretch or squeeze the document to last `duration` seconds.
    pub fn retime(&mut self, duration: f64) {
        let frames = (duration.max(0.0) * self.frame_rate).round() as u32;
        let old = self.duration_frames;
        for k in self.layers.iter_mut().flat_map(|l| l.keyframes.iter_mut()) {
            k.frame = if old == 0 {
                0
            } else {
                (f64::from(k.frame) * f64::from(frames) / f64::from(old)).round() as u32
            };
        }
        self.duration_frames = frames;
        for e in &mut self.expressions {
            if e.name == "morph_amount" {
                *e = morph_amount(self.frame_rate, frames);
            }
        }
    }

    pub fn to_json_pretty(&self) -> SegueResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Generic keyframing script for the document, one call per keyframe.
    pub fn to_script(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "// morph transition v{}", self.version);
        let _ = writeln!(
            s,
            "var comp = beginMorph({}, {}, \"{}\");",
            self.frame_rate, self.duration_frames, self.ease
        );
        for layer in &self.layers {
            let _ = writeln!(s, "var layer = comp.addLayer({:?});", layer.name);
            let _ = writeln!(s, "layer.setMask(\"source\", {});", points(&layer.source_mask));
            let _ = writeln!(s, "layer.setMask(\"target\", {});", points(&layer.target_mask));
            for k in &layer.keyframes {
                let _ = writeln!(
                    s,
                    "layer.key({}, [{:.4}, {:.4}], {:.4}, {:.4}, {:.4});",
                    k.frame, k.position.x, k.position.y, k.scale, k.opacity, k.rotation
                );
            }
        }
        for e in &self.expressions {
            let _ = writeln!(s, "comp.expression(\"{}\", {:?});", e.property, e.code);
        }
        s
    }
}

fn morph_amount(fps: f64, frames: u32) -> Expression {
    Expression {
        name: "morph_amount".to_string(),
        property: "effect.morph.amount".to_string(),
        code: format!(
            "clamp((time - inPoint) * {fps} / {}, 0, 1) * 100",
            frames.max(1)
        ),
    }
}

fn points(ps: &[Point]) -> String {
    let inner: Vec<String> = ps
        .iter()
        .map(|p| format!("[{:.4}, {:.4}]", p.x, p.y))
        .collect();
    format!("[{}]", inner.join(", "))
}

#[cfg(test)]
#[path = "../../tests/unit/morph/export.rs"]
mod tests;
