use crate::foundation::core::{Point, Rect, clamp01, norm_rect};

/// Region believed to hold a labelled subject, in normalized coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubjectRegion {
    pub label: String,
    pub confidence: f64,
    pub bbox: Rect,
    pub center: Point,
    pub area: f64,
}

impl SubjectRegion {
    pub fn new(label: impl Into<String>, confidence: f64, bbox: Rect) -> Self {
        Self {
            label: label.into(),
            confidence: clamp01(confidence),
            center: bbox.center(),
            area: bbox.area(),
            bbox,
        }
    }

    /// Bounding box corners, clockwise from top-left.
    pub fn mask_polygon(&self) -> [Point; 4] {
        let r = self.bbox;
        [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ]
    }
}

/// What an estimator may look at besides the tags.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameHints {
    pub focal_point: Point,
}

impl Default for FrameHints {
    fn default() -> Self {
        Self {
            focal_point: Point::new(0.5, 0.5),
        }
    }
}

/// Maps semantic labels to plausible image regions.
pub trait RegionEstimator: Send + Sync {
    fn estimate(&self, tags: &[String], hints: &FrameHints) -> Vec<SubjectRegion>;
}

/// Synonym groups; labels in one group may morph into each other.
pub const SYNONYM_GROUPS: &[(&str, &[&str])] = &[
    (
        "person",
        &["person", "people", "man", "woman", "child", "face", "portrait"],
    ),
    ("animal", &["animal", "dog", "cat", "bird", "horse", "pet"]),
    (
        "vehicle",
        &["vehicle", "car", "truck", "bike", "bicycle", "motorcycle", "train"],
    ),
    (
        "landscape",
        &["landscape", "mountain", "sky", "sea", "ocean", "beach", "field"],
    ),
    (
        "building",
        &["building", "architecture", "house", "city", "tower"],
    ),
    ("object", &["object", "product", "food", "flower"]),
];

pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Name of the synonym group containing `label`, if any.
pub fn label_group(label: &str) -> Option<&'static str> {
    let label = normalize_label(label);
    SYNONYM_GROUPS
        .iter()
        .find(|(_, members)| members.contains(&label.as_str()))
        .map(|(group, _)| *group)
}

/// `1.0` for identical labels, `same_group` for synonyms, `None` otherwise.
pub fn label_score(a: &str, b: &str, same_group: f64) -> Option<f64> {
    let (a, b) = (normalize_label(a), normalize_label(b));
    if a == b {
        return Some(1.0);
    }
    match (label_group(&a), label_group(&b)) {
        (Some(ga), Some(gb)) if ga == gb => Some(same_group),
        _ => None,
    }
}

/// Fixed canonical boxes per keyword. Person-like boxes follow the focal point horizontally.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordRegionEstimator;

impl KeywordRegionEstimator {
    fn canonical(label: &str) -> Option<(Rect, f64, bool)> {
        let r = match label {
            "face" | "portrait" => (norm_rect(0.35, 0.15, 0.65, 0.5), 0.6, true),
            _ => match label_group(label)? {
                "person" => (norm_rect(0.3, 0.1, 0.7, 0.95), 0.5, true),
                "animal" => (norm_rect(0.25, 0.35, 0.75, 0.9), 0.45, true),
                "vehicle" => (norm_rect(0.15, 0.45, 0.85, 0.85), 0.45, false),
                "building" => (norm_rect(0.2, 0.05, 0.8, 0.9), 0.4, false),
                "landscape" => (norm_rect(0.0, 0.0, 1.0, 1.0), 0.3, false),
                _ => (norm_rect(0.35, 0.35, 0.65, 0.65), 0.4, true),
            },
        };
        Some(r)
    }
}

impl RegionEstimator for KeywordRegionEstimator {
    fn estimate(&self, tags: &[String], hints: &FrameHints) -> Vec<SubjectRegion> {
        let mut seen = Vec::new();
        let mut out = Vec::new();
        for tag in tags {
            let label = normalize_label(tag);
            if label.is_empty() || seen.contains(&label) {
                continue;
            }
            let Some((bbox, confidence, follows_focus)) = Self::canonical(&label) else {
                continue;
            };
            let bbox = if follows_focus {
                let half = bbox.width() / 2.0;
                let cx = hints.focal_point.x.clamp(half, 1.0 - half);
                Rect::new(cx - half, bbox.y0, cx + half, bbox.y1)
            } else {
                bbox
            };
            seen.push(label.clone());
            out.push(SubjectRegion::new(label, confidence, bbox));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/morph/subjects.rs"]
mod tests;
