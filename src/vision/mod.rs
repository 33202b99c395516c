//! Low-level image machinery shared by every analyzer.
//!
//! A [`Frame`] bundles everything derived from one decoded raster (gradients, edge mask, line
//! segments, corner features, segmented regions) so each shot is measured exactly once.

pub mod color;
pub mod contours;
pub mod features;
pub mod gradient;
pub mod lines;
pub mod raster;
pub mod shapes;
pub mod spectrum;

use self::contours::{Contour, find_contours, otsu_threshold};
use self::features::{Feature, HarrisConfig, detect_features};
use self::gradient::GradientField;
use self::lines::{HoughConfig, LineSegment, detect_lines};
use self::raster::Raster;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Frames are downscaled so their longest side is at most this many pixels.
    pub max_dimension: u32,
    /// Sobel magnitude above which a pixel counts as an edge.
    pub edge_threshold: f32,
    /// Regions smaller than this fraction of the frame are ignored.
    pub min_region_fraction: f64,
    /// Frames with a luma standard deviation below this are not segmented.
    pub flat_luma_std: f64,
    /// FFT grid size for texture analysis.
    pub spectrum_size: usize,
    pub hough: HoughConfig,
    pub harris: HarrisConfig,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            max_dimension: 256,
            edge_threshold: 100.0,
            min_region_fraction: 0.002,
            flat_luma_std: 2.0,
            spectrum_size: 64,
            hough: HoughConfig::default(),
            harris: HarrisConfig::default(),
        }
    }
}

/// One shot's raster plus all geometry derived from it.
#[derive(Clone, Debug)]
pub struct Frame {
    pub raster: Raster,
    pub gradient: GradientField,
    pub edges: Vec<bool>,
    pub lines: Vec<LineSegment>,
    pub features: Vec<Feature>,
    /// Otsu-segmented regions: bright components first, then dark ones.
    pub regions: Vec<Contour>,
}

impl Frame {
    pub fn analyze(raster: Raster, cfg: &VisionConfig) -> Self {
        let gradient = GradientField::compute(&raster);
        let edges = gradient.edge_mask(cfg.edge_threshold);
        let lines = detect_lines(&edges, raster.width(), raster.height(), &cfg.hough);
        let features = detect_features(&gradient, &cfg.harris);
        let regions = segment_regions(&raster, cfg);
        Self {
            raster,
            gradient,
            edges,
            lines,
            features,
            regions,
        }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn pixel_count(&self) -> f64 {
        self.raster.len() as f64
    }

    /// Regions that do not touch the frame border, i.e. enclosed shapes.
    pub fn enclosed_regions(&self) -> impl Iterator<Item = &Contour> {
        self.regions.iter().filter(|c| !c.touches_border)
    }

    pub fn edge_density(&self) -> f64 {
        if self.edges.is_empty() {
            return 0.0;
        }
        self.edges.iter().filter(|&&e| e).count() as f64 / self.edges.len() as f64
    }
}

fn segment_regions(raster: &Raster, cfg: &VisionConfig) -> Vec<Contour> {
    if raster.luma_std() < cfg.flat_luma_std {
        return Vec::new();
    }
    let luma = raster.luma();
    let t = otsu_threshold(luma);
    let min_area = ((raster.len() as f64) * cfg.min_region_fraction).ceil().max(4.0) as usize;
    let (w, h) = (raster.width(), raster.height());

    let bright: Vec<bool> = luma.iter().map(|&v| v > t).collect();
    let dark: Vec<bool> = bright.iter().map(|&b| !b).collect();
    let mut out = find_contours(&bright, luma, w, h, min_area);
    out.extend(find_contours(&dark, luma, w, h, min_area));
    out
}

#[cfg(test)]
#[path = "../../tests/unit/vision/frame.rs"]
mod tests;
