//! Everything derived from one shot's pixels, computed once per path.

use std::path::Path;

use crate::descriptor::{DescriptorConfig, ShotDescriptor, describe};
use crate::foundation::error::SegueResult;
use crate::match_cut::{MatchCutConfig, MatchCutFeatures};
use crate::morph::subjects::FrameHints;
use crate::portal::{Portal, PortalConfig, PortalMatcher};
use crate::rhythm::{RhythmConfig, VisualMetrics};
use crate::vision::raster::{Raster, load_raster};
use crate::vision::{Frame, VisionConfig};

/// Pixel-derived state of one shot. Tag-driven subject estimation happens later, per input.
#[derive(Clone, Debug, PartialEq)]
pub struct ShotAnalysis {
    pub descriptor: ShotDescriptor,
    pub metrics: VisualMetrics,
    pub match_cut: MatchCutFeatures,
    pub portals: Vec<Portal>,
}

impl ShotAnalysis {
    pub fn hints(&self) -> FrameHints {
        FrameHints {
            focal_point: self.descriptor.motion.focal_point,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShotAnalyzer {
    vision: VisionConfig,
    descriptor: DescriptorConfig,
    match_cut: MatchCutConfig,
    rhythm: RhythmConfig,
    portals: PortalMatcher,
}

impl ShotAnalyzer {
    pub fn new(
        vision: VisionConfig,
        descriptor: DescriptorConfig,
        match_cut: MatchCutConfig,
        portal: PortalConfig,
        rhythm: RhythmConfig,
    ) -> Self {
        Self {
            vision,
            descriptor,
            match_cut,
            rhythm,
            portals: PortalMatcher::new(portal),
        }
    }

    pub fn vision(&self) -> &VisionConfig {
        &self.vision
    }

    /// Decode and analyze one file.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub fn analyze_path(&self, path: &Path) -> SegueResult<ShotAnalysis> {
        let raster = load_raster(path, self.vision.max_dimension)?;
        Ok(self.analyze_raster(raster, path))
    }

    pub fn analyze_raster(&self, raster: Raster, path: &Path) -> ShotAnalysis {
        let frame = Frame::analyze(raster, &self.vision);
        let descriptor = describe(&frame, path, &self.descriptor);
        let metrics = VisualMetrics::measure(&frame, &descriptor, &self.vision, &self.rhythm);
        let match_cut = MatchCutFeatures::extract(&frame, &self.match_cut);
        let portals = self.portals.detect(&frame);
        tracing::debug!(
            regions = frame.regions.len(),
            lines = frame.lines.len(),
            portals = portals.len(),
            "shot analyzed"
        );
        ShotAnalysis {
            descriptor,
            metrics,
            match_cut,
            portals,
        }
    }
}
