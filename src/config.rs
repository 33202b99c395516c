use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::color_flow::ColorFlowConfig;
use crate::descriptor::DescriptorConfig;
use crate::foundation::error::{SegueError, SegueResult};
use crate::match_cut::MatchCutConfig;
use crate::matcher::{MatcherConfig, RuleCondition};
use crate::morph::MorphConfig;
use crate::portal::PortalConfig;
use crate::rhythm::RhythmConfig;
use crate::vision::VisionConfig;

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ThreadingConfig {
    /// Worker count for the analysis pool; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// All tunables of one engine instance. Every section falls back to its defaults.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub vision: VisionConfig,
    pub descriptor: DescriptorConfig,
    pub color_flow: ColorFlowConfig,
    pub match_cut: MatchCutConfig,
    pub portal: PortalConfig,
    pub morph: MorphConfig,
    pub rhythm: RhythmConfig,
    pub matcher: MatcherConfig,
    pub threading: ThreadingConfig,
}

impl EngineConfig {
    pub fn from_path(path: &Path) -> SegueResult<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open engine config '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> SegueResult<Self> {
        let cfg: Self = serde_json::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SegueResult<()> {
        if self.vision.max_dimension < 8 {
            return Err(SegueError::validation("vision.max_dimension must be >= 8"));
        }
        if self.descriptor.palette.k == 0 {
            return Err(SegueError::validation("descriptor.palette.k must be >= 1"));
        }
        if self.morph.keyframes < 2 {
            return Err(SegueError::validation("morph.keyframes must be >= 2"));
        }
        if self.match_cut.window == 0 {
            return Err(SegueError::validation("match_cut.window must be >= 1"));
        }
        if let Some(0) = self.threading.threads {
            return Err(SegueError::validation(
                "threading.threads must be >= 1 when set",
            ));
        }

        positive("morph.frame_rate", self.morph.frame_rate)?;
        positive("rhythm.base_duration", self.rhythm.base_duration)?;
        positive("rhythm.sharpness_scale", self.rhythm.sharpness_scale)?;
        let r = &self.rhythm;
        if !(r.quick_below <= r.standard_below && r.standard_below <= r.long_below) {
            return Err(SegueError::validation(
                "rhythm cut-style thresholds must be ascending",
            ));
        }

        let m = &self.matcher;
        for (name, v) in [
            ("matcher.motion_weight", m.motion_weight),
            ("matcher.color_weight", m.color_weight),
            ("matcher.composition_weight", m.composition_weight),
            ("matcher.vector_share", m.vector_share),
            ("matcher.cut_below", m.cut_below),
            ("matcher.momentum_above", m.momentum_above),
            ("matcher.dissolve_above", m.dissolve_above),
            ("matcher.long_above", m.long_above),
            ("matcher.portal_effect_min", m.portal_effect_min),
            ("match_cut.motion_threshold", self.match_cut.motion_threshold),
            ("match_cut.shape_threshold", self.match_cut.shape_threshold),
            ("morph.default_threshold", self.morph.default_threshold),
            ("portal.pair_threshold", self.portal.pair_threshold),
        ] {
            unit(name, v)?;
        }
        for (label, v) in &self.morph.label_thresholds {
            unit(&format!("morph.label_thresholds.{label}"), *v)?;
        }
        for rule in &m.rules {
            if let RuleCondition::Scores {
                motion,
                color,
                composition,
            } = &rule.condition
                && [motion, color, composition].iter().any(|r| r.min > r.max)
            {
                return Err(SegueError::validation(format!(
                    "rule '{}' has an empty score range",
                    rule.name
                )));
            }
        }
        Ok(())
    }
}

fn positive(name: &str, v: f64) -> SegueResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SegueError::validation(format!(
            "{name} must be finite and > 0"
        )))
    }
}

fn unit(name: &str, v: f64) -> SegueResult<()> {
    if v.is_finite() && (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(SegueError::validation(format!("{name} must be in [0, 1]")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
