//! Sequence request in, edit plan out.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{SegueError, SegueResult};
use crate::match_cut::MatchCutOpportunity;
use crate::matcher::{EffectParam, TransitionKind, TransitionSuggestion};
use crate::rhythm::{CutStyle, RhythmAnalysis};

/// Existing in/out points of a shot, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShotTiming {
    pub start: f64,
    pub end: f64,
}

impl ShotTiming {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShotInput {
    pub path: PathBuf,
    /// Externally supplied semantic keywords; drive subject estimation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<ShotTiming>,
}

impl ShotInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tags: Vec::new(),
            timing: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timing(mut self, start: f64, end: f64) -> Self {
        self.timing = Some(ShotTiming { start, end });
        self
    }
}

/// Ordered shots plus optional pacing targets.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceRequest {
    pub shots: Vec<ShotInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
}

impl SequenceRequest {
    pub fn new(shots: Vec<ShotInput>) -> Self {
        Self {
            shots,
            ..Self::default()
        }
    }

    pub fn from_path(path: &Path) -> SegueResult<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open sequence request '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> SegueResult<Self> {
        let req: Self = serde_json::from_reader(reader)?;
        req.validate()?;
        Ok(req)
    }

    pub fn validate(&self) -> SegueResult<()> {
        if let Some(t) = self.target_duration
            && !(t.is_finite() && t > 0.0)
        {
            return Err(SegueError::validation(
                "target_duration must be finite and > 0 when set",
            ));
        }
        if let Some(bpm) = self.bpm
            && !(bpm.is_finite() && bpm > 0.0)
        {
            return Err(SegueError::validation("bpm must be finite and > 0 when set"));
        }
        for (i, shot) in self.shots.iter().enumerate() {
            if shot.path.as_os_str().is_empty() {
                return Err(SegueError::validation(format!("shot {i} has an empty path")));
            }
            if let Some(t) = shot.timing
                && !(t.start.is_finite() && t.end.is_finite() && t.end >= t.start)
            {
                return Err(SegueError::validation(format!(
                    "shot {i} timing must satisfy start <= end"
                )));
            }
        }
        Ok(())
    }
}

/// A shot that could not be analyzed; the rest of the sequence still is.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShotFailure {
    pub index: usize,
    pub path: PathBuf,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlannedShot {
    /// Position in the request.
    pub index: usize,
    pub path: PathBuf,
    pub duration: f64,
    pub cut_style: CutStyle,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditPlan {
    pub shots: Vec<PlannedShot>,
    pub transitions: Vec<TransitionSuggestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_cuts: Vec<MatchCutOpportunity>,
    pub rhythm: RhythmAnalysis,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ShotFailure>,
    pub total_duration: f64,
    /// Set when the run stopped early; completed units are still valid.
    #[serde(default)]
    pub cancelled: bool,
}

impl EditPlan {
    /// Merge pacing into shots and cap every transition at half of either adjacent hold.
    ///
    /// `shots` pairs each request index with its path; pacing is looked up by that index.
    pub fn assemble(
        shots: &[(usize, PathBuf)],
        mut transitions: Vec<TransitionSuggestion>,
        match_cuts: Vec<MatchCutOpportunity>,
        rhythm: RhythmAnalysis,
        failures: Vec<ShotFailure>,
    ) -> Self {
        let planned: Vec<PlannedShot> = shots
            .iter()
            .filter_map(|(index, path)| {
                let pacing = rhythm.pacing.iter().find(|p| p.index == *index)?;
                Some(PlannedShot {
                    index: *index,
                    path: path.clone(),
                    duration: pacing.duration,
                    cut_style: pacing.cut_style,
                })
            })
            .collect();

        let hold = |index: usize| {
            planned
                .iter()
                .find(|s| s.index == index)
                .map(|s| s.duration)
        };
        for t in &mut transitions {
            let cap = match (hold(t.source), hold(t.target)) {
                (Some(a), Some(b)) => 0.5 * a.min(b),
                _ => continue,
            };
            if t.duration > cap {
                t.duration = cap;
                if let Some(c) = &mut t.compatibility {
                    c.duration = cap;
                }
                if t.transition == TransitionKind::Morph {
                    for effect in &mut t.effects {
                        if let EffectParam::Morph { export } = effect {
                            export.retime(cap);
                        }
                    }
                }
            }
        }

        Self {
            total_duration: planned.iter().map(|s| s.duration).sum(),
            shots: planned,
            transitions,
            match_cuts,
            rhythm,
            failures,
            cancelled: false,
        }
    }

    pub fn to_json_pretty(&self) -> SegueResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "../tests/unit/analysis/plan.rs"]
mod tests;
