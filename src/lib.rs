//! Segue is a transition intelligence engine for ordered shot sequences.
//!
//! Given representative still frames it scores how well consecutive shots cut together,
//! picks and parameterizes a transition, spots specialized opportunities (match cuts,
//! portal shapes, subject morphs) and suggests per-shot hold durations:
//!
//! - Describe shots with [`describe_path`] or [`ShotAnalyzer`]
//! - Compare pairs with [`TransitionMatcher::suggest`]
//! - Run a whole [`SequenceRequest`] into an [`EditPlan`] with
//!   [`TransitionMatcher::analyze_sequence`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod cache;
pub mod color_flow;
pub mod config;
pub mod descriptor;
pub mod foundation;
pub mod match_cut;
pub mod matcher;
pub mod morph;
pub mod plan;
pub mod portal;
pub mod rhythm;
pub mod shot;
pub mod vision;

pub use crate::animation::ease::Ease;
pub use crate::cache::DescriptorCache;
pub use crate::color_flow::{ColorFlowAnalysis, ColorFlowAnalyzer};
pub use crate::config::{EngineConfig, ThreadingConfig};
pub use crate::descriptor::{ShotDescriptor, describe_path};
pub use crate::foundation::core::{Direction, Point, Rect, Rgb8, Size, Vec2};
pub use crate::foundation::error::{SegueError, SegueResult};
pub use crate::match_cut::{MatchCutAnalysis, ShapeMotionMatcher};
pub use crate::matcher::{
    EffectParam, SceneCompatibility, TransitionKind, TransitionMatcher, TransitionSuggestion,
};
pub use crate::morph::export::MorphExport;
pub use crate::morph::{MorphTransition, SubjectMorpher};
pub use crate::plan::{EditPlan, SequenceRequest, ShotFailure, ShotInput, ShotTiming};
pub use crate::portal::{PortalEffectAnalysis, PortalMatcher};
pub use crate::rhythm::{RhythmAnalysis, VisualRhythmAnalyzer};
pub use crate::shot::{ShotAnalysis, ShotAnalyzer};
