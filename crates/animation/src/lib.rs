//! Keyframe playback and tweening for scene entities.
//!
//! Two independent animation systems live here:
//! - [`AnimationMixer`] plays imported keyframe clips as [`AnimationAction`]s
//!   against an [`AnimationTarget`], with [`ActionGroups`] keeping at most one
//!   action running per [`BlendGroup`] and a one-slot queue per group.
//! - [`Timeline`] sequences eased scalar [`Tween`]s over any [`Animatable`]
//!   channel set (positions, rotations, shader uniforms, opacities).
//!
//! # Invariants
//! - Mixer updates are deterministic for a given sequence of `dt` values.
//! - A timeline reports `Completed` or `ReverseCompleted` once per arrival.
//! - Nothing here reads wall-clock time; callers pass deltas.

pub mod action;
pub mod clip;
pub mod easing;
pub mod groups;
pub mod mixer;
pub mod tween;
pub mod values;

pub use action::{AnimationAction, LoopMode};
pub use clip::{AnimationClip, Interpolation, KeyframeTrack, Track, TrackData, TrackValue};
pub use easing::Ease;
pub use groups::{ActionGroups, BlendGroup, SECONDARY_SUFFIX};
pub use mixer::{ActionId, AnimationMixer, AnimationTarget};
pub use tween::{Animatable, Repeat, Timeline, TimelineEvent, Tween};
pub use values::{Interpolatable, MorphWeights};

pub fn crate_info() -> &'static str {
    "folio-animation v0.1.0"
}
