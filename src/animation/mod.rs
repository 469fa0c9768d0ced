//! Keyframe animation: clips, their playback, and skinning.

pub use self::action::{ClipAction, LoopMode};
pub use self::clip::{AnimationClip, Channel};
pub use self::clock::Clock;
pub use self::cycle::ClipCycle;
pub use self::mixer::AnimationMixer;
pub use self::sampler::{Interpolation, Keyframes, Sample, Sampler};

mod action;
mod clip;
mod clock;
mod cycle;
mod mixer;
mod sampler;
pub mod skinning;
