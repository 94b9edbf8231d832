//! Cyclic playback — the channel sampler and the cycle player.

pub mod player;
pub mod sampler;

pub use player::{CycleEnd, CyclePlayer, PlayError};
pub use sampler::sample;
