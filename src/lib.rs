//! gaitctl — a terminal-native controller for pneumatic actuator gait patterns.

pub mod config;
pub mod device;
pub mod gait;
pub mod playback;
pub mod render;
