//! Cycle player — walks a timeline once through discrete time, sending one
//! amplitude vector per step to the device.
//!
//! Strictly single-threaded: the only suspension point is the inter-step
//! pacing sleep, so vectors reach the device in step order, one fully-formed
//! vector per call, never batched. Total wall time for one cycle is
//! approximately `cycle_duration` (best effort, not hard real time).

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::warn;

use super::sampler::sample;
use crate::device::Device;
use crate::gait::Timeline;

/// Why a cycle could not run.
#[derive(Debug, PartialEq, Eq)]
pub enum PlayError {
    /// Zero channels, or every channel empty. There is nothing to do.
    EmptyTimeline,
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::EmptyTimeline => write!(f, "timeline is empty, nothing to play"),
        }
    }
}

impl std::error::Error for PlayError {}

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEnd {
    /// All steps ran.
    Completed,
    /// The cancel flag was observed; the device was cleared best-effort.
    Cancelled,
}

/// Owns one sampling cursor per channel, reused (and reset) across cycles.
#[derive(Debug, Default)]
pub struct CyclePlayer {
    cursors: Vec<usize>,
}

impl CyclePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one full cycle of `timeline` against `device`.
    ///
    /// Samples every channel at each step `0..step_count`, sends the vector
    /// with `multiplier`, and sleeps `cycle_duration / step_count` between
    /// steps (no trailing sleep after the last one). A failing send is
    /// logged and does not abort the cycle.
    ///
    /// When `cancel` becomes true the player stops advancing, issues one
    /// best-effort `clear` (its failure swallowed), and reports
    /// [`CycleEnd::Cancelled`].
    pub fn play_cycle(
        &mut self,
        timeline: &Timeline,
        step_count: u32,
        cycle_duration: Duration,
        multiplier: f64,
        device: &mut dyn Device,
        cancel: &AtomicBool,
    ) -> Result<CycleEnd, PlayError> {
        if timeline.is_empty() {
            return Err(PlayError::EmptyTimeline);
        }

        let channels = timeline.channels();
        self.cursors.clear();
        self.cursors.resize(channels.len(), 0);

        let pace = cycle_duration / step_count.max(1);
        let mut levels = Vec::with_capacity(channels.len());

        for step in 0..step_count {
            if cancel.load(Ordering::Relaxed) {
                let _ = device.clear();
                return Ok(CycleEnd::Cancelled);
            }

            levels.clear();
            for (channel, cursor) in channels.iter().zip(self.cursors.iter_mut()) {
                let (amplitude, next) = sample(channel, *cursor, step);
                *cursor = next;
                levels.push(amplitude);
            }

            if let Err(err) = device.send(&levels, multiplier) {
                warn!("send failed at step {step}: {err}");
            }

            if step + 1 < step_count {
                thread::sleep(pace);
            }
        }

        Ok(CycleEnd::Completed)
    }
}
