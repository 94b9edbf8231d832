//! Timeline data model — intervals, channels, and the full gait timeline.
//!
//! A timeline is built once by the parser and is read-only for the rest of
//! its life. Re-parsing a file produces a brand-new timeline; the old one is
//! discarded, never mutated in place.

use std::fmt;

/// One active period on one channel: from discrete time `start`, for
/// `duration` steps, output `amplitude`.
///
/// Invariant: `duration > 0`. The parser is the only construction site and
/// enforces this, together with `amplitude < amplitude_steps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub duration: u32,
    pub amplitude: u32,
}

impl Interval {
    pub fn new(start: u32, duration: u32, amplitude: u32) -> Self {
        Self {
            start,
            duration,
            amplitude,
        }
    }

    /// First step index past the end of this interval.
    pub fn end(&self) -> u32 {
        self.start + self.duration
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.start, self.duration, self.amplitude)
    }
}

/// Ordered list of intervals for one physical output line.
///
/// Order is significant: it defines the scan order for the sampler. The
/// sampler additionally requires intervals sorted by ascending `start` and
/// non-overlapping; violating that yields undefined sampling order. This is
/// a caller contract, not a parser check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    intervals: Vec<Interval>,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_intervals(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    pub fn push(&mut self, interval: Interval) {
        self.intervals.push(interval);
    }

    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }
}

/// The full gait pattern for one cycle: ordered channels, index = physical
/// output channel number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    channels: Vec<Channel>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a channel in file order.
    pub fn push_channel(&mut self, channel: Channel) {
        self.channels.push(channel);
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Total interval count across all channels.
    pub fn interval_count(&self) -> usize {
        self.channels.iter().map(Channel::len).sum()
    }

    /// A timeline with zero channels, or where every channel is empty, has
    /// nothing to play. Playback refuses to run on it.
    pub fn is_empty(&self) -> bool {
        self.channels.iter().all(Channel::is_empty)
    }
}
