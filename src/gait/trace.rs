//! Parse trace — a diagnostic side-channel recording every accept, reject,
//! and skip decision the parser makes.
//!
//! The trace has no role in control flow; the parsing algorithm behaves
//! identically whether or not anyone reads it. The CLI renders it under
//! `--verbose`.

use std::fmt;

use super::interval::Interval;

/// Why a segment was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Shorter than the shortest valid `# # #` form.
    TooShort,
    /// Whitespace splitting did not yield exactly 3 tokens.
    TokenCount(usize),
    /// A token is not a non-negative base-10 integer.
    BadInteger(String),
    /// Duration parsed as 0.
    ZeroDuration,
    /// Amplitude at or above the configured amplitude step count.
    AmplitudeRange(u32),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooShort => write!(f, "invalid length"),
            RejectReason::TokenCount(n) => write!(f, "invalid parameter count: {n}"),
            RejectReason::BadInteger(tok) => write!(f, "invalid integer \"{tok}\""),
            RejectReason::ZeroDuration => write!(f, "duration must be positive"),
            RejectReason::AmplitudeRange(a) => write!(f, "amplitude {a} out of range"),
        }
    }
}

/// One parser decision, tagged with the 1-based source line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A line was read (after trimming).
    Line { number: usize, text: String },
    /// The one-time bare-integer line was consumed as the step count.
    StepOverride { number: usize, value: u32 },
    /// The bare-integer line was consumed but its value was unusable.
    StepOverrideInvalid { number: usize, value: u32 },
    /// A segment was rejected; the rest of the line is still attempted.
    SegmentRejected {
        number: usize,
        segment: String,
        reason: RejectReason,
    },
    /// A segment became an interval on the channel under construction.
    IntervalAccepted { number: usize, interval: Interval },
    /// The line produced a channel with this many intervals.
    ChannelAccepted {
        number: usize,
        channel: usize,
        intervals: usize,
    },
    /// The line produced zero intervals and was dropped without a channel.
    LineDropped { number: usize },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Line { number, text } => {
                write!(f, "reading line {number} > \"{text}\"")
            }
            TraceEvent::StepOverride { number, value } => {
                write!(f, "line {number}: step count set to {value}")
            }
            TraceEvent::StepOverrideInvalid { number, value } => {
                write!(f, "line {number}: step count {value} unusable, keeping default")
            }
            TraceEvent::SegmentRejected {
                number,
                segment,
                reason,
            } => {
                write!(f, "line {number}: {reason} > \"{segment}\"")
            }
            TraceEvent::IntervalAccepted { number, interval } => {
                write!(f, "line {number}: interval > {interval}")
            }
            TraceEvent::ChannelAccepted {
                number,
                channel,
                intervals,
            } => {
                write!(f, "line {number}: channel {channel} with {intervals} interval(s)")
            }
            TraceEvent::LineDropped { number } => {
                write!(f, "line {number}: no intervals found, skipping line")
            }
        }
    }
}

/// The full trace for one parse, in decision order.
#[derive(Debug, Clone, Default)]
pub struct ParseTrace {
    events: Vec<TraceEvent>,
}

impl ParseTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Rejections only, for quick error reporting.
    pub fn rejections(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::SegmentRejected { .. }))
    }
}
