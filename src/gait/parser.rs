//! Tolerant gait file parser.
//!
//! One physical line is one channel candidate. Segment rejections never
//! abort a line and line failures never abort the file: the parser always
//! reads to the end and returns the best-effort timeline it could build,
//! with `had_errors` recording whether anything was rejected along the way.

use std::fs;
use std::path::Path;

use super::error::GaitError;
use super::interval::{Channel, Interval, Timeline};
use super::trace::{ParseTrace, RejectReason, TraceEvent};
use crate::config::GaitConfig;

/// Shortest segment that could hold an interval: the `# # #` form.
const MIN_SEGMENT_LEN: usize = 5;

/// Everything one parse produces.
#[derive(Debug)]
pub struct ParseOutcome {
    pub timeline: Timeline,
    /// Parsed file override if present and valid, else the configured default.
    pub step_count: u32,
    /// True if any segment or format rejection occurred anywhere in the file.
    pub had_errors: bool,
    pub trace: ParseTrace,
}

/// Read and parse a gait file.
///
/// A missing or unreadable file is a [`GaitError`], distinct from format
/// errors inside the file (those land in `had_errors`).
pub fn load_gait(path: &Path, config: &GaitConfig) -> Result<ParseOutcome, GaitError> {
    if !path.is_file() {
        return Err(GaitError::NotFound(path.to_path_buf()));
    }
    let text =
        fs::read_to_string(path).map_err(|err| GaitError::Io(path.to_path_buf(), err))?;
    Ok(parse_str(&text, config))
}

/// Parse gait text. Never fails: format problems accumulate into
/// `had_errors` and the trace while parsing continues.
pub fn parse_str(text: &str, config: &GaitConfig) -> ParseOutcome {
    let mut timeline = Timeline::new();
    let mut trace = ParseTrace::new();
    let mut had_errors = false;
    let mut step_count = config.steps_in_timeline;
    let mut override_consumed = false;

    for (idx, raw) in text.lines().enumerate() {
        let number = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        trace.push(TraceEvent::Line {
            number,
            text: line.to_string(),
        });

        // Truncate at the first '#' (inline trailing comment).
        let line = match line.find('#') {
            Some(pos) => line[..pos].trim_end(),
            None => line,
        };

        // One-time step-count override, only while no channel exists yet.
        if config.step_override && !override_consumed && timeline.channel_count() == 0 {
            if let Some(value) = bare_integer(line) {
                override_consumed = true;
                if value >= 1 {
                    step_count = value;
                    trace.push(TraceEvent::StepOverride { number, value });
                } else {
                    trace.push(TraceEvent::StepOverrideInvalid { number, value });
                }
                continue;
            }
        }

        let mut channel = Channel::new();
        for segment in line.split(',') {
            let segment = segment.trim();
            match parse_segment(segment, config.amplitude_steps) {
                Ok(interval) => {
                    trace.push(TraceEvent::IntervalAccepted { number, interval });
                    channel.push(interval);
                }
                Err(reason) => {
                    had_errors = true;
                    trace.push(TraceEvent::SegmentRejected {
                        number,
                        segment: segment.to_string(),
                        reason,
                    });
                }
            }
        }

        if channel.is_empty() {
            // Not an error in itself; any rejected segments already counted.
            trace.push(TraceEvent::LineDropped { number });
        } else {
            trace.push(TraceEvent::ChannelAccepted {
                number,
                channel: timeline.channel_count(),
                intervals: channel.len(),
            });
            timeline.push_channel(channel);
        }
    }

    ParseOutcome {
        timeline,
        step_count,
        had_errors,
        trace,
    }
}

/// Returns the value of a line holding exactly one integer token and
/// nothing else.
fn bare_integer(line: &str) -> Option<u32> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => token.parse().ok(),
        _ => None,
    }
}

/// Parse one comma-separated segment into an interval.
fn parse_segment(segment: &str, amplitude_steps: u32) -> Result<Interval, RejectReason> {
    if segment.len() < MIN_SEGMENT_LEN {
        return Err(RejectReason::TooShort);
    }

    let tokens: Vec<&str> = segment.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(RejectReason::TokenCount(tokens.len()));
    }

    let mut values = [0u32; 3];
    for (value, token) in values.iter_mut().zip(&tokens) {
        // u32 parsing also rejects negative tokens.
        *value = token
            .parse()
            .map_err(|_| RejectReason::BadInteger(token.to_string()))?;
    }

    let [start, duration, amplitude] = values;
    if duration == 0 {
        return Err(RejectReason::ZeroDuration);
    }
    if amplitude >= amplitude_steps {
        return Err(RejectReason::AmplitudeRange(amplitude));
    }
    Ok(Interval::new(start, duration, amplitude))
}
