//! Channel sampler — amplitude lookup at a discrete time index with a
//! forward-only cursor.
//!
//! The cursor is held by the caller and threaded through successive calls;
//! the sampler itself mutates nothing. Within one cycle, `t` must be
//! non-decreasing for a given cursor stream. Because `t` only grows and the
//! cursor only advances, one full cycle costs amortized linear time in the
//! channel's interval count rather than steps × intervals.

use crate::gait::Channel;

/// Amplitude on `channel` at time `t`, given the cursor returned by the
/// previous call (0 at the start of a cycle).
///
/// Returns `(amplitude, new_cursor)`. An idle gap or a position past the
/// last interval reads as amplitude 0. Once the cursor has passed the end
/// of the list it stays there; later calls remain `(0, len)`.
pub fn sample(channel: &Channel, mut cursor: usize, t: u32) -> (u32, usize) {
    while let Some(interval) = channel.get(cursor) {
        if t < interval.start {
            // Between intervals: idle.
            return (0, cursor);
        }
        if t - interval.start < interval.duration {
            return (interval.amplitude, cursor);
        }
        // Past this interval's end; re-test the next one at the same t.
        cursor += 1;
    }
    (0, cursor)
}
