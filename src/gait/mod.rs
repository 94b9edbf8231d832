//! Gait timelines — data model, text parser, and parse diagnostics.

pub mod error;
pub mod interval;
pub mod parser;
pub mod trace;

pub use error::GaitError;
pub use interval::{Channel, Interval, Timeline};
pub use parser::{load_gait, parse_str, ParseOutcome};
pub use trace::{ParseTrace, RejectReason, TraceEvent};
