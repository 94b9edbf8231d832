//! Output devices — the sink abstraction that turns an amplitude vector
//! into a hardware effect.
//!
//! The playback core never branches on device type; it drives whatever
//! implements [`Device`]. Which variant runs is a configuration choice.

pub mod console;
pub mod null;
pub mod pwm;
pub mod scaling;

pub use console::ConsoleDevice;
pub use null::NullDevice;
pub use pwm::PwmBusDevice;
pub use scaling::ScalingPolicy;

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

use crate::config::GaitConfig;

/// An output sink for amplitude vectors.
///
/// `send` receives raw pre-scale amplitudes plus the session multiplier;
/// rescaling to the output range is the implementation's responsibility.
pub trait Device {
    /// Establish the link. Playback must not start if this fails.
    fn connect(&mut self) -> Result<(), DeviceError>;

    /// Transmit one fully-formed sample vector, one call per step.
    fn send(&mut self, levels: &[u32], multiplier: f64) -> Result<(), DeviceError>;

    /// Force all channels to the off state. Safe to call even if nothing
    /// was previously sent.
    fn clear(&mut self) -> Result<(), DeviceError>;

    /// Release the link. Attempts `clear` first, swallowing its failure.
    fn disconnect(&mut self) -> Result<(), DeviceError>;
}

/// An error from a device operation.
#[derive(Debug)]
pub struct DeviceError {
    message: String,
    source: Option<io::Error>,
}

impl DeviceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            message: message.into(),
            source: Some(source),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(err) => write!(f, "{}: {}", self.message, err),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Which device variant a session drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// No hardware; sends are counted and dropped.
    #[default]
    Null,
    /// Scaled vectors printed to the terminal.
    Console,
    /// Chained PWM breakout boards behind a byte sink.
    Pwm,
}

impl std::str::FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(DeviceKind::Null),
            "console" => Ok(DeviceKind::Console),
            "pwm" => Ok(DeviceKind::Pwm),
            other => Err(format!("unknown device \"{other}\" (null, console, pwm)")),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Null => write!(f, "null"),
            DeviceKind::Console => write!(f, "console"),
            DeviceKind::Pwm => write!(f, "pwm"),
        }
    }
}

/// Build the configured device variant.
pub fn build_device(config: &GaitConfig) -> Box<dyn Device> {
    match config.device {
        DeviceKind::Null => Box::new(NullDevice::new()),
        DeviceKind::Console => Box::new(ConsoleDevice::new(
            config.scaling,
            config.amplitude_steps,
        )),
        DeviceKind::Pwm => Box::new(PwmBusDevice::new(
            config.pwm.clone(),
            config.scaling,
            config.amplitude_steps,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_kind_yaml_names() {
        assert_eq!(serde_yaml::to_string(&DeviceKind::Pwm).unwrap().trim(), "pwm");
        let kind: DeviceKind = serde_yaml::from_str("console").unwrap();
        assert_eq!(kind, DeviceKind::Console);
    }

    #[test]
    fn build_selects_configured_variant() {
        let mut config = GaitConfig::default();
        config.device = DeviceKind::Null;
        let mut device = build_device(&config);
        assert!(device.connect().is_ok());
    }

    #[test]
    fn device_error_display() {
        let err = DeviceError::new("link lost");
        assert_eq!(err.to_string(), "link lost");
        let err = DeviceError::io(
            "cannot open bus",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().starts_with("cannot open bus"));
    }
}
