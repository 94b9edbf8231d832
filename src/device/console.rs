//! Console device — prints each scaled vector instead of driving hardware.

use crossterm::style::Stylize;

use super::scaling::ScalingPolicy;
use super::{Device, DeviceError};

/// A dry-run sink: applies the configured scaling policy and writes the
/// result to the terminal, one line per step. Zeros are dimmed so active
/// channels stand out.
#[derive(Debug)]
pub struct ConsoleDevice {
    scaling: ScalingPolicy,
    amplitude_steps: u32,
}

impl ConsoleDevice {
    pub fn new(scaling: ScalingPolicy, amplitude_steps: u32) -> Self {
        Self {
            scaling,
            amplitude_steps,
        }
    }

    fn scaled(&self, levels: &[u32], multiplier: f64) -> Vec<f64> {
        levels
            .iter()
            .map(|&v| self.scaling.scale(v, multiplier, self.amplitude_steps))
            .collect()
    }
}

impl Device for ConsoleDevice {
    fn connect(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn send(&mut self, levels: &[u32], multiplier: f64) -> Result<(), DeviceError> {
        let parts: Vec<String> = self
            .scaled(levels, multiplier)
            .iter()
            .map(|&v| {
                let text = format!("{v:7.1}");
                if v == 0.0 {
                    text.dark_grey().to_string()
                } else {
                    text
                }
            })
            .collect();
        println!("  {}", parts.join(" "));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DeviceError> {
        println!("  {}", "-- all channels off --".dark_grey());
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), DeviceError> {
        let _ = self.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_applied_per_value() {
        let dev = ConsoleDevice::new(ScalingPolicy::Linear { output_range: 100.0 }, 10);
        let scaled = dev.scaled(&[0, 5, 10], 1.0);
        assert_eq!(scaled, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn duty_cycle_zero_passes_through() {
        let dev = ConsoleDevice::new(ScalingPolicy::default(), 10);
        let scaled = dev.scaled(&[0, 1], 1.0);
        assert_eq!(scaled[0], 0.0);
        assert!(scaled[1] >= 200.0);
    }
}
