//! Amplitude scaling — the boundary between timeline amplitudes and device
//! output ranges.
//!
//! The player hands every device the raw pre-scale amplitude and the session
//! multiplier; which policy rescales them is a device configuration choice.
//! That keeps the player hardware-agnostic.

use serde::{Deserialize, Serialize};

/// How a device rescales a timeline amplitude into its output range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScalingPolicy {
    /// Pneumatic actuators have an actuation threshold: any non-zero output
    /// must sit in `[min_duty, max_duty]`, while 0 means fully off and is
    /// never nudged above the threshold.
    DutyCycle { min_duty: f64, max_duty: f64 },
    /// Plain proportional scaling over `[0, output_range]` for targets with
    /// no minimum-actuation threshold.
    Linear { output_range: f64 },
}

impl ScalingPolicy {
    /// Rescale one amplitude. `amplitude_steps` is the quantization
    /// granularity of the input value (its exclusive upper bound).
    pub fn scale(&self, value: u32, multiplier: f64, amplitude_steps: u32) -> f64 {
        let value = value as f64;
        let steps = amplitude_steps as f64;
        match *self {
            ScalingPolicy::DutyCycle { min_duty, max_duty } => {
                if value == 0.0 {
                    return 0.0;
                }
                value * multiplier * (max_duty - min_duty) / steps + min_duty
            }
            ScalingPolicy::Linear { output_range } => value * multiplier * output_range / steps,
        }
    }
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        // Matches the reference actuator hardware: threshold at 200 on a
        // 0-255 duty range.
        ScalingPolicy::DutyCycle {
            min_duty: 200.0,
            max_duty: 255.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEPS: u32 = 10;

    fn duty() -> ScalingPolicy {
        ScalingPolicy::DutyCycle {
            min_duty: 200.0,
            max_duty: 255.0,
        }
    }

    #[test]
    fn zero_stays_exactly_zero_regardless_of_multiplier() {
        for multiplier in [0.0, 0.5, 1.0, 10.0] {
            assert_eq!(duty().scale(0, multiplier, STEPS), 0.0);
        }
    }

    #[test]
    fn nonzero_lands_at_or_above_the_floor() {
        for value in 1..STEPS {
            let scaled = duty().scale(value, 1.0, STEPS);
            assert!(scaled >= 200.0, "value {value} scaled to {scaled}");
        }
    }

    #[test]
    fn full_amplitude_at_unit_multiplier_approaches_max() {
        let scaled = duty().scale(9, 1.0, STEPS);
        assert!((scaled - (9.0 * 55.0 / 10.0 + 200.0)).abs() < 1e-9);
        assert!(scaled <= 255.0);
    }

    #[test]
    fn multiplier_scales_the_span_not_the_floor() {
        let half = duty().scale(5, 0.5, STEPS);
        let full = duty().scale(5, 1.0, STEPS);
        assert!(half >= 200.0);
        assert!(half < full);
    }

    #[test]
    fn linear_has_no_floor_and_no_zero_special_case() {
        let linear = ScalingPolicy::Linear { output_range: 255.0 };
        assert_eq!(linear.scale(0, 1.0, STEPS), 0.0);
        assert!((linear.scale(5, 1.0, STEPS) - 127.5).abs() < 1e-9);
        assert!((linear.scale(2, 0.5, STEPS) - 25.5).abs() < 1e-9);
    }
}
