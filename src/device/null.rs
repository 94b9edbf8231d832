//! Null device — fake output for machines without hardware attached.

use log::debug;

use super::{Device, DeviceError};

/// Accepts everything and drives nothing. Useful for dry runs and for
/// developing gaits away from the actuator rig.
#[derive(Debug, Default)]
pub struct NullDevice {
    sends: u64,
}

impl NullDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many vectors have been sent since construction.
    pub fn sends(&self) -> u64 {
        self.sends
    }
}

impl Device for NullDevice {
    fn connect(&mut self) -> Result<(), DeviceError> {
        debug!("null device connected");
        Ok(())
    }

    fn send(&mut self, levels: &[u32], multiplier: f64) -> Result<(), DeviceError> {
        self.sends += 1;
        debug!("null send #{}: {levels:?} x{multiplier}", self.sends);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DeviceError> {
        debug!("null device cleared");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), DeviceError> {
        let _ = self.clear();
        Ok(())
    }
}
