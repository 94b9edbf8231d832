//! PWM bus device — chained 16-channel PWM breakout boards.
//!
//! Boards sit at consecutive addresses from a base; output channel `n` maps
//! to channel `n % 16` on board `n / 16`. Register frames are written to a
//! configured byte sink (a character device or FIFO bridged to the bus),
//! which also makes the frame layout testable against an in-memory buffer.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::scaling::ScalingPolicy;
use super::{Device, DeviceError};

/// Channels per board.
const CHANNELS_PER_BOARD: u32 = 16;
/// First PWM channel register; each channel occupies 4 registers.
const CHANNEL_REG_BASE: u8 = 0x06;
/// Prescale register controlling the PWM frequency.
const PRESCALE_REG: u8 = 0xFE;
/// Board oscillator, used to derive the prescale value.
const OSC_HZ: f64 = 25_000_000.0;
/// Full-on duty count (12-bit counters).
const MAX_COUNT: u16 = 4095;

/// PWM bus settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PwmConfig {
    /// Where register frames are written. Unset means the PWM device cannot
    /// connect.
    #[serde(default)]
    pub sink_path: Option<PathBuf>,
    /// Number of consecutively-addressed chained boards.
    #[serde(default = "PwmConfig::default_board_count")]
    pub board_count: u32,
    /// Address of the first board.
    #[serde(default = "PwmConfig::default_address_base")]
    pub address_base: u8,
    /// PWM frequency in Hz, programmed at connect time.
    #[serde(default = "PwmConfig::default_frequency")]
    pub frequency: f64,
}

impl PwmConfig {
    fn default_board_count() -> u32 {
        2
    }

    fn default_address_base() -> u8 {
        0x40
    }

    fn default_frequency() -> f64 {
        30.0
    }
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            sink_path: None,
            board_count: Self::default_board_count(),
            address_base: Self::default_address_base(),
            frequency: Self::default_frequency(),
        }
    }
}

/// Driver for the chained boards. Holds no link until `connect`.
pub struct PwmBusDevice {
    config: PwmConfig,
    scaling: ScalingPolicy,
    amplitude_steps: u32,
    sink: Option<Box<dyn Write + Send>>,
}

impl PwmBusDevice {
    pub fn new(config: PwmConfig, scaling: ScalingPolicy, amplitude_steps: u32) -> Self {
        Self {
            config,
            scaling,
            amplitude_steps,
            sink: None,
        }
    }

    /// Build an already-connected device over an arbitrary sink. Test and
    /// bench entry point; `connect` is a no-op afterwards.
    pub fn with_sink(
        config: PwmConfig,
        scaling: ScalingPolicy,
        amplitude_steps: u32,
        sink: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            config,
            scaling,
            amplitude_steps,
            sink: Some(sink),
        }
    }

    fn board_address(&self, board: u32) -> u8 {
        self.config.address_base.wrapping_add(board as u8)
    }

    /// Quantize one scaled duty value into a 12-bit count.
    fn count_for(&self, level: u32, multiplier: f64) -> u16 {
        let scaled = self.scaling.scale(level, multiplier, self.amplitude_steps);
        scaled.round().clamp(0.0, MAX_COUNT as f64) as u16
    }

    /// Write one channel frame: `[addr, reg, on_lo, on_hi, off_lo, off_hi]`
    /// with the on-time fixed at 0.
    fn write_channel(&mut self, channel: u32, count: u16) -> Result<(), DeviceError> {
        let board = channel / CHANNELS_PER_BOARD;
        if board >= self.config.board_count {
            return Err(DeviceError::new(format!(
                "channel {channel} exceeds {} configured board(s)",
                self.config.board_count
            )));
        }
        let addr = self.board_address(board);
        let reg = CHANNEL_REG_BASE + 4 * (channel % CHANNELS_PER_BOARD) as u8;
        let [off_lo, off_hi] = count.to_le_bytes();
        let frame = [addr, reg, 0, 0, off_lo, off_hi];
        self.sink_mut()?
            .write_all(&frame)
            .map_err(|err| DeviceError::io("pwm bus write failed", err))
    }

    fn sink_mut(&mut self) -> Result<&mut (dyn Write + Send), DeviceError> {
        self.sink
            .as_deref_mut()
            .map(|s| s as &mut (dyn Write + Send))
            .ok_or_else(|| DeviceError::new("pwm bus is not connected"))
    }

    fn prescale(&self) -> u8 {
        // Standard 12-bit PWM controller formula.
        (OSC_HZ / (4096.0 * self.config.frequency) - 1.0)
            .round()
            .clamp(3.0, 255.0) as u8
    }
}

impl Device for PwmBusDevice {
    fn connect(&mut self) -> Result<(), DeviceError> {
        if self.sink.is_none() {
            let path = self
                .config
                .sink_path
                .clone()
                .ok_or_else(|| DeviceError::new("pwm sink path is not configured"))?;
            let file = OpenOptions::new()
                .write(true)
                .open(&path)
                .map_err(|err| {
                    DeviceError::io(format!("cannot open pwm sink \"{}\"", path.display()), err)
                })?;
            self.sink = Some(Box::new(file));
        }

        // Program the output frequency on every board.
        let prescale = self.prescale();
        for board in 0..self.config.board_count {
            let frame = [self.board_address(board), PRESCALE_REG, prescale];
            self.sink_mut()?
                .write_all(&frame)
                .map_err(|err| DeviceError::io("pwm bus write failed", err))?;
        }
        info!(
            "pwm bus up: {} board(s) at 0x{:02x}, {} Hz",
            self.config.board_count, self.config.address_base, self.config.frequency
        );
        Ok(())
    }

    fn send(&mut self, levels: &[u32], multiplier: f64) -> Result<(), DeviceError> {
        for (channel, &level) in levels.iter().enumerate() {
            let count = self.count_for(level, multiplier);
            self.write_channel(channel as u32, count)?;
        }
        self.sink_mut()?
            .flush()
            .map_err(|err| DeviceError::io("pwm bus flush failed", err))
    }

    fn clear(&mut self) -> Result<(), DeviceError> {
        for channel in 0..self.config.board_count * CHANNELS_PER_BOARD {
            self.write_channel(channel, 0)?;
        }
        debug!("pwm bus cleared");
        self.sink_mut()?
            .flush()
            .map_err(|err| DeviceError::io("pwm bus flush failed", err))
    }

    fn disconnect(&mut self) -> Result<(), DeviceError> {
        if self.sink.is_some() {
            // Best-effort abort command; a dying link must not block teardown.
            let _ = self.clear();
        }
        self.sink = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Shared in-memory sink so tests can inspect what was written.
    #[derive(Clone, Default)]
    struct MemSink(Arc<Mutex<Vec<u8>>>);

    impl Write for MemSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn device(sink: MemSink) -> PwmBusDevice {
        PwmBusDevice::with_sink(
            PwmConfig::default(),
            ScalingPolicy::Linear { output_range: 4095.0 },
            10,
            Box::new(sink),
        )
    }

    #[test]
    fn send_writes_one_frame_per_channel() {
        let sink = MemSink::default();
        let mut dev = device(sink.clone());
        dev.send(&[0, 5, 9], 1.0).unwrap();

        let bytes = sink.0.lock().unwrap().clone();
        assert_eq!(bytes.len(), 3 * 6);
        // channel 0: board 0x40, register 0x06, off count 0
        assert_eq!(&bytes[0..6], &[0x40, 0x06, 0, 0, 0, 0]);
        // channel 1: register 0x0a, off count 4095/2 rounded
        let count = u16::from_le_bytes([bytes[10], bytes[11]]);
        assert_eq!(bytes[7], 0x0a);
        assert_eq!(count, 2048);
    }

    #[test]
    fn channel_past_first_board_addresses_the_next() {
        let sink = MemSink::default();
        let mut dev = device(sink.clone());
        let levels = vec![0u32; 17];
        dev.send(&levels, 1.0).unwrap();

        let bytes = sink.0.lock().unwrap().clone();
        let last_frame = &bytes[16 * 6..17 * 6];
        assert_eq!(last_frame[0], 0x41);
        assert_eq!(last_frame[1], 0x06);
    }

    #[test]
    fn channel_beyond_configured_boards_errors() {
        let mut dev = device(MemSink::default());
        let levels = vec![0u32; 33]; // 2 boards = 32 channels
        assert!(dev.send(&levels, 1.0).is_err());
    }

    #[test]
    fn clear_zeroes_every_channel_on_every_board() {
        let sink = MemSink::default();
        let mut dev = device(sink.clone());
        dev.clear().unwrap();

        let bytes = sink.0.lock().unwrap().clone();
        assert_eq!(bytes.len(), 32 * 6);
        for frame in bytes.chunks(6) {
            assert_eq!(&frame[2..6], &[0, 0, 0, 0]);
        }
    }

    #[test]
    fn counts_clamped_to_twelve_bits() {
        let sink = MemSink::default();
        let mut dev = PwmBusDevice::with_sink(
            PwmConfig::default(),
            ScalingPolicy::Linear { output_range: 4095.0 },
            10,
            Box::new(sink.clone()),
        );
        dev.send(&[9], 10.0).unwrap(); // would scale far past 4095

        let bytes = sink.0.lock().unwrap().clone();
        let count = u16::from_le_bytes([bytes[4], bytes[5]]);
        assert_eq!(count, 4095);
    }

    #[test]
    fn connect_without_path_fails_cleanly() {
        let mut dev = PwmBusDevice::new(
            PwmConfig::default(),
            ScalingPolicy::default(),
            10,
        );
        assert!(dev.connect().is_err());
    }

    #[test]
    fn prescale_for_thirty_hertz() {
        let dev = device(MemSink::default());
        // 25 MHz / (4096 * 30) - 1 ≈ 202.4
        assert_eq!(dev.prescale(), 202);
    }
}
