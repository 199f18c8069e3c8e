//! Simulator configuration.
//!
//! This module defines the hierarchical configuration consumed by
//! [`System`](crate::sim::System) and the individual components. It provides:
//! 1. **Protocol timings:** Write latency, stall bound, and the per-window burst ceiling.
//! 2. **Device model:** Backing-store size, read latency, and the valid sampling window.
//! 3. **Engine start modes:** Internal (enable-write starts at once) or external
//!    (synchronized `start` trigger).
//! 4. **CDC queues:** Depth, synchronizer stages, and the reset-hold discipline.
//! 5. **Clock plan:** Per-domain periods for the deterministic scheduler.
//!
//! Every field has a documented default, so an empty JSON object deserializes
//! to a working configuration. [`Config::validate`] enforces the cross-field
//! bounds that the cycle-level components assume and never re-check.

use serde::Deserialize;
use std::path::Path;

use crate::common::error::ConfigError;
use crate::hyperbus::fsm::{COMMAND_WINDOW_CYCLES, STROBE_NOISE_SKIP_CYCLES};
use crate::hyperbus::phy::DELAY_TAP_MAX;

/// Default configuration constants for the simulator.
mod defaults {
    /// Write latency in cycles between the command window and the first data
    /// beat. Matches the device's fixed-2x latency register setting.
    pub const WRITE_LATENCY: u32 = 11;

    /// Stall bound in cycles on any wait for a device strobe response.
    pub const STROBE_TIMEOUT: u32 = 128;

    /// Hard ceiling on words per chip-select window.
    ///
    /// Keeps chip-select low time inside the device's distributed-refresh
    /// budget (4 us class parts at the default clock).
    pub const BURST_CEILING: u32 = 512;

    /// Device capacity in 32-bit words (2 Mi words = 8 MiB part).
    pub const DEVICE_SIZE_WORDS: u32 = 1 << 21;

    /// Device-side read latency in cycles from command capture to the first
    /// data strobe.
    pub const READ_LATENCY: u32 = 11;

    /// Lowest input delay tap at which device data samples cleanly.
    pub const EYE_LO: u8 = 2;

    /// Highest input delay tap at which device data samples cleanly.
    pub const EYE_HI: u8 = 5;

    /// CDC queue capacity in entries.
    pub const FIFO_DEPTH: u32 = 512;

    /// Stages in each pointer/level synchronizer chain.
    pub const SYNC_STAGES: u32 = 2;

    /// Cycles a CDC-side reset is held by the reset stretcher.
    pub const RESET_HOLD: u32 = 4;

    /// System/controller domain clock period in picoseconds (82.5 MHz).
    pub const SYS_PERIOD_PS: u64 = 12_121;

    /// Stream-source domain clock period in picoseconds (74.25 MHz).
    pub const SOURCE_PERIOD_PS: u64 = 13_468;

    /// Stream-sink domain clock period in picoseconds (82.5 MHz).
    pub const SINK_PERIOD_PS: u64 = 12_121;
}

/// How a DMA engine's transfer is started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum StartMode {
    /// An `enable` register write latches the engine and starts it at once.
    #[default]
    #[serde(alias = "internal")]
    Internal,
    /// An `enable` write only latches the engine; the transfer starts on the
    /// synchronized external `start` pulse (frame-locked operation).
    #[serde(alias = "external")]
    External,
}

/// Protocol controller timings.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ProtocolConfig {
    /// Cycles between the end of the command window and the first write data
    /// beat (default 11).
    #[serde(default = "ProtocolConfig::default_write_latency")]
    pub write_latency: u32,
    /// Cycles any strobe wait may last before a forced acknowledgment
    /// (default 128).
    #[serde(default = "ProtocolConfig::default_strobe_timeout")]
    pub strobe_timeout: u32,
    /// Words allowed in one chip-select window (default and maximum 512).
    #[serde(default = "ProtocolConfig::default_burst_ceiling")]
    pub burst_ceiling: u32,
}

impl ProtocolConfig {
    fn default_write_latency() -> u32 {
        defaults::WRITE_LATENCY
    }

    fn default_strobe_timeout() -> u32 {
        defaults::STROBE_TIMEOUT
    }

    fn default_burst_ceiling() -> u32 {
        defaults::BURST_CEILING
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            write_latency: defaults::WRITE_LATENCY,
            strobe_timeout: defaults::STROBE_TIMEOUT,
            burst_ceiling: defaults::BURST_CEILING,
        }
    }
}

/// Behavioral memory-device model parameters.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct DeviceConfig {
    /// Backing-store capacity in 32-bit words; must be a power of two
    /// (default 2 Mi words).
    #[serde(default = "DeviceConfig::default_size_words")]
    pub size_words: u32,
    /// Cycles from command capture to the first data strobe on reads
    /// (default 11).
    #[serde(default = "DeviceConfig::default_read_latency")]
    pub read_latency: u32,
    /// Lowest controller delay tap inside the valid sampling eye (default 2).
    /// An `eye_lo` above `eye_hi` closes the eye entirely: every tap corrupts,
    /// which is the fault-injection setup for calibration-failure tests.
    #[serde(default = "DeviceConfig::default_eye_lo")]
    pub eye_lo: u8,
    /// Highest controller delay tap inside the valid sampling eye (default 5).
    #[serde(default = "DeviceConfig::default_eye_hi")]
    pub eye_hi: u8,
}

impl DeviceConfig {
    fn default_size_words() -> u32 {
        defaults::DEVICE_SIZE_WORDS
    }

    fn default_read_latency() -> u32 {
        defaults::READ_LATENCY
    }

    fn default_eye_lo() -> u8 {
        defaults::EYE_LO
    }

    fn default_eye_hi() -> u8 {
        defaults::EYE_HI
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            size_words: defaults::DEVICE_SIZE_WORDS,
            read_latency: defaults::READ_LATENCY,
            eye_lo: defaults::EYE_LO,
            eye_hi: defaults::EYE_HI,
        }
    }
}

/// Per-engine configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct EngineConfig {
    /// Start mode (default [`StartMode::Internal`]).
    #[serde(default)]
    pub start_mode: StartMode,
}

/// CDC queue configuration.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct FifoConfig {
    /// Capacity in entries; power of two >= 2 (default 512).
    #[serde(default = "FifoConfig::default_depth")]
    pub depth: u32,
    /// Stages per synchronizer chain; >= 2 (default 2).
    #[serde(default = "FifoConfig::default_sync_stages")]
    pub sync_stages: u32,
    /// Cycles the reset stretcher holds a side reset, counted in the system
    /// domain; the resulting window must span the slowest observing domain's
    /// synchronizer settling latency (default 4).
    #[serde(default = "FifoConfig::default_reset_hold")]
    pub reset_hold: u32,
}

impl FifoConfig {
    fn default_depth() -> u32 {
        defaults::FIFO_DEPTH
    }

    fn default_sync_stages() -> u32 {
        defaults::SYNC_STAGES
    }

    fn default_reset_hold() -> u32 {
        defaults::RESET_HOLD
    }

    /// Minimum reset hold for the configured synchronizer depth: the far
    /// side's chain must fully drain while the pointer is pinned at zero.
    pub fn min_reset_hold(&self) -> u32 {
        self.sync_stages + 1
    }
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self {
            depth: defaults::FIFO_DEPTH,
            sync_stages: defaults::SYNC_STAGES,
            reset_hold: defaults::RESET_HOLD,
        }
    }
}

/// Clock periods for the three simulated domains.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ClockConfig {
    /// System/controller domain period in picoseconds.
    #[serde(default = "ClockConfig::default_sys_period_ps")]
    pub sys_period_ps: u64,
    /// Stream-source domain period in picoseconds.
    #[serde(default = "ClockConfig::default_source_period_ps")]
    pub source_period_ps: u64,
    /// Stream-sink domain clock period in picoseconds.
    #[serde(default = "ClockConfig::default_sink_period_ps")]
    pub sink_period_ps: u64,
}

impl ClockConfig {
    fn default_sys_period_ps() -> u64 {
        defaults::SYS_PERIOD_PS
    }

    fn default_source_period_ps() -> u64 {
        defaults::SOURCE_PERIOD_PS
    }

    fn default_sink_period_ps() -> u64 {
        defaults::SINK_PERIOD_PS
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            sys_period_ps: defaults::SYS_PERIOD_PS,
            source_period_ps: defaults::SOURCE_PERIOD_PS,
            sink_period_ps: defaults::SINK_PERIOD_PS,
        }
    }
}

/// Root configuration for the simulator.
///
/// # Examples
///
/// ```
/// use hypersim_core::config::Config;
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.protocol.write_latency, 11);
/// ```
///
/// Partial JSON overrides merge onto the defaults:
///
/// ```
/// use hypersim_core::config::Config;
///
/// let config = Config::from_json_str(r#"{"protocol": {"strobe_timeout": 32}}"#)
///     .unwrap();
/// assert_eq!(config.protocol.strobe_timeout, 32);
/// assert_eq!(config.protocol.burst_ceiling, 512);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Config {
    /// Protocol controller timings.
    #[serde(default)]
    pub protocol: ProtocolConfig,
    /// Behavioral device model parameters.
    #[serde(default)]
    pub device: DeviceConfig,
    /// Reader engine (stream to memory) configuration.
    #[serde(default)]
    pub reader: EngineConfig,
    /// Writer engine (memory to stream) configuration.
    #[serde(default)]
    pub writer: EngineConfig,
    /// CDC queue configuration (both directions).
    #[serde(default)]
    pub fifo: FifoConfig,
    /// Per-domain clock periods.
    #[serde(default)]
    pub clocks: ClockConfig,
}

impl Config {
    /// Parses a configuration from a JSON string, merging absent fields from
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the string is not valid JSON for
    /// this schema. The result is not yet validated; call
    /// [`Config::validate`] before constructing a system.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents do not match the schema.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Minimum device read latency for the configured protocol timings: the
    /// first qualifying strobe must land after the command window, the noise
    /// skip, and the PHY alignment registers.
    pub fn min_read_latency() -> u32 {
        COMMAND_WINDOW_CYCLES + STROBE_NOISE_SKIP_CYCLES + 2
    }

    /// Checks cross-field invariants the cycle-level components assume.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fifo.depth < 2 || !self.fifo.depth.is_power_of_two() {
            return Err(ConfigError::FifoDepth {
                depth: self.fifo.depth,
            });
        }
        if self.fifo.sync_stages < 2 {
            return Err(ConfigError::SyncStages {
                stages: self.fifo.sync_stages,
            });
        }
        if self.fifo.reset_hold < self.fifo.min_reset_hold() {
            return Err(ConfigError::ResetHold {
                hold: self.fifo.reset_hold,
                min: self.fifo.min_reset_hold(),
            });
        }
        // The stretcher counts the hold in system cycles, but the queue's far
        // side observes it through a synchronizer clocked in a stream domain;
        // the window must span the slowest observer's settling time in
        // wall-clock terms, not just cycle counts.
        let window_ps = u64::from(self.fifo.reset_hold) * self.clocks.sys_period_ps;
        let slowest_ps = self
            .clocks
            .source_period_ps
            .max(self.clocks.sink_period_ps);
        let min_ps = u64::from(self.fifo.min_reset_hold()) * slowest_ps;
        if window_ps < min_ps {
            return Err(ConfigError::ResetWindow {
                hold: self.fifo.reset_hold,
                window_ps,
                min_ps,
            });
        }
        if self.protocol.write_latency == 0 {
            return Err(ConfigError::WriteLatency {
                cycles: self.protocol.write_latency,
            });
        }
        if self.protocol.strobe_timeout == 0 {
            return Err(ConfigError::StrobeTimeout {
                cycles: self.protocol.strobe_timeout,
            });
        }
        if self.protocol.burst_ceiling == 0 || self.protocol.burst_ceiling > defaults::BURST_CEILING
        {
            return Err(ConfigError::BurstCeiling {
                words: self.protocol.burst_ceiling,
                max: defaults::BURST_CEILING,
            });
        }
        if self.device.read_latency < Self::min_read_latency() {
            return Err(ConfigError::ReadLatency {
                cycles: self.device.read_latency,
                min: Self::min_read_latency(),
            });
        }
        if self.device.size_words == 0 || !self.device.size_words.is_power_of_two() {
            return Err(ConfigError::DeviceSize {
                words: self.device.size_words,
            });
        }
        // A closed eye (lo > hi) is legal fault injection; only taps past the
        // PHY range are rejected.
        if self.device.eye_hi > DELAY_TAP_MAX {
            return Err(ConfigError::EyeWindow {
                lo: self.device.eye_lo,
                hi: self.device.eye_hi,
                taps: DELAY_TAP_MAX,
            });
        }
        Ok(())
    }
}
