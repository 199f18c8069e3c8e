//! Error definitions for the fallible host-level surface.
//!
//! The per-cycle execution model has no exceptions: every protocol condition
//! (timeout, overflow, underflow, burst truncation) is a sampled boolean
//! handled in the cycle it is observed, and surfaces only through statistics
//! counters. The error types here cover the operations a host performs
//! *around* that model: loading and validating a configuration, bring-up
//! calibration, and bounded single-beat access through the host port.

use thiserror::Error;

/// Errors raised while loading or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for the expected schema.
    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),

    /// CDC queue capacity must be a power of two and at least 2 so the
    /// Gray-coded pointers wrap cleanly.
    #[error("fifo depth {depth} is not a power of two >= 2")]
    FifoDepth {
        /// Configured depth in entries.
        depth: u32,
    },

    /// Synchronizer chains need at least two stages to settle metastability.
    #[error("synchronizer stage count {stages} is below the minimum of 2")]
    SyncStages {
        /// Configured number of stages.
        stages: u32,
    },

    /// A CDC-side reset must be held longer than the opposite side's
    /// synchronizer settling latency, or entries may be dropped or duplicated.
    #[error("reset hold of {hold} cycles does not cover synchronizer settling ({min} cycles minimum)")]
    ResetHold {
        /// Configured hold duration in cycles.
        hold: u32,
        /// Minimum acceptable hold for the configured synchronizer depth.
        min: u32,
    },

    /// The stretched reset is counted in system cycles but observed through
    /// synchronizers clocked in the stream domains; the window must span the
    /// slowest observer's settling time in wall-clock terms.
    #[error(
        "reset hold of {hold} system cycles ({window_ps} ps) does not cover \
         {min_ps} ps of synchronizer settling in the slowest stream domain"
    )]
    ResetWindow {
        /// Configured hold duration in system cycles.
        hold: u32,
        /// Wall-clock span of the configured hold.
        window_ps: u64,
        /// Minimum acceptable span for the slowest observing domain.
        min_ps: u64,
    },

    /// The write latency window must be at least one cycle.
    #[error("write latency of {cycles} cycles is below the minimum of 1")]
    WriteLatency {
        /// Configured write latency.
        cycles: u32,
    },

    /// The device read latency must clear the command window plus the strobe
    /// noise-skip margin, or the first qualifying strobe lands inside the
    /// ignored region and the transfer times out.
    #[error("device read latency {cycles} is below the minimum of {min} cycles")]
    ReadLatency {
        /// Configured read latency.
        cycles: u32,
        /// Minimum acceptable latency for the configured protocol timings.
        min: u32,
    },

    /// The per-window burst ceiling must stay within the device's refresh
    /// budget.
    #[error("burst ceiling {words} outside the supported range 1..={max}")]
    BurstCeiling {
        /// Configured ceiling in words.
        words: u32,
        /// Hard upper bound.
        max: u32,
    },

    /// The stall bound must be at least one cycle.
    #[error("strobe timeout of {cycles} cycles is below the minimum of 1")]
    StrobeTimeout {
        /// Configured stall bound.
        cycles: u32,
    },

    /// The device's valid sampling window must fit inside the PHY tap range.
    /// A deliberately closed window (`lo > hi`) is allowed; taps past the
    /// range are not.
    #[error("sampling eye {lo}..={hi} does not fit the delay tap range 0..={taps}")]
    EyeWindow {
        /// Lowest working tap.
        lo: u8,
        /// Highest working tap.
        hi: u8,
        /// Maximum tap the PHY supports.
        taps: u8,
    },

    /// The device backing store must hold at least one word.
    #[error("device size of {words} words is not a power of two >= 1")]
    DeviceSize {
        /// Configured capacity in words.
        words: u32,
    },
}

/// Errors raised by the bring-up delay-tap calibration sweep.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// No input delay tap produced a correct round-trip; the link is
    /// unusable at the configured timings.
    #[error("no working delay tap found after sweeping {taps_tried} taps")]
    NoWorkingTap {
        /// Number of tap positions swept.
        taps_tried: u8,
    },

    /// A host-port access used by the sweep failed outright.
    #[error("calibration access failed")]
    Port(#[from] HostPortError),
}

/// Errors raised by single-beat host-port transactions.
#[derive(Debug, Error)]
pub enum HostPortError {
    /// The controller never acknowledged within the stall bound plus margin.
    /// The forced-timeout path makes this unreachable for a healthy
    /// controller; hitting it indicates a wiring fault in the assembly.
    #[error("bus did not acknowledge within {cycles} cycles")]
    NoAcknowledge {
        /// Cycles waited before giving up.
        cycles: u32,
    },

    /// A DMA engine currently owns the bus; host access requires the grant.
    #[error("host port denied: a DMA engine holds the bus grant")]
    Busy,
}
