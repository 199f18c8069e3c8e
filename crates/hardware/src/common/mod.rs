//! Common utilities and types used throughout the HyperBus simulator.
//!
//! This module provides fundamental building blocks that are shared across all
//! components of the simulator. It includes:
//! 1. **Address Types:** Strong types separating CSR byte addresses from bus word addresses.
//! 2. **Error Handling:** Error enums for the fallible host-level surface (configuration,
//!    calibration, host-port access). Per-cycle component ticks are infallible.

/// Address type definitions (byte and word addresses).
pub mod addr;

/// Error types for configuration, calibration, and host-port access.
pub mod error;

pub use addr::{ByteAddr, WordAddr};
pub use error::{CalibrationError, ConfigError, HostPortError};
