//! Multi-domain scheduling and system assembly.
//!
//! Provides the deterministic clock-edge scheduler for the three simulated
//! domains and the [`System`] type that wires the controller, device model,
//! DMA engines, CDC queues, and stream endpoints into the reference topology.

/// Deterministic multi-domain edge scheduling.
pub mod clock;
/// The assembled reference system (grant, host port, calibration, frames).
pub mod system;

pub use clock::{ClockPlan, Domain};
pub use system::{SinkEndpoint, SourceEndpoint, System};
