//! Cycle-accurate HyperBus memory-controller and streaming-DMA simulator.
//!
//! This crate models a controller for a strobe-qualified, variable-latency
//! DDR memory device (HyperRAM-class) together with the data path around it:
//! 1. **Controller:** Command encoding, DDR PHY shift layer, protocol state
//!    machine, and burst/stall supervision behind a pipelined-burst bus.
//! 2. **Device:** A behavioral memory model with read latency, strobe
//!    generation, and a sampling-eye model for calibration.
//! 3. **DMA:** Two streaming engines (stream to memory, memory to stream)
//!    with a CSR control plane and sticky completion.
//! 4. **CDC:** Gray-pointer asynchronous queues and the synchronizer
//!    primitives for levels, pulses, and stretched resets.
//! 5. **Simulation:** A deterministic multi-domain scheduler and the
//!    assembled reference system with host port and link calibration.

/// Pipelined-burst bus contract (requests, replies, cycle types, byte masks).
pub mod bus;
/// Clock-domain-crossing queues and synchronizer primitives.
pub mod cdc;
/// Common types (addresses, error enums).
pub mod common;
/// Simulator configuration (defaults, hierarchical config, validation).
pub mod config;
/// Behavioral HyperRAM device model.
pub mod device;
/// Streaming DMA engines (reader, writer, shared CSR core).
pub mod dma;
/// HyperBus protocol controller (wire, command, PHY, FSM, supervision).
pub mod hyperbus;
/// Multi-domain scheduler and system assembly.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;
/// Streaming endpoints and the valid/ready handshake seams.
pub mod stream;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The protocol controller serving the pipelined-burst bus.
pub use crate::hyperbus::HyperRamController;
/// The assembled reference system; construct with `System::new` or
/// `System::memtest`.
pub use crate::sim::System;
/// Aggregate counters for a system run.
pub use crate::stats::SimReport;
