//! HyperBus protocol controller.
//!
//! This module implements the cycle-accurate controller for the
//! strobe-qualified, variable-latency DDR memory device. It provides:
//! 1. **Wire bundles:** Per-cycle signal structs for the narrow multiplexed link.
//! 2. **Command encoding:** The immutable 48-bit command/address word.
//! 3. **PHY shift layer:** 32-bit word to 8-lane DDR conversion with input delay taps.
//! 4. **State machine:** Command issuance, latency waits, strobe-qualified read
//!    capture, and write-burst sequencing.
//! 5. **Supervision:** The per-window burst ceiling and the hard stall bound.
//! 6. **Controller:** The assembled core serving the pipelined-burst bus contract.

/// 48-bit command/address word encoding.
pub mod command;
/// The assembled controller serving bus requesters.
pub mod controller;
/// Protocol states, wire mappings, and phase timing.
pub mod fsm;
/// DDR shift layer and input delay taps.
pub mod phy;
/// Burst-length and stall-timeout supervision.
pub mod supervisor;
/// Wire-level signal bundles.
pub mod wire;

pub use command::CommandWord;
pub use controller::HyperRamController;
pub use fsm::State;
pub use phy::{DelayDirection, HyperBusPhy};
pub use supervisor::BurstSupervisor;
pub use wire::{DqOut, LinkInput, LinkOutput, StrobeSample};
