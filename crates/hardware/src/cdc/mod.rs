//! Clock-domain-crossing primitives.
//!
//! Everything that moves between independently clocked domains goes through
//! this module; there are no other cross-domain paths in the design. It
//! provides:
//! 1. **Bit synchronizer:** A multi-stage register chain for single-bit
//!    levels.
//! 2. **Pulse synchronizer:** Toggle-based transfer of a single-cycle pulse
//!    into another domain.
//! 3. **Edge detector:** Rise/fall detection on a synchronized level.
//! 4. **Reset stretcher:** Converts a one-cycle trigger into a reset held long
//!    enough for the far side's synchronizer to observe it.
//! 5. **Asynchronous queue:** A Gray-pointer FIFO with independent write/read
//!    clocking and per-side resets.
//! 6. **Timeline:** Delayed one-shot actions after a trigger, for frame
//!    sequencing.

/// Gray-pointer asynchronous FIFO.
pub mod async_fifo;
/// Bit/pulse synchronizers, edge detection, reset stretching.
pub mod sync;
/// Delayed one-shot action scheduling.
pub mod timeline;

pub use async_fifo::AsyncFifo;
pub use sync::{BitSync, EdgeDetect, EdgeMode, PulseSync, ResetStretcher};
pub use timeline::Timeline;
