//! Protocol state machine states and timing constants.
//!
//! The state enum carries the combinational wire mappings (which states
//! select the device, run the clock, or enable output drivers); the
//! transition logic itself lives in
//! [`HyperRamController::tick`](crate::hyperbus::HyperRamController::tick).

/// Cycles spent in [`State::Cmd`] shifting the command word out. The 48-bit
/// word needs three halves (one and a half cycles); the rest of the window is
/// driven padding, matching the device's fixed command-capture period.
pub const COMMAND_WINDOW_CYCLES: u32 = 4;

/// Cycles at the start of the strobe wait during which qualifying patterns
/// are ignored. The device parks the strobe high through the command phase
/// (latency indication), and that level is still draining through the PHY
/// alignment register when the wait begins.
pub const STROBE_NOISE_SKIP_CYCLES: u32 = 3;

/// Protocol controller states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// No transaction; chip-select and clock deasserted, counters reset.
    Idle,
    /// Shifting the command word; fixed [`COMMAND_WINDOW_CYCLES`] duration.
    Cmd,
    /// Read path: waiting for the first qualifying strobe after the command
    /// window.
    RwdsWait,
    /// Read path: first qualifying strobe seen; waiting for the first word
    /// boundary.
    ReadStart,
    /// Read path: delivering one word to the requester this cycle.
    ReadAck,
    /// Read path: between words; waiting for re-qualification or the end of
    /// the burst.
    ReadBurst,
    /// Write path: counting down the fixed latency window before data may be
    /// driven.
    LatencyWrite,
    /// Write path: accepting one word from the requester this cycle.
    WritePrep,
    /// Write path: the queued beat is on the wire; deciding continuation.
    WriteBurst,
    /// Write path: final beat launched; one cycle of driver hold.
    WriteFinish,
    /// A stall bound expired; forcing an acknowledgment to unblock the
    /// requester.
    Timeout,
    /// Deasserting chip-select, clock, and drivers before returning to idle.
    Cleanup,
}

impl State {
    /// True while the device is selected (chip-select asserted).
    pub const fn selects_device(self) -> bool {
        !matches!(self, Self::Idle | Self::Cleanup)
    }

    /// True while the differential output clock runs. Follows chip-select:
    /// the device counts latency on clock edges even while the bus is quiet.
    pub const fn clocks_device(self) -> bool {
        self.selects_device()
    }

    /// True while the controller drives the DQ lanes.
    pub const fn drives_dq(self) -> bool {
        matches!(
            self,
            Self::Cmd | Self::WritePrep | Self::WriteBurst | Self::WriteFinish
        )
    }

    /// True while the controller drives the strobe line (write byte masks).
    pub const fn drives_strobe(self) -> bool {
        matches!(self, Self::WritePrep | Self::WriteBurst | Self::WriteFinish)
    }

    /// True for states whose only exit is a device response; these are the
    /// states the stall bound guards.
    pub const fn waits_on_strobe(self) -> bool {
        matches!(self, Self::RwdsWait | Self::ReadStart | Self::ReadBurst)
    }
}

/// Cycles elapsed since the current phase began. Reset on every phase
/// transition; replaces free-running counters with bit-mask tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseTimer {
    elapsed: u32,
}

impl PhaseTimer {
    /// Timer at zero, as on phase entry.
    pub const fn new() -> Self {
        Self { elapsed: 0 }
    }

    /// Cycles spent in the current phase before this one.
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Counts one more cycle in the current phase.
    pub fn advance(&mut self) {
        self.elapsed = self.elapsed.saturating_add(1);
    }

    /// Restarts the count on a phase transition.
    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}
