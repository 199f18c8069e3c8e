//! Wire-level signal bundles between the controller's PHY and the device.
//!
//! One value of [`LinkOutput`]/[`LinkInput`] describes one system cycle of
//! activity on the narrow multiplexed bus: two DDR half-cycles on the 8-lane
//! data bus plus the strobe line, the gated differential clock, chip-select,
//! and the device reset line.

use crate::bus::ByteMask;

/// The two half-cycle samples of the device's data strobe within one system
/// cycle, as registered by the PHY input path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrobeSample {
    /// Strobe level during the first half-cycle.
    pub first: bool,
    /// Strobe level during the second half-cycle.
    pub second: bool,
}

impl StrobeSample {
    /// The qualifying pattern: strobe low in the first half-cycle, high in
    /// the second. The device marks each word boundary with this rising
    /// shape; anything else is a hold cycle, idle bus, or command-phase
    /// noise.
    pub const fn is_word_boundary(&self) -> bool {
        !self.first && self.second
    }
}

/// Activity launched on the DQ lanes by the controller for one system cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DqOut {
    /// Output drivers released (device owns the bus or link idle).
    HighZ,
    /// Two command/address halves of the 48-bit command word.
    Command {
        /// Half driven across the first half-cycle.
        first: u16,
        /// Half driven across the second half-cycle.
        second: u16,
    },
    /// One 32-bit write beat with its byte-lane mask on the strobe line.
    Data {
        /// The full word spanning both half-cycles.
        word: u32,
        /// Lanes actually written; the strobe line masks the rest.
        mask: ByteMask,
    },
    /// Drivers enabled with an empty shift register (command-window padding).
    Pad,
}

/// Controller-to-device wire state for one system cycle.
#[derive(Clone, Copy, Debug)]
pub struct LinkOutput {
    /// Chip select (model polarity: true = device selected).
    pub cs: bool,
    /// Differential clock pair running this cycle.
    pub clock_enabled: bool,
    /// Device reset line (active high); held asserted from power-on and
    /// released once by the controller.
    pub reset: bool,
    /// DQ lane activity.
    pub dq: DqOut,
}

impl LinkOutput {
    /// Link with the device deselected and drivers released.
    pub const fn inactive() -> Self {
        Self {
            cs: false,
            clock_enabled: false,
            reset: false,
            dq: DqOut::HighZ,
        }
    }
}

/// Device-to-controller wire state for one system cycle: raw half-cycle
/// levels, meaningful only where the protocol phase says the device drives.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkInput {
    /// DQ lanes during the first half-cycle.
    pub dq_first: u16,
    /// DQ lanes during the second half-cycle.
    pub dq_second: u16,
    /// Strobe level during the first half-cycle.
    pub rwds_first: bool,
    /// Strobe level during the second half-cycle.
    pub rwds_second: bool,
}

impl LinkInput {
    /// An undriven link (all lines at rest).
    pub const fn idle() -> Self {
        Self {
            dq_first: 0,
            dq_second: 0,
            rwds_first: false,
            rwds_second: false,
        }
    }

    /// A data word split across the two half-cycles with the given strobe
    /// shape.
    pub const fn word(word: u32, rwds_first: bool, rwds_second: bool) -> Self {
        Self {
            dq_first: (word >> 16) as u16,
            dq_second: word as u16,
            rwds_first,
            rwds_second,
        }
    }
}
