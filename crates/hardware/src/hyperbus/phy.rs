//! DDR PHY shift layer.
//!
//! Converts between the controller's 32-bit word view and the 8-lane DDR
//! wire format, two 16-bit halves per system cycle. It provides:
//! 1. **Transmit:** A shift register queuing either a 48-bit command word
//!    (three halves over two cycles) or one data beat (word + byte mask,
//!    launched the cycle after loading).
//! 2. **Receive:** A one-cycle alignment register so both half-cycle samples
//!    of data and strobe present to the state machine on the same
//!    system-cycle boundary.
//! 3. **Delay taps:** A per-lane-group input delay, stepped during bring-up
//!    calibration to center the sample point inside the device's valid eye;
//!    untouched in steady-state operation.
//!
//! No side effects beyond internal register state.

use crate::bus::ByteMask;
use crate::hyperbus::command::CommandWord;
use crate::hyperbus::wire::{DqOut, LinkInput, StrobeSample};

/// Highest input delay tap the input path supports.
pub const DELAY_TAP_MAX: u8 = 7;

/// Direction for one delay-tap adjustment step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelayDirection {
    /// Move the sample point later.
    Increment,
    /// Move the sample point earlier.
    Decrement,
}

/// Transmit shift-register contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TxState {
    Empty,
    Command { halves: [u16; 3], sent: u8 },
    Data { word: u32, mask: ByteMask },
}

/// The DDR shift layer: transmit register, receive alignment register, and
/// the input delay tap.
#[derive(Debug)]
pub struct HyperBusPhy {
    tx: TxState,
    rx_first: u16,
    rx_second: u16,
    rwds_first: bool,
    rwds_second: bool,
    tap: u8,
}

impl HyperBusPhy {
    /// A quiet link: empty shift registers, delay tap at zero.
    pub fn new() -> Self {
        Self {
            tx: TxState::Empty,
            rx_first: 0,
            rx_second: 0,
            rwds_first: false,
            rwds_second: false,
            tap: 0,
        }
    }

    /// Queues a command word; its three halves launch over the next two
    /// cycles while the output drivers stay enabled.
    pub fn load_command(&mut self, command: CommandWord) {
        self.tx = TxState::Command {
            halves: command.halves(),
            sent: 0,
        };
    }

    /// Queues one data beat for transmission over the next cycle's two
    /// half-cycles.
    pub fn load_data(&mut self, word: u32, mask: ByteMask) {
        self.tx = TxState::Data { word, mask };
    }

    /// Launches this cycle's wire activity from the transmit register.
    ///
    /// With drivers disabled the register is held, not drained; queued beats
    /// survive an output-enable gap.
    pub fn launch(&mut self, drivers_enabled: bool) -> DqOut {
        if !drivers_enabled {
            return DqOut::HighZ;
        }
        match self.tx {
            TxState::Empty => DqOut::Pad,
            TxState::Command { halves, sent } => {
                if sent == 0 {
                    self.tx = TxState::Command { halves, sent: 2 };
                    DqOut::Command {
                        first: halves[0],
                        second: halves[1],
                    }
                } else {
                    self.tx = TxState::Empty;
                    DqOut::Command {
                        first: halves[2],
                        second: 0,
                    }
                }
            }
            TxState::Data { word, mask } => {
                self.tx = TxState::Empty;
                DqOut::Data { word, mask }
            }
        }
    }

    /// Registers this cycle's raw input samples; they become visible through
    /// [`Self::sample_word`]/[`Self::strobe`] on the next cycle's evaluation.
    pub fn capture(&mut self, input: &LinkInput) {
        self.rx_first = input.dq_first;
        self.rx_second = input.dq_second;
        self.rwds_first = input.rwds_first;
        self.rwds_second = input.rwds_second;
    }

    /// The aligned 32-bit word reconstructed from the captured half-cycles.
    pub const fn sample_word(&self) -> u32 {
        ((self.rx_first as u32) << 16) | self.rx_second as u32
    }

    /// The aligned strobe sample for the captured cycle.
    pub const fn strobe(&self) -> StrobeSample {
        StrobeSample {
            first: self.rwds_first,
            second: self.rwds_second,
        }
    }

    /// Steps the input delay tap one position, saturating at the range ends.
    pub fn adjust_delay(&mut self, direction: DelayDirection) {
        self.tap = match direction {
            DelayDirection::Increment => self.tap.saturating_add(1).min(DELAY_TAP_MAX),
            DelayDirection::Decrement => self.tap.saturating_sub(1),
        };
    }

    /// Returns the tap to its load value (position zero).
    pub fn reset_delay(&mut self) {
        self.tap = 0;
    }

    /// Current input delay tap.
    pub const fn delay_tap(&self) -> u8 {
        self.tap
    }
}

impl Default for HyperBusPhy {
    fn default() -> Self {
        Self::new()
    }
}
