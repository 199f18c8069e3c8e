//! 48-bit command/address word encoding.
//!
//! The command word is built once per transaction and shifted out over the
//! command window. Layout (bit 47 down to bit 0):
//!
//! ```text
//! 47      read (1) / write (0)
//! 46      address space (always 0: memory)
//! 45      burst type (always 1: linear)
//! 44..35  reserved, 0
//! 34..16  row and upper column (word address bits 20..2)
//! 15..3   reserved, 0
//! 2..1    lower column (word address bits 1..0)
//! 0       always 0
//! ```

use crate::common::addr::WordAddr;

const READ_BIT: u64 = 1 << 47;
const LINEAR_BURST_BIT: u64 = 1 << 45;
const ROW_SHIFT: u32 = 16;
const ROW_WIDTH: u32 = 19;
const LOW_COLUMN_SHIFT: u32 = 1;
const LOW_COLUMN_WIDTH: u32 = 2;

/// An immutable 48-bit command word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandWord(u64);

impl CommandWord {
    /// Encodes a command for one transaction. Pure; no state, no errors.
    pub fn encode(address: WordAddr, write: bool) -> Self {
        let addr = u64::from(address.val());
        let low = (addr & ((1 << LOW_COLUMN_WIDTH) - 1)) << LOW_COLUMN_SHIFT;
        let row = ((addr >> LOW_COLUMN_WIDTH) & ((1 << ROW_WIDTH) - 1)) << ROW_SHIFT;
        let dir = if write { 0 } else { READ_BIT };
        Self(dir | LINEAR_BURST_BIT | row | low)
    }

    /// Raw 48-bit value (upper 16 bits of the `u64` are zero).
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// True when the command requests a read.
    pub const fn is_read(self) -> bool {
        self.0 & READ_BIT != 0
    }

    /// True when the burst-type bit selects linear addressing.
    pub const fn is_linear_burst(self) -> bool {
        self.0 & LINEAR_BURST_BIT != 0
    }

    /// Recovers the word address carried in the row/column fields.
    pub const fn word_addr(self) -> WordAddr {
        let row = (self.0 >> ROW_SHIFT) & ((1 << ROW_WIDTH) - 1);
        let low = (self.0 >> LOW_COLUMN_SHIFT) & ((1 << LOW_COLUMN_WIDTH) - 1);
        WordAddr(((row << LOW_COLUMN_WIDTH) | low) as u32)
    }

    /// The three 16-bit halves in transmission order (high first).
    pub const fn halves(self) -> [u16; 3] {
        [
            (self.0 >> 32) as u16,
            (self.0 >> 16) as u16,
            self.0 as u16,
        ]
    }

    /// Reassembles a command word from its three transmitted halves.
    pub const fn from_halves(halves: [u16; 3]) -> Self {
        Self(((halves[0] as u64) << 32) | ((halves[1] as u64) << 16) | halves[2] as u64)
    }
}
