//! Pipelined-burst bus contract.
//!
//! This module defines the generic upstream bus seen by requesters (DMA
//! engines, the host port) and served by the
//! [`HyperRamController`](crate::hyperbus::HyperRamController). It provides:
//! 1. **Cycle types:** `CLASSIC`, `LINEAR_BURST`, `END_OF_BURST` and their wire encodings.
//! 2. **Requests:** The per-cycle signal bundle a requester drives (cycle, strobe,
//!    write-enable, byte select, word address, write data, burst-continue hint).
//! 3. **Replies:** The per-cycle acknowledge/read-data bundle plus the remaining-window
//!    hint reported back to the requester.
//! 4. **Byte masks:** Select-polarity lane masks shared with the wire layer.
//!
//! The contract is deliberately bus-agnostic: a request exists for exactly one
//! cycle and is discarded after acknowledgment. Requesters block by holding
//! `cycle`/`strobe` asserted until the acknowledge arrives.

use crate::common::addr::WordAddr;

/// Burst phase indication exchanged between requester and controller.
///
/// Requesters place it in [`BusRequest::cycle_type`] to announce whether the
/// current beat continues a linear burst; the controller mirrors remaining
/// window capacity back in [`BusReply::window`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CycleType {
    /// Single-beat transaction, no burst intent.
    #[default]
    Classic,
    /// The requester intends at least one more beat at the next address.
    LinearBurst,
    /// The current beat is the last of the burst.
    EndOfBurst,
}

impl CycleType {
    /// Three-bit wire encoding used by pipelined-burst interconnects.
    pub const fn encoding(self) -> u8 {
        match self {
            Self::Classic => 0b000,
            Self::LinearBurst => 0b010,
            Self::EndOfBurst => 0b111,
        }
    }
}

/// Byte-lane mask in select polarity: bit `i` set means byte lane `i` is
/// written. The physical strobe line carries the inverted form during write
/// beats; the model keeps select polarity end to end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteMask(pub u8);

impl ByteMask {
    /// All four byte lanes enabled.
    pub const ALL: Self = Self(0b1111);

    /// True when byte lane `lane` (0 = least significant) is written.
    pub const fn writes_lane(self, lane: u32) -> bool {
        self.0 & (1 << lane) != 0
    }

    /// Merges `new` into `old`, replacing only the selected byte lanes.
    pub fn apply(self, old: u32, new: u32) -> u32 {
        let mut out = old;
        for lane in 0..4 {
            if self.writes_lane(lane) {
                let shift = lane * 8;
                out = (out & !(0xFF << shift)) | (new & (0xFF << shift));
            }
        }
        out
    }
}

impl Default for ByteMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// One cycle of requester activity on the bus.
#[derive(Clone, Copy, Debug, Default)]
pub struct BusRequest {
    /// Transaction envelope; held asserted until the final acknowledge.
    pub cycle: bool,
    /// Beat qualifier; with `cycle`, marks a transfer request this cycle.
    pub strobe: bool,
    /// Direction: true = write to memory.
    pub write_enable: bool,
    /// Byte lanes written (writes only).
    pub byte_select: ByteMask,
    /// Word address of the requested beat.
    pub address: WordAddr,
    /// Data for the requested beat (writes only).
    pub write_data: u32,
    /// Burst-continue hint for this beat.
    pub cycle_type: CycleType,
}

impl BusRequest {
    /// A bus with no requester activity.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A read beat at `address`.
    pub fn read(address: WordAddr, cycle_type: CycleType) -> Self {
        Self {
            cycle: true,
            strobe: true,
            write_enable: false,
            byte_select: ByteMask::ALL,
            address,
            write_data: 0,
            cycle_type,
        }
    }

    /// A write beat of `data` at `address`.
    pub fn write(address: WordAddr, data: u32, byte_select: ByteMask, cycle_type: CycleType) -> Self {
        Self {
            cycle: true,
            strobe: true,
            write_enable: true,
            byte_select,
            address,
            write_data: data,
            cycle_type,
        }
    }

    /// True when the requester is presenting a beat this cycle.
    pub const fn active(&self) -> bool {
        self.cycle && self.strobe
    }

    /// True when the requester announces a further beat after this one.
    pub fn wants_burst(&self) -> bool {
        self.active() && self.cycle_type == CycleType::LinearBurst
    }
}

/// One cycle of controller response on the bus.
#[derive(Clone, Copy, Debug, Default)]
pub struct BusReply {
    /// One beat completed this cycle (data captured or delivered).
    pub ack: bool,
    /// Captured word for acknowledged read beats; undefined otherwise.
    pub read_data: u32,
    /// Remaining-window hint: [`CycleType::LinearBurst`] while the window can
    /// accept further beats, [`CycleType::EndOfBurst`] on the last beat a
    /// window can take, [`CycleType::Classic`] on non-acknowledge cycles.
    pub window: CycleType,
}

impl BusReply {
    /// A bus with no controller response.
    pub fn idle() -> Self {
        Self::default()
    }
}
