//! Byte and word address types.
//!
//! This module defines strong types for the two address spaces that meet in the
//! DMA engines: control-plane registers hold *byte* addresses (word-aligned),
//! while the pipelined-burst bus and the memory device are *word* addressed.
//! Keeping the shift explicit at the type level prevents the classic
//! off-by-four family of bugs when programming `start_address`.

/// A byte address, as written into a DMA engine's `start_address` register.
///
/// Only word-aligned values are meaningful; the low two bits are discarded
/// when converting to a [`WordAddr`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteAddr(pub u32);

/// A 32-bit-word address, as carried on the bus `address` field and used by
/// the memory device's internal pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct WordAddr(pub u32);

impl ByteAddr {
    /// Creates a new byte address from a raw 32-bit value.
    #[inline(always)]
    pub fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw byte address value.
    #[inline(always)]
    pub fn val(&self) -> u32 {
        self.0
    }

    /// Converts to a word address, discarding the low two bits.
    #[inline(always)]
    pub fn word(&self) -> WordAddr {
        WordAddr(self.0 >> 2)
    }
}

impl WordAddr {
    /// Creates a new word address from a raw 32-bit value.
    #[inline(always)]
    pub fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw word address value.
    #[inline(always)]
    pub fn val(&self) -> u32 {
        self.0
    }

    /// Returns the address advanced by `words`, wrapping on overflow.
    #[inline(always)]
    pub fn offset(&self, words: u32) -> Self {
        Self(self.0.wrapping_add(words))
    }
}
