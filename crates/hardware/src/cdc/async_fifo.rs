//! Gray-pointer asynchronous FIFO.
//!
//! The queue has an independently clocked write side and read side. Each side
//! owns its binary pointer and observes the opposite pointer through a
//! multi-stage synchronizer chain, so a side never sees a pointer value the
//! other side has not fully committed; an entry becomes visible to the reader
//! only after the write that produced it. The pointers travel Gray-coded
//! (successive values differ in one bit, so a mid-flight sample is always
//! either the old or the new value, never garbage): each side encodes its
//! pointer into the chain and decodes the settled foreign value back to
//! binary for the occupancy comparison.
//!
//! Per-side resets pin that side's pointer at zero. A reset must stay
//! asserted at least as long as the opposite chain's settling latency or the
//! two sides disagree about occupancy and entries are dropped or duplicated;
//! that bound is a configuration obligation
//! ([`FifoConfig::min_reset_hold`](crate::config::FifoConfig::min_reset_hold)),
//! not something the queue detects at runtime.

use crate::config::FifoConfig;
use crate::stats::FifoStats;

/// Gray code image of a pointer value, as it travels between domains.
pub const fn gray(value: u32) -> u32 {
    value ^ (value >> 1)
}

/// Binary value of a Gray-coded pointer, as recovered by the observing side.
pub const fn ungray(mut value: u32) -> u32 {
    let mut shift = 1;
    while shift < 32 {
        value ^= value >> shift;
        shift <<= 1;
    }
    value
}

/// One pointer-synchronizer chain: the observing side's registered copies of
/// the opposite side's Gray-coded pointer.
#[derive(Clone, Debug)]
struct PointerChain {
    stages: Vec<u32>,
}

impl PointerChain {
    fn new(stages: u32) -> Self {
        Self {
            stages: vec![0; stages as usize],
        }
    }

    /// Clocks the chain with the current foreign pointer; returns the settled
    /// value.
    fn tick(&mut self, foreign: u32) -> u32 {
        let out = *self.stages.last().unwrap_or(&foreign);
        for i in (1..self.stages.len()).rev() {
            self.stages[i] = self.stages[i - 1];
        }
        if let Some(first) = self.stages.first_mut() {
            *first = foreign;
        }
        out
    }

    fn settled(&self) -> u32 {
        *self.stages.last().unwrap_or(&0)
    }

    fn clear(&mut self) {
        self.stages.fill(0);
    }
}

/// Asynchronous buffer moving 32-bit words between two clock domains.
#[derive(Clone, Debug)]
pub struct AsyncFifo {
    storage: Vec<u32>,
    depth: u32,
    /// Write pointer with one wrap bit (counts modulo `2 * depth`).
    wptr: u32,
    /// Read pointer with one wrap bit.
    rptr: u32,
    /// Write side's view of the read pointer.
    rptr_chain: PointerChain,
    /// Read side's view of the write pointer.
    wptr_chain: PointerChain,
    wr_reset_prev: bool,
    rd_reset_prev: bool,
    /// Behavioral counters.
    pub stats: FifoStats,
}

impl AsyncFifo {
    /// An empty queue. `config.depth` is trusted to be a validated power of
    /// two.
    pub fn new(config: &FifoConfig) -> Self {
        Self {
            storage: vec![0; config.depth as usize],
            depth: config.depth,
            wptr: 0,
            rptr: 0,
            rptr_chain: PointerChain::new(config.sync_stages),
            wptr_chain: PointerChain::new(config.sync_stages),
            wr_reset_prev: false,
            rd_reset_prev: false,
            stats: FifoStats::default(),
        }
    }

    const fn wrap(&self, ptr: u32) -> u32 {
        ptr & (2 * self.depth - 1)
    }

    /// True when the write side, per its settled view, has no free entry.
    pub fn write_full(&self) -> bool {
        let seen_rptr = ungray(self.rptr_chain.settled());
        self.wrap(self.wptr.wrapping_sub(seen_rptr)) >= self.depth
    }

    /// True when the read side, per its settled view, has an entry available.
    pub fn read_valid(&self) -> bool {
        ungray(self.wptr_chain.settled()) != self.rptr
    }

    /// The entry the read side would consume; meaningful only while
    /// [`Self::read_valid`] holds.
    pub fn read_peek(&self) -> u32 {
        self.storage[(self.rptr & (self.depth - 1)) as usize]
    }

    /// Clocks the write domain. `push` commits one word if a slot is free;
    /// returns true when the word was accepted. While `reset` is asserted the
    /// write pointer is pinned at zero and nothing commits.
    pub fn write_tick(&mut self, push: Option<u32>, reset: bool) -> bool {
        if reset && !self.wr_reset_prev {
            self.stats.resets += 1;
        }
        self.wr_reset_prev = reset;

        if reset {
            self.wptr = 0;
            self.rptr_chain.clear();
            return false;
        }

        // Occupancy decision uses the pre-edge settled view.
        let full = self.write_full();
        let accepted = match push {
            Some(word) if !full => {
                self.storage[(self.wptr & (self.depth - 1)) as usize] = word;
                self.wptr = self.wrap(self.wptr.wrapping_add(1));
                self.stats.pushes += 1;
                true
            }
            Some(_) => {
                self.stats.full_cycles += 1;
                false
            }
            None => false,
        };
        let _ = self.rptr_chain.tick(gray(self.rptr));
        accepted
    }

    /// Clocks the read domain. With `take` asserted, consumes and returns the
    /// head entry if one is visible. While `reset` is asserted the read
    /// pointer is pinned at zero and nothing is consumed.
    pub fn read_tick(&mut self, take: bool, reset: bool) -> Option<u32> {
        if reset && !self.rd_reset_prev {
            self.stats.resets += 1;
        }
        self.rd_reset_prev = reset;

        if reset {
            self.rptr = 0;
            self.wptr_chain.clear();
            return None;
        }

        let out = if take && self.read_valid() {
            let word = self.read_peek();
            self.rptr = self.wrap(self.rptr.wrapping_add(1));
            self.stats.pops += 1;
            Some(word)
        } else {
            None
        };
        let _ = self.wptr_chain.tick(gray(self.wptr));
        out
    }
}
