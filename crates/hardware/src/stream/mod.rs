//! Streaming endpoints and the valid/ready handshake seams.
//!
//! This module defines the level-style valid/ready contract used by the DMA
//! engines and the CDC queues, plus the deterministic endpoints that drive it
//! in the reference topology:
//! 1. **Traits:** [`StreamSource`] (valid/data toward a consumer) and
//!    [`StreamSink`] (ready toward a producer). A word moves exactly on cycles
//!    where both sides assert; there is no hidden buffering.
//! 2. **Pattern source:** A frame/line structured generator standing in for a
//!    video front end, with a frame-boundary pulse output.
//! 3. **Null sink:** Always ready, discards everything.
//! 4. **PRBS pair:** A PRBS-31 generator and checker for link memtests.

/// Frame/line structured pattern generator.
pub mod pattern;
/// PRBS-31 generator and checker.
pub mod prbs;

pub use pattern::PatternSource;
pub use prbs::{Prbs31Checker, Prbs31Source};

/// The producing half of a valid/ready stream.
pub trait StreamSource {
    /// True while a word is offered this cycle.
    fn valid(&self) -> bool;
    /// The offered word; meaningful only while [`Self::valid`] holds.
    fn peek(&self) -> u32;
    /// Consumes the offered word; called exactly on cycles where the consumer
    /// was ready and [`Self::valid`] held.
    fn pop(&mut self);
}

/// The consuming half of a valid/ready stream.
pub trait StreamSink {
    /// True while a word can be accepted this cycle.
    fn ready(&self) -> bool;
    /// Accepts one word; called exactly on cycles where the producer was
    /// valid and [`Self::ready`] held.
    fn push(&mut self, word: u32);
}

/// A sink that is always ready and discards its input.
#[derive(Debug, Default)]
pub struct NullSink {
    /// Words accepted so far.
    pub accepted: u64,
}

impl StreamSink for NullSink {
    fn ready(&self) -> bool {
        true
    }

    fn push(&mut self, _word: u32) {
        self.accepted += 1;
    }
}
