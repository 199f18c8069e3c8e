//! PRBS-31 generator and checker.
//!
//! Pseudo-random binary sequence endpoints for link memtests: the source
//! feeds the reader engine a reproducible word stream, the checker verifies
//! the writer engine's read-back against the same sequence. Polynomial
//! x^31 + x^28 + 1, one 32-bit word of sequence per transfer.

use crate::stream::{StreamSink, StreamSource};

const PRBS31_SEED: u32 = 0x7FFF_FFFF;

/// One 31-bit LFSR step per output bit, packed into 32-bit words.
#[derive(Clone, Copy, Debug)]
struct Prbs31 {
    state: u32,
}

impl Prbs31 {
    const fn new() -> Self {
        Self { state: PRBS31_SEED }
    }

    fn next_word(&mut self) -> u32 {
        let mut word = 0u32;
        for _ in 0..32 {
            let bit = ((self.state >> 30) ^ (self.state >> 27)) & 1;
            self.state = ((self.state << 1) | bit) & 0x7FFF_FFFF;
            word = (word << 1) | bit;
        }
        word
    }
}

/// Always-valid PRBS-31 word source.
#[derive(Debug)]
pub struct Prbs31Source {
    lfsr: Prbs31,
    current: u32,
    /// Words produced so far.
    pub produced: u64,
}

impl Prbs31Source {
    /// A source at the start of the sequence.
    pub fn new() -> Self {
        let mut lfsr = Prbs31::new();
        let current = lfsr.next_word();
        Self {
            lfsr,
            current,
            produced: 0,
        }
    }
}

impl Default for Prbs31Source {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSource for Prbs31Source {
    fn valid(&self) -> bool {
        true
    }

    fn peek(&self) -> u32 {
        self.current
    }

    fn pop(&mut self) {
        self.produced += 1;
        self.current = self.lfsr.next_word();
    }
}

/// Always-ready sink comparing its input against the PRBS-31 sequence.
#[derive(Debug)]
pub struct Prbs31Checker {
    lfsr: Prbs31,
    expected: u32,
    /// Words checked so far.
    pub checked: u64,
    /// Words that did not match the sequence.
    pub mismatches: u64,
}

impl Prbs31Checker {
    /// A checker expecting the sequence from its start.
    pub fn new() -> Self {
        let mut lfsr = Prbs31::new();
        let expected = lfsr.next_word();
        Self {
            lfsr,
            expected,
            checked: 0,
            mismatches: 0,
        }
    }
}

impl Default for Prbs31Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSink for Prbs31Checker {
    fn ready(&self) -> bool {
        true
    }

    fn push(&mut self, word: u32) {
        self.checked += 1;
        if word != self.expected {
            self.mismatches += 1;
        }
        self.expected = self.lfsr.next_word();
    }
}
