//! Burst-length and stall-timeout supervision.
//!
//! The supervisor enforces the two hard bounds of the protocol: a ceiling on
//! words per chip-select window (the device must get back to refresh) and a
//! ceiling on how long any wait for a device response may last. Both bounds
//! are independent of requester intent.

/// Tracks words transferred in the current chip-select window and judges the
/// stall bound against a phase timer reading.
#[derive(Clone, Copy, Debug)]
pub struct BurstSupervisor {
    ceiling: u32,
    stall_bound: u32,
    window_words: u32,
}

impl BurstSupervisor {
    /// A supervisor with the given per-window word ceiling and stall bound.
    pub const fn new(ceiling: u32, stall_bound: u32) -> Self {
        Self {
            ceiling,
            stall_bound,
            window_words: 0,
        }
    }

    /// Records one acknowledged word in the current window.
    pub fn record_word(&mut self) {
        self.window_words = self.window_words.saturating_add(1);
    }

    /// Words acknowledged in the current window so far.
    pub const fn window_words(&self) -> u32 {
        self.window_words
    }

    /// True while the window may accept another word.
    pub const fn can_continue(&self) -> bool {
        self.window_words < self.ceiling
    }

    /// Clears the word count; called whenever the state machine is idle.
    pub fn reset_window(&mut self) {
        self.window_words = 0;
    }

    /// True once a wait of `waited` cycles has exhausted the stall bound.
    pub const fn stalled(&self, waited: u32) -> bool {
        waited >= self.stall_bound
    }
}
