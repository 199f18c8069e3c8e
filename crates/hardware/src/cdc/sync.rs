//! Single-bit synchronizers, edge detection, and reset stretching.
//!
//! These are the only legal paths for level and pulse signals between
//! domains. Each primitive is ticked by the clock of the domain that *reads*
//! it; the writing domain only sets a register the chain samples.

/// Multi-stage register chain settling a foreign-domain level.
///
/// The output lags the input by the stage count, which is exactly the
/// settling latency the CDC reset discipline has to cover.
#[derive(Clone, Debug)]
pub struct BitSync {
    stages: Vec<bool>,
}

impl BitSync {
    /// A chain of `stages` registers, all low.
    pub fn new(stages: u32) -> Self {
        Self {
            stages: vec![false; stages as usize],
        }
    }

    /// Clocks the chain in the observing domain; returns the settled level.
    pub fn tick(&mut self, input: bool) -> bool {
        let out = *self.stages.last().unwrap_or(&input);
        for i in (1..self.stages.len()).rev() {
            self.stages[i] = self.stages[i - 1];
        }
        if let Some(first) = self.stages.first_mut() {
            *first = input;
        }
        out
    }

    /// The settled level without clocking, as last observed.
    pub fn level(&self) -> bool {
        *self.stages.last().unwrap_or(&false)
    }
}

/// Which level changes an [`EdgeDetect`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeMode {
    /// Low-to-high transitions.
    Rise,
    /// High-to-low transitions.
    Fall,
    /// Any transition.
    Change,
}

/// Edge detection on a level synchronized into the observing domain.
#[derive(Clone, Debug)]
pub struct EdgeDetect {
    mode: EdgeMode,
    sync: BitSync,
    previous: bool,
}

impl EdgeDetect {
    /// A detector with its own `stages`-deep input synchronizer.
    pub fn new(mode: EdgeMode, stages: u32) -> Self {
        Self {
            mode,
            sync: BitSync::new(stages),
            previous: false,
        }
    }

    /// Clocks the detector; true for one cycle per qualifying edge.
    pub fn tick(&mut self, input: bool) -> bool {
        let level = self.sync.tick(input);
        let edge = match self.mode {
            EdgeMode::Rise => level && !self.previous,
            EdgeMode::Fall => !level && self.previous,
            EdgeMode::Change => level != self.previous,
        };
        self.previous = level;
        edge
    }
}

/// Toggle-based transfer of a single-cycle pulse between domains.
///
/// The sending domain flips a toggle register per pulse; the receiving domain
/// synchronizes the toggle and emits one pulse per observed flip. Pulses
/// arriving faster than the synchronizer settles merge, which the frame-rate
/// use cases here cannot hit.
#[derive(Clone, Debug)]
pub struct PulseSync {
    toggle: bool,
    detect: EdgeDetect,
}

impl PulseSync {
    /// A synchronizer with a `stages`-deep chain on the receiving side.
    pub fn new(stages: u32) -> Self {
        Self {
            toggle: false,
            detect: EdgeDetect::new(EdgeMode::Change, stages),
        }
    }

    /// Sending-domain side: registers one pulse.
    pub fn send(&mut self) {
        self.toggle = !self.toggle;
    }

    /// Receiving-domain side: true for one cycle per sent pulse.
    pub fn tick(&mut self) -> bool {
        self.detect.tick(self.toggle)
    }
}

/// Converts a one-cycle trigger into a reset level held for a fixed number
/// of cycles.
///
/// The hold must exceed the far side's synchronizer settling latency; that
/// bound lives in [`FifoConfig::min_reset_hold`](crate::config::FifoConfig::min_reset_hold)
/// and is checked at configuration time, not here.
#[derive(Clone, Copy, Debug)]
pub struct ResetStretcher {
    hold: u32,
    remaining: u32,
}

impl ResetStretcher {
    /// A released stretcher holding resets for `hold` cycles.
    pub const fn new(hold: u32) -> Self {
        Self { hold, remaining: 0 }
    }

    /// Starts (or restarts) the hold window.
    pub fn trigger(&mut self) {
        self.remaining = self.hold;
    }

    /// Clocks the stretcher; true while the reset is asserted.
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    /// True while the reset is asserted, without clocking.
    pub const fn asserted(&self) -> bool {
        self.remaining > 0
    }
}
