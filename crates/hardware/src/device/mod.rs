//! Behavioral HyperRAM device model.
//!
//! This module models the memory device at the far end of the link, cycle by
//! cycle, so the controller can be exercised against realistic wire behavior.
//! It provides:
//! 1. **Command capture:** Reassembles the 48-bit command word from the three
//!    halves shifted out during the command window.
//! 2. **Read path:** Applies the configured read latency, then streams words
//!    with the source-synchronous strobe cadence (low-then-high on word
//!    boundaries, high-then-low on hold cycles, data held across both).
//! 3. **Write path:** Consumes masked data beats and auto-increments the
//!    internal word pointer (linear burst).
//! 4. **Sampling eye:** Launched read data is corrupted while the controller's
//!    input delay tap sits outside the configured valid window, which is what
//!    the bring-up calibration sweep hunts for.
//!
//! The device never stalls on its own: timeout paths are tested by replacing
//! it with a dead link, not by a device mode.

use tracing::trace;

use crate::config::DeviceConfig;
use crate::hyperbus::command::CommandWord;
use crate::hyperbus::wire::{DqOut, LinkInput, LinkOutput};

/// Deterministic bit-error pattern standing in for mis-centered sampling.
const EYE_CORRUPTION: u32 = 0xA5A5_5A5A;

/// What the device is doing with the current chip-select window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Chip-select deasserted; all lines released.
    Standby,
    /// Collecting command halves during the command window.
    CaptureCommand { halves: [u16; 3], have: u8 },
    /// Read command decoded; counting down the device read latency.
    ReadLatency { remaining: u32 },
    /// Streaming read words; `hold` marks the second cycle of each word,
    /// `primed` is false until the preamble boundary has been emitted.
    ReadStream { hold: bool, primed: bool },
    /// Write command decoded; applying data beats as they arrive.
    WriteData,
}

/// The behavioral memory device.
#[derive(Debug)]
pub struct HyperRamDevice {
    config: DeviceConfig,
    mem: Vec<u32>,
    phase: Phase,
    /// Internal word pointer, loaded from the command and auto-incremented.
    pointer: u32,
    /// Word launched on the last boundary cycle, held through the hold cycle.
    held_word: u32,
}

impl HyperRamDevice {
    /// A device in standby with a zero-filled backing store.
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            config: *config,
            mem: vec![0; config.size_words as usize],
            phase: Phase::Standby,
            pointer: 0,
            held_word: 0,
        }
    }

    /// Direct backing-store read, for test assertions.
    pub fn peek(&self, word_addr: u32) -> u32 {
        self.mem[(word_addr & (self.config.size_words - 1)) as usize]
    }

    /// Direct backing-store write, for test setup.
    pub fn poke(&mut self, word_addr: u32, value: u32) {
        let idx = (word_addr & (self.config.size_words - 1)) as usize;
        self.mem[idx] = value;
    }

    /// True while the controller's tap samples inside the valid eye.
    const fn tap_in_eye(&self, tap: u8) -> bool {
        tap >= self.config.eye_lo && tap <= self.config.eye_hi
    }

    /// Advances one device cycle.
    ///
    /// `link` is the controller's wire activity this cycle; `input_tap` is the
    /// controller PHY's current input delay setting, which decides whether
    /// launched read data survives sampling. Returns the device's wire state,
    /// which the controller registers and observes next cycle.
    pub fn tick(&mut self, link: &LinkOutput, input_tap: u8) -> LinkInput {
        if link.reset {
            self.phase = Phase::Standby;
            return LinkInput::idle();
        }
        if !link.cs {
            self.phase = Phase::Standby;
            return LinkInput::idle();
        }
        if self.phase == Phase::Standby {
            self.phase = Phase::CaptureCommand {
                halves: [0; 3],
                have: 0,
            };
        }
        if !link.clock_enabled {
            // Selected but unclocked: nothing shifts, lines hold.
            return LinkInput::idle();
        }

        match self.phase {
            Phase::Standby => LinkInput::idle(),
            Phase::CaptureCommand { mut halves, have } => {
                let captured = match link.dq {
                    DqOut::Command { first, second } => {
                        if have == 0 {
                            halves[0] = first;
                            halves[1] = second;
                            2
                        } else {
                            halves[2] = first;
                            3
                        }
                    }
                    _ => have,
                };
                if captured == 3 {
                    self.decode(CommandWord::from_halves(halves));
                } else {
                    self.phase = Phase::CaptureCommand {
                        halves,
                        have: captured,
                    };
                }
                // Strobe parked high through the command phase: the latency
                // indication the controller treats as noise.
                LinkInput {
                    dq_first: 0,
                    dq_second: 0,
                    rwds_first: true,
                    rwds_second: true,
                }
            }
            Phase::ReadLatency { remaining } => {
                if remaining <= 1 {
                    self.phase = Phase::ReadStream {
                        hold: false,
                        primed: false,
                    };
                } else {
                    self.phase = Phase::ReadLatency {
                        remaining: remaining - 1,
                    };
                }
                LinkInput {
                    dq_first: 0,
                    dq_second: 0,
                    rwds_first: true,
                    rwds_second: true,
                }
            }
            Phase::ReadStream { hold, primed } => {
                if hold {
                    self.phase = Phase::ReadStream {
                        hold: false,
                        primed,
                    };
                    // Hold cycle: data held, strobe high-then-low.
                    LinkInput::word(self.launch_word(input_tap), true, false)
                } else {
                    if primed {
                        self.held_word = self.mem
                            [(self.pointer & (self.config.size_words - 1)) as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                    self.phase = Phase::ReadStream {
                        hold: true,
                        primed: true,
                    };
                    // Word boundary: strobe low-then-high.
                    LinkInput::word(self.launch_word(input_tap), false, true)
                }
            }
            Phase::WriteData => {
                if let DqOut::Data { word, mask } = link.dq {
                    let idx = (self.pointer & (self.config.size_words - 1)) as usize;
                    self.mem[idx] = mask.apply(self.mem[idx], word);
                    self.pointer = self.pointer.wrapping_add(1);
                }
                LinkInput::idle()
            }
        }
    }

    fn decode(&mut self, command: CommandWord) {
        self.pointer = command.word_addr().val();
        self.phase = if command.is_read() {
            Phase::ReadLatency {
                remaining: self.config.read_latency,
            }
        } else {
            Phase::WriteData
        };
        trace!(
            read = command.is_read(),
            pointer = self.pointer,
            "command captured"
        );
    }

    /// The word as it survives the controller's sampling point.
    fn launch_word(&self, input_tap: u8) -> u32 {
        if self.tap_in_eye(input_tap) {
            self.held_word
        } else {
            self.held_word ^ EYE_CORRUPTION
        }
    }
}
