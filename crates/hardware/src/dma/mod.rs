//! Streaming DMA engines.
//!
//! The two engines move `transfer_size` words between the pipelined-burst bus
//! and a valid/ready streaming port without per-word control-plane work,
//! chunked into bursts of `burst_size` words:
//! 1. **Reader** ([`StreamReader`]): stream to memory; its sink is ready
//!    exactly on acknowledged active cycles.
//! 2. **Writer** ([`StreamWriter`]): memory to stream; its source is valid
//!    exactly on acknowledged active cycles.
//!
//! Both share the CSR surface, the IDLE/ACTIVE machine, the sticky `done`
//! discipline, and the burst bookkeeping, which live in [`EngineCore`]. A
//! control-plane write takes effect at the next engine clock edge.

use tracing::{debug, warn};

use crate::bus::CycleType;
use crate::common::addr::{ByteAddr, WordAddr};
use crate::config::{EngineConfig, StartMode};
use crate::stats::EngineStats;

/// Reader engine (stream to memory).
pub mod reader;
/// Writer engine (memory to stream).
pub mod writer;

pub use reader::StreamReader;
pub use writer::StreamWriter;

/// `start_address` register offset (RW, word-aligned byte address).
pub const REG_START_ADDRESS: u32 = 0x00;
/// `transfer_size` register offset (RW, word count).
pub const REG_TRANSFER_SIZE: u32 = 0x04;
/// `burst_size` register offset (RW, word count, reset 256).
pub const REG_BURST_SIZE: u32 = 0x08;
/// `done` register offset (RO, sticky).
pub const REG_DONE: u32 = 0x0C;
/// `enable` register offset (write-strobe pulse).
pub const REG_ENABLE: u32 = 0x10;
/// `reset` register offset (write-strobe pulse).
pub const REG_RESET: u32 = 0x14;

/// Reset value of `burst_size`.
pub const BURST_SIZE_RESET: u32 = 256;

/// Engine transfer states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Between bursts, or no transfer latched.
    Idle,
    /// Executing consecutive bus transactions for the current burst.
    Active,
}

/// State and bookkeeping shared by both engines.
///
/// The direction-specific parts (bus request shape, handshake polarity) live
/// in the wrapping engine; everything the control plane or the burst logic
/// touches is here.
#[derive(Debug)]
pub struct EngineCore {
    start_mode: StartMode,
    start_address: ByteAddr,
    transfer_size: u32,
    burst_size: u32,
    state: EngineState,
    enabled: bool,
    busy: bool,
    done: bool,
    /// Word index within the whole transfer; wraps to 0 at completion.
    tx_cnt: u32,
    /// Words acknowledged in the current burst window.
    burst_cnt: u32,
    /// Latched start condition, consumed at the next idle tick.
    start_request: bool,
    /// Latched CSR reset pulse, applied at the next tick.
    reset_request: bool,
    /// Behavioral counters.
    pub stats: EngineStats,
}

impl EngineCore {
    pub(crate) fn new(config: &EngineConfig) -> Self {
        Self {
            start_mode: config.start_mode,
            start_address: ByteAddr::new(0),
            transfer_size: 0,
            burst_size: BURST_SIZE_RESET,
            state: EngineState::Idle,
            enabled: false,
            busy: false,
            done: false,
            tx_cnt: 0,
            burst_cnt: 0,
            start_request: false,
            reset_request: false,
            stats: EngineStats::default(),
        }
    }

    /// Control-plane register write.
    pub fn write_csr(&mut self, offset: u32, value: u32) {
        match offset {
            REG_START_ADDRESS => self.start_address = ByteAddr::new(value),
            REG_TRANSFER_SIZE => self.transfer_size = value,
            REG_BURST_SIZE => self.burst_size = value,
            REG_ENABLE => {
                self.enabled = value & 1 != 0;
                if self.enabled && self.start_mode == StartMode::Internal {
                    self.start_request = true;
                }
            }
            REG_RESET => self.reset_request = true,
            _ => warn!(offset, "write to unknown engine register ignored"),
        }
    }

    /// Control-plane register read. Pulse registers read as zero.
    pub fn read_csr(&self, offset: u32) -> u32 {
        match offset {
            REG_START_ADDRESS => self.start_address.val(),
            REG_TRANSFER_SIZE => self.transfer_size,
            REG_BURST_SIZE => self.burst_size,
            REG_DONE => u32::from(self.done),
            _ => 0,
        }
    }

    /// External `start` trigger; honored only in external-sync mode with the
    /// engine latched enabled.
    pub fn set_start(&mut self, pulse: bool) {
        if pulse && self.enabled && self.start_mode == StartMode::External {
            self.start_request = true;
        }
    }

    /// Sticky completion flag.
    pub const fn done(&self) -> bool {
        self.done
    }

    /// True while a transfer is latched and not yet complete or aborted.
    pub const fn busy(&self) -> bool {
        self.busy
    }

    /// Current engine state.
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Word address of the beat the engine would issue this cycle.
    pub fn bus_address(&self) -> WordAddr {
        self.start_address.word().offset(self.tx_cnt)
    }

    /// `burst_size` with the defensive floor of one word.
    fn effective_burst(&self) -> u32 {
        if self.burst_size == 0 {
            warn!("burst_size of 0 treated as 1");
            1
        } else {
            self.burst_size
        }
    }

    /// True on the beat that completes the whole transfer.
    pub fn last_address(&self) -> bool {
        self.tx_cnt == self.transfer_size.saturating_sub(1)
    }

    /// True on the beat that ends the current burst window.
    pub fn burst_end(&self) -> bool {
        self.last_address() || self.burst_cnt == self.effective_burst() - 1
    }

    /// Burst-continue hint for the beat the engine would issue this cycle.
    pub fn cycle_type(&self) -> CycleType {
        if self.burst_end() {
            CycleType::EndOfBurst
        } else {
            CycleType::LinearBurst
        }
    }

    /// Clocks the shared engine state.
    ///
    /// `partner_engaged` is the streaming partner's handshake signal (valid
    /// for the reader's sink side, ready for the writer's source side);
    /// `acked` reports whether the bus acknowledged the engine's beat this
    /// cycle. Returns true when a word moved.
    pub(crate) fn tick(&mut self, partner_engaged: bool, acked: bool) -> bool {
        let mut moved = false;

        match self.state {
            EngineState::Idle => {
                if self.start_request {
                    if self.transfer_size == 0 {
                        warn!("enable with transfer_size 0 ignored");
                    } else if !self.busy {
                        self.busy = true;
                        self.tx_cnt = 0;
                        debug!(
                            start = self.start_address.val(),
                            words = self.transfer_size,
                            "transfer latched"
                        );
                    }
                }
                if self.busy && partner_engaged {
                    self.state = EngineState::Active;
                    self.stats.bursts += 1;
                }
            }
            EngineState::Active => {
                if !partner_engaged {
                    // Partner dropped mid-burst: release the bus, keep the
                    // word counter, restart the window later.
                    self.state = EngineState::Idle;
                } else if acked {
                    moved = true;
                    self.stats.words_moved += 1;
                    let last = self.last_address();
                    let ending = self.burst_end();
                    if last {
                        self.tx_cnt = 0;
                    } else {
                        self.tx_cnt += 1;
                    }
                    self.burst_cnt += 1;
                    if ending {
                        self.state = EngineState::Idle;
                        if last {
                            self.busy = false;
                            self.done = true;
                            self.stats.transfers_completed += 1;
                            debug!("transfer complete");
                        }
                    }
                }
            }
        }
        self.start_request = false;

        // The burst counter exists only inside an active window.
        if !(self.state == EngineState::Active && partner_engaged) {
            self.burst_cnt = 0;
        }

        // A clear-write observed in the same cycle as a completion event
        // wins: applied after the completion path above.
        if self.reset_request {
            if self.busy {
                self.stats.resets_mid_transfer += 1;
                debug!("transfer aborted by reset");
            }
            self.busy = false;
            self.done = false;
            self.state = EngineState::Idle;
            self.tx_cnt = 0;
            self.burst_cnt = 0;
            self.reset_request = false;
        }

        moved
    }
}
