//! Reader engine: stream to memory.
//!
//! The reader's streaming side is a sink: an upstream producer (in practice
//! the inbound CDC queue) offers words, and the engine writes them to memory
//! in bursts. The sink is ready exactly on acknowledged active cycles, so a
//! word leaves the producer in the same cycle its bus beat completes.

use crate::bus::{BusReply, BusRequest, ByteMask};
use crate::config::EngineConfig;
use crate::dma::{EngineCore, EngineState};

/// Stream-to-memory DMA engine.
#[derive(Debug)]
pub struct StreamReader {
    /// Shared CSR surface, transfer state, and counters.
    pub core: EngineCore,
}

impl StreamReader {
    /// An idle reader with reset-value registers.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            core: EngineCore::new(config),
        }
    }

    /// True while the engine drives the bus this cycle: in the active state
    /// with the producer offering a word.
    pub fn active(&self, partner_valid: bool) -> bool {
        self.core.state() == EngineState::Active && partner_valid
    }

    /// The engine's bus activity for this cycle (combinational view).
    pub fn bus_request(&self, partner_valid: bool, partner_data: u32) -> BusRequest {
        if self.active(partner_valid) {
            BusRequest::write(
                self.core.bus_address(),
                partner_data,
                ByteMask::ALL,
                self.core.cycle_type(),
            )
        } else {
            BusRequest::idle()
        }
    }

    /// Clocks the engine. Returns true when the offered word was consumed
    /// (its bus beat acknowledged); the producer must then advance.
    pub fn tick(&mut self, partner_valid: bool, reply: &BusReply) -> bool {
        let ready = reply.ack && self.active(partner_valid);
        if self.core.busy() {
            if ready && !partner_valid {
                // `ready` already folds in `partner_valid`, so this branch
                // cannot fire through this wiring; it exists so both engines
                // expose the same diagnostic pair.
                self.core.stats.overflow_cycles += 1;
            }
            if partner_valid && !ready {
                self.core.stats.underflow_cycles += 1;
            }
        }
        self.core.tick(partner_valid, ready)
    }
}
