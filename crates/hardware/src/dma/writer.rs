//! Writer engine: memory to stream.
//!
//! The writer's streaming side is a source: the engine reads memory in bursts
//! and offers each word to a downstream consumer (in practice the outbound
//! CDC queue). The source is valid exactly on acknowledged active cycles, so
//! the consumer sees a word in the same cycle its bus beat completes.

use crate::bus::{BusReply, BusRequest};
use crate::config::EngineConfig;
use crate::dma::{EngineCore, EngineState};

/// Memory-to-stream DMA engine.
#[derive(Debug)]
pub struct StreamWriter {
    /// Shared CSR surface, transfer state, and counters.
    pub core: EngineCore,
}

impl StreamWriter {
    /// An idle writer with reset-value registers.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            core: EngineCore::new(config),
        }
    }

    /// True while the engine drives the bus this cycle: in the active state
    /// with the consumer able to accept a word.
    pub fn active(&self, partner_ready: bool) -> bool {
        self.core.state() == EngineState::Active && partner_ready
    }

    /// The engine's bus activity for this cycle (combinational view).
    pub fn bus_request(&self, partner_ready: bool) -> BusRequest {
        if self.active(partner_ready) {
            BusRequest::read(self.core.bus_address(), self.core.cycle_type())
        } else {
            BusRequest::idle()
        }
    }

    /// Clocks the engine. Returns the word delivered to the consumer this
    /// cycle, if its bus beat was acknowledged.
    pub fn tick(&mut self, partner_ready: bool, reply: &BusReply) -> Option<u32> {
        let valid = reply.ack && self.active(partner_ready);
        if self.core.busy() {
            if partner_ready && !valid {
                self.core.stats.overflow_cycles += 1;
            }
            if valid && !partner_ready {
                // `valid` already folds in `partner_ready`, so this branch
                // cannot fire through this wiring; it exists so both engines
                // expose the same diagnostic pair.
                self.core.stats.underflow_cycles += 1;
            }
        }
        if self.core.tick(partner_ready, valid) {
            Some(reply.read_data)
        } else {
            None
        }
    }
}
