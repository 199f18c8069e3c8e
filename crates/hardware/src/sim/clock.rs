//! Deterministic multi-domain clock scheduling.
//!
//! The three simulated domains tick at independent periods. The plan replays
//! their edges in global time order, breaking simultaneous edges in a fixed
//! documented order (system, then source, then sink), so any run is exactly
//! reproducible for any period ratio.

use crate::config::ClockConfig;

/// The independently clocked regions of the reference topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    /// Controller, device link, DMA engines, host port.
    Sys,
    /// Stream producer feeding the inbound queue.
    Source,
    /// Stream consumer draining the outbound queue.
    Sink,
}

/// Tie-break order for simultaneous edges.
const DOMAINS: [Domain; 3] = [Domain::Sys, Domain::Source, Domain::Sink];

/// Edge scheduler across the three domains.
#[derive(Clone, Copy, Debug)]
pub struct ClockPlan {
    periods: [u64; 3],
    next_edge: [u64; 3],
    ticks: [u64; 3],
}

impl ClockPlan {
    /// A plan with all domains aligned at time zero.
    pub const fn new(config: &ClockConfig) -> Self {
        let periods = [
            config.sys_period_ps,
            config.source_period_ps,
            config.sink_period_ps,
        ];
        Self {
            periods,
            next_edge: periods,
            ticks: [0; 3],
        }
    }

    /// The domain whose edge comes next; advances that domain's schedule.
    pub fn next(&mut self) -> Domain {
        let mut idx = 0;
        for i in 1..3 {
            if self.next_edge[i] < self.next_edge[idx] {
                idx = i;
            }
        }
        self.next_edge[idx] += self.periods[idx];
        self.ticks[idx] += 1;
        DOMAINS[idx]
    }

    /// Edges delivered to `domain` so far.
    pub const fn ticks(&self, domain: Domain) -> u64 {
        self.ticks[domain as usize]
    }
}
