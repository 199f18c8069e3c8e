//! Simulation statistics collection and reporting.
//!
//! This module tracks behavioral counters for the HyperBus simulator. It provides:
//! 1. **Controller:** Transaction windows, words moved per direction, forced timeouts,
//!    burst-ceiling truncations, and the per-window high-water mark.
//! 2. **DMA engines:** Words moved, bursts issued, completed transfers, mid-transfer
//!    aborts, and stream backpressure diagnostics (overflow/underflow samples).
//! 3. **CDC queues:** Push/pop totals and reset counts.
//! 4. **Report:** A flat aggregate of every component, printable for soak runs.
//!
//! All conditions in the execution model are sampled booleans; these counters
//! are their only persistent record.

/// Counters maintained by the protocol controller.
#[derive(Clone, Copy, Debug, Default)]
pub struct CtrlStats {
    /// Chip-select windows opened (one per accepted transaction).
    pub windows: u64,
    /// Words delivered to requesters by acknowledged reads.
    pub words_read: u64,
    /// Words accepted from requesters by acknowledged writes.
    pub words_written: u64,
    /// Forced acknowledgments issued after a strobe stall bound expired.
    pub timeouts_forced: u64,
    /// Windows terminated by the burst ceiling rather than the requester.
    pub bursts_truncated: u64,
    /// Largest number of words observed in any single chip-select window.
    pub max_window_words: u64,
}

/// Counters maintained by one streaming DMA engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineStats {
    /// Words acknowledged on the bus on behalf of the stream.
    pub words_moved: u64,
    /// Burst windows issued.
    pub bursts: u64,
    /// Whole transfers completed (sticky `done` raised).
    pub transfers_completed: u64,
    /// Reset pulses that aborted an in-flight transfer.
    pub resets_mid_transfer: u64,
    /// Cycles where the partner signaled readiness but no data was valid.
    pub overflow_cycles: u64,
    /// Cycles where the partner asserted valid while this side was not ready.
    pub underflow_cycles: u64,
}

/// Counters maintained by one CDC queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct FifoStats {
    /// Entries committed on the write side.
    pub pushes: u64,
    /// Entries consumed on the read side.
    pub pops: u64,
    /// Write-side cycles stalled on a full queue.
    pub full_cycles: u64,
    /// Reset assertions observed (either side).
    pub resets: u64,
}

/// Aggregate statistics for a whole [`System`](crate::sim::System) run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimReport {
    /// Cycles executed in the system/controller domain.
    pub sys_cycles: u64,
    /// Cycles executed in the stream-source domain.
    pub source_cycles: u64,
    /// Cycles executed in the stream-sink domain.
    pub sink_cycles: u64,
    /// Controller counters.
    pub ctrl: CtrlStats,
    /// Reader engine (stream to memory) counters.
    pub reader: EngineStats,
    /// Writer engine (memory to stream) counters.
    pub writer: EngineStats,
    /// Inbound queue (source domain to system domain) counters.
    pub inbound: FifoStats,
    /// Outbound queue (system domain to sink domain) counters.
    pub outbound: FifoStats,
}

impl SimReport {
    /// Prints all counters to stdout in a fixed-width layout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("HYPERBUS LINK SIMULATION STATISTICS");
        println!("==========================================================");
        println!("cycles.sys               {}", self.sys_cycles);
        println!("cycles.source            {}", self.source_cycles);
        println!("cycles.sink              {}", self.sink_cycles);
        println!("----------------------------------------------------------");
        println!("ctrl.windows             {}", self.ctrl.windows);
        println!("ctrl.words_read          {}", self.ctrl.words_read);
        println!("ctrl.words_written       {}", self.ctrl.words_written);
        println!("ctrl.timeouts_forced     {}", self.ctrl.timeouts_forced);
        println!("ctrl.bursts_truncated    {}", self.ctrl.bursts_truncated);
        println!("ctrl.max_window_words    {}", self.ctrl.max_window_words);
        println!("----------------------------------------------------------");
        let engine = |name: &str, e: &EngineStats| {
            println!("{name}.words_moved       {}", e.words_moved);
            println!("{name}.bursts            {}", e.bursts);
            println!("{name}.transfers         {}", e.transfers_completed);
            println!("{name}.aborts            {}", e.resets_mid_transfer);
            println!("{name}.overflow_cycles   {}", e.overflow_cycles);
            println!("{name}.underflow_cycles  {}", e.underflow_cycles);
        };
        engine("reader", &self.reader);
        engine("writer", &self.writer);
        println!("----------------------------------------------------------");
        let fifo = |name: &str, f: &FifoStats| {
            println!("{name}.pushes           {}", f.pushes);
            println!("{name}.pops             {}", f.pops);
            println!("{name}.full_cycles      {}", f.full_cycles);
            println!("{name}.resets           {}", f.resets);
        };
        fifo("inbound", &self.inbound);
        fifo("outbound", &self.outbound);
        println!("==========================================================");
    }
}
