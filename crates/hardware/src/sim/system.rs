//! Reference-topology system assembly.
//!
//! Wires the full data path: a stream endpoint in the source domain feeds the
//! inbound CDC queue, the reader engine drains it into memory through the
//! controller, the writer engine reads memory back into the outbound CDC
//! queue, and a sink endpoint in its own domain consumes the result. On top
//! of that sit:
//! 1. **Bus grant:** Burst-granular mutual exclusion between the engines and
//!    the host port, standing in for the out-of-scope external arbiter.
//! 2. **Host port:** Bounded-wait single-beat classic access, used by
//!    calibration and tests.
//! 3. **Calibration:** The bring-up delay-tap sweep locating the sampling
//!    eye.
//! 4. **Frame sequencing:** The source-domain frame pulse, synchronized into
//!    the system domain, drives the writer start, a stretched inbound-queue
//!    reset that also rewinds the pattern source to its frame boundary, and
//!    a delayed reader start.

use tracing::{debug, info};

use crate::bus::{BusReply, BusRequest, ByteMask, CycleType};
use crate::cdc::{AsyncFifo, BitSync, PulseSync, ResetStretcher, Timeline};
use crate::common::addr::WordAddr;
use crate::common::error::{CalibrationError, ConfigError, HostPortError};
use crate::config::Config;
use crate::device::HyperRamDevice;
use crate::dma::{StreamReader, StreamWriter};
use crate::hyperbus::fsm::COMMAND_WINDOW_CYCLES;
use crate::hyperbus::phy::{DELAY_TAP_MAX, DelayDirection};
use crate::hyperbus::{HyperRamController, LinkInput};
use crate::sim::clock::{ClockPlan, Domain};
use crate::stats::SimReport;
use crate::stream::{NullSink, PatternSource, Prbs31Checker, Prbs31Source, StreamSink, StreamSource};

/// Pattern-source geometry: words per line.
const PATTERN_LINE_WORDS: u32 = 64;
/// Pattern-source geometry: lines per frame.
const PATTERN_FRAME_LINES: u32 = 8;

/// Frame-sequence offset of the inbound-queue reset, in system cycles after
/// the synchronized frame pulse.
const QUEUE_RESET_AT: u32 = 8;

/// Extra settling cycles between the queue reset releasing and the reader
/// start pulse.
const READER_START_MARGIN: u32 = 4;

/// Cycles of slack granted on top of the worst-case protocol latency before
/// a host-port access is declared lost.
const HOST_WAIT_MARGIN: u32 = 64;

/// Which requester the bus grant currently belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BusOwner {
    Reader,
    Writer,
    Host,
}

/// Actions scheduled behind a frame pulse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameAction {
    /// Trigger the stretched inbound-queue reset.
    QueueReset,
    /// Pulse the reader engine's external start.
    ReaderStart,
}

/// The stream producer in the source domain.
#[derive(Debug)]
pub enum SourceEndpoint {
    /// Frame-structured pattern generator (video stand-in).
    Pattern(PatternSource),
    /// PRBS-31 generator (memtest).
    Prbs(Prbs31Source),
}

impl SourceEndpoint {
    /// Frame-boundary pulse; only the pattern source frames its output.
    pub const fn frame_pulse(&self) -> bool {
        match self {
            Self::Pattern(p) => p.frame_pulse(),
            Self::Prbs(_) => false,
        }
    }

    /// Rewinds the producer to its frame boundary; the PRBS sequence has no
    /// frame structure to realign.
    pub fn clear(&mut self) {
        match self {
            Self::Pattern(p) => p.clear(),
            Self::Prbs(_) => {}
        }
    }
}

impl StreamSource for SourceEndpoint {
    fn valid(&self) -> bool {
        match self {
            Self::Pattern(p) => p.valid(),
            Self::Prbs(p) => p.valid(),
        }
    }

    fn peek(&self) -> u32 {
        match self {
            Self::Pattern(p) => p.peek(),
            Self::Prbs(p) => p.peek(),
        }
    }

    fn pop(&mut self) {
        match self {
            Self::Pattern(p) => p.pop(),
            Self::Prbs(p) => p.pop(),
        }
    }
}

/// The stream consumer in the sink domain.
#[derive(Debug)]
pub enum SinkEndpoint {
    /// Always-ready discard sink.
    Null(NullSink),
    /// PRBS-31 checker (memtest).
    Prbs(Prbs31Checker),
}

impl StreamSink for SinkEndpoint {
    fn ready(&self) -> bool {
        match self {
            Self::Null(s) => s.ready(),
            Self::Prbs(s) => s.ready(),
        }
    }

    fn push(&mut self, word: u32) {
        match self {
            Self::Null(s) => s.push(word),
            Self::Prbs(s) => s.push(word),
        }
    }
}

/// The assembled reference system.
#[derive(Debug)]
pub struct System {
    config: Config,
    clock: ClockPlan,

    /// Protocol controller (system domain).
    pub ctrl: HyperRamController,
    /// Behavioral memory device.
    pub device: HyperRamDevice,
    /// Device wire state registered toward the controller.
    link_in: LinkInput,

    /// Stream-to-memory engine.
    pub reader: StreamReader,
    /// Memory-to-stream engine.
    pub writer: StreamWriter,
    owner: BusOwner,
    host_request: Option<BusRequest>,
    host_reply: Option<BusReply>,

    /// Source domain to system domain queue.
    pub inbound: AsyncFifo,
    /// System domain to sink domain queue.
    pub outbound: AsyncFifo,
    /// Producer in the source domain.
    pub source: SourceEndpoint,
    /// Consumer in the sink domain.
    pub sink: SinkEndpoint,

    frame_pulse: PulseSync,
    sequence: Timeline<FrameAction>,
    queue_reset: ResetStretcher,
    /// Source-domain image of the system-side queue-reset level.
    wr_reset_sync: BitSync,
}

impl System {
    /// Builds the reference topology: pattern source in, null sink out.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `config` fails validation.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::assemble(
            config,
            SourceEndpoint::Pattern(PatternSource::new(PATTERN_LINE_WORDS, PATTERN_FRAME_LINES)),
            SinkEndpoint::Null(NullSink::default()),
        )
    }

    /// Builds the memtest topology: PRBS source in, PRBS checker out.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `config` fails validation.
    pub fn memtest(config: Config) -> Result<Self, ConfigError> {
        Self::assemble(
            config,
            SourceEndpoint::Prbs(Prbs31Source::new()),
            SinkEndpoint::Prbs(Prbs31Checker::new()),
        )
    }

    fn assemble(
        config: Config,
        source: SourceEndpoint,
        sink: SinkEndpoint,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let reader_start_at = QUEUE_RESET_AT
            + config.fifo.reset_hold
            + config.fifo.sync_stages
            + READER_START_MARGIN;
        Ok(Self {
            clock: ClockPlan::new(&config.clocks),
            ctrl: HyperRamController::new(&config.protocol),
            device: HyperRamDevice::new(&config.device),
            link_in: LinkInput::idle(),
            reader: StreamReader::new(&config.reader),
            writer: StreamWriter::new(&config.writer),
            owner: BusOwner::Host,
            host_request: None,
            host_reply: None,
            inbound: AsyncFifo::new(&config.fifo),
            outbound: AsyncFifo::new(&config.fifo),
            source,
            sink,
            frame_pulse: PulseSync::new(config.fifo.sync_stages),
            sequence: Timeline::new(vec![
                (QUEUE_RESET_AT, FrameAction::QueueReset),
                (reader_start_at, FrameAction::ReaderStart),
            ]),
            queue_reset: ResetStretcher::new(config.fifo.reset_hold),
            wr_reset_sync: BitSync::new(config.fifo.sync_stages),
            config,
        })
    }

    /// The validated configuration the system was built from.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// True while the frame-sequenced inbound-queue reset is asserted.
    pub const fn queue_reset_asserted(&self) -> bool {
        self.queue_reset.asserted()
    }

    /// Runs the whole plan until the system domain has advanced `sys_cycles`
    /// more edges; source and sink domains interleave per their periods.
    pub fn run(&mut self, sys_cycles: u64) {
        let target = self.clock.ticks(Domain::Sys) + sys_cycles;
        while self.clock.ticks(Domain::Sys) < target {
            match self.clock.next() {
                Domain::Sys => self.tick_sys(),
                Domain::Source => self.tick_source(),
                Domain::Sink => self.tick_sink(),
            }
        }
    }

    /// One system-domain edge: frame sequencing, grant, controller, device,
    /// engines, and the system-side queue ends.
    fn tick_sys(&mut self) {
        // Frame pulse crossing in from the source domain.
        if self.frame_pulse.tick() {
            debug!("frame pulse reached system domain");
            self.writer.core.set_start(true);
            self.sequence.trigger();
        }
        match self.sequence.tick() {
            Some(FrameAction::QueueReset) => self.queue_reset.trigger(),
            Some(FrameAction::ReaderStart) => self.reader.core.set_start(true),
            None => {}
        }
        let queue_reset = self.queue_reset.tick();

        // Combinational views of each requester.
        let inbound_valid = self.inbound.read_valid();
        let inbound_data = self.inbound.read_peek();
        let outbound_ready = !self.outbound.write_full();
        let reader_req = self.reader.bus_request(inbound_valid, inbound_data);
        let writer_req = self.writer.bus_request(outbound_ready);
        let host_req = self.host_request.unwrap_or_default();

        // Burst-granular grant: reassigned only while the controller is idle
        // and the current owner has released its cycle line.
        let owner_req = match self.owner {
            BusOwner::Reader => reader_req,
            BusOwner::Writer => writer_req,
            BusOwner::Host => host_req,
        };
        if self.ctrl.is_idle() && !owner_req.cycle {
            self.owner = if reader_req.cycle {
                BusOwner::Reader
            } else if writer_req.cycle {
                BusOwner::Writer
            } else if host_req.cycle {
                BusOwner::Host
            } else {
                self.owner
            };
        }
        let granted = match self.owner {
            BusOwner::Reader => reader_req,
            BusOwner::Writer => writer_req,
            BusOwner::Host => host_req,
        };

        let (reply, link_out) = self.ctrl.tick(&granted, &self.link_in);
        self.link_in = self.device.tick(&link_out, self.ctrl.phy().delay_tap());

        // Only the granted requester observes the reply.
        let reader_reply = if self.owner == BusOwner::Reader {
            reply
        } else {
            BusReply::idle()
        };
        let consumed = self.reader.tick(inbound_valid, &reader_reply);
        let _ = self.inbound.read_tick(consumed, queue_reset);

        let writer_reply = if self.owner == BusOwner::Writer {
            reply
        } else {
            BusReply::idle()
        };
        let delivered = self.writer.tick(outbound_ready, &writer_reply);
        let _ = self.outbound.write_tick(delivered, false);

        if self.owner == BusOwner::Host && reply.ack {
            self.host_reply = Some(reply);
        }
    }

    /// One source-domain edge: producer into the inbound queue's write side.
    fn tick_source(&mut self) {
        let reset = self.wr_reset_sync.tick(self.queue_reset.asserted());
        if reset {
            // Words the reset drops out of the queue are regenerated: the
            // producer rewinds to its frame boundary while the reset holds.
            self.source.clear();
        }
        let push = if !reset && self.source.valid() && !self.inbound.write_full() {
            Some(self.source.peek())
        } else {
            None
        };
        if self.inbound.write_tick(push, reset) {
            self.source.pop();
            if self.source.frame_pulse() {
                self.frame_pulse.send();
            }
        }
    }

    /// One sink-domain edge: outbound queue's read side into the consumer.
    fn tick_sink(&mut self) {
        let take = self.sink.ready();
        if let Some(word) = self.outbound.read_tick(take, false) {
            self.sink.push(word);
        }
    }

    /// Worst-case system cycles for one host beat to acknowledge.
    fn host_wait_bound(&self) -> u32 {
        COMMAND_WINDOW_CYCLES
            + self
                .config
                .protocol
                .strobe_timeout
                .max(self.config.protocol.write_latency)
            + HOST_WAIT_MARGIN
    }

    fn host_access(&mut self, req: BusRequest) -> Result<BusReply, HostPortError> {
        if self.reader.core.busy() || self.writer.core.busy() {
            return Err(HostPortError::Busy);
        }
        self.host_request = Some(req);
        self.host_reply = None;
        let bound = self.host_wait_bound();
        let mut result = Err(HostPortError::NoAcknowledge { cycles: bound });
        for _ in 0..bound {
            self.tick_sys();
            if let Some(reply) = self.host_reply.take() {
                result = Ok(reply);
                break;
            }
        }
        self.host_request = None;
        // Drain the controller back to idle so the next access starts clean.
        for _ in 0..2 * COMMAND_WINDOW_CYCLES {
            if self.ctrl.is_idle() {
                break;
            }
            self.tick_sys();
        }
        result
    }

    /// Single-beat classic write through the host port.
    ///
    /// # Errors
    ///
    /// [`HostPortError::Busy`] when a DMA engine holds the grant;
    /// [`HostPortError::NoAcknowledge`] when the bus never acknowledges
    /// within the stall bound plus margin.
    pub fn host_write(&mut self, addr: WordAddr, word: u32) -> Result<(), HostPortError> {
        let req = BusRequest::write(addr, word, ByteMask::ALL, CycleType::EndOfBurst);
        self.host_access(req).map(|_| ())
    }

    /// Single-beat classic read through the host port.
    ///
    /// # Errors
    ///
    /// Same conditions as [`System::host_write`]. A read that hit the forced
    /// timeout path still returns `Ok` with undefined data, exactly as a
    /// blocked bus master would observe it.
    pub fn host_read(&mut self, addr: WordAddr) -> Result<u32, HostPortError> {
        let req = BusRequest::read(addr, CycleType::EndOfBurst);
        self.host_access(req).map(|reply| reply.read_data)
    }

    /// Bring-up delay-tap sweep: writes a pattern set once, reads it back at
    /// every input tap, and locks the center of the widest passing run.
    ///
    /// Returns the locked tap.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::NoWorkingTap`] when no tap round-trips correctly;
    /// [`CalibrationError::Port`] when a sweep access fails outright.
    pub fn calibrate(&mut self) -> Result<u8, CalibrationError> {
        const PATTERNS: [u32; 4] = [0x0000_0000, 0xFFFF_FFFF, 0xA5A5_5A5A, 0x1234_5678];
        let base = WordAddr::new(self.config.device.size_words - PATTERNS.len() as u32);

        // The write path is sampling-independent; one pass suffices.
        for (i, &pattern) in PATTERNS.iter().enumerate() {
            self.host_write(base.offset(i as u32), pattern)?;
        }

        let mut passing = [false; DELAY_TAP_MAX as usize + 1];
        self.ctrl.phy_mut().reset_delay();
        for tap in 0..=DELAY_TAP_MAX {
            while self.ctrl.phy().delay_tap() < tap {
                self.ctrl.phy_mut().adjust_delay(DelayDirection::Increment);
            }
            let mut ok = true;
            for (i, &pattern) in PATTERNS.iter().enumerate() {
                ok &= self.host_read(base.offset(i as u32))? == pattern;
            }
            passing[tap as usize] = ok;
            debug!(tap, ok, "calibration tap probed");
        }

        let (start, len) = longest_run(&passing);
        if len == 0 {
            return Err(CalibrationError::NoWorkingTap {
                taps_tried: DELAY_TAP_MAX + 1,
            });
        }
        let center = (start + (len - 1) / 2) as u8;
        self.ctrl.phy_mut().reset_delay();
        while self.ctrl.phy().delay_tap() < center {
            self.ctrl.phy_mut().adjust_delay(DelayDirection::Increment);
        }
        info!(tap = center, window = len, "link calibration locked");
        Ok(center)
    }

    /// Aggregated counters for the run so far.
    pub fn report(&self) -> SimReport {
        SimReport {
            sys_cycles: self.clock.ticks(Domain::Sys),
            source_cycles: self.clock.ticks(Domain::Source),
            sink_cycles: self.clock.ticks(Domain::Sink),
            ctrl: self.ctrl.stats,
            reader: self.reader.core.stats,
            writer: self.writer.core.stats,
            inbound: self.inbound.stats,
            outbound: self.outbound.stats,
        }
    }
}

/// Start and length of the longest `true` run.
fn longest_run(flags: &[bool]) -> (usize, usize) {
    let mut best = (0, 0);
    let mut start = 0;
    let mut len = 0;
    for (i, &flag) in flags.iter().enumerate() {
        if flag {
            if len == 0 {
                start = i;
            }
            len += 1;
            if len > best.1 {
                best = (start, len);
            }
        } else {
            len = 0;
        }
    }
    best
}
