//! Protocol controller: state machine, PHY, supervisor, and bus adapter.
//!
//! One [`HyperRamController::tick`] call models one system-domain clock edge.
//! The controller consumes the requester's bus signals and the previous
//! cycle's device wire state, and produces the bus reply plus this cycle's
//! wire activity. Every transaction path, including stalls, terminates in an
//! acknowledgment: the requester can block on `ack` without a watchdog.

use tracing::{trace, warn};

use crate::bus::{BusReply, BusRequest, CycleType};
use crate::config::ProtocolConfig;
use crate::hyperbus::command::CommandWord;
use crate::hyperbus::fsm::{COMMAND_WINDOW_CYCLES, PhaseTimer, STROBE_NOISE_SKIP_CYCLES, State};
use crate::hyperbus::phy::HyperBusPhy;
use crate::hyperbus::supervisor::BurstSupervisor;
use crate::hyperbus::wire::{LinkInput, LinkOutput};
use crate::stats::CtrlStats;

/// The memory-controller core exposed to bus requesters.
#[derive(Debug)]
pub struct HyperRamController {
    write_latency: u32,
    supervisor: BurstSupervisor,
    phy: HyperBusPhy,
    state: State,
    phase: PhaseTimer,
    device_reset: bool,
    /// Behavioral counters; read at any time, never reset by the controller.
    pub stats: CtrlStats,
}

impl HyperRamController {
    /// A controller in `IDLE` with the device reset line still asserted; the
    /// line is released on the first tick.
    pub fn new(config: &ProtocolConfig) -> Self {
        Self {
            write_latency: config.write_latency,
            supervisor: BurstSupervisor::new(config.burst_ceiling, config.strobe_timeout),
            phy: HyperBusPhy::new(),
            state: State::Idle,
            phase: PhaseTimer::new(),
            device_reset: true,
            stats: CtrlStats::default(),
        }
    }

    /// Current state; exposed for assembly-level sequencing and tests.
    pub const fn state(&self) -> State {
        self.state
    }

    /// True when no transaction window is open.
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// The PHY shift layer, for calibration-time delay stepping.
    pub const fn phy(&self) -> &HyperBusPhy {
        &self.phy
    }

    /// Mutable PHY access, for calibration-time delay stepping.
    pub fn phy_mut(&mut self) -> &mut HyperBusPhy {
        &mut self.phy
    }

    /// Advances one system-domain clock edge.
    ///
    /// `req` is the requester's bus activity for this cycle; `link_in` is the
    /// device's wire state launched last cycle. Returns the bus reply for
    /// this cycle and the controller's wire activity.
    pub fn tick(&mut self, req: &BusRequest, link_in: &LinkInput) -> (BusReply, LinkOutput) {
        // The reset line is held from power-on and released exactly once.
        let reset = self.device_reset;
        self.device_reset = false;

        // Aligned views of the previous cycle's wire state.
        let strobe = self.phy.strobe();
        let captured = self.phy.sample_word();
        let waited = self.phase.elapsed();

        let entry_state = self.state;
        let mut reply = BusReply::idle();

        match entry_state {
            State::Idle => {
                self.supervisor.reset_window();
                if req.active() {
                    self.phy
                        .load_command(CommandWord::encode(req.address, req.write_enable));
                    self.stats.windows += 1;
                    trace!(
                        address = req.address.val(),
                        write = req.write_enable,
                        "chip-select window opened"
                    );
                    self.enter(State::Cmd);
                }
            }
            State::Cmd => {
                if waited == COMMAND_WINDOW_CYCLES - 1 {
                    self.enter(if req.write_enable {
                        State::LatencyWrite
                    } else {
                        State::RwdsWait
                    });
                }
            }
            State::RwdsWait => {
                if waited >= STROBE_NOISE_SKIP_CYCLES && strobe.is_word_boundary() {
                    self.enter(State::ReadStart);
                } else if self.supervisor.stalled(waited) {
                    self.force_timeout(waited);
                }
            }
            State::ReadStart => {
                if strobe.is_word_boundary() {
                    self.enter(State::ReadAck);
                } else if self.supervisor.stalled(waited) {
                    self.force_timeout(waited);
                }
            }
            State::ReadAck => {
                reply.ack = true;
                reply.read_data = captured;
                self.record_word();
                self.stats.words_read += 1;
                reply.window = self.window_hint();
                self.enter(State::ReadBurst);
            }
            State::ReadBurst => {
                if !(req.wants_burst() && self.supervisor.can_continue()) {
                    if req.wants_burst() {
                        self.stats.bursts_truncated += 1;
                    }
                    self.enter(State::Idle);
                } else if strobe.is_word_boundary() {
                    self.enter(State::ReadAck);
                } else if self.supervisor.stalled(waited) {
                    self.force_timeout(waited);
                }
            }
            State::LatencyWrite => {
                if waited == self.write_latency - 1 {
                    self.enter(State::WritePrep);
                }
            }
            State::WritePrep => {
                if req.active() {
                    self.phy.load_data(req.write_data, req.byte_select);
                    reply.ack = true;
                    self.record_word();
                    self.stats.words_written += 1;
                    reply.window = self.window_hint();
                    self.enter(State::WriteBurst);
                } else {
                    // Requester deasserted during the latency window: drain
                    // the transaction without inventing a beat.
                    self.enter(State::WriteFinish);
                }
            }
            State::WriteBurst => {
                if req.wants_burst() && self.supervisor.can_continue() {
                    self.enter(State::WritePrep);
                } else {
                    if req.wants_burst() {
                        self.stats.bursts_truncated += 1;
                    }
                    self.enter(State::WriteFinish);
                }
            }
            State::WriteFinish => self.enter(State::Cleanup),
            State::Timeout => {
                // Fail open: hand the requester an acknowledgment so it can
                // make progress; the data is whatever the link last carried.
                reply.ack = true;
                reply.read_data = captured;
                reply.window = CycleType::EndOfBurst;
                self.stats.timeouts_forced += 1;
                self.enter(State::Cleanup);
            }
            State::Cleanup => self.enter(State::Idle),
        }

        if self.state == entry_state {
            self.phase.advance();
        }

        let dq = self.phy.launch(entry_state.drives_dq());
        let output = LinkOutput {
            cs: entry_state.selects_device(),
            clock_enabled: entry_state.clocks_device(),
            reset,
            dq,
        };
        self.phy.capture(link_in);
        (reply, output)
    }

    fn enter(&mut self, next: State) {
        trace!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
        self.phase.reset();
    }

    fn force_timeout(&mut self, waited: u32) {
        warn!(state = ?self.state, waited, "strobe stall bound expired; forcing acknowledgment");
        self.enter(State::Timeout);
    }

    fn record_word(&mut self) {
        self.supervisor.record_word();
        let words = u64::from(self.supervisor.window_words());
        if words > self.stats.max_window_words {
            self.stats.max_window_words = words;
        }
    }

    fn window_hint(&self) -> CycleType {
        if self.supervisor.can_continue() {
            CycleType::LinearBurst
        } else {
            CycleType::EndOfBurst
        }
    }
}
