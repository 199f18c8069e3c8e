use hypersim_core::bus::{BusReply, BusRequest, ByteMask, CycleType};
use hypersim_core::common::addr::WordAddr;
use hypersim_core::config::Config;
use hypersim_core::device::HyperRamDevice;
use hypersim_core::hyperbus::{HyperRamController, LinkInput};

/// Cycles a single beat may wait for its acknowledgment before the test
/// fails. Covers the command window, either latency, and the stall bound.
const BEAT_WAIT_BOUND: u32 = 256;

/// Cycles allowed for the controller to drain back to idle between
/// transactions.
const DRAIN_BOUND: u32 = 16;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A controller wired straight to the behavioral device, with blocking
/// single-beat and burst helpers for protocol-level tests.
pub struct LinkHarness {
    pub ctrl: HyperRamController,
    pub device: HyperRamDevice,
    link_in: LinkInput,
    /// Input delay tap reported to the device; defaults inside the eye.
    pub tap: u8,
}

impl Default for LinkHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkHarness {
    /// A link with the default configuration and the tap centered in the
    /// default eye.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        init_tracing();
        assert!(config.validate().is_ok(), "harness config must validate");
        Self {
            ctrl: HyperRamController::new(&config.protocol),
            device: HyperRamDevice::new(&config.device),
            link_in: LinkInput::idle(),
            tap: u8::midpoint(config.device.eye_lo, config.device.eye_hi),
        }
    }

    /// One system cycle with the device attached.
    pub fn tick(&mut self, req: &BusRequest) -> BusReply {
        let (reply, link_out) = self.ctrl.tick(req, &self.link_in);
        self.link_in = self.device.tick(&link_out, self.tap);
        reply
    }

    /// One system cycle with the device absent: the wire never responds.
    pub fn tick_dead(&mut self, req: &BusRequest) -> BusReply {
        let (reply, _) = self.ctrl.tick(req, &LinkInput::idle());
        reply
    }

    /// Ticks an idle bus until the controller reports idle.
    pub fn drain(&mut self) {
        for _ in 0..DRAIN_BOUND {
            if self.ctrl.is_idle() {
                return;
            }
            let _ = self.tick(&BusRequest::idle());
        }
        panic!("controller did not return to idle within {DRAIN_BOUND} cycles");
    }

    /// Holds `req` on the bus until it acknowledges; returns the reply and
    /// the cycles waited.
    pub fn complete_beat(&mut self, req: &BusRequest) -> (BusReply, u32) {
        for waited in 0..BEAT_WAIT_BOUND {
            let reply = self.tick(req);
            if reply.ack {
                return (reply, waited);
            }
        }
        panic!("beat at {:?} not acknowledged within {BEAT_WAIT_BOUND} cycles", req.address);
    }

    /// Blocking single-beat classic write.
    pub fn write_word(&mut self, addr: u32, word: u32) {
        let req = BusRequest::write(
            WordAddr::new(addr),
            word,
            ByteMask::ALL,
            CycleType::EndOfBurst,
        );
        let _ = self.complete_beat(&req);
        self.drain();
    }

    /// Blocking single-beat classic read.
    pub fn read_word(&mut self, addr: u32) -> u32 {
        let req = BusRequest::read(WordAddr::new(addr), CycleType::EndOfBurst);
        let (reply, _) = self.complete_beat(&req);
        self.drain();
        reply.read_data
    }

    /// Blocking linear-burst write of consecutive words starting at `addr`.
    pub fn write_burst(&mut self, addr: u32, words: &[u32]) {
        for (i, &word) in words.iter().enumerate() {
            let hint = if i + 1 == words.len() {
                CycleType::EndOfBurst
            } else {
                CycleType::LinearBurst
            };
            let req = BusRequest::write(
                WordAddr::new(addr).offset(i as u32),
                word,
                ByteMask::ALL,
                hint,
            );
            let _ = self.complete_beat(&req);
        }
        self.drain();
    }

    /// Blocking linear-burst read of `count` consecutive words from `addr`.
    pub fn read_burst(&mut self, addr: u32, count: u32) -> Vec<u32> {
        let mut out = Vec::with_capacity(count as usize);
        for i in 0..count {
            let hint = if i + 1 == count {
                CycleType::EndOfBurst
            } else {
                CycleType::LinearBurst
            };
            let req = BusRequest::read(WordAddr::new(addr).offset(i), hint);
            let (reply, _) = self.complete_beat(&req);
            out.push(reply.read_data);
        }
        self.drain();
        out
    }
}
