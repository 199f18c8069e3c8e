//! Liveness under an unresponsive device: every path ends in an ack.

use crate::common::LinkHarness;
use hypersim_core::bus::{BusRequest, CycleType};
use hypersim_core::common::addr::WordAddr;
use hypersim_core::config::Config;
use hypersim_core::hyperbus::fsm::COMMAND_WINDOW_CYCLES;
use rstest::rstest;

/// Cycles of slack allowed beyond command window + stall bound for the
/// timeout and cleanup states themselves.
const TIMEOUT_SLACK: u32 = 8;

fn cycles_until_ack(link: &mut LinkHarness, req: &BusRequest, bound: u32) -> u32 {
    for cycle in 0..bound {
        if link.tick_dead(req).ack {
            return cycle;
        }
    }
    panic!("no acknowledgment within {bound} cycles");
}

#[rstest]
#[case(128)]
#[case(32)]
#[case(1)]
fn dead_link_read_acks_within_stall_bound(#[case] strobe_timeout: u32) {
    let mut config = Config::default();
    config.protocol.strobe_timeout = strobe_timeout;
    let mut link = LinkHarness::with_config(&config);

    let req = BusRequest::read(WordAddr::new(0x10), CycleType::EndOfBurst);
    let waited = cycles_until_ack(&mut link, &req, 512);

    assert!(
        waited <= COMMAND_WINDOW_CYCLES + strobe_timeout + TIMEOUT_SLACK,
        "forced ack took {waited} cycles"
    );
    assert_eq!(link.ctrl.stats.timeouts_forced, 1);

    // The controller drains back to idle and can serve another window.
    link.drain();
    assert!(link.ctrl.is_idle());
}

#[test]
fn dead_link_write_acks_after_fixed_latency() {
    // The write path never waits on the device; a dead link cannot stall it.
    let mut link = LinkHarness::new();
    let req = BusRequest::write(WordAddr::new(0), 0x55, Default::default(), CycleType::EndOfBurst);
    let waited = cycles_until_ack(&mut link, &req, 64);
    assert!(waited <= COMMAND_WINDOW_CYCLES + Config::default().protocol.write_latency + 2);
    assert_eq!(link.ctrl.stats.timeouts_forced, 0);
}

#[test]
fn stalled_burst_continuation_forces_ack() {
    // First word arrives normally, then the device goes silent while the
    // requester asks for more.
    let mut link = LinkHarness::new();
    link.device.poke(0, 0x1234);

    let req = BusRequest::read(WordAddr::new(0), CycleType::LinearBurst);
    let (first, _) = link.complete_beat(&req);
    assert_eq!(first.read_data, 0x1234);

    let next = BusRequest::read(WordAddr::new(1), CycleType::LinearBurst);
    let waited = cycles_until_ack(&mut link, &next, 512);
    assert!(waited <= Config::default().protocol.strobe_timeout + TIMEOUT_SLACK);
    assert_eq!(link.ctrl.stats.timeouts_forced, 1);
}
