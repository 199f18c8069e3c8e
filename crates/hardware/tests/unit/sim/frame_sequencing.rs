//! Frame-pulse sequencing: queue reset before the externally started reader.

use crate::common::harness::init_tracing;
use hypersim_core::common::error::ConfigError;
use hypersim_core::config::{Config, StartMode};
use hypersim_core::dma::{REG_BURST_SIZE, REG_ENABLE, REG_TRANSFER_SIZE};
use hypersim_core::sim::System;

fn framed_system() -> System {
    init_tracing();
    let mut config = Config::default();
    config.reader.start_mode = StartMode::External;
    match System::new(config) {
        Ok(sys) => sys,
        Err(err) => panic!("system construction failed: {err}"),
    }
}

#[test]
fn queue_reset_precedes_the_reader_start() {
    let mut sys = framed_system();

    // Armed but not started: the frame sequence owns the start pulse.
    sys.reader.core.write_csr(REG_TRANSFER_SIZE, 16);
    sys.reader.core.write_csr(REG_BURST_SIZE, 8);
    sys.reader.core.write_csr(REG_ENABLE, 1);

    let mut reset_at = None;
    let mut busy_at = None;
    let mut reset_cycles = 0u32;
    for cycle in 0..3000u64 {
        sys.run(1);
        if sys.queue_reset_asserted() {
            reset_cycles += 1;
            if reset_at.is_none() {
                reset_at = Some(cycle);
            }
        }
        if busy_at.is_none() && sys.reader.core.busy() {
            busy_at = Some(cycle);
        }
        if sys.reader.core.done() {
            break;
        }
    }

    let reset_at = reset_at.expect("queue reset never asserted");
    let busy_at = busy_at.expect("reader never started");
    assert!(
        busy_at > reset_at,
        "reader started at {busy_at} before the queue reset at {reset_at}"
    );
    // Post-edge sampling sees the hold window minus the trigger cycle.
    assert!(reset_cycles >= sys.config().fifo.reset_hold - 1);

    assert!(sys.reader.core.done(), "frame transfer did not complete");
    let report = sys.report();
    assert_eq!(report.reader.words_moved, 16);
    assert!(report.inbound.resets > 0);

    // The transfer starts at the top of the frame, not mid-stream.
    for i in 0..16u32 {
        assert_eq!(sys.device.peek(i), 0x0100_0000 ^ i, "word {i} misaligned");
    }
}

#[test]
fn queue_reset_realigns_the_source_between_frames() {
    let mut sys = framed_system();
    sys.reader.core.write_csr(REG_TRANSFER_SIZE, 16);
    sys.reader.core.write_csr(REG_BURST_SIZE, 8);
    sys.reader.core.write_csr(REG_ENABLE, 1);

    // Two frame pulses, two externally started transfers. Between them the
    // source runs ahead of the queue reset; the rewind during the reset must
    // put the second transfer back on the frame boundary.
    for _ in 0..4000 {
        if sys.report().reader.words_moved >= 32 {
            break;
        }
        sys.run(1);
    }
    assert_eq!(sys.report().reader.words_moved, 32);
    for i in 0..16u32 {
        assert_eq!(
            sys.device.peek(i),
            0x0200_0000 ^ i,
            "word {i} of the second frame misaligned"
        );
    }
}

#[test]
fn slow_source_domain_requires_a_longer_reset_hold() {
    // A hold that passes the cycle-count bound can still expire between two
    // samples of a slow observing domain; construction must reject it.
    let mut config = Config::default();
    config.reader.start_mode = StartMode::External;
    config.clocks.source_period_ps = 5 * config.clocks.sys_period_ps;
    assert!(matches!(
        System::new(config),
        Err(ConfigError::ResetWindow { .. })
    ));

    config.fifo.reset_hold = 15;
    assert!(System::new(config).is_ok());
}
