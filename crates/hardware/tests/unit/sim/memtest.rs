//! End-to-end pseudo-random memory test through the full data path.

use crate::common::harness::init_tracing;
use hypersim_core::config::Config;
use hypersim_core::dma::{REG_BURST_SIZE, REG_ENABLE, REG_START_ADDRESS, REG_TRANSFER_SIZE};
use hypersim_core::sim::{SinkEndpoint, System};

const TEST_WORDS: u32 = 64;

#[test]
fn prbs_survives_a_full_round_trip() {
    init_tracing();
    let mut sys = match System::memtest(Config::default()) {
        Ok(sys) => sys,
        Err(err) => panic!("system construction failed: {err}"),
    };
    match sys.calibrate() {
        Ok(_) => {}
        Err(err) => panic!("calibration failed: {err}"),
    }

    // Phase one: stream the sequence into memory.
    sys.reader.core.write_csr(REG_START_ADDRESS, 0);
    sys.reader.core.write_csr(REG_TRANSFER_SIZE, TEST_WORDS);
    sys.reader.core.write_csr(REG_BURST_SIZE, 8);
    sys.reader.core.write_csr(REG_ENABLE, 1);
    sys.run(4000);
    assert!(sys.reader.core.done(), "inbound transfer did not complete");

    // Phase two: read it back out to the checker.
    sys.writer.core.write_csr(REG_START_ADDRESS, 0);
    sys.writer.core.write_csr(REG_TRANSFER_SIZE, TEST_WORDS);
    sys.writer.core.write_csr(REG_BURST_SIZE, 8);
    sys.writer.core.write_csr(REG_ENABLE, 1);
    sys.run(4000);
    assert!(sys.writer.core.done(), "outbound transfer did not complete");
    // Let the sink domain drain the outbound queue.
    sys.run(200);

    match &sys.sink {
        SinkEndpoint::Prbs(checker) => {
            assert_eq!(checker.checked, u64::from(TEST_WORDS));
            assert_eq!(checker.mismatches, 0);
        }
        SinkEndpoint::Null(_) => panic!("memtest topology must carry a checker sink"),
    }

    let report = sys.report();
    assert_eq!(report.reader.words_moved, u64::from(TEST_WORDS));
    assert_eq!(report.writer.words_moved, u64::from(TEST_WORDS));
    assert_eq!(report.ctrl.timeouts_forced, 0);
}
