//! Single-beat host access through the assembled system.

use crate::common::harness::init_tracing;
use hypersim_core::common::addr::WordAddr;
use hypersim_core::common::error::HostPortError;
use hypersim_core::config::Config;
use hypersim_core::dma::{REG_ENABLE, REG_TRANSFER_SIZE};
use hypersim_core::sim::System;
use rstest::rstest;

/// A configuration whose sampling eye covers every tap, so the host port
/// works without a calibration pass.
pub fn open_eye_config() -> Config {
    let mut config = Config::default();
    config.device.eye_lo = 0;
    config.device.eye_hi = 7;
    config
}

fn system(config: Config) -> System {
    init_tracing();
    match System::new(config) {
        Ok(sys) => sys,
        Err(err) => panic!("system construction failed: {err}"),
    }
}

#[rstest]
#[case(0x0, 0xDEAD_BEEF)]
#[case(0x1234, 0x0000_0001)]
#[case(0x1F_FFF0, 0xFFFF_FFFF)]
fn host_round_trip(#[case] addr: u32, #[case] value: u32) {
    let mut sys = system(open_eye_config());
    assert!(sys.host_write(WordAddr::new(addr), value).is_ok());
    match sys.host_read(WordAddr::new(addr)) {
        Ok(got) => assert_eq!(got, value),
        Err(err) => panic!("host read failed: {err}"),
    }
}

#[test]
fn host_port_denied_while_an_engine_is_busy() {
    let mut sys = system(open_eye_config());
    sys.reader.core.write_csr(REG_TRANSFER_SIZE, 64);
    sys.reader.core.write_csr(REG_ENABLE, 1);
    sys.run(2);
    assert!(sys.reader.core.busy());

    assert!(matches!(
        sys.host_write(WordAddr::new(0x100), 1),
        Err(HostPortError::Busy)
    ));
    assert!(matches!(
        sys.host_read(WordAddr::new(0x100)),
        Err(HostPortError::Busy)
    ));
}

#[test]
fn back_to_back_host_beats_each_get_a_clean_window() {
    let mut sys = system(open_eye_config());
    for i in 0..8u32 {
        assert!(sys.host_write(WordAddr::new(0x200 + i), !i).is_ok());
    }
    for i in 0..8u32 {
        match sys.host_read(WordAddr::new(0x200 + i)) {
            Ok(got) => assert_eq!(got, !i),
            Err(err) => panic!("host read failed: {err}"),
        }
    }
    assert_eq!(sys.report().ctrl.windows, 16);
}
