//! Bring-up delay-tap sweep against the device's sampling eye.

use crate::common::harness::init_tracing;
use hypersim_core::common::addr::WordAddr;
use hypersim_core::common::error::CalibrationError;
use hypersim_core::config::Config;
use hypersim_core::sim::System;

fn system(config: Config) -> System {
    init_tracing();
    match System::new(config) {
        Ok(sys) => sys,
        Err(err) => panic!("system construction failed: {err}"),
    }
}

#[test]
fn locks_a_tap_inside_the_eye() {
    // Default eye is taps 2..=5; the sweep must land inside it.
    let mut sys = system(Config::default());
    let tap = match sys.calibrate() {
        Ok(tap) => tap,
        Err(err) => panic!("calibration failed: {err}"),
    };
    assert!((2..=5).contains(&tap), "locked tap {tap} outside the eye");
    assert_eq!(sys.ctrl.phy().delay_tap(), tap);

    // The link is usable afterward.
    assert!(sys.host_write(WordAddr::new(0x40), 0xCAFE_F00D).is_ok());
    match sys.host_read(WordAddr::new(0x40)) {
        Ok(got) => assert_eq!(got, 0xCAFE_F00D),
        Err(err) => panic!("post-calibration read failed: {err}"),
    }
}

#[test]
fn closed_eye_reports_every_tap_tried() {
    let mut config = Config::default();
    config.device.eye_lo = 7;
    config.device.eye_hi = 0;
    let mut sys = system(config);
    assert!(matches!(
        sys.calibrate(),
        Err(CalibrationError::NoWorkingTap { taps_tried: 8 })
    ));
}

#[test]
fn uncalibrated_tap_outside_the_eye_corrupts_reads() {
    // The load-value tap is 0, below the default eye, so reads come back
    // folded through the corruption mask until calibration runs.
    let mut sys = system(Config::default());
    assert!(sys.host_write(WordAddr::new(0x10), 0x1122_3344).is_ok());
    match sys.host_read(WordAddr::new(0x10)) {
        Ok(got) => assert_eq!(got, 0x1122_3344 ^ 0xA5A5_5A5A),
        Err(err) => panic!("uncalibrated read failed: {err}"),
    }
}
