//! Protocol-level round trips through the controller and the device model.

use crate::common::LinkHarness;
use hypersim_core::bus::{BusRequest, ByteMask, CycleType};
use hypersim_core::common::addr::WordAddr;
use hypersim_core::config::Config;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(0x0)]
#[case(0x1)]
#[case(0x3)]
#[case(0x7FF)]
#[case(0x1F_FFFF)]
fn single_beat_round_trip(#[case] addr: u32) {
    let mut link = LinkHarness::new();
    let value = 0xDEAD_BEEF ^ addr;
    link.write_word(addr, value);
    assert_eq!(link.device.peek(addr), value);
    assert_eq!(link.read_word(addr), value);
}

#[test]
fn burst_round_trip_preserves_order() {
    let mut link = LinkHarness::new();
    let words: Vec<u32> = (0..16).map(|i| 0x1000_0000 + i * 0x111).collect();
    link.write_burst(0x40, &words);
    for (i, &word) in words.iter().enumerate() {
        assert_eq!(link.device.peek(0x40 + i as u32), word);
    }
    assert_eq!(link.read_burst(0x40, 16), words);
    assert_eq!(link.ctrl.stats.words_written, 16);
    assert_eq!(link.ctrl.stats.words_read, 16);
}

#[rstest]
#[case(9, 9)]
#[case(11, 11)]
#[case(11, 20)]
#[case(4, 16)]
fn round_trip_across_latency_settings(#[case] write_latency: u32, #[case] read_latency: u32) {
    let mut config = Config::default();
    config.protocol.write_latency = write_latency;
    config.device.read_latency = read_latency;
    let mut link = LinkHarness::with_config(&config);
    link.write_word(0x123, 0xCAFE_F00D);
    assert_eq!(link.read_word(0x123), 0xCAFE_F00D);
}

#[test]
fn partial_byte_mask_merges_lanes() {
    let mut link = LinkHarness::new();
    link.write_word(0x8, 0xAABB_CCDD);

    let req = BusRequest::write(
        WordAddr::new(0x8),
        0x1122_3344,
        ByteMask(0b0011),
        CycleType::EndOfBurst,
    );
    let _ = link.complete_beat(&req);
    link.drain();

    assert_eq!(link.read_word(0x8), 0xAABB_3344);
}

#[test]
fn a_write_burst_uses_one_chip_select_window() {
    let mut link = LinkHarness::new();
    let words: Vec<u32> = (0..8).collect();
    link.write_burst(0, &words);
    assert_eq!(link.ctrl.stats.windows, 1);
    assert_eq!(link.ctrl.stats.max_window_words, 8);
}
