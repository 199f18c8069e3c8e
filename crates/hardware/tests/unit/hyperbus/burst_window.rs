//! The per-window burst ceiling and the window hint reported to requesters.

use crate::common::LinkHarness;
use hypersim_core::bus::{BusRequest, CycleType};
use hypersim_core::common::addr::WordAddr;
use hypersim_core::config::Config;
use pretty_assertions::assert_eq;

#[test]
fn long_read_never_exceeds_the_ceiling_per_window() {
    let mut link = LinkHarness::new();
    let words: Vec<u32> = (0..600).map(|i| i * 31 + 7).collect();
    for (i, &word) in words.iter().enumerate() {
        link.device.poke(i as u32, word);
    }

    let got = link.read_burst(0, 600);

    assert_eq!(got, words);
    assert!(link.ctrl.stats.max_window_words <= 512);
    assert!(link.ctrl.stats.bursts_truncated >= 1);
    assert_eq!(link.ctrl.stats.words_read, 600);
    // The ceiling split the transfer over more than one chip-select window.
    assert!(link.ctrl.stats.windows >= 2);
}

#[test]
fn long_write_never_exceeds_the_ceiling_per_window() {
    let mut link = LinkHarness::new();
    let words: Vec<u32> = (0..520).map(|i| !i).collect();
    link.write_burst(0x1000, &words);

    for (i, &word) in words.iter().enumerate() {
        assert_eq!(link.device.peek(0x1000 + i as u32), word);
    }
    assert!(link.ctrl.stats.max_window_words <= 512);
    assert!(link.ctrl.stats.bursts_truncated >= 1);
}

#[test]
fn reply_hint_marks_the_last_word_a_window_can_take() {
    let mut config = Config::default();
    config.protocol.burst_ceiling = 4;
    let mut link = LinkHarness::with_config(&config);

    let mut hints = Vec::new();
    for i in 0..4 {
        let req = BusRequest::read(WordAddr::new(i), CycleType::LinearBurst);
        let (reply, _) = link.complete_beat(&req);
        hints.push(reply.window);
    }

    assert_eq!(
        hints,
        vec![
            CycleType::LinearBurst,
            CycleType::LinearBurst,
            CycleType::LinearBurst,
            CycleType::EndOfBurst,
        ]
    );
}
