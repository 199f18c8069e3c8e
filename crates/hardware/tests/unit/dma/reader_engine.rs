//! Reader engine against the real controller and device.

use crate::common::LinkHarness;
use crate::common::mocks::stream::scripted_source;
use hypersim_core::config::EngineConfig;
use hypersim_core::dma::{
    REG_BURST_SIZE, REG_ENABLE, REG_RESET, REG_START_ADDRESS, REG_TRANSFER_SIZE, StreamReader,
};
use hypersim_core::stream::StreamSource;
use pretty_assertions::assert_eq;

/// Runs the reader against the link, drawing words from `source`.
fn pump(
    link: &mut LinkHarness,
    reader: &mut StreamReader,
    source: &mut dyn StreamSource,
    cycles: u32,
) {
    for _ in 0..cycles {
        let valid = source.valid();
        let data = if valid { source.peek() } else { 0 };
        let req = reader.bus_request(valid, data);
        let reply = link.tick(&req);
        if reader.tick(valid, &reply) {
            source.pop();
        }
    }
}

#[test]
fn streams_words_into_memory_in_order() {
    let mut link = LinkHarness::new();
    let words: Vec<u32> = (0..8).map(|i| 0x5000_0000 | i).collect();
    let (mut source, queue) = scripted_source(words.clone());

    let mut reader = StreamReader::new(&EngineConfig::default());
    reader.core.write_csr(REG_START_ADDRESS, 0x100);
    reader.core.write_csr(REG_TRANSFER_SIZE, 8);
    reader.core.write_csr(REG_BURST_SIZE, 4);
    reader.core.write_csr(REG_ENABLE, 1);

    pump(&mut link, &mut reader, &mut source, 500);

    assert!(queue.borrow().is_empty(), "source fully drained");
    for (i, &word) in words.iter().enumerate() {
        assert_eq!(link.device.peek(0x40 + i as u32), word);
    }
    assert!(reader.core.done());
    assert_eq!(reader.core.stats.bursts, 2);
    assert_eq!(reader.core.stats.words_moved, 8);
}

#[test]
fn reset_before_first_ack_leaves_memory_untouched() {
    let mut link = LinkHarness::new();
    let (mut source, queue) = scripted_source(vec![0x7777_7777]);

    let mut reader = StreamReader::new(&EngineConfig::default());
    reader.core.write_csr(REG_START_ADDRESS, 0);
    reader.core.write_csr(REG_TRANSFER_SIZE, 1);
    reader.core.write_csr(REG_BURST_SIZE, 1);
    reader.core.write_csr(REG_ENABLE, 1);

    // The write path spends the command window plus latency before the first
    // acknowledgment; abort well inside that.
    pump(&mut link, &mut reader, &mut source, 5);
    assert!(reader.core.busy());
    reader.core.write_csr(REG_RESET, 0);
    pump(&mut link, &mut reader, &mut source, 50);

    assert!(!reader.core.busy());
    assert!(!reader.core.done());
    assert_eq!(reader.core.stats.words_moved, 0);
    assert_eq!(queue.borrow().len(), 1, "no word was consumed");
    assert_eq!(link.device.peek(0), 0);
    assert!(link.ctrl.is_idle());
}
