//! The CDC queue's ordering guarantee under arbitrary clock-period ratios.

use hypersim_core::cdc::AsyncFifo;
use hypersim_core::config::FifoConfig;
use proptest::prelude::*;

proptest! {
    /// Any write-domain sequence is observed on the read domain in order,
    /// without loss or duplication, whatever the period ratio.
    #[test]
    fn sequence_crosses_in_order(
        wr_period in 1u64..6,
        rd_period in 1u64..6,
        depth_pow in 1u32..5,
        sync_stages in 2u32..4,
        words in proptest::collection::vec(any::<u32>(), 1..200),
    ) {
        let config = FifoConfig {
            depth: 1 << depth_pow,
            sync_stages,
            reset_hold: sync_stages + 1,
        };
        let mut fifo = AsyncFifo::new(&config);

        let mut sent = 0usize;
        let mut received = Vec::with_capacity(words.len());

        // Generous global deadline: throughput is bounded below by the
        // slower domain once the synchronizer pipelines fill.
        let deadline = (words.len() as u64 + 64) * wr_period.max(rd_period) * 4;
        for t in 0..deadline {
            if t % wr_period == 0 {
                let push = (sent < words.len()).then(|| words[sent]);
                if fifo.write_tick(push, false) {
                    sent += 1;
                }
            }
            if t % rd_period == 0 {
                if let Some(word) = fifo.read_tick(true, false) {
                    received.push(word);
                }
            }
        }

        prop_assert_eq!(received, words);
    }

    /// A held write-side + read-side reset empties the queue and the sides
    /// agree on occupancy afterward.
    #[test]
    fn reset_resynchronizes_both_sides(
        preload in 1u32..12,
        sync_stages in 2u32..4,
    ) {
        let config = FifoConfig {
            depth: 16,
            sync_stages,
            reset_hold: sync_stages + 1,
        };
        let mut fifo = AsyncFifo::new(&config);
        for word in 0..preload {
            let _ = fifo.write_tick(Some(word), false);
        }

        for _ in 0..config.reset_hold {
            let _ = fifo.write_tick(None, true);
            let _ = fifo.read_tick(false, true);
        }

        let mut drained = Vec::new();
        for word in 100..104u32 {
            let _ = fifo.write_tick(Some(word), false);
            if let Some(got) = fifo.read_tick(true, false) {
                drained.push(got);
            }
        }
        for _ in 0..8 {
            let _ = fifo.write_tick(None, false);
            if let Some(got) = fifo.read_tick(true, false) {
                drained.push(got);
            }
        }
        prop_assert_eq!(drained, vec![100, 101, 102, 103]);
    }
}
