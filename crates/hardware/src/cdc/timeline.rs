//! Delayed one-shot action scheduling.
//!
//! A timeline fires a fixed set of actions at fixed offsets after a trigger,
//! all within one clock domain. The frame-sequencing path uses it to space
//! the queue reset and the reader start pulse behind the synchronized frame
//! pulse.

/// A trigger-relative schedule of one-shot actions.
///
/// Offsets must be distinct; at most one action fires per cycle. A re-trigger
/// while a schedule is running restarts it from the beginning.
#[derive(Clone, Debug)]
pub struct Timeline<A: Copy> {
    schedule: Vec<(u32, A)>,
    /// Cycles since the trigger, or `None` while dormant.
    elapsed: Option<u32>,
}

impl<A: Copy> Timeline<A> {
    /// A dormant timeline with the given (offset, action) schedule.
    pub fn new(mut schedule: Vec<(u32, A)>) -> Self {
        schedule.sort_by_key(|&(offset, _)| offset);
        debug_assert!(
            schedule.windows(2).all(|w| w[0].0 != w[1].0),
            "timeline offsets must be distinct"
        );
        Self {
            schedule,
            elapsed: None,
        }
    }

    /// Starts (or restarts) the schedule; offset 0 fires on the next tick.
    pub fn trigger(&mut self) {
        self.elapsed = Some(0);
    }

    /// Clocks the timeline; returns the action scheduled for this cycle.
    pub fn tick(&mut self) -> Option<A> {
        let elapsed = self.elapsed?;
        let fired = self
            .schedule
            .iter()
            .find(|&&(offset, _)| offset == elapsed)
            .map(|&(_, action)| action);
        let last = self.schedule.last().map_or(0, |&(offset, _)| offset);
        self.elapsed = if elapsed >= last {
            None
        } else {
            Some(elapsed + 1)
        };
        fired
    }

    /// True while the schedule is running.
    pub const fn running(&self) -> bool {
        self.elapsed.is_some()
    }
}
