//! Run-local iteration state for driving a schedule.

use std::time::Duration;

use crate::schedule::{Decision, Schedule};

/// The cursor a driver holds while interpreting a [`Schedule`].
///
/// Created fresh per driver invocation and discarded at the end; the
/// schedule itself is shared and never mutated, so one schedule can back
/// any number of concurrent runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleCursor {
    index: u32,
    last_delay: Duration,
}

impl ScheduleCursor {
    /// A cursor at the start of a run.
    pub fn new() -> Self {
        Self::default()
    }

    /// The next iteration index the cursor will ask about.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The delay of the last proceeding decision.
    pub fn last_delay(&self) -> Duration {
        self.last_delay
    }

    /// Ask the schedule for the decision at the current index.
    ///
    /// Advances the cursor only when the schedule proceeds.
    pub fn next(&mut self, schedule: &Schedule) -> Decision {
        let decision = schedule.decide(self.index);
        if decision.proceed {
            self.index = self.index.saturating_add(1);
            self.last_delay = decision.delay;
        }
        decision
    }
}
