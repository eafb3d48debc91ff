//! Recency Clock Module
//!
//! Supplies the timestamps used to pick eviction victims.

// == Recency Clock ==
/// Logical clock handing out strictly increasing ticks.
///
/// Wall-clock seconds collapse bursts of accesses onto one value and make the
/// eviction victim depend on tie-breaking. A counter orders every touch.
#[derive(Debug, Default, Clone)]
pub struct RecencyClock {
    /// Last tick handed out
    now: u64,
}

impl RecencyClock {
    // == Constructor ==
    /// Creates a clock whose first tick is 1.
    pub fn new() -> Self {
        Self { now: 0 }
    }

    // == Tick ==
    /// Advances the clock and returns the new timestamp.
    pub fn tick(&mut self) -> u64 {
        self.now += 1;
        self.now
    }

    // == Current ==
    /// Returns the last tick handed out without advancing.
    pub fn current(&self) -> u64 {
        self.now
    }
}
