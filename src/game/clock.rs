use std::time::{Duration, Instant};

/// Decides when the next simulation tick is due.
///
/// Uses catch-up accounting: a due tick advances the reference point by
/// exactly one interval instead of snapping to `now`, so frame jitter does
/// not accumulate into drift. At most one tick is reported per call.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    last_tick: Instant,
}

impl TickClock {
    pub fn new(now: Instant) -> Self {
        Self { last_tick: now }
    }

    /// Re-arm the clock, e.g. after a pause, an overlay or a reset
    pub fn reset(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// True when a tick is due at `now`; consumes one interval if so
    pub fn due(&mut self, now: Instant, interval: Duration) -> bool {
        if now.saturating_duration_since(self.last_tick) >= interval {
            self.last_tick += interval;
            true
        } else {
            false
        }
    }
}
