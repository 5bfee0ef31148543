use std::time::{Duration, Instant};

/// A repeating timer that is polled from the display loop instead of firing on its own.
///
/// Ticks that were missed because the loop was busy are not replayed: a late poll fires once
/// and the next tick is scheduled on the original cadence.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next_due: Instant,
}

impl Interval {
    /// `None` for a zero period, which would never stop firing
    pub fn starting_at(start: Instant, period: Duration) -> Option<Self> {
        if period.is_zero() {
            return None;
        }
        Some(Self {
            period,
            next_due: start + period,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Returns `true` if a tick is due at `now`, and schedules the following one
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        while self.next_due <= now {
            self.next_due += self.period;
        }
        true
    }
}
