use crate::{
    row::{RowSlots, TeamRowHandle},
    timer::Interval,
};
use log::*;
use std::time::{Duration, Instant};

/// How often every row is forced open while preparing for a capture
pub const SAVE_MODE_PERIOD: Duration = Duration::from_secs(5);

/// Keeps every team row expanded so the whole scoreboard can be captured as an image.
///
/// Once activated it never stops; the capture is expected to happen after the first tick has
/// given the layout time to settle.
#[derive(Debug, Clone, Default)]
pub struct SaveModePreparer {
    interval: Option<Interval>,
}

impl SaveModePreparer {
    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Starts the timer. Activating it again leaves the running timer alone.
    pub fn activate(&mut self, now: Instant) {
        if self.interval.is_none() {
            info!("Preparing the scoreboard for capture");
            self.interval = Interval::starting_at(now, SAVE_MODE_PERIOD);
        }
    }

    /// Opens every row if a tick is due. Returns whether it did.
    pub fn poll<R: TeamRowHandle>(&mut self, now: Instant, rows: &mut RowSlots<R>) -> bool {
        let due = self.interval.as_mut().is_some_and(|i| i.poll(now));
        if due {
            Self::open_all(rows);
        }
        due
    }

    pub fn open_all<R: TeamRowHandle>(rows: &mut RowSlots<R>) {
        let mut opened = 0;
        for row in rows.mounted_mut() {
            row.open();
            opened += 1;
        }
        trace!("Forced {opened} rows open");
    }
}
