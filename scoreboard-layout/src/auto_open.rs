use crate::{
    row::{RowSlots, TeamRowHandle},
    selection::TeamSelection,
    timer::Interval,
    viewport::DisplaySurface,
};
use log::*;
use std::time::{Duration, Instant};

/// Height of a collapsed team row, in unscaled pixels
pub const COLLAPSED_ROW_HEIGHT: f32 = 100.0;
/// The cursor goes back to the first row after this many rows, whatever the team count
pub const AUTO_OPEN_WRAP: usize = 10;

#[derive(Debug, Clone)]
enum AutoOpenState {
    Idle,
    Scheduled(Interval),
}

/// Opens one team row after another on a timer, for screens nobody is interacting with
#[derive(Debug, Clone)]
pub struct TeamAutoOpener {
    state: AutoOpenState,
    next_team_to_open: usize,
}

impl TeamAutoOpener {
    /// Stays idle forever unless `period` is set and non-zero
    pub fn new(period: Option<Duration>, now: Instant) -> Self {
        let state = match period.and_then(|period| Interval::starting_at(now, period)) {
            Some(interval) => {
                info!("Opening a team row every {:?}", interval.period());
                AutoOpenState::Scheduled(interval)
            }
            None => AutoOpenState::Idle,
        };
        Self {
            state,
            next_team_to_open: 0,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, AutoOpenState::Scheduled(_))
    }

    /// Row position that will be opened on the next tick
    pub fn next_team_to_open(&self) -> usize {
        self.next_team_to_open
    }

    /// Runs a tick if one is due. Returns whether it did.
    pub fn poll<R: TeamRowHandle>(
        &mut self,
        now: Instant,
        rows: &mut RowSlots<R>,
        selection: &mut TeamSelection,
        scale: f32,
        surface: &mut dyn DisplaySurface,
    ) -> bool {
        let AutoOpenState::Scheduled(interval) = &mut self.state else {
            return false;
        };
        if !interval.poll(now) {
            return false;
        }
        self.tick(rows, selection, scale, surface);
        true
    }

    /// Clicks the row under the cursor, scrolls it into view, and moves the cursor on. A
    /// position without a mounted row is passed over.
    pub fn tick<R: TeamRowHandle>(
        &mut self,
        rows: &mut RowSlots<R>,
        selection: &mut TeamSelection,
        scale: f32,
        surface: &mut dyn DisplaySurface,
    ) {
        let position = self.next_team_to_open;
        if let Some(row) = rows.get_mut(position) {
            trace!("Auto opening row {position}");
            row.handle_click(selection);
            surface.scroll_to(COLLAPSED_ROW_HEIGHT * scale * position as f32);
        } else {
            trace!("No row mounted at {position}, skipping");
        }

        self.next_team_to_open += 1;
        if self.next_team_to_open >= AUTO_OPEN_WRAP {
            self.next_team_to_open = 0;
        }
    }
}
