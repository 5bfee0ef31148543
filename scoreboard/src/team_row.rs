use log::*;
use scoreboard_common::model::TeamId;
use scoreboard_layout::{LiveModelSync, TeamRowHandle, TeamSelection};
use std::{cell::Cell, collections::HashMap, rc::Rc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowState {
    #[default]
    Collapsed,
    Expanded,
}

impl RowState {
    fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }
}

/// The engine's handle on one drawn team row. The state is shared with the registry, so it
/// follows the team rather than the position.
#[derive(Debug, Clone)]
pub struct TeamRow {
    team_id: TeamId,
    state: Rc<Cell<RowState>>,
}

impl TeamRow {
    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn state(&self) -> RowState {
        self.state.get()
    }
}

impl TeamRowHandle for TeamRow {
    fn handle_click(&mut self, selection: &mut TeamSelection) {
        let state = self.state.get().toggled();
        trace!("Team {} row is now {state:?}", self.team_id);
        self.state.set(state);

        let row_state = Rc::clone(&self.state);
        selection.on_team_click(self.team_id, move || row_state.set(RowState::Collapsed));
    }

    fn open(&mut self) {
        self.state.set(RowState::Expanded);
    }
}

/// Row states by team, kept across scoreboard reorders
#[derive(Debug, Default)]
pub struct RowRegistry {
    states: HashMap<TeamId, Rc<Cell<RowState>>>,
}

impl RowRegistry {
    pub fn state(&self, team_id: TeamId) -> RowState {
        self.states
            .get(&team_id)
            .map_or(RowState::Collapsed, |s| s.get())
    }

    /// Forgets every row, for a new contest
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Mounts a row for every team at its current place, and unmounts places past the end
    pub fn remount(&mut self, sync: &mut LiveModelSync<TeamRow>) {
        let Some(model) = sync.model() else {
            return;
        };
        let team_ids: Vec<TeamId> = model.scoreboard().iter().map(|t| t.team_id).collect();

        for (place, &team_id) in team_ids.iter().enumerate() {
            let state = Rc::clone(self.states.entry(team_id).or_default());
            sync.mount_row(place, TeamRow { team_id, state });
        }
        for place in team_ids.len()..sync.rows().len() {
            sync.unmount_row(place);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::surface::ScreenSurface;
    use scoreboard_common::{
        config::ViewConfig,
        model::{GameModel, TeamScore},
    };
    use std::time::Instant;

    fn teams(ids: &[TeamId]) -> Vec<TeamScore> {
        ids.iter()
            .map(|&team_id| TeamScore {
                team_id,
                name: format!("team{team_id}"),
                score: 0.0,
                services: vec![],
            })
            .collect()
    }

    fn started(ids: &[TeamId]) -> (LiveModelSync<TeamRow>, ScreenSurface) {
        let mut sync = LiveModelSync::new(&ViewConfig::default(), None, Instant::now());
        let mut surface = ScreenSurface::new(1920.0);
        sync.start(GameModel {
            scoreboard: Some(teams(ids)),
            ..Default::default()
        });
        sync.update_scoreboard(Instant::now(), &mut surface);
        (sync, surface)
    }

    #[test]
    fn test_click_toggles_and_selects() {
        let (mut sync, _) = started(&[10, 20]);
        let mut registry = RowRegistry::default();
        registry.remount(&mut sync);

        sync.click_row(0);
        assert_eq!(registry.state(10), RowState::Expanded);
        assert_eq!(sync.selected_team(), Some(10));

        sync.click_row(1);
        assert_eq!(registry.state(10), RowState::Collapsed);
        assert_eq!(registry.state(20), RowState::Expanded);
        assert_eq!(sync.selected_team(), Some(20));

        sync.click_row(1);
        assert_eq!(registry.state(20), RowState::Collapsed);
        assert_eq!(sync.selected_team(), None);
    }

    #[test]
    fn test_state_follows_team() {
        let (mut sync, mut surface) = started(&[10, 20, 30]);
        let mut registry = RowRegistry::default();
        registry.remount(&mut sync);
        sync.click_row(0);

        sync.model_mut().unwrap().scoreboard = Some(teams(&[20, 10]));
        sync.update_scoreboard(Instant::now(), &mut surface);
        registry.remount(&mut sync);

        assert_eq!(sync.rows().get(1).map(TeamRow::state), Some(RowState::Expanded));
        assert_eq!(sync.rows().get(0).map(TeamRow::team_id), Some(20));
        assert!(sync.rows().get(2).is_none());
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut row = TeamRow {
            team_id: 1,
            state: Rc::default(),
        };
        row.open();
        row.open();
        assert_eq!(row.state(), RowState::Expanded);
    }
}
