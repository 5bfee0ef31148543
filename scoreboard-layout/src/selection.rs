use log::*;
use scoreboard_common::model::TeamId;

/// Called on a team's row when another team gets selected in its place
pub type DeselectCallback = Box<dyn FnOnce()>;

struct SelectedTeam {
    id: TeamId,
    on_deselect: DeselectCallback,
}

/// Which team, if any, is currently selected on the scoreboard.
///
/// This is the only place selection is tracked. Rows hand over a callback with each click and
/// hear back through it when they lose the selection.
#[derive(Default)]
pub struct TeamSelection {
    selected: Option<SelectedTeam>,
}

impl core::fmt::Debug for TeamSelection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TeamSelection")
            .field("selected", &self.selected())
            .finish()
    }
}

impl TeamSelection {
    pub fn selected(&self) -> Option<TeamId> {
        self.selected.as_ref().map(|s| s.id)
    }

    /// Clicking the selected team clears the selection without calling back into it. Clicking
    /// any other team deselects the previous one first, then selects the clicked team.
    pub fn on_team_click<F: FnOnce() + 'static>(&mut self, id: TeamId, on_deselect: F) {
        match self.selected.take() {
            Some(previous) if previous.id == id => {
                debug!("Team {id} deselected");
            }
            previous => {
                if let Some(previous) = previous {
                    debug!("Team {} deselected in favour of team {id}", previous.id);
                    (previous.on_deselect)();
                } else {
                    debug!("Team {id} selected");
                }
                self.selected = Some(SelectedTeam {
                    id,
                    on_deselect: Box::new(on_deselect),
                });
            }
        }
    }

    /// Forgets the selection without notifying anyone, for when the rows themselves go away
    pub fn clear(&mut self) {
        self.selected = None;
    }
}
