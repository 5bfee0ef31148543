use crate::{
    auto_open::TeamAutoOpener,
    compact::CompactPanelLayout,
    header::{ServiceColumn, visible_columns},
    row::{RowSlots, TeamRowHandle},
    save_mode::SaveModePreparer,
    selection::TeamSelection,
    service_window::ServiceWindow,
    viewport::{DisplaySurface, LayoutWidth, ScaleStrategy, ViewportScaler},
};
use log::*;
use scoreboard_common::{
    config::ViewConfig,
    model::{GameModel, TeamId},
};
use std::time::Instant;

/// Content width assumed before the first scoreboard arrives
pub const DEFAULT_CONTENT_WIDTH: f32 = 1000.0;

/// Keeps the scoreboard layout in step with the controller's notifications.
///
/// Owns the model, the values derived from it, the mounted row handles, the team selection and
/// the timers that act on rows. Every handler leaves all of that consistent before returning.
#[derive(Debug)]
pub struct LiveModelSync<R> {
    window: ServiceWindow,
    for_save: bool,
    compact_width: Option<u32>,
    model: Option<GameModel>,
    initialized: bool,
    rows: RowSlots<R>,
    selection: TeamSelection,
    visible_service_count: usize,
    content_width: f32,
    scaler: ViewportScaler,
    auto_opener: TeamAutoOpener,
    save_mode: SaveModePreparer,
}

impl<R: TeamRowHandle> LiveModelSync<R> {
    pub fn new(config: &ViewConfig, strategy: Option<ScaleStrategy>, now: Instant) -> Self {
        Self {
            window: ServiceWindow::from(config),
            for_save: config.for_save,
            compact_width: config
                .has_compact_scoreboard()
                .then_some(config.compact_scoreboard_width),
            model: None,
            initialized: false,
            rows: RowSlots::default(),
            selection: TeamSelection::default(),
            visible_service_count: 0,
            content_width: DEFAULT_CONTENT_WIDTH,
            scaler: ViewportScaler::new(strategy, config.compact_scoreboard_width as f32),
            auto_opener: TeamAutoOpener::new(config.auto_open_period(), now),
            save_mode: SaveModePreparer::default(),
        }
    }

    /// Takes over a freshly started contest model
    pub fn start(&mut self, model: GameModel) {
        info!(
            "Starting with {} services, {} active",
            model.services.len(),
            model.active_services.len()
        );
        self.model = Some(model);
        self.scaler.reset();
        self.selection.clear();
    }

    /// Recomputes the layout after the held model's scoreboard was refreshed.
    ///
    /// Does nothing until there is a model with a scoreboard. Returns whether the update was
    /// taken.
    pub fn update_scoreboard(&mut self, now: Instant, surface: &mut dyn DisplaySurface) -> bool {
        let Some(model) = self.model.as_ref() else {
            trace!("Scoreboard update before any model, ignoring");
            return false;
        };
        if !model.has_scoreboard() {
            trace!("Model has no scoreboard yet, ignoring update");
            return false;
        }

        let first_update = !self.initialized;
        if first_update {
            self.rows.reset(model.scoreboard().len());
        }

        self.visible_service_count = self.window.select(&model.active_services).count;
        self.content_width =
            model.team_width + model.one_service_width * self.visible_service_count as f32;
        debug!(
            "Showing {} services, content is {}px wide",
            self.visible_service_count, self.content_width
        );

        surface.request_redraw();
        self.scaler.rescale(self.content_width, surface);
        self.initialized = true;

        if first_update && self.for_save {
            self.save_mode.activate(now);
        }
        true
    }

    /// Redraws for new history data, once the layout has been worked out at least once
    pub fn history(&mut self, surface: &mut dyn DisplaySurface) -> bool {
        if !self.initialized {
            trace!("History before the first scoreboard update, ignoring");
            return false;
        }
        surface.request_redraw();
        true
    }

    pub fn on_resize(&mut self, surface: &mut dyn DisplaySurface) -> Option<f32> {
        self.scaler.rescale(self.content_width, surface)
    }

    /// Called by a row when it is clicked
    pub fn on_team_click<F: FnOnce() + 'static>(&mut self, team_id: TeamId, on_deselect: F) {
        self.selection.on_team_click(team_id, on_deselect);
    }

    /// Clicks the row at `index` on the user's behalf. Returns `false` if nothing is mounted there.
    pub fn click_row(&mut self, index: usize) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.handle_click(&mut self.selection);
                true
            }
            None => false,
        }
    }

    pub fn mount_row(&mut self, index: usize, row: R) {
        self.rows.mount(index, row);
    }

    pub fn unmount_row(&mut self, index: usize) -> Option<R> {
        self.rows.unmount(index)
    }

    /// Runs whichever timers are due
    pub fn poll_timers(&mut self, now: Instant, surface: &mut dyn DisplaySurface) {
        let scale = self.scaler.scale();
        let auto_opened =
            self.auto_opener
                .poll(now, &mut self.rows, &mut self.selection, scale, surface);
        let forced_open = self.save_mode.poll(now, &mut self.rows);
        if auto_opened || forced_open {
            surface.request_redraw();
        }
    }

    pub fn model(&self) -> Option<&GameModel> {
        self.model.as_ref()
    }

    /// For refreshing the held model in place before notifying
    pub fn model_mut(&mut self) -> Option<&mut GameModel> {
        self.model.as_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn rows(&self) -> &RowSlots<R> {
        &self.rows
    }

    pub fn selected_team(&self) -> Option<TeamId> {
        self.selection.selected()
    }

    pub fn visible_service_count(&self) -> usize {
        self.visible_service_count
    }

    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    pub fn scale(&self) -> f32 {
        self.scaler.scale()
    }

    pub fn auto_opener(&self) -> &TeamAutoOpener {
        &self.auto_opener
    }

    pub fn save_mode(&self) -> &SaveModePreparer {
        &self.save_mode
    }

    /// The service columns to draw, empty until the layout is initialized
    pub fn columns(&self) -> Vec<ServiceColumn<'_>> {
        match &self.model {
            Some(model) if self.initialized => visible_columns(model, &self.window),
            _ => Vec::new(),
        }
    }

    pub fn compact_panel(&self, inner_height: f32) -> Option<CompactPanelLayout> {
        let width = self.compact_width?;
        let team_count = self.model.as_ref().map_or(0, |m| m.scoreboard().len());
        CompactPanelLayout::new(width, inner_height, team_count)
    }

    pub fn header_width(&self, container_width: Option<f32>) -> LayoutWidth {
        self.scaler.header_width(self.content_width, container_width)
    }

    pub fn scoreboard_width(&self, container_width: Option<f32>) -> LayoutWidth {
        self.scaler
            .scoreboard_width(self.content_width, container_width)
    }
}
