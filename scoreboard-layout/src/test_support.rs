//! Stand-ins for the display and its rows, shared by the engine's tests

use crate::{
    row::TeamRowHandle,
    selection::TeamSelection,
    viewport::{DisplaySurface, ScaleContainer, ScaleStyle},
};
use scoreboard_common::model::TeamId;
use std::{cell::Cell, rc::Rc, sync::Once};

static INIT: Once = Once::new();

pub fn initialize() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[derive(Debug, Default)]
pub struct MockContainer {
    pub style: Option<ScaleStyle>,
    pub width: f32,
}

impl ScaleContainer for MockContainer {
    fn set_scale_style(&mut self, style: Option<ScaleStyle>) {
        self.style = style;
    }

    fn offset_width(&self) -> f32 {
        self.width
    }
}

#[derive(Debug, Default)]
pub struct MockSurface {
    pub outer_width: f32,
    pub container: Option<MockContainer>,
    pub redraws: u32,
    pub scrolls: Vec<f32>,
}

impl MockSurface {
    pub fn mounted(outer_width: f32) -> Self {
        Self {
            outer_width,
            container: Some(MockContainer {
                style: None,
                width: outer_width,
            }),
            ..Default::default()
        }
    }

    pub fn unmounted(outer_width: f32) -> Self {
        Self {
            outer_width,
            ..Default::default()
        }
    }
}

impl DisplaySurface for MockSurface {
    fn outer_width(&self) -> f32 {
        self.outer_width
    }

    fn container(&mut self) -> Option<&mut dyn ScaleContainer> {
        self.container
            .as_mut()
            .map(|c| c as &mut dyn ScaleContainer)
    }

    fn scroll_to(&mut self, top: f32) {
        self.scrolls.push(top);
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}

/// A row whose clones all share one state, so tests can watch rows they handed to the engine
#[derive(Debug, Clone)]
pub struct MockRow {
    pub team_id: TeamId,
    clicks: Rc<Cell<u32>>,
    opens: Rc<Cell<u32>>,
    expanded: Rc<Cell<bool>>,
}

impl MockRow {
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            clicks: Rc::new(Cell::new(0)),
            opens: Rc::new(Cell::new(0)),
            expanded: Rc::new(Cell::new(false)),
        }
    }

    pub fn clicks(&self) -> u32 {
        self.clicks.get()
    }

    pub fn opens(&self) -> u32 {
        self.opens.get()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }
}

impl TeamRowHandle for MockRow {
    fn handle_click(&mut self, selection: &mut TeamSelection) {
        self.clicks.set(self.clicks.get() + 1);
        self.expanded.set(!self.expanded.get());
        let expanded = Rc::clone(&self.expanded);
        selection.on_team_click(self.team_id, move || expanded.set(false));
    }

    fn open(&mut self) {
        self.opens.set(self.opens.get() + 1);
        self.expanded.set(true);
    }
}
