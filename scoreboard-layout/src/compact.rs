/// Vertical room kept free above and below the compact panel's rows
pub const COMPACT_VERTICAL_PADDING: f32 = 60.0;
pub const COMPACT_ROW_SPACING: f32 = 10.0;
/// Room taken by the place, logo and score columns, the name gets what is left
pub const COMPACT_RESERVED_WIDTH: f32 = 230.0;
const MIN_SIZE: f32 = 3.0;

/// Sizes for the side panel that lists every team on one screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactPanelLayout {
    pub width: f32,
    pub height: f32,
    pub logo_size: f32,
    pub place_size: f32,
    pub name_width: f32,
}

impl CompactPanelLayout {
    /// `None` when the panel is disabled
    pub fn new(width: u32, inner_height: f32, team_count: usize) -> Option<Self> {
        if width == 0 {
            return None;
        }
        let width = width as f32;
        let rows = team_count.max(1) as f32;
        let logo_size =
            ((inner_height - COMPACT_VERTICAL_PADDING) / rows - COMPACT_ROW_SPACING).max(MIN_SIZE);
        Some(Self {
            width,
            height: inner_height,
            logo_size,
            place_size: (logo_size - 4.0).max(MIN_SIZE),
            name_width: (width - COMPACT_RESERVED_WIDTH).max(0.0),
        })
    }

    pub fn row_height(&self) -> f32 {
        self.logo_size + COMPACT_ROW_SPACING
    }

    pub fn row_top(&self, index: usize) -> f32 {
        COMPACT_VERTICAL_PADDING / 2.0 + self.row_height() * index as f32
    }
}
