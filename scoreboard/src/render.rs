use crate::{
    surface::ScreenSurface,
    team_row::{RowRegistry, RowState, TeamRow},
};
use coarsetime::Instant;
use log::warn;
use macroquad::prelude::*;
use scoreboard_common::model::{GameModel, TeamScore};
use scoreboard_layout::{
    DisplaySurface, LiveModelSync, ScaleStyle, auto_open::COLLAPSED_ROW_HEIGHT,
    compact::CompactPanelLayout,
    header::{PhaseTimer, ServiceColumn},
};
use time::OffsetDateTime;

const HEADER_HEIGHT: f32 = 140.0;
const EXPANDED_ROW_HEIGHT: f32 = 210.0;
const PROGRESS_HEIGHT: f32 = 6.0;
const PADDING: f32 = 12.0;
const FONT_LARGE: f32 = 32.0;
const FONT_MEDIUM: f32 = 24.0;
const FONT_SMALL: f32 = 18.0;

/// Colors for one `style` value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub header: Color,
    pub row: Color,
    pub row_alt: Color,
    pub row_selected: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub gain: Color,
    pub loss: Color,
    pub panel: Color,
}

impl Theme {
    pub const DARK: Self = Self {
        background: Color::new(0.07, 0.07, 0.09, 1.0),
        header: Color::new(0.12, 0.12, 0.15, 1.0),
        row: Color::new(0.10, 0.10, 0.13, 1.0),
        row_alt: Color::new(0.13, 0.13, 0.16, 1.0),
        row_selected: Color::new(0.18, 0.20, 0.28, 1.0),
        text: Color::new(0.93, 0.93, 0.93, 1.0),
        muted: Color::new(0.55, 0.55, 0.60, 1.0),
        accent: Color::new(0.26, 0.60, 0.96, 1.0),
        gain: Color::new(0.30, 0.80, 0.40, 1.0),
        loss: Color::new(0.90, 0.30, 0.30, 1.0),
        panel: Color::new(0.05, 0.05, 0.07, 1.0),
    };

    pub const LIGHT: Self = Self {
        background: Color::new(0.97, 0.97, 0.97, 1.0),
        header: Color::new(0.90, 0.90, 0.92, 1.0),
        row: Color::new(1.0, 1.0, 1.0, 1.0),
        row_alt: Color::new(0.94, 0.94, 0.96, 1.0),
        row_selected: Color::new(0.84, 0.89, 0.98, 1.0),
        text: Color::new(0.10, 0.10, 0.12, 1.0),
        muted: Color::new(0.45, 0.45, 0.50, 1.0),
        accent: Color::new(0.10, 0.45, 0.85, 1.0),
        gain: Color::new(0.15, 0.60, 0.25, 1.0),
        loss: Color::new(0.80, 0.15, 0.15, 1.0),
        panel: Color::new(0.88, 0.88, 0.90, 1.0),
    };

    pub fn from_style(style: &str) -> Self {
        match style {
            "" | "dark" => Self::DARK,
            "light" => Self::LIGHT,
            other => {
                warn!("Unknown style {other:?}, using the default");
                Self::DARK
            }
        }
    }
}

/// Reads a `#rrggbb` or `#rgb` color
pub fn parse_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    let hex = match hex.len() {
        6 => hex.to_string(),
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        _ => return None,
    };
    u32::from_str_radix(&hex, 16).ok().map(Color::from_hex)
}

/// Seconds to show on a phase clock `since_update` seconds after the controller reported it
pub fn phase_clock(timer: PhaseTimer, since_update: u64) -> u64 {
    match timer {
        PhaseTimer::Elapsed(secs) => secs + since_update,
        PhaseTimer::Remaining(secs) => secs.saturating_sub(since_update),
    }
}

pub fn format_clock(secs: u64) -> String {
    let (hours, mins, secs) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins:02}:{secs:02}")
    }
}

/// Draws in unscaled content coordinates
struct Painter {
    x: f32,
    y: f32,
    scale: f32,
}

impl Painter {
    fn rect(&self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        draw_rectangle(
            self.x + x * self.scale,
            self.y + y * self.scale,
            w * self.scale,
            h * self.scale,
            color,
        );
    }

    fn text(&self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        draw_text(
            text,
            self.x + x * self.scale,
            self.y + y * self.scale,
            size * self.scale,
            color,
        );
    }

    /// Like `text`, but cut down with ".." to fit `width`
    fn text_fit(&self, text: &str, x: f32, y: f32, width: f32, size: f32, color: Color) {
        self.text(&fit_text(text, width, size), x, y, size, color);
    }

    /// One bar per round, scaled to the busiest round
    fn sparkline(&self, values: &[u32], x: f32, y: f32, w: f32, h: f32, color: Color) {
        let Some(&max) = values.iter().max() else {
            return;
        };
        if max == 0 {
            return;
        }
        let bar = w / values.len() as f32;
        for (i, &value) in values.iter().enumerate() {
            let bar_h = h * value as f32 / max as f32;
            self.rect(x + bar * i as f32, y + h - bar_h, bar.max(1.0), bar_h, color);
        }
    }
}

fn fit_text(text: &str, width: f32, size: f32) -> String {
    let fits = |t: &str| measure_text(t, None, size as u16, 1.0).width <= width;
    if fits(text) {
        return text.to_string();
    }
    let mut cut = text.to_string();
    while !cut.is_empty() {
        cut.pop();
        let candidate = format!("{cut}..");
        if fits(&candidate) {
            return candidate;
        }
    }
    String::new()
}

/// Widths for one frame in unscaled content units, and the scale they are drawn at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameWidths {
    pub scale: f32,
    pub header: f32,
    pub scoreboard: f32,
}

impl FrameWidths {
    pub fn measure(sync: &LiveModelSync<TeamRow>, surface: &ScreenSurface, sidebar: f32) -> Self {
        let scale = surface.scale_style().map_or(1.0, ScaleStyle::scale);
        let content = sync.content_width();
        let available = (surface.outer_width() - sidebar) / scale;
        let container = surface.container_width();
        Self {
            scale,
            header: sync.header_width(container).resolve(available, content),
            scoreboard: sync.scoreboard_width(container).resolve(available, content),
        }
    }
}

/// Lays the container out over the window beside the compact panel, once there is a
/// scoreboard in it. The scaler skips until the container exists, so its first layout is
/// followed by a rescale.
pub fn lay_out_container(
    sync: &mut LiveModelSync<TeamRow>,
    surface: &mut ScreenSurface,
    sidebar: f32,
) {
    if !sync.is_initialized() {
        return;
    }
    let first_layout = surface.container_width().is_none();
    surface.container_laid_out(surface.outer_width() - sidebar);
    if first_layout {
        sync.on_resize(surface);
    }
}

fn score_text(score: f64) -> String {
    format!("{score:.2}")
}

pub struct Renderer {
    theme: Theme,
    updated_at: Instant,
    /// Row areas from the last frame, in screen coordinates
    hitboxes: Vec<(Rect, usize)>,
    content_height: f32,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            updated_at: Instant::now(),
            hitboxes: Vec::new(),
            content_height: 0.0,
        }
    }

    /// Restarts the phase clocks from the newly reported values
    pub fn mark_update(&mut self) {
        self.updated_at = Instant::now();
    }

    pub fn row_at(&self, x: f32, y: f32) -> Option<usize> {
        self.hitboxes
            .iter()
            .find(|(rect, _)| rect.contains(vec2(x, y)))
            .map(|(_, index)| *index)
    }

    /// How far the rows can be scrolled on a screen of `height`
    pub fn max_scroll(&self, height: f32) -> f32 {
        (self.content_height - height).max(0.0)
    }

    pub fn draw(
        &mut self,
        sync: &LiveModelSync<TeamRow>,
        rows: &RowRegistry,
        surface: &ScreenSurface,
    ) {
        clear_background(self.theme.background);
        self.hitboxes.clear();

        let model = match sync.model() {
            Some(model) if sync.is_initialized() => model,
            _ => {
                self.draw_waiting();
                return;
            }
        };

        let compact = sync.compact_panel(screen_height());
        let sidebar = compact.map_or(0.0, |c| c.width);
        let FrameWidths {
            scale,
            header: header_width,
            scoreboard: scoreboard_width,
        } = FrameWidths::measure(sync, surface, sidebar);

        let columns = sync.columns();
        let since_update = self.updated_at.elapsed().as_secs();

        let rows_painter = Painter {
            x: sidebar,
            y: HEADER_HEIGHT * scale - surface.scroll_top(),
            scale,
        };
        let mut top = 0.0;
        for (place, team) in model.scoreboard().iter().enumerate() {
            let state = rows.state(team.team_id);
            let height = match state {
                RowState::Collapsed => COLLAPSED_ROW_HEIGHT,
                RowState::Expanded => EXPANDED_ROW_HEIGHT,
            };
            let background = if sync.selected_team() == Some(team.team_id) {
                self.theme.row_selected
            } else if place % 2 == 0 {
                self.theme.row
            } else {
                self.theme.row_alt
            };
            rows_painter.rect(0.0, top, scoreboard_width, height, background);
            self.draw_team(&rows_painter, model, &columns, place, team, top, state);

            self.hitboxes.push((
                Rect::new(
                    rows_painter.x,
                    rows_painter.y + top * scale,
                    scoreboard_width * scale,
                    height * scale,
                ),
                place,
            ));
            top += height;
        }
        self.content_height = (HEADER_HEIGHT + top) * scale;

        let header_painter = Painter {
            x: sidebar,
            y: 0.0,
            scale,
        };
        self.draw_header(&header_painter, model, &columns, header_width, since_update);

        if let Some(panel) = compact {
            self.draw_compact(&panel, model.scoreboard());
        }
    }

    fn draw_waiting(&self) {
        let text = "Waiting for the contest to start";
        let dims = measure_text(text, None, FONT_LARGE as u16, 1.0);
        draw_text(
            text,
            (screen_width() - dims.width) / 2.0,
            screen_height() / 2.0,
            FONT_LARGE,
            self.theme.muted,
        );
    }

    fn draw_header(
        &self,
        p: &Painter,
        model: &GameModel,
        columns: &[ServiceColumn],
        width: f32,
        since_update: u64,
    ) {
        let theme = &self.theme;
        p.rect(0.0, 0.0, width, HEADER_HEIGHT, theme.header);

        let progress = model.info.progress(OffsetDateTime::now_utc());
        p.rect(0.0, 0.0, width, PROGRESS_HEIGHT, theme.row_alt);
        p.rect(0.0, 0.0, width * progress, PROGRESS_HEIGHT, theme.accent);

        p.text(
            &format!("Round {}", model.rounds_count),
            PADDING,
            40.0,
            FONT_MEDIUM,
            theme.text,
        );
        p.text(
            &format!("{} attacks this round", model.total_attacks_in_round()),
            PADDING,
            70.0,
            FONT_SMALL,
            theme.muted,
        );
        p.sparkline(
            &model.attacks_graph(None),
            PADDING,
            85.0,
            model.team_width - 2.0 * PADDING,
            40.0,
            theme.accent,
        );

        for (slot, column) in columns.iter().enumerate() {
            let x = model.team_width + model.one_service_width * slot as f32;
            let w = model.one_service_width;
            let color = column.color.and_then(parse_color).unwrap_or(theme.accent);

            p.rect(x, PROGRESS_HEIGHT, w, 4.0, color);
            p.text_fit(&column.service.name, x + 6.0, 36.0, w - 12.0, FONT_MEDIUM, theme.text);
            p.text(
                &column.attacks_in_round.to_string(),
                x + 6.0,
                62.0,
                FONT_SMALL,
                color,
            );
            if let Some(badge) = column.phase {
                let clock = format_clock(phase_clock(badge.timer, since_update));
                p.text_fit(
                    &format!("{} {clock}", badge.phase),
                    x + 6.0,
                    84.0,
                    w - 12.0,
                    FONT_SMALL,
                    theme.muted,
                );
            }
            p.sparkline(
                &model.attacks_graph(Some(column.index)),
                x + 6.0,
                95.0,
                w - 12.0,
                35.0,
                color,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_team(
        &self,
        p: &Painter,
        model: &GameModel,
        columns: &[ServiceColumn],
        place: usize,
        team: &TeamScore,
        top: f32,
        state: RowState,
    ) {
        let theme = &self.theme;
        p.text(
            &(place + 1).to_string(),
            PADDING,
            top + 44.0,
            FONT_LARGE,
            theme.muted,
        );
        p.text_fit(
            &team.name,
            70.0,
            top + 44.0,
            model.team_width - 190.0,
            FONT_LARGE,
            theme.text,
        );
        p.text(
            &score_text(team.score),
            model.team_width - 110.0,
            top + 44.0,
            FONT_MEDIUM,
            theme.text,
        );

        for (slot, column) in columns.iter().enumerate() {
            let x = model.team_width + model.one_service_width * slot as f32;
            let Some(service) = team.service(column.service.id) else {
                continue;
            };
            p.text(
                &score_text(service.score),
                x + 6.0,
                top + 40.0,
                FONT_MEDIUM,
                theme.text,
            );
            p.text(
                &format!("+{}", service.stolen),
                x + 6.0,
                top + 70.0,
                FONT_SMALL,
                theme.gain,
            );
            p.text(
                &format!("-{}", service.lost),
                x + 60.0,
                top + 70.0,
                FONT_SMALL,
                theme.loss,
            );
        }

        if state == RowState::Expanded {
            let stolen: u32 = team.services.iter().map(|s| s.stolen).sum();
            let lost: u32 = team.services.iter().map(|s| s.lost).sum();
            p.text(
                &format!("Flags stolen: {stolen}"),
                70.0,
                top + 120.0,
                FONT_SMALL,
                theme.gain,
            );
            p.text(
                &format!("Flags lost: {lost}"),
                70.0,
                top + 150.0,
                FONT_SMALL,
                theme.loss,
            );
            p.text(
                &format!("Team #{}", team.team_id),
                70.0,
                top + 180.0,
                FONT_SMALL,
                theme.muted,
            );
        }
    }

    fn draw_compact(&self, panel: &CompactPanelLayout, teams: &[TeamScore]) {
        let theme = &self.theme;
        draw_rectangle(0.0, 0.0, panel.width, panel.height, theme.panel);

        for (place, team) in teams.iter().enumerate() {
            let y = panel.row_top(place);
            let text_y = y + panel.logo_size * 0.7;
            let size = (panel.logo_size * 0.6).clamp(8.0, FONT_MEDIUM);

            draw_rectangle(PADDING, y + 2.0, panel.place_size, panel.place_size, theme.row_alt);
            draw_text(
                &(place + 1).to_string(),
                PADDING + 2.0,
                text_y,
                size,
                theme.text,
            );

            let logo_x = PADDING + panel.place_size + 8.0;
            draw_rectangle(logo_x, y, panel.logo_size, panel.logo_size, theme.accent);

            let name_x = logo_x + panel.logo_size + 8.0;
            draw_text(
                &fit_text(&team.name, panel.name_width, size),
                name_x,
                text_y,
                size,
                theme.text,
            );
            draw_text(
                &format!("{:.0}", team.score),
                panel.width - 70.0,
                text_y,
                size,
                theme.muted,
            );
        }
    }
}
