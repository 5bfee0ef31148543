use scoreboard_layout::{DisplaySurface, ScaleContainer, ScaleStyle};

/// The block all scoreboard content is drawn in, beside the compact panel
#[derive(Debug, Clone, Default)]
pub struct ScreenContainer {
    style: Option<ScaleStyle>,
    /// Screen pixels the container is laid out over
    layout_width: f32,
}

impl ScreenContainer {
    pub fn style(&self) -> Option<ScaleStyle> {
        self.style
    }
}

impl ScaleContainer for ScreenContainer {
    fn set_scale_style(&mut self, style: Option<ScaleStyle>) {
        self.style = style;
    }

    /// Measured in the container's own units: a zoom shrinks its pixels, a transform doesn't
    /// change its layout at all
    fn offset_width(&self) -> f32 {
        match self.style {
            Some(ScaleStyle::Zoom(scale)) => self.layout_width / scale,
            Some(ScaleStyle::Transform(_)) | None => self.layout_width,
        }
    }
}

/// What the engine sees of the window. The frame loop keeps it current; nothing in here talks
/// to the graphics backend, so it works the same under test.
#[derive(Debug, Clone)]
pub struct ScreenSurface {
    outer_width: f32,
    container: Option<ScreenContainer>,
    scroll_top: f32,
    needs_layout: bool,
}

impl ScreenSurface {
    pub fn new(outer_width: f32) -> Self {
        Self {
            outer_width,
            container: None,
            scroll_top: 0.0,
            needs_layout: true,
        }
    }

    /// Returns `true` if the width actually changed
    pub fn set_outer_width(&mut self, width: f32) -> bool {
        if (width - self.outer_width).abs() < f32::EPSILON {
            return false;
        }
        self.outer_width = width;
        true
    }

    /// Lays the container out over `layout_width` screen pixels, creating it on the first
    /// drawn scoreboard
    pub fn container_laid_out(&mut self, layout_width: f32) {
        self.container
            .get_or_insert_with(Default::default)
            .layout_width = layout_width;
    }

    /// The container's `offset_width`, `None` before it exists
    pub fn container_width(&self) -> Option<f32> {
        self.container.as_ref().map(ScaleContainer::offset_width)
    }

    pub fn scale_style(&self) -> Option<ScaleStyle> {
        self.container.as_ref().and_then(ScreenContainer::style)
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn scroll_by(&mut self, delta: f32, max: f32) {
        self.scroll_top = (self.scroll_top + delta).clamp(0.0, max.max(0.0));
    }

    /// Returns whether a layout was requested since the last call, and resets the request
    pub fn take_layout_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_layout)
    }
}

impl DisplaySurface for ScreenSurface {
    fn outer_width(&self) -> f32 {
        self.outer_width
    }

    fn container(&mut self) -> Option<&mut dyn ScaleContainer> {
        self.container
            .as_mut()
            .map(|c| c as &mut dyn ScaleContainer)
    }

    fn scroll_to(&mut self, top: f32) {
        self.scroll_top = top.max(0.0);
    }

    fn request_redraw(&mut self) {
        self.needs_layout = true;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_container_appears_once_drawn() {
        let mut surface = ScreenSurface::new(1280.0);
        assert!(surface.container().is_none());
        assert_eq!(surface.container_width(), None);

        surface.container_laid_out(900.0);
        assert_eq!(surface.container_width(), Some(900.0));
        surface
            .container()
            .unwrap()
            .set_scale_style(Some(ScaleStyle::Zoom(0.5)));
        assert_eq!(surface.scale_style(), Some(ScaleStyle::Zoom(0.5)));

        // Laying out again keeps the style
        surface.container_laid_out(950.0);
        assert_eq!(surface.scale_style(), Some(ScaleStyle::Zoom(0.5)));
    }

    #[test]
    fn test_container_width_units() {
        let mut surface = ScreenSurface::new(1280.0);
        surface.container_laid_out(800.0);
        let container = surface.container().unwrap();

        container.set_scale_style(Some(ScaleStyle::Zoom(0.5)));
        assert_eq!(container.offset_width(), 1600.0);
        container.set_scale_style(Some(ScaleStyle::Transform(0.5)));
        assert_eq!(container.offset_width(), 800.0);
        container.set_scale_style(None);
        assert_eq!(container.offset_width(), 800.0);
    }

    #[test]
    fn test_layout_requests() {
        let mut surface = ScreenSurface::new(1280.0);
        assert!(surface.take_layout_request());
        assert!(!surface.take_layout_request());
        surface.request_redraw();
        assert!(surface.take_layout_request());
    }

    #[test]
    fn test_scrolling() {
        let mut surface = ScreenSurface::new(1280.0);
        surface.scroll_to(-20.0);
        assert_eq!(surface.scroll_top(), 0.0);
        surface.scroll_to(300.0);
        surface.scroll_by(100.0, 350.0);
        assert_eq!(surface.scroll_top(), 350.0);
        surface.scroll_by(-500.0, 350.0);
        assert_eq!(surface.scroll_top(), 0.0);
        assert!(!surface.set_outer_width(1280.0));
        assert!(surface.set_outer_width(1000.0));
        assert_eq!(surface.outer_width(), 1000.0);
    }
}
