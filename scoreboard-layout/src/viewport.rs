use log::*;
use std::str::FromStr;

/// Below this outer width the window is treated as minimized and scaling is left alone
pub const MIN_OUTER_WIDTH: f32 = 150.0;
/// Room kept free around the scaled content
pub const SCALE_MARGIN: f32 = 40.0;
/// Smallest scale ever applied, for side panels wider than the window itself
pub const MIN_SCALE: f32 = 0.01;

/// The kind of engine the scoreboard is rendered with, as far as scaling is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderEnvironment {
    /// Only geometric transforms are reliable
    TransformOnly,
    /// Neither transforms nor zoom can be trusted, so the layout is never scaled
    Legacy,
    #[default]
    ZoomCapable,
}

impl FromStr for RenderEnvironment {
    type Err = String;

    /// Accepts either the environment name or the browser name it was detected from
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transform" | "transform-only" | "firefox" => Ok(Self::TransformOnly),
            "legacy" | "ie" => Ok(Self::Legacy),
            "zoom" | "zoom-capable" | "" => Ok(Self::ZoomCapable),
            other => Err(format!("unknown render environment {other:?}")),
        }
    }
}

impl core::fmt::Display for RenderEnvironment {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Self::TransformOnly => write!(f, "transform-only"),
            Self::Legacy => write!(f, "legacy"),
            Self::ZoomCapable => write!(f, "zoom-capable"),
        }
    }
}

/// How a scale factor is put on the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleStrategy {
    Transform,
    NativeZoom,
}

impl ScaleStrategy {
    /// Picks the strategy for an environment, once, when the display starts
    pub fn probe(env: RenderEnvironment) -> Option<Self> {
        match env {
            RenderEnvironment::TransformOnly => Some(Self::Transform),
            RenderEnvironment::ZoomCapable => Some(Self::NativeZoom),
            RenderEnvironment::Legacy => None,
        }
    }

    pub fn style(self, scale: f32) -> ScaleStyle {
        match self {
            Self::Transform => ScaleStyle::Transform(scale),
            Self::NativeZoom => ScaleStyle::Zoom(scale),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleStyle {
    /// A uniform 2D scale transform; the layout keeps its unscaled size
    Transform(f32),
    /// The native zoom property; the layout itself shrinks
    Zoom(f32),
}

impl ScaleStyle {
    pub fn scale(self) -> f32 {
        match self {
            Self::Transform(scale) | Self::Zoom(scale) => scale,
        }
    }
}

/// The element all scoreboard content is drawn in
pub trait ScaleContainer {
    /// `None` clears any previously applied style
    fn set_scale_style(&mut self, style: Option<ScaleStyle>);

    /// Current on-screen width of the container
    fn offset_width(&self) -> f32;
}

/// Everything the engine needs from the window the scoreboard lives in
pub trait DisplaySurface {
    fn outer_width(&self) -> f32;

    /// `None` until the scoreboard has been drawn at least once
    fn container(&mut self) -> Option<&mut dyn ScaleContainer>;

    fn scroll_to(&mut self, top: f32);

    /// Layout inputs changed, the next frame has to be laid out again
    fn request_redraw(&mut self);
}

/// A width as the layout asks for it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutWidth {
    /// All of the available width
    Fill,
    /// Whatever the content needs
    Auto,
    Px(f32),
}

impl LayoutWidth {
    pub fn resolve(self, available: f32, content: f32) -> f32 {
        match self {
            Self::Fill => available,
            Self::Auto => content,
            Self::Px(px) => px,
        }
    }
}

/// Computes the scale factor for `content_width` to fit in the viewport.
///
/// Returns `None` when the viewport is too small to be meaningful, in which case the previous
/// scale should be kept.
pub fn compute_scale(content_width: f32, outer_width: f32, sidebar_width: f32) -> Option<f32> {
    if outer_width < MIN_OUTER_WIDTH {
        return None;
    }
    if outer_width - sidebar_width >= content_width || content_width <= 0.0 {
        return Some(1.0);
    }
    let available = outer_width - SCALE_MARGIN - sidebar_width;
    Some((available / content_width).clamp(MIN_SCALE, 1.0))
}

#[derive(Debug, Clone)]
pub struct ViewportScaler {
    strategy: Option<ScaleStrategy>,
    sidebar_width: f32,
    scale: f32,
}

impl ViewportScaler {
    pub fn new(strategy: Option<ScaleStrategy>, sidebar_width: f32) -> Self {
        Self {
            strategy,
            sidebar_width,
            scale: 1.0,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Forgets the applied scale, without touching the container
    pub fn reset(&mut self) {
        self.scale = 1.0;
    }

    /// Fits `content_width` into the surface and applies the result to its container.
    ///
    /// Nothing happens while the viewport is degenerate, when the environment can't be scaled,
    /// or before the container exists. Otherwise a redraw is requested and the new scale is
    /// returned.
    pub fn rescale(&mut self, content_width: f32, surface: &mut dyn DisplaySurface) -> Option<f32> {
        let outer_width = surface.outer_width();
        let Some(scale) = compute_scale(content_width, outer_width, self.sidebar_width) else {
            trace!("Viewport is only {outer_width}px wide, keeping scale {}", self.scale);
            return None;
        };
        let strategy = self.strategy?;
        let Some(container) = surface.container() else {
            trace!("Container isn't mounted yet, skipping scaling");
            return None;
        };

        self.scale = scale;
        if scale < 1.0 {
            container.set_scale_style(Some(strategy.style(scale)));
        } else {
            container.set_scale_style(None);
        }
        debug!("Scaled {content_width}px of content to {scale} for a {outer_width}px viewport");
        surface.request_redraw();
        Some(scale)
    }

    /// Width of the header strip above the rows
    pub fn header_width(&self, content_width: f32, container_width: Option<f32>) -> LayoutWidth {
        match self.strategy {
            Some(ScaleStrategy::Transform) => self.unscaled_width(content_width, container_width),
            _ if self.sidebar_width == 0.0 => LayoutWidth::Fill,
            _ => LayoutWidth::Px(container_width.unwrap_or(content_width)),
        }
    }

    /// Width of the block holding the team rows
    pub fn scoreboard_width(&self, content_width: f32, container_width: Option<f32>) -> LayoutWidth {
        match self.strategy {
            Some(ScaleStrategy::Transform) => self.unscaled_width(content_width, container_width),
            _ => LayoutWidth::Auto,
        }
    }

    /// A transform doesn't change layout size, so the container is measured back at scale 1
    fn unscaled_width(&self, content_width: f32, container_width: Option<f32>) -> LayoutWidth {
        LayoutWidth::Px(container_width.map_or(content_width, |w| w / self.scale))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::MockSurface;
    use more_asserts::*;

    #[test]
    fn test_compute_scale_fits() {
        assert_eq!(compute_scale(900.0, 1000.0, 100.0), Some(1.0));
        assert_eq!(compute_scale(800.0, 1000.0, 0.0), Some(1.0));
        assert_eq!(compute_scale(0.0, 1000.0, 0.0), Some(1.0));
        for content in [10.0, 500.0, 999.0, 1000.0] {
            assert_eq!(compute_scale(content, 1000.0, 0.0), Some(1.0));
        }
    }

    #[test]
    fn test_compute_scale_shrinks() {
        let scale = compute_scale(1200.0, 1000.0, 100.0).unwrap();
        assert_eq!(scale, (1000.0 - 40.0 - 100.0) / 1200.0);
        assert_gt!(scale, 0.716);
        assert_lt!(scale, 0.717);
    }

    #[test]
    fn test_compute_scale_degenerate() {
        assert_eq!(compute_scale(1200.0, 149.0, 0.0), None);
        assert_eq!(compute_scale(1200.0, 0.0, 0.0), None);
        assert!(compute_scale(1200.0, 150.0, 0.0).is_some());
    }

    #[test]
    fn test_compute_scale_stays_positive() {
        let scale = compute_scale(1200.0, 200.0, 180.0).unwrap();
        assert_gt!(scale, 0.0);
        assert_le!(scale, 1.0);
    }

    #[test]
    fn test_probe() {
        assert_eq!(
            ScaleStrategy::probe(RenderEnvironment::TransformOnly),
            Some(ScaleStrategy::Transform)
        );
        assert_eq!(
            ScaleStrategy::probe(RenderEnvironment::ZoomCapable),
            Some(ScaleStrategy::NativeZoom)
        );
        assert_eq!(ScaleStrategy::probe(RenderEnvironment::Legacy), None);
    }

    #[test]
    fn test_render_environment_from_str() {
        assert_eq!("firefox".parse(), Ok(RenderEnvironment::TransformOnly));
        assert_eq!("IE".parse(), Ok(RenderEnvironment::Legacy));
        assert_eq!("zoom".parse(), Ok(RenderEnvironment::ZoomCapable));
        assert!("netscape".parse::<RenderEnvironment>().is_err());
        for env in [
            RenderEnvironment::TransformOnly,
            RenderEnvironment::Legacy,
            RenderEnvironment::ZoomCapable,
        ] {
            assert_eq!(env.to_string().parse(), Ok(env));
        }
    }

    #[test]
    fn test_rescale_zoom() {
        let mut surface = MockSurface::mounted(1000.0);
        let mut scaler = ViewportScaler::new(Some(ScaleStrategy::NativeZoom), 100.0);

        let scale = scaler.rescale(1200.0, &mut surface).unwrap();
        assert_eq!(scaler.scale(), scale);
        assert_eq!(
            surface.container.as_ref().unwrap().style,
            Some(ScaleStyle::Zoom(scale))
        );
        assert_eq!(surface.redraws, 1);

        // Growing the window clears the style again
        surface.outer_width = 1400.0;
        assert_eq!(scaler.rescale(1200.0, &mut surface), Some(1.0));
        assert_eq!(surface.container.as_ref().unwrap().style, None);
        assert_eq!(surface.redraws, 2);
    }

    #[test]
    fn test_rescale_transform() {
        let mut surface = MockSurface::mounted(1000.0);
        let mut scaler = ViewportScaler::new(Some(ScaleStrategy::Transform), 0.0);

        let scale = scaler.rescale(2000.0, &mut surface).unwrap();
        assert_eq!(scale, (1000.0 - 40.0) / 2000.0);
        assert_eq!(
            surface.container.as_ref().unwrap().style,
            Some(ScaleStyle::Transform(scale))
        );
    }

    #[test]
    fn test_rescale_keeps_scale_on_degenerate_viewport() {
        let mut surface = MockSurface::mounted(1000.0);
        let mut scaler = ViewportScaler::new(Some(ScaleStrategy::NativeZoom), 0.0);
        let scale = scaler.rescale(2000.0, &mut surface).unwrap();

        surface.outer_width = 100.0;
        assert_eq!(scaler.rescale(500.0, &mut surface), None);
        assert_eq!(scaler.scale(), scale);
        assert_eq!(surface.redraws, 1);
        assert_eq!(
            surface.container.as_ref().unwrap().style,
            Some(ScaleStyle::Zoom(scale))
        );
    }

    #[test]
    fn test_rescale_without_container() {
        let mut surface = MockSurface::unmounted(500.0);
        let mut scaler = ViewportScaler::new(Some(ScaleStrategy::NativeZoom), 0.0);
        assert_eq!(scaler.rescale(2000.0, &mut surface), None);
        assert_eq!(scaler.scale(), 1.0);
        assert_eq!(surface.redraws, 0);
    }

    #[test]
    fn test_rescale_legacy() {
        let mut surface = MockSurface::mounted(500.0);
        let mut scaler = ViewportScaler::new(None, 0.0);
        assert_eq!(scaler.rescale(2000.0, &mut surface), None);
        assert_eq!(scaler.scale(), 1.0);
        assert_eq!(surface.container.as_ref().unwrap().style, None);
    }

    #[test]
    fn test_layout_widths() {
        let mut surface = MockSurface::mounted(1000.0);

        let mut transform = ViewportScaler::new(Some(ScaleStrategy::Transform), 0.0);
        assert_eq!(transform.header_width(2000.0, None), LayoutWidth::Px(2000.0));
        transform.rescale(2000.0, &mut surface);
        let scale = transform.scale();
        assert_eq!(
            transform.header_width(2000.0, Some(960.0)),
            LayoutWidth::Px(960.0 / scale)
        );
        assert_eq!(
            transform.scoreboard_width(2000.0, Some(960.0)),
            LayoutWidth::Px(960.0 / scale)
        );

        let zoom = ViewportScaler::new(Some(ScaleStrategy::NativeZoom), 0.0);
        assert_eq!(zoom.header_width(2000.0, Some(960.0)), LayoutWidth::Fill);
        assert_eq!(zoom.scoreboard_width(2000.0, Some(960.0)), LayoutWidth::Auto);

        let zoom_with_panel = ViewportScaler::new(Some(ScaleStrategy::NativeZoom), 300.0);
        assert_eq!(
            zoom_with_panel.header_width(2000.0, Some(960.0)),
            LayoutWidth::Px(960.0)
        );
        assert_eq!(
            zoom_with_panel.header_width(2000.0, None),
            LayoutWidth::Px(2000.0)
        );
    }

    #[test]
    fn test_layout_width_resolve() {
        assert_eq!(LayoutWidth::Fill.resolve(800.0, 1200.0), 800.0);
        assert_eq!(LayoutWidth::Auto.resolve(800.0, 1200.0), 1200.0);
        assert_eq!(LayoutWidth::Px(5.0).resolve(800.0, 1200.0), 5.0);
    }
}
