//! Window decorations (title bar, control buttons, resize handles)
//!
//! The core does not draw anything. It only knows the frame layout well
//! enough to say which decoration element sits under a point, reported the
//! way a retained-mode toolkit would: the tagged element chain from the hit
//! element up to the window root.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::input::{Element, ElementPath};
use crate::shared::{Geometry, Vec2};
use crate::wm::resize::{Edge, ResizeDirection};

pub const CLASS_WINDOW_BUTTON: &str = "window-button";
pub const CLASS_WINDOW_CONTROLS: &str = "window-controls";
pub const CLASS_RESIZE_HANDLE: &str = "resize-handle";
pub const TITLE_BAR: &str = "title-bar";

const WINDOW: Element = Element::new("window", &["window"]);
const CONTENT: Element = Element::new("window-content", &["window-content"]);
const TITLE: Element = Element::new(TITLE_BAR, &["title-bar"]);
const CONTROLS: Element = Element::new("window-controls", &["window-controls"]);
const CLOSE: Element = Element::new("close-btn", &["window-button", "window-close"]);
const MAXIMIZE: Element = Element::new("maximize-btn", &["window-button", "window-maximize"]);
const MINIMIZE: Element = Element::new("minimize-btn", &["window-button", "window-minimize"]);

const RESIZE_TOP: Element = Element::new("resize-top", &["resize-handle", "resize-top"]);
const RESIZE_BOTTOM: Element = Element::new("resize-bottom", &["resize-handle", "resize-bottom"]);
const RESIZE_LEFT: Element = Element::new("resize-left", &["resize-handle", "resize-left"]);
const RESIZE_RIGHT: Element = Element::new("resize-right", &["resize-handle", "resize-right"]);
const RESIZE_TOP_LEFT: Element = Element::new("resize-top-left", &["resize-handle", "resize-top-left"]);
const RESIZE_TOP_RIGHT: Element = Element::new("resize-top-right", &["resize-handle", "resize-top-right"]);
const RESIZE_BOTTOM_LEFT: Element =
    Element::new("resize-bottom-left", &["resize-handle", "resize-bottom-left"]);
const RESIZE_BOTTOM_RIGHT: Element =
    Element::new("resize-bottom-right", &["resize-handle", "resize-bottom-right"]);

/// Title bar control buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonType {
    Close,
    Maximize,
    Minimize,
}

impl ButtonType {
    /// Right to left, as laid out in the title bar
    const ORDER: [ButtonType; 3] = [ButtonType::Close, ButtonType::Maximize, ButtonType::Minimize];

    fn element(self) -> Element {
        match self {
            ButtonType::Close => CLOSE,
            ButtonType::Maximize => MAXIMIZE,
            ButtonType::Minimize => MINIMIZE,
        }
    }

    /// Identify a button from the hit path target
    pub fn from_path(path: &ElementPath) -> Option<Self> {
        let target = path.target()?;
        Self::ORDER.into_iter().find(|b| b.element().name == target.name)
    }
}

/// Frame geometry configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Title bar height
    pub titlebar_height: f32,
    /// Button size
    pub button_size: f32,
    /// Button padding
    pub button_padding: f32,
    /// Thickness of the resize strips along each edge
    pub resize_border: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            titlebar_height: 32.0,
            button_size: 16.0,
            button_padding: 8.0,
            resize_border: 6.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Decorations {
    config: FrameConfig,
}

impl Decorations {
    pub fn new(config: FrameConfig) -> Self {
        if config.titlebar_height <= 0.0 {
            warn!("Frame has no title bar; window dragging is disabled");
        }
        if config.resize_border <= 0.0 {
            warn!("Frame has no resize border; interactive resizing is disabled");
        }
        Self { config }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Elements under `point`, innermost first. Empty when the point is
    /// outside the window.
    pub fn hit_test(&self, geometry: Geometry, point: Vec2) -> ElementPath {
        if !geometry.contains(point) {
            return ElementPath::default();
        }
        let local = point - geometry.position();

        if let Some(direction) = self.resize_direction_at(geometry, local) {
            return ElementPath::new(vec![resize_element(direction), WINDOW]);
        }

        if local.y < self.config.titlebar_height {
            for button in ButtonType::ORDER {
                if self.button_rect(geometry, button).contains(point) {
                    return ElementPath::new(vec![button.element(), CONTROLS, TITLE, WINDOW]);
                }
            }
            if self.controls_rect(geometry).contains(point) {
                return ElementPath::new(vec![CONTROLS, TITLE, WINDOW]);
            }
            return ElementPath::new(vec![TITLE, WINDOW]);
        }

        ElementPath::new(vec![CONTENT, WINDOW])
    }

    /// Absolute rectangle of a control button
    pub fn button_rect(&self, geometry: Geometry, button: ButtonType) -> Geometry {
        let c = &self.config;
        let index = ButtonType::ORDER.iter().position(|b| *b == button).unwrap_or(0) as f32;
        let x = geometry.right() - c.resize_border - c.button_padding - (index + 1.0) * c.button_size
            - index * c.button_padding;
        let y = geometry.y + (c.titlebar_height - c.button_size) / 2.0;
        Geometry::new(x, y, c.button_size, c.button_size)
    }

    /// Rectangle of the button container, padding included
    fn controls_rect(&self, geometry: Geometry) -> Geometry {
        let leftmost = self.button_rect(geometry, ButtonType::Minimize);
        let x = leftmost.x - self.config.button_padding / 2.0;
        Geometry::new(
            x,
            geometry.y,
            geometry.right() - self.config.resize_border - x,
            self.config.titlebar_height,
        )
    }

    /// A point on the title bar clear of the controls and resize strips
    pub fn title_bar_point(&self, geometry: Geometry) -> Vec2 {
        let c = &self.config;
        Vec2::new(
            geometry.x + c.resize_border + c.button_padding + 1.0,
            geometry.y + (c.titlebar_height.max(c.resize_border * 2.0 + 1.0)) / 2.0,
        )
    }

    /// A point inside the handle for `direction`
    pub fn handle_point(&self, geometry: Geometry, direction: ResizeDirection) -> Vec2 {
        let inset = self.config.resize_border / 2.0;
        let (h, v) = direction.edges();
        let x = match h {
            Some(Edge::Near) => geometry.x + inset,
            Some(Edge::Far) => geometry.right() - inset,
            None => geometry.x + geometry.width / 2.0,
        };
        let y = match v {
            Some(Edge::Near) => geometry.y + inset,
            Some(Edge::Far) => geometry.bottom() - inset,
            None => geometry.y + geometry.height / 2.0,
        };
        Vec2::new(x, y)
    }

    fn resize_direction_at(&self, geometry: Geometry, local: Vec2) -> Option<ResizeDirection> {
        let border = self.config.resize_border;
        if border <= 0.0 {
            return None;
        }
        let corner = border * 2.0;
        let (w, h) = (geometry.width, geometry.height);

        let on_left = local.x < border;
        let on_right = local.x >= w - border;
        let on_top = local.y < border;
        let on_bottom = local.y >= h - border;
        if !(on_left || on_right || on_top || on_bottom) {
            return None;
        }

        let near_left = local.x < corner;
        let near_right = local.x >= w - corner;
        let near_top = local.y < corner;
        let near_bottom = local.y >= h - corner;

        let direction = match (near_left, near_right, near_top, near_bottom) {
            (true, _, true, _) => ResizeDirection::TopLeft,
            (_, true, true, _) => ResizeDirection::TopRight,
            (true, _, _, true) => ResizeDirection::BottomLeft,
            (_, true, _, true) => ResizeDirection::BottomRight,
            _ if on_left => ResizeDirection::Left,
            _ if on_right => ResizeDirection::Right,
            _ if on_top => ResizeDirection::Top,
            _ => ResizeDirection::Bottom,
        };
        Some(direction)
    }
}

impl Default for Decorations {
    fn default() -> Self {
        Self::new(FrameConfig::default())
    }
}

fn resize_element(direction: ResizeDirection) -> Element {
    match direction {
        ResizeDirection::Top => RESIZE_TOP,
        ResizeDirection::Bottom => RESIZE_BOTTOM,
        ResizeDirection::Left => RESIZE_LEFT,
        ResizeDirection::Right => RESIZE_RIGHT,
        ResizeDirection::TopLeft => RESIZE_TOP_LEFT,
        ResizeDirection::TopRight => RESIZE_TOP_RIGHT,
        ResizeDirection::BottomLeft => RESIZE_BOTTOM_LEFT,
        ResizeDirection::BottomRight => RESIZE_BOTTOM_RIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        Geometry::new(100.0, 100.0, 700.0, 500.0)
    }

    #[test]
    fn test_title_bar_hit() {
        let deco = Decorations::default();
        let path = deco.hit_test(geometry(), Vec2::new(300.0, 115.0));
        assert_eq!(path.target().map(|e| e.name), Some(TITLE_BAR));
        assert!(!path.any_ancestor_has_class(CLASS_WINDOW_CONTROLS));
    }

    #[test]
    fn test_button_hit_reports_controls_ancestry() {
        let deco = Decorations::default();
        for button in ButtonType::ORDER {
            let rect = deco.button_rect(geometry(), button);
            let path = deco.hit_test(geometry(), Vec2::new(rect.x + 4.0, rect.y + 4.0));
            assert_eq!(ButtonType::from_path(&path), Some(button));
            assert!(path.any_ancestor_has_class(CLASS_WINDOW_BUTTON));
            assert!(path.any_ancestor_has_class(CLASS_WINDOW_CONTROLS));
            assert!(path.contains(TITLE_BAR));
        }
    }

    #[test]
    fn test_gap_between_buttons_is_still_controls() {
        let deco = Decorations::default();
        let close = deco.button_rect(geometry(), ButtonType::Close);
        let path = deco.hit_test(geometry(), Vec2::new(close.x - 4.0, close.y + 4.0));
        assert_eq!(ButtonType::from_path(&path), None);
        assert!(path.any_ancestor_has_class(CLASS_WINDOW_CONTROLS));
    }

    #[test]
    fn test_resize_handles() {
        let deco = Decorations::default();
        let g = geometry();
        for direction in ResizeDirection::ALL {
            let path = deco.hit_test(g, deco.handle_point(g, direction));
            assert_eq!(ResizeDirection::from_path(&path), Some(direction), "{direction:?}");
        }
    }

    #[test]
    fn test_content_and_outside() {
        let deco = Decorations::default();
        let path = deco.hit_test(geometry(), Vec2::new(400.0, 400.0));
        assert_eq!(path.target().map(|e| e.name), Some("window-content"));
        assert!(deco.hit_test(geometry(), Vec2::new(50.0, 50.0)).is_empty());
    }

    #[test]
    fn test_title_bar_point_is_draggable_surface() {
        let deco = Decorations::default();
        let path = deco.hit_test(geometry(), deco.title_bar_point(geometry()));
        assert_eq!(path.target().map(|e| e.name), Some(TITLE_BAR));
    }
}
