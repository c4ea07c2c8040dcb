//! Resize controller
//!
//! One edge or corner per session. Each axis is adjusted on its own so a
//! corner drag can hit a limit on one axis and keep tracking on the other.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{WmError, WmResult};
use crate::input::{ElementPath, PointerButton, PointerId};
use crate::shared::{Geometry, SizeLimits, Vec2, clamp_span};
use crate::wm::WindowId;
use crate::wm::decorations::CLASS_RESIZE_HANDLE;
use crate::wm::screen::ScreenInfo;
use crate::wm::window::Window;

/// Resize direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeDirection {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Which side of an axis a handle moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Left or top: the position moves, the opposite edge stays put
    Near,
    /// Right or bottom: only the size changes
    Far,
}

impl ResizeDirection {
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::Top,
        ResizeDirection::Bottom,
        ResizeDirection::Left,
        ResizeDirection::Right,
        ResizeDirection::TopLeft,
        ResizeDirection::TopRight,
        ResizeDirection::BottomLeft,
        ResizeDirection::BottomRight,
    ];

    /// (horizontal, vertical) edges driven by this direction
    pub fn edges(self) -> (Option<Edge>, Option<Edge>) {
        use Edge::{Far, Near};
        match self {
            ResizeDirection::Top => (None, Some(Near)),
            ResizeDirection::Bottom => (None, Some(Far)),
            ResizeDirection::Left => (Some(Near), None),
            ResizeDirection::Right => (Some(Far), None),
            ResizeDirection::TopLeft => (Some(Near), Some(Near)),
            ResizeDirection::TopRight => (Some(Far), Some(Near)),
            ResizeDirection::BottomLeft => (Some(Near), Some(Far)),
            ResizeDirection::BottomRight => (Some(Far), Some(Far)),
        }
    }

    /// Class tagging the handle for this direction
    pub fn handle_class(self) -> &'static str {
        match self {
            ResizeDirection::Top => "resize-top",
            ResizeDirection::Bottom => "resize-bottom",
            ResizeDirection::Left => "resize-left",
            ResizeDirection::Right => "resize-right",
            ResizeDirection::TopLeft => "resize-top-left",
            ResizeDirection::TopRight => "resize-top-right",
            ResizeDirection::BottomLeft => "resize-bottom-left",
            ResizeDirection::BottomRight => "resize-bottom-right",
        }
    }

    /// Read the direction off the handle the pointer went down on
    pub fn from_path(path: &ElementPath) -> Option<Self> {
        let target = path.target()?;
        if !target.has_class(CLASS_RESIZE_HANDLE) {
            return None;
        }
        Self::ALL.into_iter().find(|d| target.has_class(d.handle_class()))
    }

    /// Parse "left", "top-right", ...
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|d| d.handle_class().strip_prefix("resize-") == Some(name.as_str()))
    }
}

/// Adjust one axis. Returns the new (position, length).
///
/// Far edge: length clamped to `[min, min(max, bound - position)]`.
/// Near edge: the far edge is fixed and the near coordinate is clamped so the
/// length stays in `[min, max]` and the position stays at or above 0.
pub fn resize_axis(
    position: f32,
    length: f32,
    delta: f32,
    edge: Edge,
    min: f32,
    max: f32,
    bound: f32,
) -> (f32, f32) {
    match edge {
        Edge::Far => {
            let length = clamp_span(length + delta, min, max.min(bound - position));
            (position, length)
        }
        Edge::Near => {
            let far = position + length;
            let near = clamp_span(position + delta, (far - max).max(0.0), far - min);
            (near, far - near)
        }
    }
}

/// Geometry after moving the `direction` handle by `delta` from `start`
pub fn resize_geometry(
    start: Geometry,
    direction: ResizeDirection,
    delta: Vec2,
    limits: SizeLimits,
    screen: &ScreenInfo,
) -> Geometry {
    let area = screen.work_area;
    let mut geometry = start;
    let (horizontal, vertical) = direction.edges();

    if let Some(edge) = horizontal {
        let (x, width) = resize_axis(
            start.x,
            start.width,
            delta.x,
            edge,
            limits.min_width,
            limits.max_width,
            area.width,
        );
        geometry.x = x;
        geometry.width = width;
    }
    if let Some(edge) = vertical {
        let (y, height) = resize_axis(
            start.y,
            start.height,
            delta.y,
            edge,
            limits.min_height,
            limits.max_height,
            area.height,
        );
        geometry.y = y;
        geometry.height = height;
    }
    geometry
}

/// Resize operation state
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub window: WindowId,
    pub pointer: PointerId,
    pub direction: ResizeDirection,
    pub start_geometry: Geometry,
    pub start_pointer: Vec2,
}

#[derive(Debug, Default)]
pub struct ResizeController {
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start a session on the handle under the pointer
    pub fn begin(
        &mut self,
        window: &Window,
        pointer: PointerId,
        button: PointerButton,
        position: Vec2,
        path: &ElementPath,
    ) -> WmResult<ResizeDirection> {
        if button != PointerButton::Primary {
            return Err(WmError::NotPrimaryButton);
        }
        if self.session.is_some() {
            return Err(WmError::PointerCaptured(pointer));
        }
        let direction = ResizeDirection::from_path(path).ok_or(WmError::NoResizeHandle)?;
        if window.is_maximized() {
            return Err(WmError::WindowMaximized(window.app_name().to_string()));
        }
        if window.is_minimized() {
            return Err(WmError::WindowMinimized(window.app_name().to_string()));
        }

        debug!("Starting resize of {} ({:?})", window.app_name(), direction);
        self.session = Some(ResizeSession {
            window: window.id(),
            pointer,
            direction,
            start_geometry: window.geometry(),
            start_pointer: position,
        });
        Ok(direction)
    }

    /// Apply a pointer move. Returns `true` when the geometry changed.
    pub fn update(
        &mut self,
        window: &mut Window,
        pointer: PointerId,
        position: Vec2,
        screen: &ScreenInfo,
    ) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if session.pointer != pointer || session.window != window.id() {
            return false;
        }

        let delta = position - session.start_pointer;
        let geometry = resize_geometry(
            session.start_geometry,
            session.direction,
            delta,
            window.limits(),
            screen,
        );
        if geometry == window.geometry() {
            return false;
        }
        window.set_geometry(geometry, screen);
        true
    }

    /// Pointer released. Ignored for pointers that do not hold capture.
    pub fn end(&mut self, pointer: PointerId) -> Option<ResizeSession> {
        if self.session.as_ref().is_some_and(|s| s.pointer == pointer) {
            return self.session.take();
        }
        None
    }

    /// Capture lost: same as a release, whatever geometry was applied stays
    pub fn cancel(&mut self) -> Option<ResizeSession> {
        self.session.take()
    }
}
