//! Window entity
//!
//! Owns one application window's geometry, state and stacking value. Every
//! mutation re-establishes the bounds invariant against the `ScreenInfo` it
//! is given; the registry layers focus and event reporting on top.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::{Geometry, Size, SizeLimits, Vec2, WindowState, clamp_span};
use crate::wm::screen::ScreenInfo;
use crate::wm::session::WindowLayoutData;
use crate::wm::snap;

/// Opaque handle for a registered window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents one open application window
#[derive(Debug, Clone)]
pub struct Window {
    id: WindowId,
    app_name: String,
    title: String,
    geometry: Geometry,
    state: WindowState,
    /// Geometry to return to when leaving the maximized state
    saved_geometry: Option<Geometry>,
    z_index: u32,
    focused: bool,
    limits: SizeLimits,
}

impl Window {
    pub fn new(
        id: WindowId,
        app_name: impl Into<String>,
        title: impl Into<String>,
        geometry: Geometry,
        limits: SizeLimits,
        screen: &ScreenInfo,
    ) -> Self {
        let mut window = Self {
            id,
            app_name: app_name.into(),
            title: title.into(),
            geometry,
            state: WindowState::Normal,
            saved_geometry: None,
            z_index: 0,
            focused: false,
            limits,
        };
        window.constrain(screen);
        window
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn position(&self) -> Vec2 {
        self.geometry.position()
    }

    pub fn size(&self) -> Size {
        self.geometry.size()
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_minimized(&self) -> bool {
        self.state.is_minimized()
    }

    pub fn is_maximized(&self) -> bool {
        self.state.is_maximized()
    }

    pub fn is_visible(&self) -> bool {
        !self.is_minimized()
    }

    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    pub(crate) fn set_z_index(&mut self, z_index: u32) {
        self.z_index = z_index;
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Replace the geometry, then clamp size to the limits and position into
    /// the work area. Only meaningful for a normal window.
    pub fn set_geometry(&mut self, geometry: Geometry, screen: &ScreenInfo) {
        self.geometry = geometry;
        self.constrain(screen);
    }

    /// Move without touching the size
    pub fn move_to(&mut self, position: Vec2, screen: &ScreenInfo) {
        self.geometry.x = position.x;
        self.geometry.y = position.y;
        self.constrain(screen);
    }

    /// Re-establish the bounds invariant after the work area or the geometry
    /// changed. Maximized windows refit to the whole work area.
    pub fn constrain(&mut self, screen: &ScreenInfo) {
        match self.state {
            WindowState::Maximized => self.geometry = screen.work_area,
            WindowState::Normal | WindowState::Minimized { maximized: false } => {
                self.geometry = constrain_geometry(self.geometry, self.limits, screen)
            }
            WindowState::Minimized { maximized: true } => {}
        }
        if let Some(saved) = self.saved_geometry {
            self.saved_geometry = Some(constrain_geometry(saved, self.limits, screen));
        }
    }

    /// Returns `false` if the window was already minimized
    pub fn minimize(&mut self) -> bool {
        if self.is_minimized() {
            return false;
        }
        self.state = WindowState::Minimized {
            maximized: self.is_maximized(),
        };
        self.focused = false;
        true
    }

    /// Returns `false` if the window was not minimized
    pub fn restore(&mut self, screen: &ScreenInfo) -> bool {
        let WindowState::Minimized { maximized } = self.state else {
            return false;
        };
        self.state = if maximized {
            WindowState::Maximized
        } else {
            WindowState::Normal
        };
        self.constrain(screen);
        true
    }

    /// Flip between maximized and normal. Returns the new maximized flag, or
    /// `None` when the window is minimized and the request is ignored.
    pub fn toggle_maximize(&mut self, screen: &ScreenInfo) -> Option<bool> {
        match self.state {
            WindowState::Minimized { .. } => None,
            WindowState::Maximized => {
                self.state = WindowState::Normal;
                if let Some(saved) = self.saved_geometry.take() {
                    self.geometry = saved;
                }
                self.constrain(screen);
                Some(false)
            }
            WindowState::Normal => {
                self.saved_geometry = Some(self.geometry);
                self.state = WindowState::Maximized;
                self.geometry = screen.work_area;
                Some(true)
            }
        }
    }

    /// Leave the maximized state (if any) and take `geometry`, constrained.
    /// Returns `true` if the window was maximized. Minimized windows are
    /// left alone.
    pub fn place(&mut self, geometry: Geometry, screen: &ScreenInfo) -> bool {
        if self.is_minimized() {
            return false;
        }
        let was_maximized = self.is_maximized();
        if was_maximized {
            self.state = WindowState::Normal;
            self.saved_geometry = None;
        }
        self.set_geometry(geometry, screen);
        was_maximized
    }

    /// Round the position to the grid and keep it inside the work area
    pub fn snap_to_grid(&mut self, grid: f32, screen: &ScreenInfo) {
        if !matches!(self.state, WindowState::Normal) {
            return;
        }
        let snapped = snap::snap_to_grid(self.position(), grid);
        self.move_to(snapped, screen);
    }

    /// Capture the persisted subset of this window's state
    pub fn layout_snapshot(&self) -> WindowLayoutData {
        let geometry = match (self.state, self.saved_geometry) {
            (WindowState::Maximized | WindowState::Minimized { maximized: true }, Some(saved)) => saved,
            _ => self.geometry,
        };
        WindowLayoutData {
            app_name: self.app_name.clone(),
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
            is_minimized: self.is_minimized(),
            z_index: self.z_index,
        }
    }

    /// Apply a saved snapshot's geometry. The saved z value only orders
    /// entries and is not adopted; minimizing is left to the caller so it can
    /// notify the dock.
    ///
    /// Returns `true` when the snapshot asks for the window to be minimized.
    pub fn apply_layout_snapshot(&mut self, data: &WindowLayoutData, screen: &ScreenInfo) -> bool {
        self.state = match self.state {
            WindowState::Minimized { .. } => WindowState::Minimized { maximized: false },
            _ => WindowState::Normal,
        };
        self.saved_geometry = None;
        self.set_geometry(Geometry::new(data.x, data.y, data.width, data.height), screen);
        data.is_minimized
    }
}

/// Clamp size into the limits (and the work area), then the position
pub fn constrain_geometry(geometry: Geometry, limits: SizeLimits, screen: &ScreenInfo) -> Geometry {
    let area = screen.work_area;
    let width = clamp_span(geometry.width, limits.min_width, limits.max_width.min(area.width));
    let height = clamp_span(geometry.height, limits.min_height, limits.max_height.min(area.height));
    let position = screen.clamp_position(geometry.position(), Size::new(width, height));
    Geometry::new(position.x, position.y, width, height)
}
