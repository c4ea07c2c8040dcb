//! Screen Module
//!
//! Desktop bounds: the hosting surface minus the strip reserved for the dock.
//! The shell owns the only `ScreenInfo` and hands it by reference to every
//! window, drag and resize operation, so nothing holds a stale copy across a
//! surface resize.

use tracing::debug;

use crate::shared::{Geometry, Size, Vec2, clamp_span};

/// Default height reserved at the bottom of the surface for the dock
pub const DOCK_HEIGHT: f32 = 70.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenInfo {
    /// Surface width
    pub width: f32,

    /// Surface height (dock included)
    pub height: f32,

    /// Height reserved for the dock
    pub dock_height: f32,

    /// Work area: origin (0, 0), surface minus dock
    pub work_area: Geometry,
}

impl ScreenInfo {
    pub fn new(width: f32, height: f32, dock_height: f32) -> Self {
        let mut screen = Self {
            width: 0.0,
            height: 0.0,
            dock_height: dock_height.max(0.0),
            work_area: Geometry::default(),
        };
        screen.set_size(width, height);
        screen
    }

    /// Recompute the work area for a new surface size.
    ///
    /// Returns `true` when the work area changed.
    pub fn set_size(&mut self, width: f32, height: f32) -> bool {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let work_area = Geometry::new(0.0, 0.0, width, (height - self.dock_height).max(0.0));
        let changed = work_area != self.work_area;

        self.width = width;
        self.height = height;
        self.work_area = work_area;

        if changed {
            debug!(
                "Desktop bounds updated: {}x{} (surface {}x{})",
                work_area.width, work_area.height, width, height
            );
        }
        changed
    }

    pub fn desktop_size(&self) -> Size {
        self.work_area.size()
    }

    /// Clamp a window's top-left corner so a window of `size` stays inside
    pub fn clamp_position(&self, position: Vec2, size: Size) -> Vec2 {
        Vec2::new(
            clamp_span(position.x, 0.0, self.work_area.width - size.width),
            clamp_span(position.y, 0.0, self.work_area.height - size.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_area_excludes_dock() {
        let screen = ScreenInfo::new(1920.0, 1080.0, DOCK_HEIGHT);
        assert_eq!(screen.work_area, Geometry::new(0.0, 0.0, 1920.0, 1010.0));
    }

    #[test]
    fn test_set_size_reports_change() {
        let mut screen = ScreenInfo::new(1000.0, 870.0, DOCK_HEIGHT);
        assert!(!screen.set_size(1000.0, 870.0));
        assert!(screen.set_size(800.0, 600.0));
        assert_eq!(screen.desktop_size(), Size::new(800.0, 530.0));
    }

    #[test]
    fn test_tiny_surface_never_goes_negative() {
        let screen = ScreenInfo::new(100.0, 40.0, DOCK_HEIGHT);
        assert_eq!(screen.work_area.height, 0.0);
        assert_eq!(
            screen.clamp_position(Vec2::new(50.0, 50.0), Size::new(300.0, 200.0)),
            Vec2::ZERO
        );
    }

    #[test]
    fn test_clamp_position() {
        let screen = ScreenInfo::new(1000.0, 870.0, DOCK_HEIGHT);
        let size = Size::new(300.0, 200.0);
        assert_eq!(screen.clamp_position(Vec2::new(-10.0, 900.0), size), Vec2::new(0.0, 600.0));
        assert_eq!(screen.clamp_position(Vec2::new(700.0, 600.0), size), Vec2::new(700.0, 600.0));
        assert_eq!(screen.clamp_position(Vec2::new(701.0, 600.0), size), Vec2::new(700.0, 600.0));
    }
}
