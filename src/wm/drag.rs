//! Drag controller
//!
//! Title bar drags. Every move applies a clamped position immediately; the
//! snap zone under the pointer is tracked for preview only.

use tracing::debug;

use crate::error::{WmError, WmResult};
use crate::input::{ElementPath, PointerButton, PointerId};
use crate::shared::{Size, Vec2};
use crate::wm::WindowId;
use crate::wm::decorations::{CLASS_WINDOW_BUTTON, CLASS_WINDOW_CONTROLS, TITLE_BAR};
use crate::wm::screen::ScreenInfo;
use crate::wm::snap::{self, SnapZone};
use crate::wm::window::Window;

/// Drag operation state
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub window: WindowId,
    pub pointer: PointerId,
    pub start_pointer: Vec2,
    pub start_position: Vec2,
    /// Zone under the pointer as of the last move
    pub zone: SnapZone,
}

/// Result of one pointer move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub moved: bool,
    /// Set when the preview zone changed on this move
    pub zone_changed: Option<SnapZone>,
}

/// Position for a window of `size` after the pointer moved from
/// `start_pointer` to `current`, clamped into the work area
pub fn drag_position(
    start_position: Vec2,
    start_pointer: Vec2,
    current: Vec2,
    size: Size,
    screen: &ScreenInfo,
) -> Vec2 {
    let candidate = start_position + (current - start_pointer);
    screen.clamp_position(candidate, size)
}

#[derive(Debug)]
pub struct DragController {
    session: Option<DragSession>,
    snap_threshold: f32,
}

impl DragController {
    pub fn new(snap_threshold: f32) -> Self {
        Self {
            session: None,
            snap_threshold,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Current snap preview, `None` when idle
    pub fn preview(&self) -> SnapZone {
        self.session.as_ref().map(|s| s.zone).unwrap_or_default()
    }

    /// Start dragging `window` if the pointer went down on its title bar
    pub fn begin(
        &mut self,
        window: &Window,
        pointer: PointerId,
        button: PointerButton,
        position: Vec2,
        path: &ElementPath,
    ) -> WmResult<()> {
        if button != PointerButton::Primary {
            return Err(WmError::NotPrimaryButton);
        }
        if self.session.is_some() {
            return Err(WmError::PointerCaptured(pointer));
        }
        if path.any_ancestor_has_class(CLASS_WINDOW_BUTTON)
            || path.any_ancestor_has_class(CLASS_WINDOW_CONTROLS)
        {
            return Err(WmError::ControlRegion);
        }
        if !path.contains(TITLE_BAR) {
            return Err(WmError::NotDraggable);
        }
        if window.is_maximized() {
            return Err(WmError::WindowMaximized(window.app_name().to_string()));
        }
        if window.is_minimized() {
            return Err(WmError::WindowMinimized(window.app_name().to_string()));
        }

        debug!("Starting drag of {} at ({}, {})", window.app_name(), position.x, position.y);
        self.session = Some(DragSession {
            window: window.id(),
            pointer,
            start_pointer: position,
            start_position: window.position(),
            zone: SnapZone::None,
        });
        Ok(())
    }

    /// Apply a pointer move to the dragged window. `None` when the event does
    /// not belong to the active session.
    pub fn update(
        &mut self,
        window: &mut Window,
        pointer: PointerId,
        position: Vec2,
        screen: &ScreenInfo,
    ) -> Option<DragUpdate> {
        let session = self.session.as_mut()?;
        if session.pointer != pointer || session.window != window.id() {
            return None;
        }

        let target = drag_position(
            session.start_position,
            session.start_pointer,
            position,
            window.size(),
            screen,
        );
        let moved = target != window.position();
        if moved {
            window.move_to(target, screen);
        }

        let zone = snap::classify_zone(position, screen.desktop_size(), self.snap_threshold);
        let zone_changed = (zone != session.zone).then(|| {
            session.zone = zone;
            zone
        });

        Some(DragUpdate { moved, zone_changed })
    }

    /// Pointer released. Ignored for pointers that do not hold capture.
    pub fn end(&mut self, pointer: PointerId) -> Option<DragSession> {
        if self.session.as_ref().is_some_and(|s| s.pointer == pointer) {
            return self.session.take();
        }
        None
    }

    /// Capture lost: ends the session like a release
    pub fn cancel(&mut self) -> Option<DragSession> {
        self.session.take()
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(snap::SNAP_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{Geometry, SizeLimits};
    use crate::wm::decorations::{ButtonType, Decorations};
    use crate::wm::screen::DOCK_HEIGHT;
    use proptest::prelude::*;

    fn screen() -> ScreenInfo {
        ScreenInfo::new(1920.0, 1080.0, DOCK_HEIGHT)
    }

    fn mail(screen: &ScreenInfo) -> Window {
        Window::new(
            WindowId(1),
            "Mail",
            "Coalition Briefings",
            Geometry::new(100.0, 100.0, 700.0, 500.0),
            SizeLimits::default(),
            screen,
        )
    }

    fn grab(controller: &mut DragController, window: &Window) -> Vec2 {
        let deco = Decorations::default();
        let point = deco.title_bar_point(window.geometry());
        let path = deco.hit_test(window.geometry(), point);
        controller
            .begin(window, 0, PointerButton::Primary, point, &path)
            .unwrap();
        point
    }

    #[test]
    fn test_large_delta_clamps_to_far_corner() {
        let screen = screen();
        let mut window = mail(&screen);
        let mut controller = DragController::default();
        let start = grab(&mut controller, &window);

        let update = controller
            .update(&mut window, 0, start + Vec2::new(5000.0, 5000.0), &screen)
            .unwrap();
        assert!(update.moved);
        assert_eq!(window.position(), Vec2::new(1920.0 - 700.0, 1010.0 - 500.0));
    }

    #[test]
    fn test_zone_preview_changes_are_reported_once() {
        let screen = screen();
        let mut window = mail(&screen);
        let mut controller = DragController::default();
        grab(&mut controller, &window);

        let first = controller.update(&mut window, 0, Vec2::new(10.0, 10.0), &screen).unwrap();
        assert_eq!(first.zone_changed, Some(SnapZone::TopLeft));
        let second = controller.update(&mut window, 0, Vec2::new(12.0, 11.0), &screen).unwrap();
        assert_eq!(second.zone_changed, None);
        assert_eq!(controller.preview(), SnapZone::TopLeft);

        let third = controller.update(&mut window, 0, Vec2::new(900.0, 500.0), &screen).unwrap();
        assert_eq!(third.zone_changed, Some(SnapZone::None));
    }

    #[test]
    fn test_controls_never_start_a_drag() {
        let screen = screen();
        let window = mail(&screen);
        let deco = Decorations::default();
        let mut controller = DragController::default();

        for button in [ButtonType::Close, ButtonType::Maximize, ButtonType::Minimize] {
            let rect = deco.button_rect(window.geometry(), button);
            let point = Vec2::new(rect.x + 2.0, rect.y + 2.0);
            let path = deco.hit_test(window.geometry(), point);
            assert_eq!(
                controller.begin(&window, 0, PointerButton::Primary, point, &path),
                Err(WmError::ControlRegion)
            );
        }
        assert!(!controller.is_active());
    }

    #[test]
    fn test_content_area_is_not_draggable() {
        let screen = screen();
        let window = mail(&screen);
        let deco = Decorations::default();
        let point = Vec2::new(400.0, 400.0);
        let path = deco.hit_test(window.geometry(), point);
        let mut controller = DragController::default();
        assert_eq!(
            controller.begin(&window, 0, PointerButton::Primary, point, &path),
            Err(WmError::NotDraggable)
        );
    }

    #[test]
    fn test_maximized_window_rejects_drag() {
        let screen = screen();
        let mut window = mail(&screen);
        window.toggle_maximize(&screen);
        let deco = Decorations::default();
        let point = deco.title_bar_point(window.geometry());
        let path = deco.hit_test(window.geometry(), point);
        let mut controller = DragController::default();
        assert_eq!(
            controller.begin(&window, 0, PointerButton::Primary, point, &path),
            Err(WmError::WindowMaximized("Mail".into()))
        );
    }

    #[test]
    fn test_only_capturing_pointer_moves_the_window() {
        let screen = screen();
        let mut window = mail(&screen);
        let mut controller = DragController::default();
        let start = grab(&mut controller, &window);

        assert!(controller.update(&mut window, 3, start + Vec2::new(50.0, 0.0), &screen).is_none());
        assert_eq!(window.position(), Vec2::new(100.0, 100.0));
        assert!(controller.end(3).is_none());
        assert!(controller.is_active());
        assert!(controller.cancel().is_some());
        assert!(!controller.is_active());
    }

    proptest! {
        #[test]
        fn prop_every_move_stays_in_bounds(
            moves in proptest::collection::vec((-3000.0f32..3000.0, -3000.0f32..3000.0), 1..20)
        ) {
            let screen = screen();
            let mut window = mail(&screen);
            let mut controller = DragController::default();
            let start = grab(&mut controller, &window);

            for (dx, dy) in moves {
                controller.update(&mut window, 0, start + Vec2::new(dx, dy), &screen);
                let p = window.position();
                prop_assert!(p.x >= 0.0 && p.x <= screen.work_area.width - window.size().width);
                prop_assert!(p.y >= 0.0 && p.y <= screen.work_area.height - window.size().height);
            }
        }
    }
}
