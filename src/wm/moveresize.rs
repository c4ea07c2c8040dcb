//! MoveResize Module
//!
//! Owns the drag and resize controllers. Only one interactive session holds
//! pointer capture at a time; whichever controller is idle rejects new
//! sessions until the active one ends. Drags end with a grid snap (or a zone
//! layout when configured); resizes end as they are.

use tracing::{debug, warn};

use crate::config::WindowManagerConfig;
use crate::error::{WmError, WmResult};
use crate::input::{ElementPath, PointerButton, PointerId};
use crate::shared::Vec2;
use crate::wm::drag::DragController;
use crate::wm::events::WmEvent;
use crate::wm::resize::{ResizeController, ResizeDirection};
use crate::wm::screen::ScreenInfo;
use crate::wm::snap::SnapZone;
use crate::wm::{WindowId, WindowManager};

/// Which kind of session holds capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResizeOperation {
    Move,
    Resize(ResizeDirection),
}

/// Move/resize manager
#[derive(Debug)]
pub struct MoveResizeManager {
    drag: DragController,
    resize: ResizeController,

    /// Apply the previewed zone on release instead of grid snapping
    pub apply_zone_on_release: bool,
}

impl MoveResizeManager {
    pub fn new(config: &WindowManagerConfig) -> Self {
        Self {
            drag: DragController::new(config.snap_threshold),
            resize: ResizeController::new(),
            apply_zone_on_release: config.apply_zone_on_release,
        }
    }

    pub fn is_active(&self) -> bool {
        self.drag.is_active() || self.resize.is_active()
    }

    /// Window and operation of the session holding capture
    pub fn active(&self) -> Option<(WindowId, MoveResizeOperation)> {
        if let Some(session) = self.drag.session() {
            return Some((session.window, MoveResizeOperation::Move));
        }
        self.resize
            .session()
            .map(|s| (s.window, MoveResizeOperation::Resize(s.direction)))
    }

    /// Zone previewed by the current drag
    pub fn snap_preview(&self) -> SnapZone {
        self.drag.preview()
    }

    /// Start a move operation
    pub fn start_move(
        &mut self,
        wm: &mut WindowManager,
        id: WindowId,
        pointer: PointerId,
        button: PointerButton,
        position: Vec2,
        path: &ElementPath,
    ) -> WmResult<()> {
        if self.resize.is_active() {
            return Err(WmError::PointerCaptured(pointer));
        }
        let window = wm.get(id).ok_or(WmError::WindowNotFound(id))?;
        self.drag.begin(window, pointer, button, position, path)?;
        wm.push_event(WmEvent::WindowDragStarted { id });
        Ok(())
    }

    /// Start a resize operation on the handle under the pointer
    pub fn start_resize(
        &mut self,
        wm: &mut WindowManager,
        id: WindowId,
        pointer: PointerId,
        button: PointerButton,
        position: Vec2,
        path: &ElementPath,
    ) -> WmResult<ResizeDirection> {
        if self.drag.is_active() {
            return Err(WmError::PointerCaptured(pointer));
        }
        let window = wm.get(id).ok_or(WmError::WindowNotFound(id))?;
        let direction = self.resize.begin(window, pointer, button, position, path)?;
        wm.push_event(WmEvent::WindowResizeStarted { id, direction });
        Ok(direction)
    }

    /// Route a pointer move to the active session. Returns `true` if the
    /// event belonged to it.
    pub fn handle_motion(
        &mut self,
        wm: &mut WindowManager,
        pointer: PointerId,
        position: Vec2,
        screen: &ScreenInfo,
    ) -> bool {
        let Some((id, operation)) = self.active() else {
            return false;
        };
        let Some(window) = wm.get_mut(id) else {
            warn!("Window {} vanished during {:?}, releasing capture", id, operation);
            self.drag.cancel();
            self.resize.cancel();
            return false;
        };

        match operation {
            MoveResizeOperation::Move => {
                let Some(update) = self.drag.update(window, pointer, position, screen) else {
                    return false;
                };
                let geometry = window.geometry();
                if update.moved {
                    wm.push_event(WmEvent::WindowGeometryChanged { id, geometry });
                }
                if let Some(zone) = update.zone_changed {
                    debug!("Snap preview for {} is now {:?}", id, zone);
                    wm.push_event(WmEvent::SnapPreviewChanged { id, zone });
                }
                true
            }
            MoveResizeOperation::Resize(_) => {
                if self.resize.session().is_some_and(|s| s.pointer != pointer) {
                    return false;
                }
                if self.resize.update(window, pointer, position, screen) {
                    let geometry = window.geometry();
                    wm.push_event(WmEvent::WindowGeometryChanged { id, geometry });
                }
                true
            }
        }
    }

    /// Pointer released. Returns `true` if a session ended.
    pub fn finish(&mut self, wm: &mut WindowManager, pointer: PointerId, screen: &ScreenInfo) -> bool {
        if let Some(session) = self.drag.end(pointer) {
            self.end_drag(wm, session.window, session.zone, screen);
            return true;
        }
        if let Some(session) = self.resize.end(pointer) {
            debug!("Resize of {} finished", session.window);
            wm.push_event(WmEvent::WindowResizeEnded { id: session.window });
            return true;
        }
        false
    }

    /// Capture lost. Finalized exactly like a release; nothing is rolled back.
    pub fn cancel(&mut self, wm: &mut WindowManager, screen: &ScreenInfo) -> bool {
        if let Some(session) = self.drag.cancel() {
            debug!("Capture lost while dragging {}", session.window);
            self.end_drag(wm, session.window, session.zone, screen);
            return true;
        }
        if let Some(session) = self.resize.cancel() {
            debug!("Capture lost while resizing {}", session.window);
            wm.push_event(WmEvent::WindowResizeEnded { id: session.window });
            return true;
        }
        false
    }

    fn end_drag(&mut self, wm: &mut WindowManager, id: WindowId, zone: SnapZone, screen: &ScreenInfo) {
        if zone != SnapZone::None {
            wm.push_event(WmEvent::SnapPreviewChanged {
                id,
                zone: SnapZone::None,
            });
        }

        let result = if self.apply_zone_on_release && zone != SnapZone::None {
            wm.snap_to_zone(id, zone, screen)
        } else {
            wm.snap_to_grid(id, screen)
        };
        if let Err(e) = result {
            debug!("Drag of {} ended without snapping: {}", id, e);
        }
        wm.push_event(WmEvent::WindowDragEnded { id });
    }
}

impl Default for MoveResizeManager {
    fn default() -> Self {
        Self::new(&WindowManagerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{Geometry, Size};
    use crate::wm::decorations::Decorations;
    use crate::wm::screen::DOCK_HEIGHT;

    fn setup() -> (ScreenInfo, WindowManager, WindowId) {
        let screen = ScreenInfo::new(1920.0, 1080.0, DOCK_HEIGHT);
        let mut wm = WindowManager::default();
        let mail = wm.open("Mail", "Mail", Size::new(700.0, 500.0), &screen);
        wm.take_events();
        (screen, wm, mail)
    }

    fn title_grab(wm: &WindowManager, id: WindowId) -> (Vec2, ElementPath) {
        let deco = Decorations::default();
        let geometry = wm.get(id).unwrap().geometry();
        let point = deco.title_bar_point(geometry);
        (point, deco.hit_test(geometry, point))
    }

    #[test]
    fn test_drag_far_then_release_snaps_to_grid() {
        let (screen, mut wm, mail) = setup();
        let mut mr = MoveResizeManager::default();
        let (start, path) = title_grab(&wm, mail);

        mr.start_move(&mut wm, mail, 0, PointerButton::Primary, start, &path).unwrap();
        assert!(mr.handle_motion(&mut wm, 0, start + Vec2::new(5000.0, 5000.0), &screen));
        assert_eq!(wm.get(mail).unwrap().position(), Vec2::new(1220.0, 510.0));

        // 510 rounds to 520 on the grid, which the bounds pull back to 510
        assert!(mr.finish(&mut wm, 0, &screen));
        assert_eq!(wm.get(mail).unwrap().position(), Vec2::new(1220.0, 510.0));
        assert!(!mr.is_active());

        let events = wm.take_events();
        assert_eq!(events.first(), Some(&WmEvent::WindowDragStarted { id: mail }));
        assert_eq!(events.last(), Some(&WmEvent::WindowDragEnded { id: mail }));
        assert!(events.contains(&WmEvent::SnapPreviewChanged {
            id: mail,
            zone: SnapZone::BottomRight
        }));
    }

    #[test]
    fn test_intermediate_positions_are_not_snapped() {
        let (screen, mut wm, mail) = setup();
        let mut mr = MoveResizeManager::default();
        let (start, path) = title_grab(&wm, mail);

        mr.start_move(&mut wm, mail, 0, PointerButton::Primary, start, &path).unwrap();
        mr.handle_motion(&mut wm, 0, start + Vec2::new(33.0, 7.0), &screen);
        assert_eq!(wm.get(mail).unwrap().position(), Vec2::new(133.0, 107.0));

        assert!(mr.cancel(&mut wm, &screen));
        assert_eq!(wm.get(mail).unwrap().position(), Vec2::new(140.0, 100.0));
    }

    #[test]
    fn test_zone_applied_on_release_when_enabled() {
        let (screen, mut wm, mail) = setup();
        let mut mr = MoveResizeManager::default();
        mr.apply_zone_on_release = true;
        let (start, path) = title_grab(&wm, mail);

        mr.start_move(&mut wm, mail, 0, PointerButton::Primary, start, &path).unwrap();
        mr.handle_motion(&mut wm, 0, Vec2::new(5.0, 500.0), &screen);
        assert_eq!(mr.snap_preview(), SnapZone::Left);
        mr.finish(&mut wm, 0, &screen);
        assert_eq!(wm.get(mail).unwrap().geometry(), Geometry::new(0.0, 0.0, 960.0, 1010.0));
    }

    #[test]
    fn test_single_capture_across_drag_and_resize() {
        let (screen, mut wm, mail) = setup();
        let mut mr = MoveResizeManager::default();
        let (start, path) = title_grab(&wm, mail);
        mr.start_move(&mut wm, mail, 0, PointerButton::Primary, start, &path).unwrap();

        let deco = Decorations::default();
        let geometry = wm.get(mail).unwrap().geometry();
        let handle = deco.handle_point(geometry, ResizeDirection::Right);
        let handle_path = deco.hit_test(geometry, handle);
        assert_eq!(
            mr.start_resize(&mut wm, mail, 1, PointerButton::Primary, handle, &handle_path),
            Err(WmError::PointerCaptured(1))
        );
        assert!(!mr.handle_motion(&mut wm, 1, Vec2::new(0.0, 0.0), &screen));
        assert!(!mr.finish(&mut wm, 1, &screen));
        assert!(mr.finish(&mut wm, 0, &screen));
    }

    #[test]
    fn test_resize_ends_without_snap() {
        let (screen, mut wm, mail) = setup();
        let mut mr = MoveResizeManager::default();
        let deco = Decorations::default();
        let geometry = wm.get(mail).unwrap().geometry();
        let handle = deco.handle_point(geometry, ResizeDirection::BottomRight);
        let path = deco.hit_test(geometry, handle);

        let direction = mr
            .start_resize(&mut wm, mail, 0, PointerButton::Primary, handle, &path)
            .unwrap();
        assert_eq!(direction, ResizeDirection::BottomRight);
        mr.handle_motion(&mut wm, 0, handle + Vec2::new(13.0, 27.0), &screen);
        mr.finish(&mut wm, 0, &screen);

        assert_eq!(wm.get(mail).unwrap().geometry(), Geometry::new(100.0, 100.0, 713.0, 527.0));
        assert_eq!(wm.take_events().last(), Some(&WmEvent::WindowResizeEnded { id: mail }));
    }

    #[test]
    fn test_closing_window_mid_drag_releases_capture() {
        let (screen, mut wm, mail) = setup();
        let mut mr = MoveResizeManager::default();
        let (start, path) = title_grab(&wm, mail);
        mr.start_move(&mut wm, mail, 0, PointerButton::Primary, start, &path).unwrap();

        wm.close(mail);
        assert!(!mr.handle_motion(&mut wm, 0, start, &screen));
        assert!(!mr.is_active());
    }
}
