//! Window Manager Module
//!
//! The window registry: every open window, focus and z-order, bulk layout
//! actions, layout snapshots, and the queue of events describing what
//! changed.

pub mod cycle;
pub mod decorations;
pub mod drag;
pub mod events;
pub mod keyboard;
pub mod moveresize;
pub mod placement;
pub mod resize;
pub mod screen;
pub mod session;
pub mod snap;
pub mod stacking;
pub mod window;

use tracing::{debug, info, warn};

use crate::config::WindowManagerConfig;
use crate::error::{WmError, WmResult};
use crate::shared::{Geometry, Size, SizeLimits, Vec2};
use crate::wm::events::WmEvent;
use crate::wm::placement::PlacementManager;
use crate::wm::screen::ScreenInfo;
use crate::wm::session::{DesktopLayout, WindowLayoutData};
use crate::wm::snap::SnapZone;
use crate::wm::stacking::StackingManager;

pub use decorations::ButtonType;
pub use window::{Window, WindowId};

pub struct WindowManager {
    /// Open windows in registry (open) order
    windows: Vec<Window>,
    stacking: StackingManager,
    placement: PlacementManager,
    next_id: u32,
    limits: SizeLimits,
    grid_size: f32,
    /// Changes not yet picked up by the shell
    events: Vec<WmEvent>,
}

impl WindowManager {
    pub fn new(config: &WindowManagerConfig) -> Self {
        Self {
            windows: Vec::new(),
            stacking: StackingManager::new(config.base_z_index),
            placement: PlacementManager::new(config.placement),
            next_id: 1,
            limits: config.limits,
            grid_size: config.grid_size,
            events: Vec::new(),
        }
    }

    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Open a window for `app_name`, or restore/focus the one already open
    pub fn open(
        &mut self,
        app_name: &str,
        title: &str,
        size: Size,
        screen: &ScreenInfo,
    ) -> WindowId {
        if let Some(id) = self.find_by_app_name(app_name).map(Window::id) {
            debug!("{} is already open, focusing it", app_name);
            self.focus(id, screen);
            return id;
        }

        let position = self.placement.place_new(screen, size, self.windows.len());
        let id = self.allocate_id();
        let window = Window::new(
            id,
            app_name,
            title,
            Geometry::from_parts(position, size),
            self.limits,
            screen,
        );
        self.register(window)
    }

    /// Fresh id for a window about to be registered
    pub fn allocate_id(&mut self) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Add a window and bring it to front. A window whose id or application
    /// is already registered is ignored and the existing id returned.
    pub fn register(&mut self, window: Window) -> WindowId {
        if let Some(existing) = self
            .windows
            .iter()
            .find(|w| w.id() == window.id() || w.app_name() == window.app_name())
        {
            debug!("Window for {} already registered", window.app_name());
            return existing.id();
        }

        let id = window.id();
        if id.0 >= self.next_id {
            self.next_id = id.0.saturating_add(1);
        }
        info!("Opened {} ({})", window.app_name(), id);
        self.events.push(WmEvent::WindowOpened {
            id,
            app_name: window.app_name().to_string(),
            title: window.title().to_string(),
            geometry: window.geometry(),
        });
        self.windows.push(window);
        self.raise(id);
        id
    }

    /// Remove without side effects; returns the window if it was registered
    pub fn unregister(&mut self, id: WindowId) -> Option<Window> {
        let index = self.windows.iter().position(|w| w.id() == id)?;
        Some(self.windows.remove(index))
    }

    /// Close and destroy a window. Closing an absent window returns `false`.
    pub fn close(&mut self, id: WindowId) -> bool {
        let Some(window) = self.unregister(id) else {
            return false;
        };
        info!("Closed {} ({})", window.app_name(), id);
        self.events.push(WmEvent::WindowClosed {
            id,
            app_name: window.app_name().to_string(),
        });
        if window.is_focused() {
            self.refocus_topmost();
        }
        true
    }

    // ------------------------------------------------------------------
    // Focus and stacking
    // ------------------------------------------------------------------

    /// Assign the next z value, focus the window and unfocus all others
    pub fn bring_to_front(&mut self, id: WindowId) -> WmResult<u32> {
        let window = self.get(id).ok_or(WmError::WindowNotFound(id))?;
        if window.is_minimized() {
            return Err(WmError::WindowMinimized(window.app_name().to_string()));
        }
        Ok(self.raise(id))
    }

    fn raise(&mut self, id: WindowId) -> u32 {
        let z = self.stacking.next_z();
        for window in &mut self.windows {
            let is_target = window.id() == id;
            window.set_focused(is_target);
            if is_target {
                window.set_z_index(z);
            }
        }
        debug!("Raised {} to z {}", id, z);
        self.events.push(WmEvent::WindowFocused { id, z_index: z });
        z
    }

    /// Restore if minimized, otherwise bring to front
    pub fn focus(&mut self, id: WindowId, screen: &ScreenInfo) -> bool {
        match self.get(id) {
            Some(window) if window.is_minimized() => self.restore(id, screen).unwrap_or(false),
            Some(_) => self.bring_to_front(id).is_ok(),
            None => false,
        }
    }

    /// Hand focus to the topmost visible window without changing its z
    pub fn refocus_topmost(&mut self) -> Option<WindowId> {
        let top = self
            .windows
            .iter()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index())
            .map(|w| (w.id(), w.z_index()));

        for window in &mut self.windows {
            window.set_focused(top.is_some_and(|(id, _)| id == window.id()));
        }
        let (id, z_index) = top?;
        self.events.push(WmEvent::WindowFocused { id, z_index });
        Some(id)
    }

    // ------------------------------------------------------------------
    // State changes
    // ------------------------------------------------------------------

    /// Returns `Ok(false)` when the window was already minimized
    pub fn minimize(&mut self, id: WindowId) -> WmResult<bool> {
        let window = self.get_mut(id).ok_or(WmError::WindowNotFound(id))?;
        let was_focused = window.is_focused();
        if !window.minimize() {
            return Ok(false);
        }
        let app_name = window.app_name().to_string();
        debug!("Minimized {}", app_name);
        self.events.push(WmEvent::WindowMinimized { id, app_name });
        if was_focused {
            self.refocus_topmost();
        }
        Ok(true)
    }

    /// Returns `Ok(false)` when the window was not minimized
    pub fn restore(&mut self, id: WindowId, screen: &ScreenInfo) -> WmResult<bool> {
        let window = self.get_mut(id).ok_or(WmError::WindowNotFound(id))?;
        if !window.restore(screen) {
            return Ok(false);
        }
        let app_name = window.app_name().to_string();
        debug!("Restored {}", app_name);
        self.events.push(WmEvent::WindowRestored { id, app_name });
        self.raise(id);
        Ok(true)
    }

    /// Returns the new maximized flag, `None` if the window is minimized
    pub fn toggle_maximize(&mut self, id: WindowId, screen: &ScreenInfo) -> WmResult<Option<bool>> {
        let window = self.get_mut(id).ok_or(WmError::WindowNotFound(id))?;
        let Some(maximized) = window.toggle_maximize(screen) else {
            debug!("Ignoring maximize toggle for minimized {}", window.app_name());
            return Ok(None);
        };
        let geometry = window.geometry();
        self.events.push(if maximized {
            WmEvent::WindowMaximized { id }
        } else {
            WmEvent::WindowUnmaximized { id }
        });
        self.events.push(WmEvent::WindowGeometryChanged { id, geometry });
        Ok(Some(maximized))
    }

    pub fn snap_to_grid(&mut self, id: WindowId, screen: &ScreenInfo) -> WmResult<()> {
        let grid = self.grid_size;
        self.update_geometry(id, |w| w.snap_to_grid(grid, screen))
    }

    /// Apply the half/quarter layout of `zone`. Maximized windows leave the
    /// maximized state; minimized windows are rejected.
    pub fn snap_to_zone(&mut self, id: WindowId, zone: SnapZone, screen: &ScreenInfo) -> WmResult<()> {
        if zone == SnapZone::None {
            return Err(WmError::InvalidZone);
        }
        let window = self.get(id).ok_or(WmError::WindowNotFound(id))?;
        if window.is_minimized() {
            return Err(WmError::WindowMinimized(window.app_name().to_string()));
        }
        let layout = snap::layout_for_zone(zone, screen.desktop_size());
        debug!("Snapping {} to {:?}", window.app_name(), zone);
        self.place(id, layout, screen);
        Ok(())
    }

    /// Move a window, keeping it inside the work area
    pub fn move_window(&mut self, id: WindowId, position: Vec2, screen: &ScreenInfo) -> WmResult<()> {
        self.update_geometry(id, |w| w.move_to(position, screen))
    }

    /// Run `f` on the window and report a geometry change if there was one
    pub(crate) fn update_geometry(
        &mut self,
        id: WindowId,
        f: impl FnOnce(&mut Window),
    ) -> WmResult<()> {
        let window = self.get_mut(id).ok_or(WmError::WindowNotFound(id))?;
        let before = window.geometry();
        f(window);
        let geometry = window.geometry();
        if geometry != before {
            self.events.push(WmEvent::WindowGeometryChanged { id, geometry });
        }
        Ok(())
    }

    fn place(&mut self, id: WindowId, geometry: Geometry, screen: &ScreenInfo) {
        let mut was_maximized = false;
        let _ = self.update_geometry(id, |w| was_maximized = w.place(geometry, screen));
        if was_maximized {
            self.events.push(WmEvent::WindowUnmaximized { id });
        }
    }

    pub(crate) fn push_event(&mut self, event: WmEvent) {
        self.events.push(event);
    }

    /// Drain the events queued since the last call
    pub fn take_events(&mut self) -> Vec<WmEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id() == id)
    }

    pub fn find_by_app_name(&self, app_name: &str) -> Option<&Window> {
        self.windows.iter().find(|w| w.app_name() == app_name)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Windows in registry order
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn focused(&self) -> Option<&Window> {
        self.windows.iter().find(|w| w.is_focused())
    }

    /// Bottom to top
    pub fn stacking_order(&self) -> Vec<WindowId> {
        StackingManager::stacking_order(&self.windows)
    }

    /// Topmost visible window containing `point`
    pub fn window_at(&self, point: Vec2) -> Option<&Window> {
        self.windows
            .iter()
            .filter(|w| w.is_visible() && w.geometry().contains(point))
            .max_by_key(|w| w.z_index())
    }

    // ------------------------------------------------------------------
    // Bulk actions
    // ------------------------------------------------------------------

    /// Diagonal from the cascade origin, one step per registry index, grid
    /// snapped. Minimized windows keep their slot but are not moved.
    pub fn cascade(&mut self, screen: &ScreenInfo) {
        let targets: Vec<(WindowId, Vec2, Size)> = self
            .windows
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_visible())
            .map(|(i, w)| {
                let saved = w.layout_snapshot();
                (w.id(), self.placement.cascade_position(i), Size::new(saved.width, saved.height))
            })
            .collect();

        debug!("Cascading {} windows", targets.len());
        let grid = self.grid_size;
        for (id, position, size) in targets {
            self.place(id, Geometry::from_parts(position, size), screen);
            let _ = self.update_geometry(id, |w| w.snap_to_grid(grid, screen));
        }
    }

    /// Near-square grid over the work area, row-major over visible windows
    pub fn tile(&mut self, screen: &ScreenInfo) {
        let visible: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|w| w.is_visible())
            .map(Window::id)
            .collect();
        let cells = self.placement.tile(screen, visible.len());

        debug!("Tiling {} windows", visible.len());
        for (id, cell) in visible.into_iter().zip(cells) {
            self.place(id, cell, screen);
        }
    }

    pub fn minimize_all(&mut self) {
        for id in self.ids() {
            let _ = self.minimize(id);
        }
    }

    pub fn restore_all(&mut self, screen: &ScreenInfo) {
        for id in self.ids() {
            let _ = self.restore(id, screen);
        }
    }

    pub fn close_all(&mut self) {
        for id in self.ids() {
            self.close(id);
        }
    }

    /// Re-establish bounds after the desktop changed size
    pub fn constrain_all(&mut self, screen: &ScreenInfo) {
        for id in self.ids() {
            let _ = self.update_geometry(id, |w| w.constrain(screen));
        }
    }

    fn ids(&self) -> Vec<WindowId> {
        self.windows.iter().map(Window::id).collect()
    }

    // ------------------------------------------------------------------
    // Layout snapshots
    // ------------------------------------------------------------------

    pub fn layout_snapshot(&self) -> DesktopLayout {
        DesktopLayout {
            windows: self.windows.iter().map(Window::layout_snapshot).collect(),
        }
    }

    /// Apply a saved entry to the window of the same application. The window
    /// takes a fresh z value from the counter; the saved one is not adopted.
    /// Focus is left to the caller.
    pub fn apply_layout(&mut self, data: &WindowLayoutData, screen: &ScreenInfo) -> WmResult<WindowId> {
        let id = self
            .find_by_app_name(&data.app_name)
            .map(Window::id)
            .ok_or_else(|| WmError::UnknownApplication(data.app_name.clone()))?;

        let mut minimize = false;
        self.update_geometry(id, |w| minimize = w.apply_layout_snapshot(data, screen))?;
        let z = self.stacking.next_z();
        if let Some(window) = self.get_mut(id) {
            window.set_z_index(z);
        }

        let is_minimized = self.get(id).is_some_and(Window::is_minimized);
        if minimize {
            self.minimize(id)?;
        } else if is_minimized {
            self.restore(id, screen)?;
        }
        debug!("Applied saved layout to {}", data.app_name);
        Ok(id)
    }

    /// Apply a whole layout, lowest saved z first so the saved stacking order
    /// is rebuilt from fresh values, then hand focus to the topmost window.
    /// Entries for applications without a window are returned to the caller.
    pub fn apply_layouts<'a>(
        &mut self,
        entries: impl IntoIterator<Item = &'a WindowLayoutData>,
        screen: &ScreenInfo,
    ) -> Vec<&'a WindowLayoutData> {
        let mut entries: Vec<&WindowLayoutData> = entries.into_iter().collect();
        entries.sort_by_key(|e| e.z_index);

        let mut unmatched = Vec::new();
        for entry in entries {
            if let Err(e) = self.apply_layout(entry, screen) {
                warn!("Saved layout entry not applied: {}", e);
                unmatched.push(entry);
            }
        }
        self.refocus_topmost();
        unmatched
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(&WindowManagerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::screen::DOCK_HEIGHT;

    fn screen() -> ScreenInfo {
        ScreenInfo::new(1920.0, 1080.0, DOCK_HEIGHT)
    }

    fn open(wm: &mut WindowManager, name: &str, screen: &ScreenInfo) -> WindowId {
        wm.open(name, name, Size::new(600.0, 400.0), screen)
    }

    fn focused_count(wm: &WindowManager) -> usize {
        wm.windows().iter().filter(|w| w.is_focused()).count()
    }

    #[test]
    fn test_open_places_on_offset_diagonal() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let mail = wm.open("Mail", "Mail", Size::new(700.0, 500.0), &screen);
        let chat = wm.open("Chat", "Chat", Size::new(500.0, 600.0), &screen);

        assert_eq!(wm.get(mail).unwrap().geometry(), Geometry::new(100.0, 100.0, 700.0, 500.0));
        assert_eq!(wm.get(chat).unwrap().position(), Vec2::new(130.0, 130.0));
        assert_eq!(wm.focused().map(Window::id), Some(chat));
    }

    #[test]
    fn test_opening_twice_focuses_existing_window() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let chat = open(&mut wm, "Chat", &screen);
        open(&mut wm, "Mail", &screen);

        assert_eq!(open(&mut wm, "Chat", &screen), chat);
        assert_eq!(wm.window_count(), 2);
        assert_eq!(wm.focused().map(Window::id), Some(chat));
    }

    #[test]
    fn test_opening_minimized_application_restores_it() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let chat = open(&mut wm, "Chat", &screen);
        wm.minimize(chat).unwrap();
        wm.take_events();

        open(&mut wm, "Chat", &screen);
        assert!(!wm.get(chat).unwrap().is_minimized());
        let events = wm.take_events();
        assert!(events.contains(&WmEvent::WindowRestored {
            id: chat,
            app_name: "Chat".into()
        }));
    }

    #[test]
    fn test_focus_requests_are_strictly_increasing() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let ids: Vec<WindowId> = ["Mail", "Chat", "Polling"]
            .into_iter()
            .map(|n| open(&mut wm, n, &screen))
            .collect();

        let mut last = 0;
        for id in [ids[0], ids[2], ids[0], ids[1], ids[1]] {
            let z = wm.bring_to_front(id).unwrap();
            assert!(z > last);
            last = z;
            assert_eq!(focused_count(&wm), 1);
            assert_eq!(wm.focused().map(Window::id), Some(id));
        }
        assert_eq!(wm.stacking_order().last(), Some(&ids[1]));
    }

    #[test]
    fn test_register_ignores_duplicates() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let mail = open(&mut wm, "Mail", &screen);
        let id = wm.allocate_id();
        let duplicate = Window::new(
            id,
            "Mail",
            "Mail",
            Geometry::new(0.0, 0.0, 600.0, 400.0),
            SizeLimits::default(),
            &screen,
        );
        assert_eq!(wm.register(duplicate), mail);
        assert_eq!(wm.window_count(), 1);
        assert!(wm.unregister(WindowId(99)).is_none());
    }

    #[test]
    fn test_close_is_idempotent_and_refocuses() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let mail = open(&mut wm, "Mail", &screen);
        let chat = open(&mut wm, "Chat", &screen);

        assert!(wm.close(chat));
        assert!(!wm.close(chat));
        assert_eq!(wm.focused().map(Window::id), Some(mail));
        assert!(wm.find_by_app_name("Chat").is_none());
    }

    #[test]
    fn test_minimize_moves_focus_without_raising() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let mail = open(&mut wm, "Mail", &screen);
        let chat = open(&mut wm, "Chat", &screen);
        let mail_z = wm.get(mail).unwrap().z_index();

        assert!(wm.minimize(chat).unwrap());
        assert!(!wm.minimize(chat).unwrap());
        assert_eq!(wm.focused().map(Window::id), Some(mail));
        assert_eq!(wm.get(mail).unwrap().z_index(), mail_z);

        assert!(wm.restore(chat, &screen).unwrap());
        assert!(!wm.restore(chat, &screen).unwrap());
        assert_eq!(wm.focused().map(Window::id), Some(chat));
    }

    #[test]
    fn test_window_at_picks_topmost_visible() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let mail = open(&mut wm, "Mail", &screen);
        let chat = open(&mut wm, "Chat", &screen);
        let overlap = Vec2::new(200.0, 200.0);

        assert_eq!(wm.window_at(overlap).map(Window::id), Some(chat));
        wm.bring_to_front(mail).unwrap();
        assert_eq!(wm.window_at(overlap).map(Window::id), Some(mail));
        wm.minimize(mail).unwrap();
        assert_eq!(wm.window_at(overlap).map(Window::id), Some(chat));
        assert!(wm.window_at(Vec2::new(1900.0, 1000.0)).is_none());
    }

    #[test]
    fn test_cascade_uses_registry_index_and_grid() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let mail = open(&mut wm, "Mail", &screen);
        let chat = open(&mut wm, "Chat", &screen);
        let polling = open(&mut wm, "Polling", &screen);
        wm.minimize(chat).unwrap();
        wm.toggle_maximize(polling, &screen).unwrap();

        wm.cascade(&screen);
        assert_eq!(wm.get(mail).unwrap().position(), Vec2::new(60.0, 60.0));
        assert_eq!(wm.get(chat).unwrap().position(), Vec2::new(130.0, 130.0));
        let polling = wm.get(polling).unwrap();
        assert!(!polling.is_maximized());
        assert_eq!(polling.geometry(), Geometry::new(120.0, 120.0, 600.0, 400.0));
    }

    #[test]
    fn test_tile_three_windows() {
        let screen = ScreenInfo::new(1200.0, 870.0, DOCK_HEIGHT);
        let mut wm = WindowManager::default();
        let ids: Vec<WindowId> = ["Mail", "Chat", "Polling"]
            .into_iter()
            .map(|n| open(&mut wm, n, &screen))
            .collect();

        wm.tile(&screen);
        assert_eq!(wm.get(ids[0]).unwrap().geometry(), Geometry::new(0.0, 0.0, 600.0, 400.0));
        assert_eq!(wm.get(ids[1]).unwrap().geometry(), Geometry::new(600.0, 0.0, 600.0, 400.0));
        assert_eq!(wm.get(ids[2]).unwrap().geometry(), Geometry::new(0.0, 400.0, 600.0, 400.0));
    }

    #[test]
    fn test_snap_to_zone() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let mail = open(&mut wm, "Mail", &screen);

        wm.snap_to_zone(mail, SnapZone::Right, &screen).unwrap();
        assert_eq!(wm.get(mail).unwrap().geometry(), Geometry::new(960.0, 0.0, 960.0, 1010.0));
        assert_eq!(wm.snap_to_zone(mail, SnapZone::None, &screen), Err(WmError::InvalidZone));
        wm.minimize(mail).unwrap();
        assert_eq!(
            wm.snap_to_zone(mail, SnapZone::Left, &screen),
            Err(WmError::WindowMinimized("Mail".into()))
        );
    }

    #[test]
    fn test_bulk_minimize_restore_close() {
        let screen = screen();
        let mut wm = WindowManager::default();
        for name in ["Mail", "Chat", "Polling"] {
            open(&mut wm, name, &screen);
        }

        wm.minimize_all();
        assert!(wm.windows().iter().all(Window::is_minimized));
        assert!(wm.focused().is_none());
        wm.restore_all(&screen);
        assert!(wm.windows().iter().all(Window::is_visible));
        assert_eq!(focused_count(&wm), 1);
        wm.close_all();
        assert_eq!(wm.window_count(), 0);
    }

    #[test]
    fn test_constrain_all_after_shrink() {
        let mut screen = screen();
        let mut wm = WindowManager::default();
        let mail = open(&mut wm, "Mail", &screen);
        wm.move_window(mail, Vec2::new(1300.0, 600.0), &screen).unwrap();
        let chat = open(&mut wm, "Chat", &screen);
        wm.toggle_maximize(chat, &screen).unwrap();

        screen.set_size(1024.0, 768.0);
        wm.constrain_all(&screen);
        assert_eq!(wm.get(mail).unwrap().geometry(), Geometry::new(424.0, 298.0, 600.0, 400.0));
        assert_eq!(wm.get(chat).unwrap().geometry(), screen.work_area);
    }

    fn layout(app_name: &str, z_index: u32) -> WindowLayoutData {
        WindowLayoutData {
            app_name: app_name.into(),
            x: 300.0,
            y: 200.0,
            width: 640.0,
            height: 480.0,
            is_minimized: false,
            z_index,
        }
    }

    #[test]
    fn test_layout_round_trip_orders_and_minimizes() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let mail = open(&mut wm, "Mail", &screen);
        let chat = open(&mut wm, "Chat", &screen);
        let before = wm.get(chat).unwrap().z_index();

        let mail_data = layout("Mail", 5000);
        let chat_data = WindowLayoutData {
            is_minimized: true,
            z_index: 4000,
            ..layout("Chat", 0)
        };
        let calendar_data = layout("Calendar", 5000);
        let unmatched = wm.apply_layouts([&mail_data, &chat_data, &calendar_data], &screen);
        assert_eq!(unmatched.len(), 1);
        assert_eq!(unmatched[0].app_name, "Calendar");

        let mail_window = wm.get(mail).unwrap();
        assert_eq!(mail_window.geometry(), Geometry::new(300.0, 200.0, 640.0, 480.0));
        assert!(mail_window.z_index() > wm.get(chat).unwrap().z_index());
        assert!(wm.get(chat).unwrap().z_index() > before);
        assert!(wm.get(chat).unwrap().is_minimized());
        assert_eq!(wm.focused().map(Window::id), Some(mail));
        assert!(wm.restore(chat, &screen).unwrap());
        assert!(wm.get(chat).unwrap().z_index() > wm.get(mail).unwrap().z_index());

        let snapshot = wm.layout_snapshot();
        assert_eq!(snapshot.windows[0].app_name, "Mail");
        assert_eq!(
            (snapshot.windows[0].x, snapshot.windows[0].y, snapshot.windows[0].width),
            (300.0, 200.0, 640.0)
        );
    }

    #[test]
    fn test_saved_z_does_not_pin_the_counter() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let chat = open(&mut wm, "Chat", &screen);
        let mail = open(&mut wm, "Mail", &screen);

        let saved = layout("Mail", u32::MAX);
        assert!(wm.apply_layouts([&saved], &screen).is_empty());

        let a = wm.bring_to_front(chat).unwrap();
        let b = wm.bring_to_front(mail).unwrap();
        let c = wm.bring_to_front(chat).unwrap();
        assert!(a < b && b < c);
        assert_eq!(wm.window_at(Vec2::new(400.0, 400.0)).map(Window::id), Some(chat));
    }

    #[test]
    fn test_applied_layout_never_reuses_a_live_z() {
        let screen = screen();
        let mut wm = WindowManager::default();
        let chat = open(&mut wm, "Chat", &screen);
        let mail = open(&mut wm, "Mail", &screen);
        let chat_z = wm.get(chat).unwrap().z_index();

        // Saved by a session where Mail was the only window
        let saved = layout("Mail", chat_z);
        wm.apply_layouts([&saved], &screen);

        assert_ne!(wm.get(mail).unwrap().z_index(), wm.get(chat).unwrap().z_index());
        assert_eq!(wm.stacking_order(), vec![chat, mail]);
        assert_eq!(wm.focused().map(Window::id), Some(mail));
    }
}
