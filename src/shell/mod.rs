//! Shell Module
//!
//! The desktop shell context. One `Shell` is created at startup and owns the
//! window registry, the interactive controllers, the dock, the timers and the
//! layout store. Hosts feed it pointer, keyboard and surface events; after
//! each one the queued window manager events go to the dock and then to
//! subscribers.

pub mod apps;
pub mod command;
pub mod dock;
pub mod timers;

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{WmError, WmResult};
use crate::input::{PointerButton, PointerId};
use crate::shared::Vec2;
use crate::wm::cycle::{CycleDirection, CycleManager};
use crate::wm::decorations::{Decorations, TITLE_BAR};
use crate::wm::events::{EventBus, WmEvent};
use crate::wm::keyboard::{Key, KeyboardAction, KeyboardManager, Modifiers};
use crate::wm::moveresize::MoveResizeManager;
use crate::wm::resize::ResizeDirection;
use crate::wm::screen::ScreenInfo;
use crate::wm::session::{SessionManager, WindowLayoutData};
use crate::wm::snap::SnapZone;
use crate::wm::{ButtonType, Window, WindowId, WindowManager};

use self::apps::AppCatalog;
use self::command::{HELP, ShellCommand};
use self::dock::Dock;
use self::timers::TimerQueue;

/// Pointer used for gestures synthesized from text commands
const COMMAND_POINTER: PointerId = 0;

/// Deferred shell work
#[derive(Debug, Clone, PartialEq)]
pub enum ShellTimer {
    /// End the pressed feedback of a dock button
    ReleaseDockButton(String),
}

/// What the host should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Done,
    Text(String),
    Quit,
}

/// A control button held down, activated if released over the same button
#[derive(Debug, Clone, Copy)]
struct PressedButton {
    pointer: PointerId,
    window: WindowId,
    button: ButtonType,
}

/// Shell state
pub struct Shell {
    config: Config,
    screen: ScreenInfo,
    wm: WindowManager,
    move_resize: MoveResizeManager,
    decorations: Decorations,
    catalog: AppCatalog,
    dock: Dock,
    keyboard: KeyboardManager,
    cycle: CycleManager,
    timers: TimerQueue<ShellTimer>,
    session: SessionManager,
    /// Saved entries waiting for their application to open
    pending_layout: Vec<WindowLayoutData>,
    pressed: Option<PressedButton>,
    events: EventBus,
}

impl Shell {
    /// Create a shell with the built-in applications
    pub fn new(config: Config) -> Self {
        Self::with_catalog(config, AppCatalog::builtin())
    }

    pub fn with_catalog(config: Config, catalog: AppCatalog) -> Self {
        let desktop = &config.desktop;
        let screen = ScreenInfo::new(desktop.width, desktop.height, desktop.dock_height);
        let layout_path = config
            .persistence
            .layout_path
            .clone()
            .unwrap_or_else(SessionManager::default_path);

        info!(
            "Shell starting on a {}x{} surface with {} applications",
            screen.width,
            screen.height,
            catalog.len()
        );

        Self {
            screen,
            wm: WindowManager::new(&config.window_manager),
            move_resize: MoveResizeManager::new(&config.window_manager),
            decorations: Decorations::new(config.decorations),
            dock: Dock::new(&catalog),
            catalog,
            keyboard: KeyboardManager::from_config(&config.keybindings),
            cycle: CycleManager::new(config.window_manager.cycle_minimized),
            timers: TimerQueue::new(),
            session: SessionManager::new(layout_path),
            pending_layout: Vec::new(),
            pressed: None,
            events: EventBus::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn screen(&self) -> &ScreenInfo {
        &self.screen
    }

    pub fn wm(&self) -> &WindowManager {
        &self.wm
    }

    pub fn dock(&self) -> &Dock {
        &self.dock
    }

    pub fn catalog(&self) -> &AppCatalog {
        &self.catalog
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    pub fn move_resize(&self) -> &MoveResizeManager {
        &self.move_resize
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn pending_layout(&self) -> &[WindowLayoutData] {
        &self.pending_layout
    }

    /// Subscriber list for window manager events
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    // ------------------------------------------------------------------
    // Applications and windows
    // ------------------------------------------------------------------

    /// Open an application, or restore/focus its window if it already has one
    pub fn open_application(&mut self, name: &str, now: Instant) -> WmResult<WindowId> {
        let app = self
            .catalog
            .resolve(name)
            .ok_or_else(|| WmError::UnknownApplication(name.to_string()))?;
        let app_name = app.app_name().to_string();
        let title = app.display_name().to_string();
        let size = app.default_size();

        let is_new = self.wm.find_by_app_name(&app_name).is_none();
        let id = self.wm.open(&app_name, &title, size, &self.screen);
        if is_new {
            self.apply_pending(id, &app_name);
        }

        if self.dock.press(&app_name) {
            let delay = Duration::from_millis(self.config.desktop.dock_press_ms);
            self.timers
                .schedule_in(now, delay, ShellTimer::ReleaseDockButton(app_name));
        }
        self.dispatch_events();
        Ok(id)
    }

    /// Window of an application, matched like typed names
    pub fn window_for(&self, app: &str) -> WmResult<WindowId> {
        let name = self.catalog.resolve(app).map_or(app, |a| a.app_name());
        self.wm
            .find_by_app_name(name)
            .map(Window::id)
            .ok_or_else(|| WmError::UnknownApplication(app.to_string()))
    }

    pub fn close_window(&mut self, id: WindowId) -> bool {
        let closed = self.wm.close(id);
        if self.pressed.is_some_and(|p| p.window == id) {
            self.pressed = None;
        }
        self.dispatch_events();
        closed
    }

    pub fn minimize_window(&mut self, id: WindowId) -> WmResult<bool> {
        let result = self.wm.minimize(id);
        self.dispatch_events();
        result
    }

    pub fn restore_window(&mut self, id: WindowId) -> WmResult<bool> {
        let result = self.wm.restore(id, &self.screen);
        self.dispatch_events();
        result
    }

    /// Restore if minimized, otherwise bring to front
    pub fn focus_window(&mut self, id: WindowId) -> bool {
        let focused = self.wm.focus(id, &self.screen);
        self.dispatch_events();
        focused
    }

    pub fn toggle_maximize(&mut self, id: WindowId) -> WmResult<Option<bool>> {
        let result = self.wm.toggle_maximize(id, &self.screen);
        self.dispatch_events();
        result
    }

    pub fn snap_window(&mut self, id: WindowId, zone: SnapZone) -> WmResult<()> {
        let result = self.wm.snap_to_zone(id, zone, &self.screen);
        self.dispatch_events();
        result
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.wm.focused().map(Window::id)
    }

    pub fn cascade(&mut self) {
        self.wm.cascade(&self.screen);
        self.dispatch_events();
    }

    pub fn tile(&mut self) {
        self.wm.tile(&self.screen);
        self.dispatch_events();
    }

    pub fn minimize_all(&mut self) {
        self.wm.minimize_all();
        self.dispatch_events();
    }

    pub fn restore_all(&mut self) {
        self.wm.restore_all(&self.screen);
        self.dispatch_events();
    }

    pub fn close_all(&mut self) {
        self.wm.close_all();
        self.pressed = None;
        self.dispatch_events();
    }

    // ------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------

    /// Pointer pressed. The window under the pointer is focused, then the
    /// press goes to a resize handle, a control button or the title bar.
    /// Presses on the desktop or window content only focus.
    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        button: PointerButton,
        position: Vec2,
    ) -> WmResult<()> {
        if self.move_resize.is_active() || self.pressed.is_some() {
            return Err(WmError::PointerCaptured(pointer));
        }
        let Some(window) = self.wm.window_at(position) else {
            debug!("Pointer {} pressed on the desktop", pointer);
            return Ok(());
        };
        let id = window.id();
        let path = self.decorations.hit_test(window.geometry(), position);

        let result = self.wm.bring_to_front(id).and_then(|_| {
            if ResizeDirection::from_path(&path).is_some() {
                self.move_resize
                    .start_resize(&mut self.wm, id, pointer, button, position, &path)
                    .map(|_| ())
            } else if let Some(control) = ButtonType::from_path(&path) {
                if button != PointerButton::Primary {
                    return Err(WmError::NotPrimaryButton);
                }
                self.pressed = Some(PressedButton {
                    pointer,
                    window: id,
                    button: control,
                });
                Ok(())
            } else if path.contains(TITLE_BAR) {
                self.move_resize
                    .start_move(&mut self.wm, id, pointer, button, position, &path)
            } else {
                Ok(())
            }
        });
        self.dispatch_events();
        result
    }

    /// Returns `true` if the motion belonged to the active session
    pub fn pointer_move(&mut self, pointer: PointerId, position: Vec2) -> bool {
        let handled = self
            .move_resize
            .handle_motion(&mut self.wm, pointer, position, &self.screen);
        self.dispatch_events();
        handled
    }

    /// Returns `true` if the release ended a session or clicked a control
    pub fn pointer_up(&mut self, pointer: PointerId, position: Vec2) -> bool {
        if let Some(pressed) = self.pressed.filter(|p| p.pointer == pointer) {
            self.pressed = None;
            let released_over = self
                .wm
                .get(pressed.window)
                .map(|w| self.decorations.hit_test(w.geometry(), position))
                .and_then(|path| ButtonType::from_path(&path));
            if released_over == Some(pressed.button) {
                self.activate_button(pressed.window, pressed.button);
            } else {
                debug!("{:?} press on {} abandoned", pressed.button, pressed.window);
            }
            self.dispatch_events();
            return true;
        }

        let finished = self.move_resize.finish(&mut self.wm, pointer, &self.screen);
        self.dispatch_events();
        finished
    }

    /// Capture taken away by the host; ends the session as a release would
    pub fn capture_lost(&mut self) -> bool {
        let had_press = self.pressed.take().is_some();
        let ended = self.move_resize.cancel(&mut self.wm, &self.screen);
        self.dispatch_events();
        had_press || ended
    }

    fn activate_button(&mut self, id: WindowId, button: ButtonType) {
        debug!("{:?} clicked on {}", button, id);
        let result = match button {
            ButtonType::Close => {
                self.wm.close(id);
                Ok(())
            }
            ButtonType::Maximize => self.wm.toggle_maximize(id, &self.screen).map(|_| ()),
            ButtonType::Minimize => self.wm.minimize(id).map(|_| ()),
        };
        if let Err(e) = result {
            warn!("{:?} button on {} had no effect: {}", button, id, e);
        }
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    /// Returns `true` if the key press was a shortcut
    pub fn key_down(&mut self, modifiers: Modifiers, key: Key) -> bool {
        let Some(action) = self.keyboard.resolve(modifiers, key) else {
            return false;
        };
        debug!("Shortcut {:?}", action);

        match action {
            KeyboardAction::CycleWindows => self.cycle_windows(CycleDirection::Forward),
            KeyboardAction::CycleWindowsBackward => self.cycle_windows(CycleDirection::Backward),
            KeyboardAction::MinimizeActive => {
                if let Some(id) = self.focused_window() {
                    if let Err(e) = self.wm.minimize(id) {
                        warn!("Failed to minimize {}: {}", id, e);
                    }
                }
            }
            KeyboardAction::CloseActive => {
                if let Some(id) = self.focused_window() {
                    self.wm.close(id);
                }
            }
            KeyboardAction::ClearNotifications => self.wm.push_event(WmEvent::NotificationsCleared),
        }
        self.dispatch_events();
        true
    }

    fn cycle_windows(&mut self, direction: CycleDirection) {
        match self.cycle.next_target(self.wm.windows(), direction) {
            Some(id) => {
                self.wm.focus(id, &self.screen);
            }
            None => debug!("Nothing to cycle to"),
        }
    }

    // ------------------------------------------------------------------
    // Surface
    // ------------------------------------------------------------------

    /// The hosting surface changed size; windows are pulled back in bounds
    pub fn resize_surface(&mut self, width: f32, height: f32) {
        if self.screen.set_size(width, height) {
            self.wm.constrain_all(&self.screen);
        }
        self.dispatch_events();
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Read the saved layout and hold its entries until they can be applied.
    /// Returns the number of entries loaded.
    pub fn load_layout(&mut self) -> Result<usize> {
        let layout = self.session.restore_state()?;
        self.pending_layout = layout.windows;
        Ok(self.pending_layout.len())
    }

    /// Apply pending entries whose application has a window, lowest z first.
    /// The rest wait for their application to open.
    pub fn restore_saved_layout(&mut self) {
        let pending = std::mem::take(&mut self.pending_layout);
        let (ready, waiting): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|e| self.wm.find_by_app_name(&e.app_name).is_some());

        if !ready.is_empty() {
            info!("Restoring layout of {} open window(s)", ready.len());
            self.wm.apply_layouts(&ready, &self.screen);
        }
        for entry in &waiting {
            if self.catalog.get(&entry.app_name).is_none() {
                debug!("Saved layout for {} waits for the application to register", entry.app_name);
            }
        }
        self.pending_layout = waiting;
        self.dispatch_events();
    }

    /// Saved geometry for a window the user just opened. It is shown on top
    /// even if it was saved minimized or low in the stack.
    fn apply_pending(&mut self, id: WindowId, app_name: &str) {
        let Some(index) = self.pending_layout.iter().position(|e| e.app_name == app_name) else {
            return;
        };
        let mut entry = self.pending_layout.remove(index);
        entry.is_minimized = false;
        debug!("Applying deferred layout for {}", app_name);
        let result = self
            .wm
            .apply_layout(&entry, &self.screen)
            .and_then(|_| self.wm.bring_to_front(id));
        if let Err(e) = result {
            warn!("Deferred layout for {} not applied: {}", app_name, e);
        }
    }

    /// Write the current layout. Entries still waiting for their application
    /// are written back so they survive the session; an open window's own
    /// snapshot replaces its waiting entry.
    pub fn save_layout(&self) -> Result<()> {
        let mut layout = self.wm.layout_snapshot();
        let waiting: Vec<_> = self
            .pending_layout
            .iter()
            .filter(|e| self.wm.find_by_app_name(&e.app_name).is_none())
            .cloned()
            .collect();
        layout.windows.extend(waiting);
        self.session.save_state(&layout)
    }

    pub fn on_suspend(&mut self) {
        self.save_logged();
    }

    pub fn on_focus_lost(&mut self) {
        if self.config.persistence.save_on_focus_loss {
            self.save_logged();
        }
    }

    /// End any interaction and save. Failures are logged only.
    pub fn shutdown(&mut self) {
        self.capture_lost();
        self.save_logged();
        info!("Shell stopped with {} window(s) open", self.wm.window_count());
    }

    fn save_logged(&self) {
        if let Err(e) = self.save_layout() {
            error!("Failed to save desktop layout: {:#}", e);
        }
    }

    // ------------------------------------------------------------------
    // Timers and events
    // ------------------------------------------------------------------

    /// Fire due timers. Returns how many fired.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.timers.due(now);
        let fired = due.len();
        for timer in due {
            match timer {
                ShellTimer::ReleaseDockButton(app_name) => self.dock.release(&app_name),
            }
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    fn dispatch_events(&mut self) {
        for event in self.wm.take_events() {
            self.dock.handle_event(&event);
            self.events.publish(&event);
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn execute(&mut self, command: ShellCommand, now: Instant) -> Result<Reply> {
        match command {
            ShellCommand::Open { app } => {
                self.open_application(&app, now)?;
            }
            ShellCommand::Close { app } => {
                let id = self.window_for(&app)?;
                self.close_window(id);
            }
            ShellCommand::Minimize { app } => {
                let id = self.window_for(&app)?;
                self.minimize_window(id)?;
            }
            ShellCommand::Restore { app } => {
                let id = self.window_for(&app)?;
                self.restore_window(id)?;
            }
            ShellCommand::Maximize { app } => {
                let id = self.window_for(&app)?;
                self.toggle_maximize(id)?;
            }
            ShellCommand::Focus { app } => {
                let id = self.window_for(&app)?;
                self.focus_window(id);
            }
            ShellCommand::Drag { app, dx, dy } => {
                let id = self.window_for(&app)?;
                let start = self.raise_for_gesture(id, |deco, w| deco.title_bar_point(w.geometry()))?;
                self.run_gesture(start, Vec2::new(dx, dy))?;
            }
            ShellCommand::Resize { app, direction, dx, dy } => {
                let id = self.window_for(&app)?;
                let start = self
                    .raise_for_gesture(id, |deco, w| deco.handle_point(w.geometry(), direction))?;
                self.run_gesture(start, Vec2::new(dx, dy))?;
            }
            ShellCommand::Snap { app, zone } => {
                let id = self.window_for(&app)?;
                self.snap_window(id, zone)?;
            }
            ShellCommand::Cascade => self.cascade(),
            ShellCommand::Tile => self.tile(),
            ShellCommand::MinimizeAll => self.minimize_all(),
            ShellCommand::RestoreAll => self.restore_all(),
            ShellCommand::CloseAll => self.close_all(),
            ShellCommand::Key { chord } => {
                if !self.key_down(chord.modifiers, chord.key) {
                    return Ok(Reply::Text(format!("{chord} is not bound")));
                }
            }
            ShellCommand::Surface { width, height } => self.resize_surface(width, height),
            ShellCommand::List => return Ok(Reply::Text(self.describe())),
            ShellCommand::Save => self.save_layout()?,
            ShellCommand::Suspend => self.on_suspend(),
            ShellCommand::Help => return Ok(Reply::Text(HELP.to_string())),
            ShellCommand::Quit => return Ok(Reply::Quit),
        }
        Ok(Reply::Done)
    }

    /// Bring the window to front so the gesture's start point hits it
    fn raise_for_gesture(
        &mut self,
        id: WindowId,
        start: impl FnOnce(&Decorations, &Window) -> Vec2,
    ) -> WmResult<Vec2> {
        self.wm.bring_to_front(id)?;
        self.dispatch_events();
        let window = self.wm.get(id).ok_or(WmError::WindowNotFound(id))?;
        Ok(start(&self.decorations, window))
    }

    fn run_gesture(&mut self, start: Vec2, delta: Vec2) -> WmResult<()> {
        self.pointer_down(COMMAND_POINTER, PointerButton::Primary, start)?;
        self.pointer_move(COMMAND_POINTER, start + delta);
        self.pointer_up(COMMAND_POINTER, start + delta);
        Ok(())
    }

    /// One line per window, top of the stack first
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for id in self.wm.stacking_order().into_iter().rev() {
            let Some(w) = self.wm.get(id) else { continue };
            let g = w.geometry();
            let _ = write!(
                out,
                "{:<10} {:<22} {:>6.0},{:<6.0} {:>5.0}x{:<5.0} z={}",
                w.app_name(),
                w.title(),
                g.x,
                g.y,
                g.width,
                g.height,
                w.z_index()
            );
            for (flag, label) in [
                (w.is_focused(), " focused"),
                (w.is_minimized(), " minimized"),
                (w.is_maximized(), " maximized"),
            ] {
                if flag {
                    out.push_str(label);
                }
            }
            out.push('\n');
        }
        if out.is_empty() {
            out.push_str("no windows open\n");
        }
        out
    }
}
