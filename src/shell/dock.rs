//! Dock (bottom bar) state
//!
//! One button per catalog application. The dock mirrors window state through
//! its minimized indicators and gives short pressed feedback when a button
//! opens an application. It draws nothing itself.

use tracing::{debug, warn};

use crate::shell::apps::AppCatalog;
use crate::wm::WindowManager;
use crate::wm::events::WmEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct DockEntry {
    pub app_name: String,
    pub label: String,
    pub icon: String,
    /// Minimized indicator shown under the button
    pub minimized: bool,
    /// Pressed feedback, cleared by a timer
    pub pressed: bool,
}

/// Dock state
#[derive(Debug, Clone, Default)]
pub struct Dock {
    entries: Vec<DockEntry>,
}

impl Dock {
    pub fn new(catalog: &AppCatalog) -> Self {
        if catalog.is_empty() {
            warn!("No applications registered; the dock is inert");
        }
        let entries = catalog
            .iter()
            .map(|app| DockEntry {
                app_name: app.app_name().to_string(),
                label: app.dock_label().to_string(),
                icon: app.icon().to_string(),
                minimized: false,
                pressed: false,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[DockEntry] {
        &self.entries
    }

    pub fn entry(&self, app_name: &str) -> Option<&DockEntry> {
        self.entries.iter().find(|e| e.app_name == app_name)
    }

    fn entry_mut(&mut self, app_name: &str) -> Option<&mut DockEntry> {
        let entry = self.entries.iter_mut().find(|e| e.app_name == app_name);
        if entry.is_none() {
            debug!("No dock button for {}", app_name);
        }
        entry
    }

    pub fn show_minimized_indicator(&mut self, app_name: &str) {
        if let Some(entry) = self.entry_mut(app_name) {
            entry.minimized = true;
        }
    }

    pub fn hide_minimized_indicator(&mut self, app_name: &str) {
        if let Some(entry) = self.entry_mut(app_name) {
            entry.minimized = false;
        }
    }

    /// Mark the button pressed. Returns `false` when there is no such button.
    pub fn press(&mut self, app_name: &str) -> bool {
        match self.entry_mut(app_name) {
            Some(entry) => {
                entry.pressed = true;
                true
            }
            None => false,
        }
    }

    pub fn release(&mut self, app_name: &str) {
        if let Some(entry) = self.entry_mut(app_name) {
            entry.pressed = false;
        }
    }

    /// Mirror a window manager event
    pub fn handle_event(&mut self, event: &WmEvent) {
        match event {
            WmEvent::WindowMinimized { app_name, .. } => self.show_minimized_indicator(app_name),
            WmEvent::WindowRestored { app_name, .. } | WmEvent::WindowClosed { app_name, .. } => {
                self.hide_minimized_indicator(app_name)
            }
            _ => {}
        }
    }

    /// Dock applications that currently have a window, in dock order
    pub fn open_applications(&self, wm: &WindowManager) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| wm.find_by_app_name(&e.app_name).is_some())
            .map(|e| e.app_name.clone())
            .collect()
    }
}
