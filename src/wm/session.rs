//! Session Module
//!
//! Desktop layout persistence. The layout is a flat list of per-window
//! snapshots written as JSON; loading is lenient and never fails the shell
//! over a single bad entry.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// File name of the layout inside the data directory
pub const LAYOUT_FILE_NAME: &str = "desktop_layout.json";

/// Persisted subset of one window's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowLayoutData {
    pub app_name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub is_minimized: bool,
    pub z_index: u32,
}

impl WindowLayoutData {
    fn is_valid(&self) -> bool {
        !self.app_name.trim().is_empty()
            && [self.x, self.y, self.width, self.height]
                .iter()
                .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesktopLayout {
    pub windows: Vec<WindowLayoutData>,
}

impl DesktopLayout {
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Parse layout JSON, skipping entries that do not describe a window.
    /// Anything unreadable as a whole yields an empty layout.
    pub fn parse_lenient(text: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Saved layout is not valid JSON, ignoring it: {}", e);
                return Self::default();
            }
        };
        let Some(entries) = value.get("windows").and_then(|w| w.as_array()) else {
            warn!("Saved layout has no window list, ignoring it");
            return Self::default();
        };

        let mut windows = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match serde_json::from_value::<WindowLayoutData>(entry.clone()) {
                Ok(data) if data.is_valid() => Self::insert_dedup(&mut windows, data),
                Ok(data) => warn!("Skipping layout entry {} ({:?}): invalid values", index, data.app_name),
                Err(e) => warn!("Skipping malformed layout entry {}: {}", index, e),
            }
        }
        Self { windows }
    }

    /// One entry per application: the one saved highest in the stack wins
    fn insert_dedup(windows: &mut Vec<WindowLayoutData>, data: WindowLayoutData) {
        match windows.iter_mut().find(|w| w.app_name == data.app_name) {
            Some(existing) => {
                warn!("Duplicate layout entry for {}, keeping the topmost", data.app_name);
                if data.z_index > existing.z_index {
                    *existing = data;
                }
            }
            None => windows.push(data),
        }
    }
}

/// Reads and writes the layout file
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Session save path
    save_path: PathBuf,
}

impl SessionManager {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
        }
    }

    /// `<data dir>/coalition/desktop_layout.json`, falling back to the
    /// working directory when the platform has no data directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("coalition"))
            .unwrap_or_default()
            .join(LAYOUT_FILE_NAME)
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Write the layout. The file is replaced atomically so a crash mid-write
    /// leaves the previous layout intact.
    pub fn save_state(&self, layout: &DesktopLayout) -> Result<()> {
        debug!("Saving {} window(s) to {:?}", layout.windows.len(), self.save_path);

        if let Some(parent) = self.save_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create layout directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(layout).context("Failed to serialize layout")?;
        let tmp = self.save_path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write layout to {:?}", tmp))?;
        fs::rename(&tmp, &self.save_path)
            .with_context(|| format!("Failed to move layout into place at {:?}", self.save_path))?;

        info!("Saved desktop layout ({} windows)", layout.windows.len());
        Ok(())
    }

    /// Read the layout back. A missing file is a first run, not an error.
    pub fn restore_state(&self) -> Result<DesktopLayout> {
        let text = match fs::read_to_string(&self.save_path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No saved layout at {:?}", self.save_path);
                return Ok(DesktopLayout::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read layout from {:?}", self.save_path));
            }
        };

        let layout = DesktopLayout::parse_lenient(&text);
        info!("Loaded desktop layout ({} windows)", layout.windows.len());
        Ok(layout)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}
