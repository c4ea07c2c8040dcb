//! Configuration system for the Coalition desktop shell
//!
//! Loads configuration from TOML file at `~/.config/coalition/config.toml`
//! Auto-generates default config file on first run if missing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::shared::SizeLimits;
use crate::wm::decorations::FrameConfig;
use crate::wm::placement::PlacementConfig;
use crate::wm::screen::DOCK_HEIGHT;
use crate::wm::snap::{GRID_SIZE, SNAP_THRESHOLD};
use crate::wm::stacking::BASE_Z_INDEX;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_manager: WindowManagerConfig,
    pub desktop: DesktopConfig,
    pub decorations: FrameConfig,
    pub persistence: PersistenceConfig,
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load from an explicit path. A missing file is created with defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            if let Err(e) = Self::save_default(config_path) {
                warn!("Failed to create default config file: {:#}", e);
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {:?}", config_path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", config_path))?;

        info!("Configuration loaded from {:?}", config_path);
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("coalition");

        Ok(config_dir.join("config.toml"))
    }

    /// Save default configuration to file
    fn save_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let default_config = Self::default();
        let toml_string =
            toml::to_string_pretty(&default_config).context("Failed to serialize default config")?;

        fs::write(path, toml_string).context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }
}

/// Window manager behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowManagerConfig {
    /// Grid unit positions are rounded to when a drag ends (0 disables)
    pub grid_size: f32,
    /// Distance from a desktop edge that triggers a snap preview
    pub snap_threshold: f32,
    /// Apply the previewed zone layout on release instead of grid snapping
    pub apply_zone_on_release: bool,
    /// First z value handed out
    pub base_z_index: u32,
    /// Include minimized windows when cycling with modifier+Tab
    pub cycle_minimized: bool,
    pub limits: SizeLimits,
    pub placement: PlacementConfig,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            snap_threshold: SNAP_THRESHOLD,
            apply_zone_on_release: false,
            base_z_index: BASE_Z_INDEX,
            cycle_minimized: true,
            limits: SizeLimits::default(),
            placement: PlacementConfig::default(),
        }
    }
}

/// Initial hosting surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub width: f32,
    pub height: f32,
    /// Strip reserved at the bottom for the dock
    pub dock_height: f32,
    /// How long a dock button shows as pressed, in milliseconds
    pub dock_press_ms: u64,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            dock_height: DOCK_HEIGHT,
            dock_press_ms: 100,
        }
    }
}

/// Layout persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Override for the layout file; defaults to the platform data directory
    pub layout_path: Option<PathBuf>,
    /// Save whenever the shell loses focus
    pub save_on_focus_loss: bool,
    /// Replay the saved layout at startup
    pub restore_on_startup: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            layout_path: None,
            save_on_focus_loss: true,
            restore_on_startup: true,
        }
    }
}

/// Keyboard shortcuts configuration, chords per action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub cycle_windows: Vec<String>,
    pub cycle_windows_backward: Vec<String>,
    pub minimize_active: Vec<String>,
    pub close_active: Vec<String>,
    pub clear_notifications: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        let primary = |key: &str| vec![format!("ctrl+{key}"), format!("cmd+{key}")];
        Self {
            cycle_windows: primary("tab"),
            cycle_windows_backward: primary("shift+tab"),
            minimize_active: primary("m"),
            close_active: primary("w"),
            clear_notifications: vec!["escape".to_string()],
        }
    }
}
