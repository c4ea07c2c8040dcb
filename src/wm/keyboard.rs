//! Keyboard Module
//!
//! Shell-level shortcuts. Chords are written as text in the config
//! ("ctrl+tab", "cmd+shift+tab", "escape") and resolved to actions here; the
//! shell carries the actions out against the registry.

use std::collections::HashMap;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::KeybindingsConfig;
use crate::error::{WmError, WmResult};

bitflags! {
    /// Modifier keys held during a key press
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CONTROL = 1 << 0;
        const COMMAND = 1 << 1;
        const SHIFT = 1 << 2;
        const ALT = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Escape,
    /// Printable key, stored lowercase
    Char(char),
}

impl Key {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "tab" => Some(Key::Tab),
            "escape" | "esc" => Some(Key::Escape),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }

    fn normalized(self) -> Self {
        match self {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }
}

/// A key together with the exact set of modifiers that must be held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl KeyChord {
    pub fn new(modifiers: Modifiers, key: Key) -> Self {
        Self {
            modifiers,
            key: key.normalized(),
        }
    }

    /// Parse `mod+mod+key`. Modifier names: ctrl/control, cmd/command/super/
    /// meta, shift, alt/option.
    pub fn parse(text: &str) -> WmResult<Self> {
        let invalid = || WmError::InvalidChord(text.to_string());
        let mut parts: Vec<&str> = text.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty()).ok_or_else(invalid)?;
        let key = Key::parse(key).ok_or_else(invalid)?;

        let mut modifiers = Modifiers::empty();
        for part in parts {
            let flag = match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Modifiers::CONTROL,
                "cmd" | "command" | "super" | "meta" => Modifiers::COMMAND,
                "shift" => Modifiers::SHIFT,
                "alt" | "option" => Modifiers::ALT,
                _ => return Err(invalid()),
            };
            modifiers |= flag;
        }
        Ok(Self::new(modifiers, key))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CONTROL, "ctrl"),
            (Modifiers::COMMAND, "cmd"),
            (Modifiers::SHIFT, "shift"),
            (Modifiers::ALT, "alt"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{}+", name)?;
            }
        }
        match self.key {
            Key::Tab => write!(f, "tab"),
            Key::Escape => write!(f, "escape"),
            Key::Char(c) => write!(f, "{}", c),
        }
    }
}

/// Keyboard shortcut action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyboardAction {
    /// Focus the next window in registry order
    CycleWindows,
    /// Focus the previous window in registry order
    CycleWindowsBackward,
    /// Minimize the focused window
    MinimizeActive,
    /// Close the focused window
    CloseActive,
    /// Dismiss transient notifications
    ClearNotifications,
}

fn binding_entries(config: &KeybindingsConfig) -> [(KeyboardAction, &[String]); 5] {
    [
        (KeyboardAction::CycleWindows, config.cycle_windows.as_slice()),
        (KeyboardAction::CycleWindowsBackward, config.cycle_windows_backward.as_slice()),
        (KeyboardAction::MinimizeActive, config.minimize_active.as_slice()),
        (KeyboardAction::CloseActive, config.close_active.as_slice()),
        (KeyboardAction::ClearNotifications, config.clear_notifications.as_slice()),
    ]
}

/// Keyboard manager
#[derive(Debug, Clone, Default)]
pub struct KeyboardManager {
    bindings: HashMap<KeyChord, KeyboardAction>,
}

impl KeyboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the binding table. Chords that do not parse are logged and
    /// skipped; the remaining shortcuts still work.
    pub fn from_config(config: &KeybindingsConfig) -> Self {
        let mut manager = Self::new();
        for (action, chords) in binding_entries(config) {
            for text in chords {
                match KeyChord::parse(text) {
                    Ok(chord) => manager.bind(chord, action),
                    Err(e) => warn!("Ignoring keybinding for {:?}: {}", action, e),
                }
            }
        }
        debug!("Keyboard bindings ready ({} chords)", manager.bindings.len());
        manager
    }

    pub fn bind(&mut self, chord: KeyChord, action: KeyboardAction) {
        if let Some(previous) = self.bindings.insert(chord, action) {
            if previous != action {
                warn!("Chord {} rebound from {:?} to {:?}", chord, previous, action);
            }
        }
    }

    pub fn unbind(&mut self, chord: &KeyChord) -> Option<KeyboardAction> {
        self.bindings.remove(chord)
    }

    /// Action for a key press, if any. Modifiers must match exactly.
    pub fn resolve(&self, modifiers: Modifiers, key: Key) -> Option<KeyboardAction> {
        self.bindings.get(&KeyChord::new(modifiers, key)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chords() {
        let chord = KeyChord::parse("Ctrl+Shift+Tab").unwrap();
        assert_eq!(chord.modifiers, Modifiers::CONTROL | Modifiers::SHIFT);
        assert_eq!(chord.key, Key::Tab);
        assert_eq!(chord.to_string(), "ctrl+shift+tab");

        assert_eq!(KeyChord::parse("cmd+M").unwrap().key, Key::Char('m'));
        assert_eq!(KeyChord::parse("esc").unwrap(), KeyChord::new(Modifiers::empty(), Key::Escape));
    }

    #[test]
    fn test_parse_rejects_bad_chords() {
        for bad in ["", "ctrl+", "hyper+tab", "ctrl+enter"] {
            assert_eq!(KeyChord::parse(bad), Err(WmError::InvalidChord(bad.to_string())));
        }
    }

    #[test]
    fn test_default_bindings_resolve_for_ctrl_and_cmd() {
        let keyboard = KeyboardManager::from_config(&KeybindingsConfig::default());
        for modifier in [Modifiers::CONTROL, Modifiers::COMMAND] {
            assert_eq!(keyboard.resolve(modifier, Key::Tab), Some(KeyboardAction::CycleWindows));
            assert_eq!(
                keyboard.resolve(modifier | Modifiers::SHIFT, Key::Tab),
                Some(KeyboardAction::CycleWindowsBackward)
            );
            assert_eq!(keyboard.resolve(modifier, Key::Char('M')), Some(KeyboardAction::MinimizeActive));
            assert_eq!(keyboard.resolve(modifier, Key::Char('w')), Some(KeyboardAction::CloseActive));
        }
        assert_eq!(
            keyboard.resolve(Modifiers::empty(), Key::Escape),
            Some(KeyboardAction::ClearNotifications)
        );
        assert_eq!(keyboard.resolve(Modifiers::empty(), Key::Tab), None);
        assert_eq!(keyboard.resolve(Modifiers::ALT, Key::Char('m')), None);
    }

    #[test]
    fn test_invalid_config_entries_are_skipped() {
        let config = KeybindingsConfig {
            close_active: vec!["ctrl+q".into(), "nonsense+q".into()],
            ..KeybindingsConfig::default()
        };
        let keyboard = KeyboardManager::from_config(&config);
        assert_eq!(keyboard.resolve(Modifiers::CONTROL, Key::Char('q')), Some(KeyboardAction::CloseActive));
        assert_eq!(keyboard.resolve(Modifiers::CONTROL, Key::Char('w')), None);
        assert_eq!(keyboard.len(), 8);
    }
}
