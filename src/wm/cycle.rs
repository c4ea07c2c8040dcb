//! Cycle Module
//!
//! Window cycling (modifier+Tab). Cycling walks the registry in open order,
//! starting after the focused window.

use tracing::debug;

use crate::wm::WindowId;
use crate::wm::window::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Backward,
}

/// Cycle manager
#[derive(Debug, Clone)]
pub struct CycleManager {
    /// Also visit minimized windows (they are restored when reached)
    pub include_minimized: bool,
}

impl CycleManager {
    pub fn new(include_minimized: bool) -> Self {
        Self { include_minimized }
    }

    /// Window that should receive focus next, or `None` when there is
    /// nothing to cycle to
    pub fn next_target(&self, windows: &[Window], direction: CycleDirection) -> Option<WindowId> {
        let candidates: Vec<&Window> = windows
            .iter()
            .filter(|w| self.include_minimized || w.is_visible())
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let len = candidates.len();
        let index = match candidates.iter().position(|w| w.is_focused()) {
            Some(current) => match direction {
                CycleDirection::Forward => (current + 1) % len,
                CycleDirection::Backward => (current + len - 1) % len,
            },
            None => match direction {
                CycleDirection::Forward => 0,
                CycleDirection::Backward => len - 1,
            },
        };

        let target = candidates[index];
        debug!("Cycling {:?} to {}", direction, target.app_name());
        Some(target.id())
    }
}

impl Default for CycleManager {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{Geometry, SizeLimits};
    use crate::wm::screen::{DOCK_HEIGHT, ScreenInfo};

    fn windows(focused: Option<usize>) -> Vec<Window> {
        let screen = ScreenInfo::new(1920.0, 1080.0, DOCK_HEIGHT);
        ["Mail", "Chat", "Polling"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut w = Window::new(
                    WindowId(i as u32 + 1),
                    *name,
                    *name,
                    Geometry::new(100.0, 100.0, 600.0, 400.0),
                    SizeLimits::default(),
                    &screen,
                );
                w.set_focused(focused == Some(i));
                w
            })
            .collect()
    }

    #[test]
    fn test_forward_wraps_around() {
        let cycle = CycleManager::default();
        assert_eq!(cycle.next_target(&windows(Some(0)), CycleDirection::Forward), Some(WindowId(2)));
        assert_eq!(cycle.next_target(&windows(Some(2)), CycleDirection::Forward), Some(WindowId(1)));
    }

    #[test]
    fn test_backward_wraps_around() {
        let cycle = CycleManager::default();
        assert_eq!(cycle.next_target(&windows(Some(0)), CycleDirection::Backward), Some(WindowId(3)));
        assert_eq!(cycle.next_target(&windows(None), CycleDirection::Backward), Some(WindowId(3)));
    }

    #[test]
    fn test_minimized_windows_can_be_skipped() {
        let mut list = windows(Some(0));
        list[1].minimize();
        assert_eq!(
            CycleManager::new(false).next_target(&list, CycleDirection::Forward),
            Some(WindowId(3))
        );
        assert_eq!(
            CycleManager::new(true).next_target(&list, CycleDirection::Forward),
            Some(WindowId(2))
        );
        assert_eq!(CycleManager::default().next_target(&[], CycleDirection::Forward), None);
    }
}
