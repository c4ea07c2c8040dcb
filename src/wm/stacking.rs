//! Stacking Module
//!
//! Z-order pool. Values are handed out strictly increasing and never reused;
//! the counter alone decides which window is on top.

use crate::wm::WindowId;
use crate::wm::window::Window;

/// First z value handed out in a session
pub const BASE_Z_INDEX: u32 = 1000;

#[derive(Debug, Clone)]
pub struct StackingManager {
    next_z: u32,
}

impl StackingManager {
    pub fn new(base: u32) -> Self {
        Self { next_z: base }
    }

    /// Take the next z value. Saturates at `u32::MAX`, which takes billions of
    /// focus requests to reach.
    pub fn next_z(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z = self.next_z.saturating_add(1);
        z
    }

    /// Window ids ordered bottom to top
    pub fn stacking_order(windows: &[Window]) -> Vec<WindowId> {
        let mut ordered: Vec<&Window> = windows.iter().collect();
        ordered.sort_by_key(|w| w.z_index());
        ordered.into_iter().map(Window::id).collect()
    }
}

impl Default for StackingManager {
    fn default() -> Self {
        Self::new(BASE_Z_INDEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_is_strictly_increasing() {
        let mut stacking = StackingManager::default();
        let a = stacking.next_z();
        let b = stacking.next_z();
        assert_eq!(a, BASE_Z_INDEX);
        assert_eq!(b, BASE_Z_INDEX + 1);
        assert_eq!(stacking.next_z(), BASE_Z_INDEX + 2);
    }

    #[test]
    fn test_saturates_instead_of_wrapping() {
        let mut stacking = StackingManager::new(u32::MAX);
        assert_eq!(stacking.next_z(), u32::MAX);
        assert_eq!(stacking.next_z(), u32::MAX);
    }
}
