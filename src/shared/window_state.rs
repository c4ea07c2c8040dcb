//! Shared window state types
//!
//! Geometry and state primitives used by the window entity, the move/resize
//! controllers and the layout snapshot code. All coordinates are
//! desktop-local, origin at the top-left corner.

use serde::{Deserialize, Serialize};

/// A point or delta in desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Window or surface size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Window geometry
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Geometry {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_parts(position: Vec2, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: the right and bottom edges are outside
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Window state. Exactly one variant holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowState {
    #[default]
    Normal,
    /// Hidden; `maximized` records the state to return to on restore
    Minimized { maximized: bool },
    Maximized,
}

impl WindowState {
    pub fn is_minimized(&self) -> bool {
        matches!(self, WindowState::Minimized { .. })
    }

    pub fn is_maximized(&self) -> bool {
        matches!(self, WindowState::Maximized)
    }
}

/// Minimum and maximum window size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    pub min_width: f32,
    pub min_height: f32,
    pub max_width: f32,
    pub max_height: f32,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_width: 300.0,
            min_height: 200.0,
            max_width: 1920.0,
            max_height: 1200.0,
        }
    }
}

/// Clamp `value` into `[lo, hi]`, preferring `lo` when the range is empty.
///
/// `f32::clamp` panics on an inverted range, which happens legitimately here
/// when the desktop is narrower than a window's minimum size.
pub fn clamp_span(value: f32, lo: f32, hi: f32) -> f32 {
    if hi < lo {
        lo
    } else {
        value.clamp(lo, hi)
    }
}
