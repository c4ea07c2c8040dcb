//! Snap Module
//!
//! Pure geometry helpers: grid snapping, snap zone classification and the
//! half/quarter rectangles each zone maps to.

use serde::{Deserialize, Serialize};

use crate::shared::{Geometry, Size, Vec2};

/// Grid unit used when a drag ends
pub const GRID_SIZE: f32 = 20.0;

/// Distance from a desktop edge that counts as "in" a snap zone
pub const SNAP_THRESHOLD: f32 = 20.0;

/// Region of the desktop the pointer is in while dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SnapZone {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SnapZone {
    pub const ALL: [SnapZone; 9] = [
        SnapZone::None,
        SnapZone::Left,
        SnapZone::Right,
        SnapZone::Top,
        SnapZone::Bottom,
        SnapZone::TopLeft,
        SnapZone::TopRight,
        SnapZone::BottomLeft,
        SnapZone::BottomRight,
    ];

    /// Parse a zone name as typed in shell commands ("left", "top-right", ...)
    pub fn parse(name: &str) -> Option<Self> {
        let zone = match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "none" => SnapZone::None,
            "left" => SnapZone::Left,
            "right" => SnapZone::Right,
            "top" => SnapZone::Top,
            "bottom" => SnapZone::Bottom,
            "top-left" => SnapZone::TopLeft,
            "top-right" => SnapZone::TopRight,
            "bottom-left" => SnapZone::BottomLeft,
            "bottom-right" => SnapZone::BottomRight,
            _ => return None,
        };
        Some(zone)
    }
}

/// Round each coordinate to the nearest multiple of `grid`.
///
/// A non-positive grid disables snapping.
pub fn snap_to_grid(position: Vec2, grid: f32) -> Vec2 {
    if grid <= 0.0 || !grid.is_finite() {
        return position;
    }
    Vec2::new(
        (position.x / grid).round() * grid,
        (position.y / grid).round() * grid,
    )
}

pub fn is_in_snap_zone(position: Vec2, desktop: Size, threshold: f32) -> bool {
    classify_zone(position, desktop, threshold) != SnapZone::None
}

/// Classify a pointer position. Corners win over edges.
pub fn classify_zone(position: Vec2, desktop: Size, threshold: f32) -> SnapZone {
    let left = position.x <= threshold;
    let right = position.x >= desktop.width - threshold;
    let top = position.y <= threshold;
    let bottom = position.y >= desktop.height - threshold;

    match (left, right, top, bottom) {
        (true, _, true, _) => SnapZone::TopLeft,
        (_, true, true, _) => SnapZone::TopRight,
        (true, _, _, true) => SnapZone::BottomLeft,
        (_, true, _, true) => SnapZone::BottomRight,
        (true, _, _, _) => SnapZone::Left,
        (_, true, _, _) => SnapZone::Right,
        (_, _, true, _) => SnapZone::Top,
        (_, _, _, true) => SnapZone::Bottom,
        _ => SnapZone::None,
    }
}

/// Rectangle a window takes when snapped into `zone`.
///
/// `SnapZone::None` yields the whole desktop; callers treat it as "do not
/// apply".
pub fn layout_for_zone(zone: SnapZone, desktop: Size) -> Geometry {
    let half_w = desktop.width / 2.0;
    let half_h = desktop.height / 2.0;

    match zone {
        SnapZone::Left => Geometry::new(0.0, 0.0, half_w, desktop.height),
        SnapZone::Right => Geometry::new(half_w, 0.0, half_w, desktop.height),
        SnapZone::Top => Geometry::new(0.0, 0.0, desktop.width, half_h),
        SnapZone::Bottom => Geometry::new(0.0, half_h, desktop.width, half_h),
        SnapZone::TopLeft => Geometry::new(0.0, 0.0, half_w, half_h),
        SnapZone::TopRight => Geometry::new(half_w, 0.0, half_w, half_h),
        SnapZone::BottomLeft => Geometry::new(0.0, half_h, half_w, half_h),
        SnapZone::BottomRight => Geometry::new(half_w, half_h, half_w, half_h),
        SnapZone::None => Geometry::new(0.0, 0.0, desktop.width, desktop.height),
    }
}
