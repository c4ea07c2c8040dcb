//! Placement Module
//!
//! Where new windows appear, and the bulk cascade and tile arrangements.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shared::{Geometry, Size, Vec2};
use crate::wm::screen::ScreenInfo;

/// Placement constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Top-left corner of the first opened window
    pub anchor_x: f32,
    pub anchor_y: f32,
    /// Diagonal offset per already-open window
    pub open_offset: f32,
    /// Start of the cascade diagonal
    pub cascade_x: f32,
    pub cascade_y: f32,
    /// Diagonal step per registry index when cascading
    pub cascade_step: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            anchor_x: 100.0,
            anchor_y: 100.0,
            open_offset: 30.0,
            cascade_x: 50.0,
            cascade_y: 50.0,
            cascade_step: 30.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlacementManager {
    pub config: PlacementConfig,
}

impl PlacementManager {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Position for a new window given how many windows are already open.
    ///
    /// The offset diagonal is capped so the window stays on-screen.
    pub fn place_new(&self, screen: &ScreenInfo, size: Size, open_count: usize) -> Vec2 {
        let offset = open_count as f32 * self.config.open_offset;
        let area = screen.work_area;
        let x = (self.config.anchor_x + offset).min(area.width - size.width).max(0.0);
        let y = (self.config.anchor_y + offset).min(area.height - size.height).max(0.0);
        debug!("Placing new window #{} at ({}, {})", open_count + 1, x, y);
        Vec2::new(x, y)
    }

    /// Cascade position for the window at registry `index`
    pub fn cascade_position(&self, index: usize) -> Vec2 {
        let step = index as f32 * self.config.cascade_step;
        Vec2::new(self.config.cascade_x + step, self.config.cascade_y + step)
    }

    /// Row-major near-square grid of `count` cells over the work area
    pub fn tile(&self, screen: &ScreenInfo, count: usize) -> Vec<Geometry> {
        if count == 0 {
            return Vec::new();
        }
        let (cols, rows) = grid_dimensions(count);
        let area = screen.work_area;
        let cell_w = area.width / cols as f32;
        let cell_h = area.height / rows as f32;

        (0..count)
            .map(|i| {
                let col = i % cols;
                let row = i / cols;
                Geometry::new(
                    area.x + col as f32 * cell_w,
                    area.y + row as f32 * cell_h,
                    cell_w,
                    cell_h,
                )
            })
            .collect()
    }
}

/// `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`
pub fn grid_dimensions(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    (cols, rows)
}
