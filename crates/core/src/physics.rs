//! Geometry primitives for the simulation.
//!
//! Everything is axis-aligned rectangles - hitboxes, trigger zones, level
//! bounds. No physics engine needed for a side-scroller of this scale.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle defined by its minimum corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Build a rect from a top-left position and a size vector.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { min: pos, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Check if a point lies within this rect (inclusive edges).
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    /// AABB overlap test against another rect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }

    /// Clamp a top-left position so a box of `size` stays inside this rect.
    pub fn clamp_with_size(&self, pos: Vec2, size: Vec2) -> Vec2 {
        let max = self.max() - size;
        Vec2::new(
            pos.x.clamp(self.min.x, max.x.max(self.min.x)),
            pos.y.clamp(self.min.y, max.y.max(self.min.y)),
        )
    }
}
