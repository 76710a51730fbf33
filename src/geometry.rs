//! Tile-space geometry.
//!
//! DESIGN
//! ======
//! `Rect` uses the inclusive-edge convention regions are stored with:
//! `right()` is `x + width` and names the last covered column, so a region
//! with `width == 0` is one column wide. Negative extents mark a region that
//! contains no tiles at all.

use serde::{Deserialize, Serialize};

/// A tile coordinate. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four orthogonal neighbours: west, east, north, south.
    #[must_use]
    pub const fn neighbours(self) -> [Point; 4] {
        [
            Point::new(self.x - 1, self.y),
            Point::new(self.x + 1, self.y),
            Point::new(self.x, self.y - 1),
            Point::new(self.x, self.y + 1),
        ]
    }
}

/// Axis-aligned rectangle with inclusive right/bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// True when the rectangle has a negative extent and covers no tiles.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.width < 0 || self.height < 0
    }

    /// Inclusive containment test. A rectangle whose edges cross contains nothing.
    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Grow (or, with a negative `by`, shrink) every edge outward by `by` tiles.
    #[must_use]
    pub const fn inflate(&self, by: i32) -> Self {
        Self {
            x: self.x.saturating_sub(by),
            y: self.y.saturating_sub(by),
            width: self.width.saturating_add(by.saturating_mul(2)),
            height: self.height.saturating_add(by.saturating_mul(2)),
        }
    }

    /// Whether `p` lies within `range` tiles of this rectangle on both axes.
    #[must_use]
    pub const fn is_near(&self, p: Point, range: i32) -> bool {
        self.inflate(range).contains(p)
    }
}

#[cfg(test)]
#[path = "geometry_test.rs"]
mod tests;
