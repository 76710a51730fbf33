//! Packet: what the overlay core sends down a viewer's link.
//!
//! DESIGN
//! ======
//! Section and square packets carry a snapshot of the tiles in their
//! rectangle, read from the grid at construction time. Phantom borders are
//! only ever on the grid while a stack is painted, so building the packet at
//! that moment is what gives one viewer a view nobody else receives.
//!
//! Frame-section packets ask the client to refresh lighting and tile framing
//! for the coarse sections a border touches.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::tile::Tile;
use crate::world::Grid;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Width in tiles of one coarse client section.
pub const SECTION_WIDTH: i32 = 200;

/// Height in tiles of one coarse client section.
pub const SECTION_HEIGHT: i32 = 150;

// =============================================================================
// TYPES
// =============================================================================

/// 24-bit message colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Outbound message for one viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Packet {
    /// Rectangular tile section, `width × height` cells starting at (`x`, `y`),
    /// tiles in row-major order.
    Section { x: i32, y: i32, width: i32, height: i32, tiles: Vec<Tile> },
    /// Refresh framing for coarse sections `start..=end`.
    FrameSection { start_x: i32, start_y: i32, end_x: i32, end_y: i32 },
    /// Square resync of `size × size` cells at (`x`, `y`).
    Square { x: i32, y: i32, size: i32, tiles: Vec<Tile> },
    /// Chat line in the given colour.
    Message { text: String, colour: Rgb },
}

/// Grepable error code for rejections surfaced to viewers.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

impl Packet {
    /// Snapshot a section of the grid. Cells outside the world read as empty.
    #[must_use]
    pub fn section(grid: &dyn Grid, x: i32, y: i32, width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self::Section { x, y, width, height, tiles: snapshot(grid, x, y, width, height) }
    }

    /// Coarse frame refresh covering every section `area` touches.
    #[must_use]
    pub fn frame_section(area: Rect) -> Self {
        Self::FrameSection {
            start_x: area.left() / SECTION_WIDTH,
            start_y: area.top() / SECTION_HEIGHT,
            end_x: area.right() / SECTION_WIDTH,
            end_y: area.bottom() / SECTION_HEIGHT,
        }
    }

    /// Single-cell resync carrying the true tile at `at`.
    #[must_use]
    pub fn square(grid: &dyn Grid, at: Point) -> Self {
        Self::Square { x: at.x, y: at.y, size: 1, tiles: snapshot(grid, at.x, at.y, 1, 1) }
    }

    pub fn message(text: impl Into<String>, colour: Rgb) -> Self {
        Self::Message { text: text.into(), colour }
    }

    /// Tile at (`x`, `y`) inside a section or square packet, if covered.
    #[must_use]
    pub fn tile_at(&self, p: Point) -> Option<Tile> {
        let (x, y, width, height, tiles) = match self {
            Self::Section { x, y, width, height, tiles } => (*x, *y, *width, *height, tiles),
            Self::Square { x, y, size, tiles } => (*x, *y, *size, *size, tiles),
            _ => return None,
        };
        if p.x < x || p.y < y || p.x >= x + width || p.y >= y + height {
            return None;
        }
        let index = usize::try_from((p.y - y) * width + (p.x - x)).ok()?;
        tiles.get(index).copied()
    }
}

fn snapshot(grid: &dyn Grid, x: i32, y: i32, width: i32, height: i32) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(usize::try_from(width * height).unwrap_or(0));
    for row in y..y + height {
        for col in x..x + width {
            tiles.push(grid.tile(Point::new(col, row)).unwrap_or_default());
        }
    }
    tiles
}

// =============================================================================
// DISPLAY
// =============================================================================

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section { x, y, width, height, .. } => write!(f, "section {width}x{height} at ({x}, {y})"),
            Self::FrameSection { start_x, start_y, end_x, end_y } => {
                write!(f, "frame sections ({start_x}, {start_y})..=({end_x}, {end_y})")
            }
            Self::Square { x, y, size, .. } => write!(f, "square {size} at ({x}, {y})"),
            Self::Message { text, .. } => write!(f, "message {text:?}"),
        }
    }
}

#[cfg(test)]
#[path = "packet_test.rs"]
mod tests;
