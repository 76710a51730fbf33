//! Grid cell value.

use serde::{Deserialize, Serialize};

/// Tile type ids the overlay logic needs to know about.
pub mod ids {
    pub const GRAY_BRICK: u16 = 38;
    pub const MAGICAL_ICE_BLOCK: u16 = 127;
    /// Does not accept paint; phantom copies are swapped to gray brick.
    pub const RAINBOW_BRICK: u16 = 160;
}

/// One grid cell. `Tile::default()` is an empty cell.
///
/// Restoring a saved `Tile` must reproduce the cell exactly, so every field
/// the grid stores is carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    /// A foreground block occupies the cell.
    pub active: bool,
    /// The block is actuated: drawn but not solid.
    pub inactive: bool,
    pub kind: u16,
    pub wall: u16,
    pub paint: u8,
    pub wall_paint: u8,
    pub liquid: u8,
    pub frame_x: i16,
    pub frame_y: i16,
}

impl Tile {
    /// A solid foreground block of the given type.
    #[must_use]
    pub fn block(kind: u16) -> Self {
        Self { active: true, kind, ..Self::default() }
    }

    /// An empty cell with a background wall.
    #[must_use]
    pub fn wall(wall: u16) -> Self {
        Self { wall, ..Self::default() }
    }

    #[must_use]
    pub fn has_wall(&self) -> bool {
        self.wall > 0
    }
}
