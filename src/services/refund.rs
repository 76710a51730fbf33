//! Item refunds for rejected placements.
//!
//! DESIGN
//! ======
//! The catalog is scanned once at startup into two maps: placed tile
//! (type, style) → item and placed wall type → item. Rejected edits then cost
//! one hash lookup. When several items place the same thing the lowest id
//! wins. Wands consume a material item per placement, so a wand match
//! refunds the material rather than the wand.

use std::collections::HashMap;

use crate::world::{ItemDef, ItemId};

use super::admission::EditKind;

#[derive(Debug, Default)]
pub struct RefundTable {
    tiles: HashMap<(u16, i32), ItemId>,
    walls: HashMap<u16, ItemId>,
}

impl RefundTable {
    #[must_use]
    pub fn build(items: &[ItemDef]) -> Self {
        let mut sorted: Vec<&ItemDef> = items.iter().collect();
        sorted.sort_by_key(|item| item.id);

        let mut table = Self::default();
        for item in sorted {
            if let Some(tile) = item.create_tile {
                table
                    .tiles
                    .entry((tile, item.place_style))
                    .or_insert(item.tile_wand.unwrap_or(item.id));
            }
            if let Some(wall) = item.create_wall {
                table.walls.entry(wall).or_insert(item.id);
            }
        }
        table
    }

    /// Item that would have produced `edit`, if any.
    #[must_use]
    pub fn item_for(&self, edit: EditKind) -> Option<ItemId> {
        match edit {
            EditKind::PlaceTile { kind, style } => self.tiles.get(&(kind, style)).copied(),
            EditKind::PlaceWall { wall } => self.walls.get(&wall).copied(),
            _ => None,
        }
    }
}
