//! World: the collaborators the overlay core borrows from its host.
//!
//! DESIGN
//! ======
//! The host owns the tile grid, the region database, the item catalog, and
//! each viewer's connection. The core only needs the narrow slices declared
//! here. Implementations synchronise internally; every method takes `&self`
//! so collaborators can be shared as `Arc<dyn Trait>`, the same way the
//! server shares its LLM client.
//!
//! Only one world is live at a time. Regions recorded against another world
//! id are invisible to every lookup made through [`World`].

pub mod link;
pub mod memory;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Rect};
use crate::packet::Packet;
use crate::tile::Tile;

pub use link::ChannelLink;

/// Item id in the host's catalog.
pub type ItemId = i32;

// =============================================================================
// TRAITS
// =============================================================================

/// Shared tile grid.
pub trait Grid: Send + Sync {
    /// Identifier of the loaded world.
    fn world_id(&self) -> String;

    /// World extent in tiles: `(width, height)`.
    fn size(&self) -> (i32, i32);

    /// Cell at `p`, or `None` outside the world.
    fn tile(&self, p: Point) -> Option<Tile>;

    /// Overwrite the cell at `p`. Writes outside the world are ignored.
    fn set_tile(&self, p: Point, tile: Tile);

    /// Whether blocks of this type refuse attachments (torches, platforms...).
    fn no_attach(&self, kind: u16) -> bool;
}

/// A named rectangular region as stored by the region authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub name: String,
    pub area: Rect,
    pub world_id: String,
}

/// Source of truth for region geometry.
pub trait RegionAuthority: Send + Sync {
    /// Exact-name lookup across all worlds.
    fn region_by_name(&self, name: &str) -> Option<RegionRecord>;

    /// Every known region, in storage order.
    fn regions(&self) -> Vec<RegionRecord>;
}

/// One viewer's connection: where they stand and how to reach them.
pub trait ViewerLink: Send + Sync {
    /// The viewer's current tile coordinate.
    fn position(&self) -> Point;

    /// Queue a packet for this viewer. Must not block.
    fn send(&self, packet: Packet);
}

/// Item definition as exposed by the host's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    /// Foreground tile type this item places, if any.
    #[serde(default)]
    pub create_tile: Option<u16>,
    #[serde(default)]
    pub place_style: i32,
    /// Background wall type this item places, if any.
    #[serde(default)]
    pub create_wall: Option<u16>,
    /// For wands, the material item consumed per placement.
    #[serde(default)]
    pub tile_wand: Option<ItemId>,
}

pub trait ItemCatalog: Send + Sync {
    fn items(&self) -> Vec<ItemDef>;

    /// Give one unit of `item` to the viewer.
    fn grant(&self, viewer: Uuid, item: ItemId);
}

// =============================================================================
// WORLD
// =============================================================================

/// Bundle of shared collaborators handed to [`crate::state::AppState`].
#[derive(Clone)]
pub struct World {
    pub grid: Arc<dyn Grid>,
    pub regions: Arc<dyn RegionAuthority>,
    pub items: Arc<dyn ItemCatalog>,
}

impl World {
    #[must_use]
    pub fn new(grid: Arc<dyn Grid>, regions: Arc<dyn RegionAuthority>, items: Arc<dyn ItemCatalog>) -> Self {
        Self { grid, regions, items }
    }

    /// Exact-name lookup restricted to the loaded world.
    #[must_use]
    pub fn region_named(&self, name: &str) -> Option<RegionRecord> {
        let world_id = self.grid.world_id();
        self.regions
            .region_by_name(name)
            .filter(|record| record.world_id == world_id)
            .or_else(|| self.regions_in_world().into_iter().find(|record| record.name == name))
    }

    /// All regions of the loaded world, in storage order.
    #[must_use]
    pub fn regions_in_world(&self) -> Vec<RegionRecord> {
        let world_id = self.grid.world_id();
        self.regions
            .regions()
            .into_iter()
            .filter(|record| record.world_id == world_id)
            .collect()
    }
}
