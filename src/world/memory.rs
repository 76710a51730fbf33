//! In-memory collaborators for the demo host and tests.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError, RwLock};

use tracing::info;
use uuid::Uuid;

use super::{Grid, ItemCatalog, ItemDef, ItemId, RegionAuthority, RegionRecord};
use crate::geometry::{Point, Rect};
use crate::tile::Tile;

// =============================================================================
// GRID
// =============================================================================

pub struct MemoryGrid {
    world_id: String,
    width: i32,
    height: i32,
    tiles: RwLock<Vec<Tile>>,
    no_attach: HashSet<u16>,
}

impl MemoryGrid {
    /// An empty world of `width × height` tiles.
    #[must_use]
    pub fn new(world_id: impl Into<String>, width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = usize::try_from(width).unwrap_or(0) * usize::try_from(height).unwrap_or(0);
        Self {
            world_id: world_id.into(),
            width,
            height,
            tiles: RwLock::new(vec![Tile::default(); cells]),
            no_attach: HashSet::new(),
        }
    }

    /// Mark block types that refuse attachments.
    #[must_use]
    pub fn with_no_attach(mut self, kinds: impl IntoIterator<Item = u16>) -> Self {
        self.no_attach.extend(kinds);
        self
    }

    /// Write `tile` into every cell of `area` (inclusive edges).
    pub fn fill(&self, area: Rect, tile: Tile) {
        for y in area.top()..=area.bottom() {
            for x in area.left()..=area.right() {
                self.set_tile(Point::new(x, y), tile);
            }
        }
    }

    /// Copy of every cell, row-major.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Tile> {
        self.tiles.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }
        usize::try_from(p.y * self.width + p.x).ok()
    }
}

impl Grid for MemoryGrid {
    fn world_id(&self) -> String {
        self.world_id.clone()
    }

    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn tile(&self, p: Point) -> Option<Tile> {
        let index = self.index(p)?;
        self.tiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .copied()
    }

    fn set_tile(&self, p: Point, tile: Tile) {
        let Some(index) = self.index(p) else {
            return;
        };
        if let Some(cell) = self
            .tiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(index)
        {
            *cell = tile;
        }
    }

    fn no_attach(&self, kind: u16) -> bool {
        self.no_attach.contains(&kind)
    }
}

// =============================================================================
// REGIONS
// =============================================================================

#[derive(Default)]
pub struct MemoryRegions {
    regions: RwLock<Vec<RegionRecord>>,
}

impl MemoryRegions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region, replacing any existing one with the same name and world.
    pub fn insert(&self, name: impl Into<String>, area: Rect, world_id: impl Into<String>) {
        let record = RegionRecord { name: name.into(), area, world_id: world_id.into() };
        let mut regions = self.regions.write().unwrap_or_else(PoisonError::into_inner);
        regions.retain(|r| !(r.name == record.name && r.world_id == record.world_id));
        regions.push(record);
    }

    /// Remove a region by name. Returns the removed record.
    pub fn remove(&self, name: &str) -> Option<RegionRecord> {
        let mut regions = self.regions.write().unwrap_or_else(PoisonError::into_inner);
        let index = regions.iter().position(|r| r.name == name)?;
        Some(regions.remove(index))
    }

    /// Change a region's area. Returns false when no such region exists.
    pub fn resize(&self, name: &str, area: Rect) -> bool {
        let mut regions = self.regions.write().unwrap_or_else(PoisonError::into_inner);
        match regions.iter_mut().find(|r| r.name == name) {
            Some(record) => {
                record.area = area;
                true
            }
            None => false,
        }
    }
}

impl RegionAuthority for MemoryRegions {
    fn region_by_name(&self, name: &str) -> Option<RegionRecord> {
        self.regions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| r.name == name)
            .cloned()
    }

    fn regions(&self) -> Vec<RegionRecord> {
        self.regions.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

// =============================================================================
// ITEMS
// =============================================================================

#[derive(Default)]
pub struct MemoryCatalog {
    items: Vec<ItemDef>,
    granted: Mutex<Vec<(Uuid, ItemId)>>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new(items: Vec<ItemDef>) -> Self {
        Self { items, granted: Mutex::new(Vec::new()) }
    }

    /// Every grant made so far, oldest first.
    #[must_use]
    pub fn granted(&self) -> Vec<(Uuid, ItemId)> {
        self.granted.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ItemCatalog for MemoryCatalog {
    fn items(&self) -> Vec<ItemDef> {
        self.items.clone()
    }

    fn grant(&self, viewer: Uuid, item: ItemId) {
        info!(%viewer, item, "granting item");
        self.granted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((viewer, item));
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
