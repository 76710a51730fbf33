use super::*;
use crate::world::World;
use std::sync::Arc;

#[test]
fn grid_reads_outside_world_as_none() {
    let grid = MemoryGrid::new("w", 10, 10);
    assert!(grid.tile(Point::new(-1, 0)).is_none());
    assert!(grid.tile(Point::new(10, 0)).is_none());
    assert_eq!(grid.tile(Point::new(9, 9)), Some(Tile::default()));
}

#[test]
fn grid_ignores_writes_outside_world() {
    let grid = MemoryGrid::new("w", 4, 4);
    let before = grid.snapshot();
    grid.set_tile(Point::new(4, 0), Tile::block(1));
    assert_eq!(grid.snapshot(), before);
}

#[test]
fn fill_covers_inclusive_rect() {
    let grid = MemoryGrid::new("w", 10, 10);
    grid.fill(Rect::new(2, 2, 1, 1), Tile::block(7));
    assert!(grid.tile(Point::new(3, 3)).is_some_and(|t| t.active));
    assert!(grid.tile(Point::new(4, 3)).is_some_and(|t| !t.active));
}

#[test]
fn regions_insert_replaces_same_name() {
    let regions = MemoryRegions::new();
    regions.insert("Spawn", Rect::new(0, 0, 5, 5), "w");
    regions.insert("Spawn", Rect::new(1, 1, 5, 5), "w");
    assert_eq!(regions.regions().len(), 1);
    assert_eq!(regions.region_by_name("Spawn").map(|r| r.area), Some(Rect::new(1, 1, 5, 5)));
}

#[test]
fn world_filters_other_worlds() {
    let grid = Arc::new(MemoryGrid::new("home", 100, 100));
    let regions = Arc::new(MemoryRegions::new());
    regions.insert("Elsewhere", Rect::new(0, 0, 5, 5), "away");
    regions.insert("Here", Rect::new(0, 0, 5, 5), "home");
    let world = World::new(grid, regions, Arc::new(MemoryCatalog::default()));

    assert!(world.region_named("Elsewhere").is_none());
    assert!(world.region_named("Here").is_some());
    assert_eq!(world.regions_in_world().len(), 1);
}

#[test]
fn catalog_records_grants() {
    let catalog = MemoryCatalog::new(Vec::new());
    let viewer = Uuid::new_v4();
    catalog.grant(viewer, 42);
    assert_eq!(catalog.granted(), vec![(viewer, 42)]);
}
