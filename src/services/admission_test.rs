use super::*;
use crate::services::selection;
use crate::state::test_helpers::{self, Harness, drain, frame_count, join_viewer};
use crate::tile::Tile;
use crate::world::ItemDef;
use tokio::sync::mpsc;

const SPAWN: Rect = Rect::new(100, 100, 20, 20);
/// One tile above the top edge of the border.
const ABOVE_TOP: Point = Point::new(110, 99);

fn viewing_spawn(items: Vec<ItemDef>) -> (Harness, ViewerId, mpsc::Receiver<Packet>) {
    let h = test_helpers::harness_with_items(items);
    h.region("Spawn", SPAWN);
    let (id, _link, mut rx) = join_viewer(&h.state, Point::new(110, 110));
    selection::select_overlay(&h.state, id, "Spawn").unwrap();
    drain(&mut rx);
    (h, id, rx)
}

fn dirt_item() -> ItemDef {
    ItemDef { id: 2, create_tile: Some(0), place_style: 0, create_wall: None, tile_wand: None }
}

fn wall_item() -> ItemDef {
    ItemDef { id: 30, create_tile: None, place_style: 0, create_wall: Some(4), tile_wand: None }
}

// =============================================================================
// band
// =============================================================================

#[test]
fn band_spans_one_outside_to_one_inside() {
    let d = Rect::new(10, 10, 10, 10);
    assert!(in_border_band(d, Point::new(15, 9)));
    assert!(in_border_band(d, Point::new(15, 10)));
    assert!(in_border_band(d, Point::new(15, 11)));
    assert!(!in_border_band(d, Point::new(15, 12)));
    assert!(!in_border_band(d, Point::new(15, 8)));
    assert!(in_border_band(d, Point::new(21, 15)));
    assert!(!in_border_band(d, Point::new(22, 15)));
}

// =============================================================================
// desync
// =============================================================================

#[test]
fn breaking_phantom_above_top_edge_clears_everything() {
    let (h, id, mut rx) = viewing_spawn(Vec::new());

    let verdict = on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::KillTile);
    assert_eq!(verdict, Verdict::RejectFullClear);
    assert!(h.stack_names(id).is_empty());
    assert_eq!(frame_count(&drain(&mut rx)), 1);
}

#[test]
fn destroying_far_from_any_border_is_allowed() {
    let (h, id, mut rx) = viewing_spawn(Vec::new());

    let verdict = on_grid_edit_attempt(&h.state, id, Point::new(110, 94), EditKind::KillTile);
    assert_eq!(verdict, Verdict::Allow);
    assert_eq!(h.stack_names(id), vec!["Spawn".to_string()]);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn destroying_deep_interior_is_allowed() {
    let (h, id, _rx) = viewing_spawn(Vec::new());
    let verdict = on_grid_edit_attempt(&h.state, id, Point::new(110, 110), EditKind::KillTileNoItem);
    assert_eq!(verdict, Verdict::Allow);
}

#[test]
fn destroying_real_block_in_band_is_allowed() {
    let (h, id, _rx) = viewing_spawn(Vec::new());
    h.grid.set_tile(ABOVE_TOP, Tile::block(1));
    assert_eq!(on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::KillTile), Verdict::Allow);
}

// =============================================================================
// placement
// =============================================================================

#[test]
fn unsupported_tile_in_band_is_resynced_and_refunded() {
    let (h, id, mut rx) = viewing_spawn(vec![dirt_item()]);

    let verdict = on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::PlaceTile { kind: 0, style: 0 });
    assert_eq!(verdict, Verdict::RejectSingleCell);

    let packets = drain(&mut rx);
    assert_eq!(packets.len(), 1);
    assert!(matches!(packets[0], Packet::Square { x: 110, y: 99, size: 1, .. }));
    assert_eq!(h.items.granted(), vec![(id, 2)]);
    // A single-cell rejection keeps the overlays.
    assert_eq!(h.stack_names(id), vec!["Spawn".to_string()]);
}

#[test]
fn unsupported_wall_in_band_refunds_the_wall_item() {
    let (h, id, _rx) = viewing_spawn(vec![dirt_item(), wall_item()]);
    let verdict = on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::PlaceWall { wall: 4 });
    assert_eq!(verdict, Verdict::RejectSingleCell);
    assert_eq!(h.items.granted(), vec![(id, 30)]);
}

#[test]
fn rejection_without_matching_item_grants_nothing() {
    let (h, id, _rx) = viewing_spawn(Vec::new());
    let verdict = on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::PlaceTile { kind: 5, style: 0 });
    assert_eq!(verdict, Verdict::RejectSingleCell);
    assert!(h.items.granted().is_empty());
}

#[test]
fn real_wall_neighbour_supports_tile() {
    let (h, id, _rx) = viewing_spawn(Vec::new());
    h.grid.set_tile(Point::new(110, 98), Tile::wall(4));
    let verdict = on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::PlaceTile { kind: 0, style: 0 });
    assert_eq!(verdict, Verdict::Allow);
}

#[test]
fn real_block_neighbour_supports_tile() {
    let (h, id, _rx) = viewing_spawn(Vec::new());
    h.grid.set_tile(Point::new(109, 99), Tile::block(1));
    let verdict = on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::PlaceTile { kind: 0, style: 0 });
    assert_eq!(verdict, Verdict::Allow);
}

#[test]
fn no_attach_neighbour_gives_no_support() {
    let (h, id, _rx) = viewing_spawn(Vec::new());
    h.grid.set_tile(Point::new(109, 99), Tile::block(19));
    let verdict = on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::PlaceTile { kind: 0, style: 0 });
    assert_eq!(verdict, Verdict::RejectSingleCell);
}

#[test]
fn wall_behind_block_is_supported_by_the_block() {
    let (h, id, _rx) = viewing_spawn(Vec::new());
    h.grid.set_tile(ABOVE_TOP, Tile::block(1));
    let verdict = on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::PlaceWall { wall: 4 });
    assert_eq!(verdict, Verdict::Allow);
}

#[test]
fn tile_over_own_wall_is_supported_but_wall_under_nothing_is_not() {
    let grid = crate::world::memory::MemoryGrid::new("w", 50, 50);
    let p = Point::new(10, 10);
    grid.set_tile(p, Tile::wall(4));
    assert!(tile_is_supported(&grid, p));

    let q = Point::new(30, 30);
    assert!(!wall_is_supported(&grid, q));
    assert!(!tile_is_supported(&grid, q));
}

#[test]
fn placement_outside_band_is_allowed() {
    let (h, id, _rx) = viewing_spawn(Vec::new());
    let verdict = on_grid_edit_attempt(&h.state, id, Point::new(110, 90), EditKind::PlaceTile { kind: 0, style: 0 });
    assert_eq!(verdict, Verdict::Allow);
}

// =============================================================================
// skipped edits
// =============================================================================

#[test]
fn ice_block_placement_and_wall_removal_are_never_checked() {
    let (h, id, _rx) = viewing_spawn(Vec::new());
    let ice = EditKind::PlaceTile { kind: ids::MAGICAL_ICE_BLOCK, style: 0 };
    assert_eq!(on_grid_edit_attempt(&h.state, id, ABOVE_TOP, ice), Verdict::Allow);
    assert_eq!(on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::KillWall), Verdict::Allow);
    assert_eq!(on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::Other), Verdict::Allow);
}

#[test]
fn viewer_without_overlays_is_never_checked() {
    let h = test_helpers::harness();
    let (id, _link, _rx) = join_viewer(&h.state, Point::new(110, 110));
    assert_eq!(on_grid_edit_attempt(&h.state, id, ABOVE_TOP, EditKind::KillTile), Verdict::Allow);
    assert_eq!(
        on_grid_edit_attempt(&h.state, uuid::Uuid::new_v4(), ABOVE_TOP, EditKind::KillTile),
        Verdict::Allow
    );
}

#[test]
fn edit_kinds_parse_from_json() {
    let edit: EditKind = serde_json::from_str(r#"{"type":"place_tile","kind":4,"style":1}"#).unwrap();
    assert_eq!(edit, EditKind::PlaceTile { kind: 4, style: 1 });
}
