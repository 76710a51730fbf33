use super::*;
use crate::overlay::colour_code;
use crate::packet::Packet;
use crate::tile::Tile;
use crate::world::ChannelLink;
use crate::world::memory::MemoryGrid;
use tokio::sync::mpsc;

const A_AREA: Rect = Rect::new(100, 100, 10, 10);
const B_AREA: Rect = Rect::new(105, 100, 10, 10);
const OVERLAP: Point = Point::new(107, 100);

fn setup() -> (MemoryGrid, std::sync::Arc<ChannelLink>, mpsc::Receiver<Packet>) {
    let grid = MemoryGrid::new("w", 2000, 1000);
    grid.fill(Rect::new(90, 101, 40, 0), Tile::block(1));
    let (link, rx) = ChannelLink::new(256, Point::new(110, 105));
    (grid, link, rx)
}

fn drain(rx: &mut mpsc::Receiver<Packet>) -> Vec<Packet> {
    let mut out = Vec::new();
    while let Ok(packet) = rx.try_recv() {
        out.push(packet);
    }
    out
}

fn frames(packets: &[Packet]) -> usize {
    packets
        .iter()
        .filter(|p| matches!(p, Packet::FrameSection { .. }))
        .count()
}

#[test]
fn names_have_distinct_colours() {
    assert_ne!(colour_code("A"), colour_code("B"));
}

// =============================================================================
// paint / peel
// =============================================================================

#[test]
fn later_overlay_wins_on_shared_cells_and_peels_in_reverse() {
    let (grid, _link, _rx) = setup();
    let original = grid.snapshot();

    let mut stack = OverlayStack::new();
    stack.push(RegionOverlay::new("A", A_AREA, Origin::Manual));
    stack.push(RegionOverlay::new("B", B_AREA, Origin::Manual));
    stack.paint(&grid).unwrap();

    assert_eq!(grid.tile(OVERLAP).unwrap().paint, colour_code("B"));

    stack.overlays[1].unapply(&grid).unwrap();
    assert_eq!(grid.tile(OVERLAP).unwrap().paint, colour_code("A"));

    stack.overlays[0].unapply(&grid).unwrap();
    assert_eq!(grid.snapshot(), original);
}

#[test]
fn peel_restores_grid_exactly() {
    let (grid, _link, _rx) = setup();
    let original = grid.snapshot();

    let mut stack = OverlayStack::new();
    stack.push(RegionOverlay::new("A", A_AREA, Origin::Manual));
    stack.push(RegionOverlay::new("B", B_AREA, Origin::Manual));
    stack.paint(&grid).unwrap();
    stack.peel(&grid).unwrap();

    assert_eq!(grid.snapshot(), original);
    assert!(stack.iter().all(|o| !o.is_applied()));
}

#[test]
fn paint_over_painted_overlay_fails_and_leaves_grid_clean() {
    let (grid, _link, _rx) = setup();
    let original = grid.snapshot();

    let mut stack = OverlayStack::new();
    stack.push(RegionOverlay::new("A", A_AREA, Origin::Manual));
    stack.push(RegionOverlay::new("B", B_AREA, Origin::Manual));
    stack.overlays[1].apply(&grid).unwrap();

    assert_eq!(stack.paint(&grid), Err(OverlayError::AlreadyApplied("B".into())));
    assert_eq!(grid.snapshot(), original);
    assert_eq!(grid.tile(OVERLAP), Some(Tile::default()));
    assert!(stack.iter().all(|o| !o.is_applied()));
}

#[test]
fn paint_with_painted_bottom_layer_restores_shared_cells() {
    let (grid, _link, _rx) = setup();
    let original = grid.snapshot();

    let mut stack = OverlayStack::new();
    stack.push(RegionOverlay::new("A", A_AREA, Origin::Manual));
    stack.push(RegionOverlay::new("B", B_AREA, Origin::Manual));
    stack.overlays[0].apply(&grid).unwrap();

    assert_eq!(stack.paint(&grid), Err(OverlayError::AlreadyApplied("A".into())));
    assert_eq!(grid.snapshot(), original);
    assert!(stack.iter().all(|o| !o.is_applied()));
}

// =============================================================================
// repaint
// =============================================================================

#[test]
fn repaint_sends_top_paint_and_leaves_true_grid() {
    let (grid, link, mut rx) = setup();
    let original = grid.snapshot();
    let config = OverlayConfig::default();
    let canvas = Canvas::new(&grid, link.as_ref(), &config);

    let mut stack = OverlayStack::new();
    stack.push(RegionOverlay::new("A", A_AREA, Origin::Manual));
    stack.push(RegionOverlay::new("B", B_AREA, Origin::Manual));
    stack.repaint(&canvas).unwrap();

    assert_eq!(grid.snapshot(), original);

    let packets = drain(&mut rx);
    assert_eq!(frames(&packets), 2);
    let seen: Vec<Tile> = packets.iter().filter_map(|p| p.tile_at(OVERLAP)).collect();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|t| t.paint == colour_code("B")));
}

// =============================================================================
// select / remove / clear
// =============================================================================

#[test]
fn select_appends_new_overlay_unpainted() {
    let (grid, link, mut rx) = setup();
    let config = OverlayConfig::default();
    let canvas = Canvas::new(&grid, link.as_ref(), &config);

    let mut stack = OverlayStack::new();
    let overlay = stack.select("A", A_AREA, Origin::Manual, &canvas).unwrap();
    assert_eq!(overlay.name(), "A");
    assert!(!overlay.is_applied());
    assert_eq!(stack.len(), 1);
    assert_eq!(frames(&drain(&mut rx)), 1);
}

#[test]
fn reselect_moves_overlay_to_top() {
    let (grid, link, _rx) = setup();
    let config = OverlayConfig::default();
    let canvas = Canvas::new(&grid, link.as_ref(), &config);

    let mut stack = OverlayStack::new();
    stack.select("A", A_AREA, Origin::Manual, &canvas).unwrap();
    stack.select("B", B_AREA, Origin::Manual, &canvas).unwrap();
    stack.select("A", A_AREA, Origin::Manual, &canvas).unwrap();

    assert_eq!(stack.names(), vec!["B".to_string(), "A".to_string()]);
}

#[test]
fn manual_reselect_promotes_auto_overlay() {
    let (grid, link, _rx) = setup();
    let config = OverlayConfig::default();
    let canvas = Canvas::new(&grid, link.as_ref(), &config);

    let mut stack = OverlayStack::new();
    stack.select("A", A_AREA, Origin::Auto, &canvas).unwrap();
    stack.select("A", A_AREA, Origin::Manual, &canvas).unwrap();
    assert_eq!(stack.get("A").map(RegionOverlay::origin), Some(Origin::Manual));
}

#[test]
fn reselect_with_moved_window_refreshes_old_window() {
    let (grid, link, mut rx) = setup();
    let config = OverlayConfig::default();
    let canvas = Canvas::new(&grid, link.as_ref(), &config);
    let wide = Rect::new(500, 100, 600, 10);

    let mut stack = OverlayStack::new();
    link.move_to(Point::new(700, 105));
    stack.select("Wide", wide, Origin::Manual, &canvas).unwrap();
    drain(&mut rx);

    link.move_to(Point::new(800, 105));
    stack.select("Wide", wide, Origin::Manual, &canvas).unwrap();
    // One refresh for the stale window, one for the repaint.
    assert_eq!(frames(&drain(&mut rx)), 2);
    assert_eq!(stack.get("Wide").unwrap().display_area().left(), 800 - 128);
}

#[test]
fn remove_pushes_one_refresh_of_true_tiles() {
    let (grid, link, mut rx) = setup();
    let config = OverlayConfig::default();
    let canvas = Canvas::new(&grid, link.as_ref(), &config);

    let mut stack = OverlayStack::new();
    stack.push(RegionOverlay::new("A", A_AREA, Origin::Manual));
    stack.push(RegionOverlay::new("B", B_AREA, Origin::Manual));

    let removed = stack.remove("A", &canvas).unwrap();
    assert_eq!(removed.map(|o| o.name().to_string()), Some("A".into()));
    assert_eq!(stack.names(), vec!["B".to_string()]);

    let packets = drain(&mut rx);
    assert_eq!(frames(&packets), 1);
    let corner = Point::new(100, 100);
    assert!(packets.iter().filter_map(|p| p.tile_at(corner)).all(|t| t == Tile::default()));
}

#[test]
fn remove_unknown_name_is_a_no_op() {
    let (grid, link, mut rx) = setup();
    let config = OverlayConfig::default();
    let canvas = Canvas::new(&grid, link.as_ref(), &config);

    let mut stack = OverlayStack::new();
    stack.push(RegionOverlay::new("A", A_AREA, Origin::Manual));
    assert!(stack.remove("missing", &canvas).unwrap().is_none());
    assert_eq!(stack.len(), 1);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn clear_refreshes_every_border_and_empties_stack() {
    let (grid, link, mut rx) = setup();
    let original = grid.snapshot();
    let config = OverlayConfig::default();
    let canvas = Canvas::new(&grid, link.as_ref(), &config);

    let mut stack = OverlayStack::new();
    stack.select("A", A_AREA, Origin::Manual, &canvas).unwrap();
    stack.select("B", B_AREA, Origin::Manual, &canvas).unwrap();
    drain(&mut rx);

    assert_eq!(stack.clear(&canvas).unwrap(), 2);
    assert!(stack.is_empty());
    assert_eq!(frames(&drain(&mut rx)), 2);
    assert_eq!(grid.snapshot(), original);
}
