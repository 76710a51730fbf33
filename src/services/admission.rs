//! Edit admission: stop edits that only work because of a phantom border.
//!
//! DESIGN
//! ======
//! A viewer sees phantom blocks along each overlay's border, so their client
//! will happily mine a block that does not exist or attach a placement to
//! one. Every attempted edit from a viewer with overlays is checked against
//! the true grid, which holds no phantoms between operations:
//!
//! - Destroying an empty cell in a border band means the viewer broke an
//!   illusion. The edit is rejected and the whole stack is cleared.
//! - Placing a tile or wall in a border band is rejected unless real
//!   neighbours support it. The cell is resynced and the item refunded.
//!
//! Wall destruction and placement of the phantom block type are never
//! checked. The border band of a display window is the ring from one tile
//! outside its edge to one tile inside it.
//!
//! [`evaluate`] is pure; [`on_grid_edit_attempt`] performs the side effects.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::geometry::{Point, Rect};
use crate::packet::Packet;
use crate::stack::OverlayStack;
use crate::state::{AppState, ViewerId};
use crate::tile::ids;
use crate::world::Grid;

/// Attempted edit as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditKind {
    KillTile,
    PlaceTile { kind: u16, style: i32 },
    KillWall,
    PlaceWall { wall: u16 },
    KillTileNoItem,
    /// Any other edit (wiring, actuators, slopes...). Never checked.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    /// Reject and resync the one cell.
    RejectSingleCell,
    /// Reject and clear the viewer's whole stack.
    RejectFullClear,
}

impl EditKind {
    fn is_checked(self) -> bool {
        match self {
            Self::KillWall | Self::Other => false,
            Self::PlaceTile { kind, .. } => kind != ids::MAGICAL_ICE_BLOCK,
            Self::KillTile | Self::KillTileNoItem | Self::PlaceWall { .. } => true,
        }
    }

    fn is_destructive(self) -> bool {
        matches!(self, Self::KillTile | Self::KillTileNoItem)
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// Whether `p` lies in the border band of a display window.
#[must_use]
pub fn in_border_band(display: Rect, p: Point) -> bool {
    display.inflate(1).contains(p) && !display.inflate(-2).contains(p)
}

/// Whether real neighbours would hold a wall placed at `p`.
#[must_use]
pub fn wall_is_supported(grid: &dyn Grid, p: Point) -> bool {
    if grid.tile(p).is_some_and(|t| t.active) {
        return true;
    }
    p.neighbours()
        .into_iter()
        .filter_map(|n| grid.tile(n))
        .any(|t| (t.active && !grid.no_attach(t.kind)) || t.has_wall())
}

/// Whether real neighbours would hold a tile placed at `p`.
#[must_use]
pub fn tile_is_supported(grid: &dyn Grid, p: Point) -> bool {
    if grid.tile(p).is_some_and(|t| t.has_wall()) {
        return true;
    }
    p.neighbours()
        .into_iter()
        .filter_map(|n| grid.tile(n))
        .any(|t| t.has_wall() || (t.active && !grid.no_attach(t.kind)))
}

/// Decide an edit at `at` against every overlay in `stack`. First rejection wins.
#[must_use]
pub fn evaluate(grid: &dyn Grid, stack: &OverlayStack, at: Point, edit: EditKind) -> Verdict {
    if !edit.is_checked() {
        return Verdict::Allow;
    }

    for overlay in stack.iter() {
        let in_band = in_border_band(overlay.display_area(), at);
        if !in_band {
            continue;
        }

        if edit.is_destructive() {
            if !grid.tile(at).is_some_and(|t| t.active) {
                return Verdict::RejectFullClear;
            }
            continue;
        }

        let supported = match edit {
            EditKind::PlaceWall { .. } => wall_is_supported(grid, at),
            _ => tile_is_supported(grid, at),
        };
        if !supported {
            return Verdict::RejectSingleCell;
        }
    }
    Verdict::Allow
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Gate an attempted edit by `viewer_id` at `at`, performing the side
/// effects of a rejection before returning the verdict.
pub fn on_grid_edit_attempt(state: &AppState, viewer_id: ViewerId, at: Point, edit: EditKind) -> Verdict {
    let mut registry = state.registry();
    let Some(viewer) = registry.get_mut(viewer_id) else {
        return Verdict::Allow;
    };
    if viewer.stack.is_empty() {
        return Verdict::Allow;
    }

    let grid = state.world.grid.as_ref();
    let verdict = evaluate(grid, &viewer.stack, at, edit);
    match verdict {
        Verdict::Allow => {}
        Verdict::RejectSingleCell => {
            info!(viewer = %viewer_id, x = at.x, y = at.y, ?edit, "placement relies on a phantom border; rejected");
            viewer.link.send(Packet::square(grid, at));
            if let Some(item) = state.refunds.item_for(edit) {
                state.world.items.grant(viewer_id, item);
            }
        }
        Verdict::RejectFullClear => {
            info!(viewer = %viewer_id, x = at.x, y = at.y, ?edit, "phantom border broken; clearing overlays");
            let (stack, canvas) = viewer.split(&state.world, &state.config);
            if let Err(e) = stack.clear(&canvas) {
                error!(viewer = %viewer_id, error = %e, "failed to clear overlays");
            }
        }
    }
    verdict
}

#[cfg(test)]
#[path = "admission_test.rs"]
mod tests;
