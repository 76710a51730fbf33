//! Reconciliation: keep every viewer's overlays in step with the regions.
//!
//! DESIGN
//! ======
//! A pass visits each viewer under the registry lock:
//! 1. Every overlay's region is fetched again by name. Missing regions,
//!    automatic overlays the viewer has left behind, and regions resized to
//!    nothing are removed; resized regions take their new area. Overlays
//!    whose display window no longer matches the viewer's position are
//!    recentred.
//! 2. With proximity mode on, regions within range that are not yet shown
//!    are added as automatic overlays.
//! 3. If anything changed, the viewer's stack is repainted once.
//!
//! Each removed or moved border is refreshed with true tiles exactly once,
//! before the repaint, so the viewer never keeps a stale phantom.
//!
//! ERROR HANDLING
//! ==============
//! Contract violations from the stack are logged and end that viewer's
//! pass; other viewers are still reconciled.

use tracing::{debug, error, info};

use crate::config::OverlayConfig;
use crate::overlay::{Origin, OverlayError, RegionOverlay};
use crate::packet::Packet;
use crate::state::{AppState, Viewer};
use crate::world::World;

use super::messages;

/// What one viewer's pass found.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ViewerPass {
    /// Overlays were added, removed, or changed; the stack was repainted.
    pub changed: bool,
}

/// Run one reconciliation pass over every viewer, then re-arm or disable
/// the scheduler. Returns whether any viewer still needs reconciling.
pub fn run_pass(state: &AppState) -> bool {
    let mut registry = state.registry();
    let mut repainted = 0usize;

    for viewer in registry.viewers.values_mut() {
        match reconcile_viewer(&state.world, &state.config, viewer) {
            Ok(pass) => repainted += usize::from(pass.changed),
            Err(e) => error!(viewer = %viewer.id, error = %e, "reconciliation failed"),
        }
    }
    let any_active = registry.any_needs_reconciliation();
    drop(registry);

    debug!(repainted, any_active, "reconciliation pass complete");
    if any_active {
        state.scheduler.arm_steady();
    } else {
        state.scheduler.disable();
    }
    any_active
}

/// Reconcile one viewer's stack against the region authority.
///
/// # Errors
///
/// Propagates overlay contract violations.
pub fn reconcile_viewer(world: &World, config: &OverlayConfig, viewer: &mut Viewer) -> Result<ViewerPass, OverlayError> {
    let viewing_nearby = viewer.viewing_nearby;
    let viewer_id = viewer.id;
    let (stack, canvas) = viewer.split(world, config);
    let position = canvas.viewer_position();
    let mut pass = ViewerPass::default();

    for name in stack.names() {
        let Some(record) = world.region_named(&name) else {
            debug!(viewer = %viewer_id, region = %name, "region gone; removing overlay");
            stack.remove(&name, &canvas)?;
            pass.changed = true;
            continue;
        };
        let Some(overlay) = stack.get(&name) else {
            continue;
        };

        let out_of_range = overlay.origin() == Origin::Auto
            && (!viewing_nearby || !overlay.area().is_near(position, config.near_range));
        if out_of_range {
            debug!(viewer = %viewer_id, region = %name, "viewer left region range; removing overlay");
            stack.remove(&name, &canvas)?;
            pass.changed = true;
            continue;
        }

        if record.area != overlay.area() {
            if record.area.is_degenerate() {
                debug!(viewer = %viewer_id, region = %name, area = ?record.area, "region emptied; removing overlay");
                stack.remove(&name, &canvas)?;
                pass.changed = true;
                continue;
            }
            debug!(viewer = %viewer_id, region = %name, area = ?record.area, "region resized");
            overlay.push(canvas.grid, canvas.link);
            if let Some(overlay) = stack.get_mut(&name) {
                overlay.set_area(record.area);
                canvas.recompute(overlay);
            }
            pass.changed = true;
            continue;
        }

        let mut moved = overlay.clone();
        if canvas.recompute(&mut moved) {
            overlay.push(canvas.grid, canvas.link);
            if let Some(overlay) = stack.get_mut(&name) {
                *overlay = moved;
            }
            pass.changed = true;
        }
    }

    if viewing_nearby {
        for record in world.regions_in_world() {
            if record.area.is_degenerate()
                || !record.area.is_near(position, config.near_range)
                || stack.contains(&record.name)
            {
                continue;
            }
            let mut overlay = RegionOverlay::new(record.name.as_str(), record.area, Origin::Auto);
            canvas.recompute(&mut overlay);
            info!(viewer = %viewer_id, region = %record.name, "nearby region shown");
            canvas.link.send(Packet::message(
                messages::region_seen(&record.name),
                messages::text_colour(overlay.colour()),
            ));
            stack.push(overlay);
            pass.changed = true;
        }
    }

    if pass.changed {
        stack.repaint(&canvas)?;
    }
    Ok(pass)
}

// =============================================================================
// REGION SIGNALS
// =============================================================================

/// A region was created, deleted or resized elsewhere: reconcile soon.
pub fn on_region_mutated(state: &AppState) {
    state.scheduler.arm_fast();
}

/// A region was created: reconcile now so proximity viewers see it at once.
pub fn on_region_created(state: &AppState) {
    state.scheduler.disable();
    run_pass(state);
}

/// A region was deleted: drop it from every viewer of the loaded world now.
pub fn on_region_deleted(state: &AppState, name: &str, world_id: &str) {
    if world_id != state.world.grid.world_id() {
        return;
    }

    let mut registry = state.registry();
    for viewer in registry.viewers.values_mut() {
        let viewer_id = viewer.id;
        let (stack, canvas) = viewer.split(&state.world, &state.config);
        let Some(overlay) = stack.get(name) else {
            continue;
        };
        canvas.link.send(Packet::message(
            messages::region_deleted(name),
            messages::text_colour(overlay.colour()),
        ));

        let result = stack
            .remove(name, &canvas)
            .and_then(|_| if stack.is_empty() { Ok(()) } else { stack.repaint(&canvas) });
        match result {
            Ok(()) => info!(viewer = %viewer_id, region = %name, "deleted region removed from view"),
            Err(e) => error!(viewer = %viewer_id, region = %name, error = %e, "failed to remove deleted region"),
        }
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
