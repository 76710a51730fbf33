//! Session lifecycle and proximity mode.

use std::sync::Arc;

use tracing::{debug, info};

use crate::packet::Packet;
use crate::state::{AppState, Viewer, ViewerId};
use crate::world::ViewerLink;

use super::messages;

/// Register a viewer with an empty stack and proximity mode off.
pub fn on_session_start(state: &AppState, viewer_id: ViewerId, link: Arc<dyn ViewerLink>) {
    let mut registry = state.registry();
    if registry.viewers.insert(viewer_id, Viewer::new(viewer_id, link)).is_some() {
        debug!(viewer = %viewer_id, "session restarted; previous overlays dropped");
    }
    info!(viewer = %viewer_id, viewers = registry.viewers.len(), "viewer joined");
}

/// Forget a viewer. Nothing is sent and the grid is not touched; the
/// viewer's stack is never left painted between operations.
pub fn on_session_end(state: &AppState, viewer_id: ViewerId) {
    let mut registry = state.registry();
    if let Some(viewer) = registry.viewers.remove(&viewer_id) {
        info!(viewer = %viewer_id, overlays = viewer.stack.len(), "viewer left");
    }
}

/// Flip proximity mode. Returns the new setting, or `None` for an unknown viewer.
pub fn toggle_proximity_mode(state: &AppState, viewer_id: ViewerId) -> Option<bool> {
    let mut registry = state.registry();
    let viewer = registry.get_mut(viewer_id)?;
    viewer.viewing_nearby = !viewer.viewing_nearby;
    let enabled = viewer.viewing_nearby;
    viewer.link.send(Packet::message(messages::proximity(enabled), messages::INFO_COLOUR));
    drop(registry);

    info!(viewer = %viewer_id, enabled, "proximity mode toggled");
    if enabled {
        state.scheduler.arm_fast();
    }
    Some(enabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect};
    use crate::services::selection;
    use crate::state::test_helpers::{self, drain, messages};
    use crate::world::ChannelLink;

    #[test]
    fn start_registers_empty_viewer() {
        let h = test_helpers::harness();
        let id = uuid::Uuid::new_v4();
        let (link, _rx) = ChannelLink::new(16, Point::new(0, 0));
        on_session_start(&h.state, id, link);

        let registry = h.state.registry();
        let viewer = registry.viewers.get(&id).unwrap();
        assert!(viewer.stack.is_empty());
        assert!(!viewer.viewing_nearby);
    }

    #[test]
    fn end_forgets_viewer_without_touching_grid() {
        let h = test_helpers::harness();
        h.region("Spawn", Rect::new(100, 100, 20, 20));
        let (id, _link, mut rx) = test_helpers::join_viewer(&h.state, Point::new(110, 110));
        selection::select_overlay(&h.state, id, "Spawn").unwrap();
        drain(&mut rx);
        let before = h.grid.snapshot();

        on_session_end(&h.state, id);
        assert!(h.state.registry().viewers.is_empty());
        assert!(drain(&mut rx).is_empty());
        assert_eq!(h.grid.snapshot(), before);
    }

    #[test]
    fn toggle_flips_and_announces() {
        let h = test_helpers::harness();
        let (id, _link, mut rx) = test_helpers::join_viewer(&h.state, Point::new(10, 10));

        assert_eq!(toggle_proximity_mode(&h.state, id), Some(true));
        assert!(h.state.scheduler.is_armed());
        assert_eq!(toggle_proximity_mode(&h.state, id), Some(false));

        let lines = messages(&drain(&mut rx));
        assert_eq!(
            lines,
            vec![
                "You are now viewing regions near you.".to_string(),
                "You are no longer viewing regions near you.".to_string(),
            ]
        );
    }

    #[test]
    fn toggle_for_unknown_viewer_is_none() {
        let h = test_helpers::harness();
        assert_eq!(toggle_proximity_mode(&h.state, uuid::Uuid::new_v4()), None);
        assert!(!h.state.scheduler.is_armed());
    }
}
