use super::*;
use crate::geometry::Point;
use crate::overlay::{Origin, RegionOverlay};
use crate::geometry::Rect;

#[test]
fn registry_new_is_empty() {
    let registry = Registry::new();
    assert!(registry.viewers.is_empty());
    assert!(!registry.any_needs_reconciliation());
}

#[test]
fn viewer_starts_without_overlays_or_proximity() {
    let h = test_helpers::harness();
    let (id, _link, _rx) = test_helpers::join_viewer(&h.state, Point::new(10, 10));
    let registry = h.state.registry();
    let viewer = registry.viewers.get(&id).expect("viewer should exist");
    assert!(viewer.stack.is_empty());
    assert!(!viewer.viewing_nearby);
    assert!(!viewer.needs_reconciliation());
}

#[test]
fn proximity_or_overlays_need_reconciliation() {
    let h = test_helpers::harness();
    let (a, _la, _ra) = test_helpers::join_viewer(&h.state, Point::new(10, 10));
    let (b, _lb, _rb) = test_helpers::join_viewer(&h.state, Point::new(10, 10));

    let mut registry = h.state.registry();
    registry.get_mut(a).unwrap().viewing_nearby = true;
    assert!(registry.any_needs_reconciliation());

    registry.get_mut(a).unwrap().viewing_nearby = false;
    registry
        .get_mut(b)
        .unwrap()
        .stack
        .push(RegionOverlay::new("Spawn", Rect::new(0, 0, 5, 5), Origin::Manual));
    assert!(registry.any_needs_reconciliation());
}

#[test]
fn app_state_clones_share_registry() {
    let h = test_helpers::harness();
    let clone = h.state.clone();
    let (id, _link, _rx) = test_helpers::join_viewer(&clone, Point::new(0, 0));
    assert!(h.state.registry().viewers.contains_key(&id));
}
