//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is cloned into every entry point and the scheduler task. It
//! holds the host's collaborators and the viewer registry. Every registry
//! read or write goes through one `std::sync::Mutex`: overlay paint/peel
//! sequences must never interleave across viewers or with a reconciliation
//! pass, because a half-peeled stack leaves the shared grid in a state no
//! viewer expects. The lock is synchronous so the edit-interception path
//! never awaits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::config::OverlayConfig;
use crate::services::refund::RefundTable;
use crate::services::scheduler::Scheduler;
use crate::stack::{Canvas, OverlayStack};
use crate::world::{ViewerLink, World};

/// Stable per-session viewer identifier.
pub type ViewerId = Uuid;

// =============================================================================
// VIEWER
// =============================================================================

/// One connected viewer and their overlays.
pub struct Viewer {
    pub id: ViewerId,
    pub link: Arc<dyn ViewerLink>,
    pub stack: OverlayStack,
    /// Proximity mode: nearby regions are overlaid automatically.
    pub viewing_nearby: bool,
}

impl Viewer {
    #[must_use]
    pub fn new(id: ViewerId, link: Arc<dyn ViewerLink>) -> Self {
        Self { id, link, stack: OverlayStack::new(), viewing_nearby: false }
    }

    /// Split into the stack and a canvas over `world`'s grid and this viewer's link.
    pub fn split<'a>(
        &'a mut self,
        world: &'a World,
        config: &OverlayConfig,
    ) -> (&'a mut OverlayStack, Canvas<'a>) {
        let canvas = Canvas::new(world.grid.as_ref(), self.link.as_ref(), config);
        (&mut self.stack, canvas)
    }

    /// Whether the scheduler still has work for this viewer.
    #[must_use]
    pub fn needs_reconciliation(&self) -> bool {
        self.viewing_nearby || !self.stack.is_empty()
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

#[derive(Default)]
pub struct Registry {
    pub viewers: HashMap<ViewerId, Viewer>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_mut(&mut self, id: ViewerId) -> Option<&mut Viewer> {
        self.viewers.get_mut(&id)
    }

    #[must_use]
    pub fn any_needs_reconciliation(&self) -> bool {
        self.viewers.values().any(Viewer::needs_reconciliation)
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Process-wide state container. Clone is cheap; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub world: World,
    pub registry: Arc<Mutex<Registry>>,
    /// Item lookups for refunds, built once from the catalog.
    pub refunds: Arc<RefundTable>,
    pub scheduler: Scheduler,
    pub config: OverlayConfig,
}

impl AppState {
    #[must_use]
    pub fn new(world: World, config: OverlayConfig) -> Self {
        let refunds = Arc::new(RefundTable::build(&world.items.items()));
        Self {
            world,
            registry: Arc::new(Mutex::new(Registry::new())),
            refunds,
            scheduler: Scheduler::new(&config),
            config,
        }
    }

    /// Take the registry lock, recovering from a poisoned mutex.
    pub fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
