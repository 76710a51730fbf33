//! Viewer overlay stack: one viewer's overlays in paint order.
//!
//! DESIGN
//! ======
//! Overlays are kept in a `Vec`, bottom first. Painting walks forward so the
//! most recently selected border wins on shared cells; peeling walks
//! backward so each saved tile is restored over the layer it was taken from.
//!
//! Paint is transient. `repaint` paints the whole stack, pushes it to the
//! viewer, and peels it again, so between operations the shared grid holds
//! only true tiles and no other viewer can observe a phantom.
//!
//! ERROR HANDLING
//! ==============
//! A failed paint peels whatever was painted before returning the error so
//! the grid is never left holding phantoms.

use tracing::debug;

use crate::config::OverlayConfig;
use crate::geometry::{Point, Rect};
use crate::overlay::{Origin, OverlayError, RegionOverlay};
use crate::world::{Grid, ViewerLink};

// =============================================================================
// CANVAS
// =============================================================================

/// What a stack operation paints on and who sees it.
#[derive(Clone, Copy)]
pub struct Canvas<'a> {
    pub grid: &'a dyn Grid,
    pub link: &'a dyn ViewerLink,
    pub max_border_size: i32,
}

impl<'a> Canvas<'a> {
    #[must_use]
    pub fn new(grid: &'a dyn Grid, link: &'a dyn ViewerLink, config: &OverlayConfig) -> Self {
        Self { grid, link, max_border_size: config.max_border_size }
    }

    /// Recompute `overlay`'s display area for the viewer's current position.
    pub fn recompute(&self, overlay: &mut RegionOverlay) -> bool {
        overlay.recompute(self.link.position(), self.grid.size(), self.max_border_size)
    }

    #[must_use]
    pub fn viewer_position(&self) -> Point {
        self.link.position()
    }
}

// =============================================================================
// STACK
// =============================================================================

#[derive(Debug, Default)]
pub struct OverlayStack {
    overlays: Vec<RegionOverlay>,
}

impl OverlayStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Overlays bottom first.
    pub fn iter(&self) -> impl Iterator<Item = &RegionOverlay> {
        self.overlays.iter()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.overlays.iter().map(|o| o.name().to_string()).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegionOverlay> {
        self.overlays.iter().find(|o| o.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RegionOverlay> {
        self.overlays.iter_mut().find(|o| o.name() == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Put an unpainted overlay on top. Does not touch the grid.
    pub fn push(&mut self, overlay: RegionOverlay) {
        self.overlays.push(overlay);
    }

    // -------------------------------------------------------------------------
    // PAINT / PEEL
    // -------------------------------------------------------------------------

    /// Apply every overlay, bottom first.
    ///
    /// # Errors
    ///
    /// Fails if any overlay is already painted. Nothing is applied in that
    /// case; the painted members are peeled and the grid holds true tiles.
    pub fn paint(&mut self, grid: &dyn Grid) -> Result<(), OverlayError> {
        if let Some(painted) = self.overlays.iter().find(|o| o.is_applied()) {
            let e = OverlayError::AlreadyApplied(painted.name().to_string());
            self.peel(grid)?;
            return Err(e);
        }
        for overlay in &mut self.overlays {
            overlay.apply(grid)?;
        }
        Ok(())
    }

    /// Unapply every painted overlay, topmost first.
    ///
    /// # Errors
    ///
    /// Propagates a contract violation from [`RegionOverlay::unapply`].
    pub fn peel(&mut self, grid: &dyn Grid) -> Result<(), OverlayError> {
        for overlay in self.overlays.iter_mut().rev() {
            if overlay.is_applied() {
                overlay.unapply(grid)?;
            }
        }
        Ok(())
    }

    /// Paint the stack, push every overlay while painted, then peel.
    ///
    /// # Errors
    ///
    /// Propagates contract violations from paint or peel.
    pub fn repaint(&mut self, canvas: &Canvas<'_>) -> Result<(), OverlayError> {
        self.peel(canvas.grid)?;
        self.paint(canvas.grid)?;
        for overlay in &self.overlays {
            overlay.push(canvas.grid, canvas.link);
        }
        self.peel(canvas.grid)
    }

    // -------------------------------------------------------------------------
    // OPERATIONS
    // -------------------------------------------------------------------------

    /// Show `name` on top of the stack, creating it or moving it up.
    ///
    /// A reselected overlay takes the new `area`; a manual reselect of an
    /// automatic overlay makes it manual. If its display window moved, the
    /// old window is refreshed with true tiles before the repaint.
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the repaint.
    pub fn select(
        &mut self,
        name: &str,
        area: Rect,
        origin: Origin,
        canvas: &Canvas<'_>,
    ) -> Result<&RegionOverlay, OverlayError> {
        self.peel(canvas.grid)?;

        let overlay = match self.take(name) {
            Some(mut existing) => {
                let stale = existing.clone();
                existing.set_area(area);
                if origin == Origin::Manual {
                    existing.set_origin(Origin::Manual);
                }
                canvas.recompute(&mut existing);
                if existing.display_area() != stale.display_area() {
                    stale.push(canvas.grid, canvas.link);
                }
                existing
            }
            None => {
                let mut fresh = RegionOverlay::new(name, area, origin);
                canvas.recompute(&mut fresh);
                fresh
            }
        };
        debug!(region = %name, display = ?overlay.display_area(), "overlay selected");

        self.overlays.push(overlay);
        self.repaint(canvas)?;
        let top = self.overlays.len() - 1;
        Ok(&self.overlays[top])
    }

    /// Remove one overlay and refresh its border with true tiles.
    ///
    /// The rest of the stack is not repainted; callers batch that.
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the peel.
    pub fn remove(&mut self, name: &str, canvas: &Canvas<'_>) -> Result<Option<RegionOverlay>, OverlayError> {
        self.peel(canvas.grid)?;
        let removed = self.take(name);
        if let Some(overlay) = &removed {
            overlay.push(canvas.grid, canvas.link);
        }
        Ok(removed)
    }

    /// Drop every overlay, refreshing each border with true tiles.
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the peel.
    pub fn clear(&mut self, canvas: &Canvas<'_>) -> Result<usize, OverlayError> {
        self.peel(canvas.grid)?;
        for overlay in self.overlays.iter().rev() {
            overlay.push(canvas.grid, canvas.link);
        }
        let count = self.overlays.len();
        self.overlays.clear();
        Ok(count)
    }

    fn take(&mut self, name: &str) -> Option<RegionOverlay> {
        let index = self.overlays.iter().position(|o| o.name() == name)?;
        Some(self.overlays.remove(index))
    }
}

#[cfg(test)]
#[path = "stack_test.rs"]
mod tests;
