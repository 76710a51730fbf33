//! Region overlay: one region's phantom border.
//!
//! DESIGN
//! ======
//! An overlay is either painted or not. While painted it holds the true
//! tiles it covered in `saved`, in edge-walk order; `saved` is `None`
//! otherwise. Painting over a painted overlay, or restoring one that is not
//! painted, is a contract violation reported as [`OverlayError`].
//!
//! The edge walk visits the top row, the east column, the west column, then
//! the bottom row. Corners belong to the rows so each cell is visited once.
//! Edges of a display window that were clamped (the window is smaller than
//! the region) are not real boundaries and are skipped.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::packet::Packet;
use crate::tile::{Tile, ids};
use crate::world::{Grid, ViewerLink};

/// Paint colours cycle through twelve hues starting at this paint id.
pub const COLOUR_OFFSET: u8 = 13;
const COLOUR_COUNT: u64 = 12;

/// Sprite column of the first ice-block variant and the step to the next.
const ICE_FRAME_X: i16 = 162;
const ICE_FRAME_STEP: i16 = 18;
const ICE_FRAME_Y: i16 = 54;

/// Why an overlay is in a viewer's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The viewer asked for it by name.
    Manual,
    /// Added by proximity mode because the viewer is near it.
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    #[error("border of region {0} is already painted")]
    AlreadyApplied(String),
    #[error("border of region {0} is not painted")]
    NotApplied(String),
}

/// Paint colour for a region name: sum of UTF-16 code units mod 12, offset.
#[must_use]
pub fn colour_code(name: &str) -> u8 {
    let total: u64 = name.encode_utf16().map(u64::from).sum();
    u8::try_from(total % COLOUR_COUNT).unwrap_or(0) + COLOUR_OFFSET
}

/// Part of `area`'s border to draw for a viewer at `viewer`.
///
/// Oversized axes get a `max_size - 1` window centred on the viewer and
/// kept inside `area`. The result is then clamped into the world so every
/// coordinate lies in `1..=extent - 2`.
#[must_use]
pub fn display_area(area: Rect, viewer: Point, world: (i32, i32), max_size: i32) -> Rect {
    let mut show = area;

    if show.width >= max_size {
        show.x = viewer.x - max_size / 2;
        show.width = max_size - 1;
        if show.left() < area.left() {
            show.x = area.left();
        } else if show.right() > area.right() {
            show.x = area.right() - (max_size - 1);
        }
    }
    if show.height >= max_size {
        show.y = viewer.y - max_size / 2;
        show.height = max_size - 1;
        if show.top() < area.top() {
            show.y = area.top();
        } else if show.bottom() > area.bottom() {
            show.y = area.bottom() - (max_size - 1);
        }
    }

    let (x, width) = clamp_axis(show.x, show.width, world.0);
    let (y, height) = clamp_axis(show.y, show.height, world.1);
    Rect::new(x, y, width, height)
}

/// Clamp an inclusive span into `1..=extent - 2`, shrinking it from
/// whichever end hangs outside.
fn clamp_axis(start: i32, len: i32, extent: i32) -> (i32, i32) {
    let low = 1;
    let high = (extent - 2).max(low);
    let first = start.clamp(low, high);
    let last = (start + len).min(high).max(first);
    (first, last - first)
}

/// Border cells of `display` in edge-walk order.
fn border_cells(display: Rect, area: Rect) -> Vec<Point> {
    let (left, right, top, bottom) = (display.left(), display.right(), display.top(), display.bottom());
    let mut cells = Vec::new();

    if top == area.top() {
        cells.extend((left..=right).map(|x| Point::new(x, top)));
    }
    if right == area.right() {
        cells.extend((top + 1..bottom).map(|y| Point::new(right, y)));
    }
    if display.width > 0 && left == area.left() {
        cells.extend((top + 1..bottom).map(|y| Point::new(left, y)));
    }
    if display.height > 0 && bottom == area.bottom() {
        cells.extend((left..=right).map(|x| Point::new(x, bottom)));
    }
    cells
}

// =============================================================================
// REGION OVERLAY
// =============================================================================

#[derive(Debug, Clone)]
pub struct RegionOverlay {
    name: String,
    area: Rect,
    display: Rect,
    colour: u8,
    origin: Origin,
    saved: Option<Vec<(Point, Tile)>>,
}

impl RegionOverlay {
    /// A new, unpainted overlay whose display area is the whole region.
    #[must_use]
    pub fn new(name: impl Into<String>, area: Rect, origin: Origin) -> Self {
        let name = name.into();
        let colour = colour_code(&name);
        Self { name, area, display: area, colour, origin, saved: None }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Authoritative region area.
    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }

    #[must_use]
    pub fn display_area(&self) -> Rect {
        self.display
    }

    #[must_use]
    pub fn colour(&self) -> u8 {
        self.colour
    }

    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Origin) {
        self.origin = origin;
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.saved.is_some()
    }

    /// True tiles under the painted border, in edge-walk order.
    #[must_use]
    pub fn saved_cells(&self) -> &[(Point, Tile)] {
        self.saved.as_deref().unwrap_or_default()
    }

    /// Replace the authoritative area. Call [`Self::recompute`] afterwards.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// Recompute the display area. Returns true if it moved.
    pub fn recompute(&mut self, viewer: Point, world: (i32, i32), max_size: i32) -> bool {
        let display = display_area(self.area, viewer, world, max_size);
        let moved = display != self.display;
        self.display = display;
        moved
    }

    /// Paint the phantom border onto the grid, saving what it covers.
    ///
    /// A window with no drawable cells (every edge clamped away or off the
    /// world) paints nothing and stays unapplied.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::AlreadyApplied`] if the border is already painted.
    pub fn apply(&mut self, grid: &dyn Grid) -> Result<(), OverlayError> {
        if self.saved.is_some() {
            return Err(OverlayError::AlreadyApplied(self.name.clone()));
        }

        let mut rng = rand::rng();
        let mut saved = Vec::new();
        for p in border_cells(self.display, self.area) {
            let Some(real) = grid.tile(p) else {
                continue;
            };
            grid.set_tile(p, self.phantom(real, &mut rng));
            saved.push((p, real));
        }
        if !saved.is_empty() {
            self.saved = Some(saved);
        }
        Ok(())
    }

    /// Write the saved tiles back, in the same order they were taken.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NotApplied`] if the border is not painted.
    pub fn unapply(&mut self, grid: &dyn Grid) -> Result<(), OverlayError> {
        let Some(saved) = self.saved.take() else {
            return Err(OverlayError::NotApplied(self.name.clone()));
        };
        for (p, tile) in saved {
            grid.set_tile(p, tile);
        }
        Ok(())
    }

    /// Send the border's sections to a viewer, followed by one frame refresh.
    ///
    /// Thin borders go out as one enlarged section. Otherwise each real edge
    /// gets a three-tile strip; clamped edges are left alone.
    pub fn push(&self, grid: &dyn Grid, link: &dyn ViewerLink) {
        let d = self.display;
        let a = self.area;

        if d.width <= 3 || d.height <= 3 {
            link.send(Packet::section(grid, d.left() - 1, d.top() - 1, d.width + 3, d.height + 3));
        } else {
            if d.top() == a.top() {
                link.send(Packet::section(grid, d.left() - 1, d.top() - 1, d.width + 3, 3));
            }
            if d.left() == a.left() {
                link.send(Packet::section(grid, d.left() - 1, d.top() + 2, 3, d.height));
            }
            if d.right() == a.right() {
                link.send(Packet::section(grid, d.right() - 1, d.top() + 2, 3, d.height));
            }
            if d.bottom() == a.bottom() {
                link.send(Packet::section(grid, d.left() + 2, d.bottom() - 1, d.width - 3, 3));
            }
        }

        link.send(Packet::frame_section(d));
    }

    fn phantom(&self, real: Tile, rng: &mut impl Rng) -> Tile {
        if real.active {
            let mut fake = real;
            if fake.kind == ids::RAINBOW_BRICK {
                fake.kind = ids::GRAY_BRICK;
            }
            fake.paint = self.colour;
            fake
        } else {
            Tile {
                active: true,
                inactive: true,
                kind: ids::MAGICAL_ICE_BLOCK,
                frame_x: ICE_FRAME_X + rng.random_range(0..2_i16) * ICE_FRAME_STEP,
                frame_y: ICE_FRAME_Y,
                paint: self.colour,
                ..real
            }
        }
    }
}

#[cfg(test)]
#[path = "overlay_test.rs"]
mod tests;
