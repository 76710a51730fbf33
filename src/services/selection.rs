//! Selection: viewers asking to see a region, or to see nothing.
//!
//! ERROR HANDLING
//! ==============
//! Lookup failures are returned as [`SelectError`] so the host can show the
//! message to the viewer verbatim. Overlay contract violations are logged
//! and returned as well; they indicate a bug, not bad input.

use tracing::{error, info};

use crate::overlay::{Origin, OverlayError};
use crate::packet::{ErrorCode, Packet};
use crate::state::{AppState, ViewerId};

use super::{lookup, messages};

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("A region name is required.")]
    EmptyName,
    #[error("viewer {0} is not connected")]
    UnknownViewer(ViewerId),
    #[error("No such region exists.")]
    NotFound,
    #[error("Multiple matching regions were found: {}. Please be more specific.", candidates(.shown, *.more))]
    Ambiguous { shown: Vec<String>, more: usize },
    #[error("Region {name} contains no tiles. (Found dimensions: {width} × {height}) Use /region resize to fix it.")]
    EmptyArea { name: String, width: i32, height: i32 },
    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

impl ErrorCode for SelectError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "E_REGION_NAME_REQUIRED",
            Self::UnknownViewer(_) => "E_VIEWER_NOT_FOUND",
            Self::NotFound => "E_REGION_NOT_FOUND",
            Self::Ambiguous { .. } => "E_REGION_AMBIGUOUS",
            Self::EmptyArea { .. } => "E_REGION_EMPTY",
            Self::Overlay(_) => "E_OVERLAY_STATE",
        }
    }
}

fn candidates(shown: &[String], more: usize) -> String {
    let list = shown.join(", ");
    if more > 0 { format!("{list} and {more} more") } else { list }
}

/// Show the region best matching `query` on top of the viewer's stack.
/// Returns the confirmation line that was sent to the viewer.
///
/// # Errors
///
/// See [`SelectError`]. Nothing is painted or sent on error.
pub fn select_overlay(state: &AppState, viewer_id: ViewerId, query: &str) -> Result<String, SelectError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SelectError::EmptyName);
    }
    let record = lookup::resolve_region(&state.world, query)?;
    if record.area.is_degenerate() {
        return Err(SelectError::EmptyArea {
            name: record.name,
            width: record.area.width,
            height: record.area.height,
        });
    }

    let mut registry = state.registry();
    let viewer = registry.get_mut(viewer_id).ok_or(SelectError::UnknownViewer(viewer_id))?;
    let (stack, canvas) = viewer.split(&state.world, &state.config);

    let overlay = stack
        .select(&record.name, record.area, Origin::Manual, &canvas)
        .inspect_err(|e| error!(viewer = %viewer_id, region = %record.name, error = %e, "select failed"))?;
    let text = messages::now_viewing(&record.name, record.area, canvas.viewer_position(), state.config.max_border_size);
    canvas.link.send(Packet::message(text.as_str(), messages::text_colour(overlay.colour())));
    info!(viewer = %viewer_id, region = %record.name, "region selected");
    drop(registry);

    state.scheduler.arm_steady();
    Ok(text)
}

/// Drop every overlay the viewer has and turn proximity mode off.
/// Returns how many overlays were removed.
///
/// # Errors
///
/// [`SelectError::UnknownViewer`], or an overlay contract violation.
pub fn clear_overlays(state: &AppState, viewer_id: ViewerId) -> Result<usize, SelectError> {
    let mut registry = state.registry();
    let viewer = registry.get_mut(viewer_id).ok_or(SelectError::UnknownViewer(viewer_id))?;
    viewer.viewing_nearby = false;
    let (stack, canvas) = viewer.split(&state.world, &state.config);
    let removed = stack
        .clear(&canvas)
        .inspect_err(|e| error!(viewer = %viewer_id, error = %e, "clear failed"))?;
    info!(viewer = %viewer_id, removed, "overlays cleared");
    Ok(removed)
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
