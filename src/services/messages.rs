//! Viewer-facing message text and colours.

use crate::geometry::{Point, Rect};
use crate::overlay::COLOUR_OFFSET;
use crate::packet::Rgb;

/// Message colour per paint colour, starting at [`COLOUR_OFFSET`].
pub const TEXT_COLOURS: [Rgb; 12] = [
    Rgb(244, 93, 93),
    Rgb(244, 169, 93),
    Rgb(244, 244, 93),
    Rgb(169, 244, 93),
    Rgb(93, 244, 93),
    Rgb(93, 244, 169),
    Rgb(93, 244, 244),
    Rgb(93, 169, 244),
    Rgb(93, 93, 244),
    Rgb(169, 93, 244),
    Rgb(244, 93, 244),
    Rgb(244, 93, 169),
];

/// Neutral colour for informational lines.
pub const INFO_COLOUR: Rgb = Rgb(255, 255, 0);

/// Text colour matching a border's paint colour.
#[must_use]
pub fn text_colour(paint: u8) -> Rgb {
    let index = usize::from(paint.saturating_sub(COLOUR_OFFSET)) % TEXT_COLOURS.len();
    TEXT_COLOURS[index]
}

fn tiles(n: i32) -> String {
    if n == 1 { "1 tile".to_string() } else { format!("{n} tiles") }
}

/// Confirmation for a selected region, with distance hints for large ones.
#[must_use]
pub fn now_viewing(name: &str, area: Rect, viewer: Point, max_border_size: i32) -> String {
    let mut message = format!("You are now viewing {name}.");
    if area.width < max_border_size && area.height < max_border_size {
        return message;
    }

    if area.bottom() < viewer.y {
        message += &format!(" Borders are {} above you", tiles(viewer.y - area.bottom()));
    } else if area.top() > viewer.y {
        message += &format!(" Borders are {} below you", tiles(area.top() - viewer.y));
    } else {
        message += &format!(
            " Borders are {} above, {} below you",
            tiles(viewer.y - area.top()),
            tiles(area.bottom() - viewer.y)
        );
    }

    if area.right() < viewer.x {
        message += &format!(", {} west of you.", tiles(viewer.x - area.right()));
    } else if area.left() > viewer.x {
        message += &format!(", {} east of you.", tiles(area.left() - viewer.x));
    } else {
        message += &format!(
            ", {} west, {} east of you.",
            tiles(viewer.x - area.left()),
            tiles(area.right() - viewer.x)
        );
    }
    message
}

#[must_use]
pub fn region_seen(name: &str) -> String {
    format!("You see region {name}.")
}

#[must_use]
pub fn region_deleted(name: &str) -> String {
    format!("Region {name} has been deleted.")
}

#[must_use]
pub fn proximity(enabled: bool) -> &'static str {
    if enabled {
        "You are now viewing regions near you."
    } else {
        "You are no longer viewing regions near you."
    }
}
