//! Region name resolution for selection requests.
//!
//! DESIGN
//! ======
//! Three passes over the loaded world's regions, stopping at the first pass
//! that finds anything:
//! 1. exact name (wins outright); case-insensitive equal names are collected
//! 2. case-sensitive prefix
//! 3. case-insensitive prefix
//!
//! One candidate resolves; several are reported back, at most
//! [`MAX_SUGGESTIONS`] by name plus an overrun count.

use crate::world::{RegionRecord, World};

use super::selection::SelectError;

pub const MAX_SUGGESTIONS: usize = 5;

/// Resolve `query` to one region of the loaded world.
///
/// # Errors
///
/// [`SelectError::NotFound`] when nothing matches, [`SelectError::Ambiguous`]
/// when several regions match equally well.
pub fn resolve_region(world: &World, query: &str) -> Result<RegionRecord, SelectError> {
    let regions = world.regions_in_world();
    let lowered = query.to_lowercase();

    let mut matches: Vec<&RegionRecord> = Vec::new();
    for region in &regions {
        if region.name == query {
            return Ok(region.clone());
        }
        if region.name.to_lowercase() == lowered {
            matches.push(region);
        }
    }

    if matches.is_empty() {
        matches = regions.iter().filter(|r| r.name.starts_with(query)).collect();
    }
    if matches.is_empty() {
        matches = regions
            .iter()
            .filter(|r| r.name.to_lowercase().starts_with(&lowered))
            .collect();
    }

    match matches.as_slice() {
        [] => Err(SelectError::NotFound),
        [only] => Ok((*only).clone()),
        many => Err(SelectError::Ambiguous {
            shown: many.iter().take(MAX_SUGGESTIONS).map(|r| r.name.clone()).collect(),
            more: many.len().saturating_sub(MAX_SUGGESTIONS),
        }),
    }
}

#[cfg(test)]
#[path = "lookup_test.rs"]
mod tests;
