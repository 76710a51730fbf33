//! Region Vision: per-viewer region border overlays on a shared tile grid.
//!
//! ARCHITECTURE
//! ============
//! A viewer asks to see a region and the server paints that region's border
//! as phantom tiles, pushes the painted sections to that viewer only, and
//! restores the true tiles before anyone else can observe them.
//!
//! - `overlay` owns one region's phantom border (apply / unapply / push).
//! - `stack` keeps a viewer's overlays in paint order and repaints them.
//! - `services` exposes the operations the host calls: sessions, selection,
//!   reconciliation, the scheduler task, and edit admission.
//! - `world` declares what the host must provide (grid, regions, items,
//!   viewer links) plus in-memory implementations.

pub mod config;
pub mod geometry;
pub mod overlay;
pub mod packet;
pub mod services;
pub mod stack;
pub mod state;
pub mod tile;
pub mod world;

pub use config::OverlayConfig;
pub use geometry::{Point, Rect};
pub use overlay::{Origin, OverlayError, RegionOverlay};
pub use packet::Packet;
pub use services::admission::{EditKind, Verdict};
pub use stack::OverlayStack;
pub use state::{AppState, ViewerId};
pub use tile::Tile;
