//! Overlay configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_MAX_BORDER_SIZE: i32 = 256;
pub const DEFAULT_NEAR_RANGE: i32 = 100;
pub const DEFAULT_FAST_INTERVAL_MS: u64 = 1500;
pub const DEFAULT_STEADY_INTERVAL_MS: u64 = 7000;
pub const DEFAULT_PACKET_QUEUE: usize = 256;
/// Larger than any world edge; keeps range arithmetic far from overflow.
pub const MAX_NEAR_RANGE: i32 = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Regions at least this wide (or tall) only show a window of their border.
    pub max_border_size: i32,
    /// Proximity mode shows regions within this many tiles of the viewer.
    pub near_range: i32,
    /// Reconciliation delay after a region was created, deleted or resized.
    pub fast_interval: Duration,
    /// Reconciliation delay while overlays stay active.
    pub steady_interval: Duration,
    /// Per-viewer outbound packet queue capacity.
    pub packet_queue: usize,
}

impl OverlayConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// - `REGIONVISION_MAX_BORDER_SIZE`: default 256
    /// - `REGIONVISION_NEAR_RANGE`: default 100
    /// - `REGIONVISION_FAST_INTERVAL_MS`: default 1500
    /// - `REGIONVISION_STEADY_INTERVAL_MS`: default 7000
    /// - `REGIONVISION_PACKET_QUEUE`: default 256
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_border_size: env_parse("REGIONVISION_MAX_BORDER_SIZE", DEFAULT_MAX_BORDER_SIZE).max(2),
            near_range: env_parse("REGIONVISION_NEAR_RANGE", DEFAULT_NEAR_RANGE).clamp(0, MAX_NEAR_RANGE),
            fast_interval: Duration::from_millis(env_parse("REGIONVISION_FAST_INTERVAL_MS", DEFAULT_FAST_INTERVAL_MS)),
            steady_interval: Duration::from_millis(env_parse(
                "REGIONVISION_STEADY_INTERVAL_MS",
                DEFAULT_STEADY_INTERVAL_MS,
            )),
            packet_queue: env_parse("REGIONVISION_PACKET_QUEUE", DEFAULT_PACKET_QUEUE),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            max_border_size: DEFAULT_MAX_BORDER_SIZE,
            near_range: DEFAULT_NEAR_RANGE,
            fast_interval: Duration::from_millis(DEFAULT_FAST_INTERVAL_MS),
            steady_interval: Duration::from_millis(DEFAULT_STEADY_INTERVAL_MS),
            packet_queue: DEFAULT_PACKET_QUEUE,
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
