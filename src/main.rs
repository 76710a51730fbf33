//! Demo host: replays a scripted session against in-memory collaborators.
//!
//! The fixture (`REGIONVISION_FIXTURE`, default `demos/basic.json`) describes
//! the world, its regions and items, and a script of viewer actions. The
//! reconciliation scheduler runs live, so `wait` steps let passes fire.
//! Every packet a viewer would receive is logged.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use regionvision::packet::ErrorCode;
use regionvision::services::{admission, reconcile, scheduler, selection, session};
use regionvision::tile::Tile;
use regionvision::world::memory::{MemoryCatalog, MemoryGrid, MemoryRegions};
use regionvision::world::{ChannelLink, ItemDef, World};
use regionvision::{AppState, EditKind, OverlayConfig, Point, Rect, ViewerId};
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

const DEFAULT_FIXTURE: &str = "demos/basic.json";

#[derive(Debug, thiserror::Error)]
enum HostError {
    #[error("failed to read fixture {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("invalid fixture: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// FIXTURE
// =============================================================================

#[derive(Debug, Deserialize)]
struct Fixture {
    world: WorldFixture,
    #[serde(default)]
    regions: Vec<RegionFixture>,
    #[serde(default)]
    items: Vec<ItemDef>,
    #[serde(default)]
    script: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct WorldFixture {
    id: String,
    width: i32,
    height: i32,
    /// Rows from here down are solid dirt.
    #[serde(default)]
    ground_level: Option<i32>,
    #[serde(default)]
    no_attach: Vec<u16>,
}

#[derive(Debug, Deserialize)]
struct RegionFixture {
    name: String,
    area: Rect,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Step {
    Join { viewer: String, x: i32, y: i32 },
    Leave { viewer: String },
    Move { viewer: String, x: i32, y: i32 },
    Select { viewer: String, region: String },
    Clear { viewer: String },
    Toggle { viewer: String },
    Edit { viewer: String, x: i32, y: i32, edit: EditKind },
    CreateRegion { name: String, area: Rect },
    ResizeRegion { name: String, area: Rect },
    DeleteRegion { name: String },
    Wait { ms: u64 },
}

fn load_fixture(path: &str) -> Result<Fixture, HostError> {
    let raw = std::fs::read_to_string(path).map_err(|source| HostError::Io { path: path.to_string(), source })?;
    Ok(serde_json::from_str(&raw)?)
}

// =============================================================================
// HOST
// =============================================================================

struct Connected {
    id: ViewerId,
    link: Arc<ChannelLink>,
    logger: JoinHandle<()>,
}

struct Host {
    state: AppState,
    regions: Arc<MemoryRegions>,
    world_id: String,
    viewers: HashMap<String, Connected>,
}

impl Host {
    fn viewer(&self, name: &str) -> Option<&Connected> {
        let found = self.viewers.get(name);
        if found.is_none() {
            warn!(viewer = %name, "script names a viewer that has not joined");
        }
        found
    }

    async fn run(&mut self, step: Step) {
        match step {
            Step::Join { viewer, x, y } => {
                let id = Uuid::new_v4();
                let (link, mut rx) = ChannelLink::new(self.state.config.packet_queue, Point::new(x, y));
                let label = viewer.clone();
                let logger = tokio::spawn(async move {
                    while let Some(packet) = rx.recv().await {
                        info!(viewer = %label, %packet, "packet");
                    }
                });
                session::on_session_start(&self.state, id, link.clone());
                self.viewers.insert(viewer, Connected { id, link, logger });
            }
            Step::Leave { viewer } => {
                if let Some(connected) = self.viewers.remove(&viewer) {
                    session::on_session_end(&self.state, connected.id);
                    drop(connected.link);
                    let _ = connected.logger.await;
                }
            }
            Step::Move { viewer, x, y } => {
                if let Some(connected) = self.viewer(&viewer) {
                    connected.link.move_to(Point::new(x, y));
                }
            }
            Step::Select { viewer, region } => {
                if let Some(connected) = self.viewer(&viewer) {
                    if let Err(e) = selection::select_overlay(&self.state, connected.id, &region) {
                        info!(viewer = %viewer, code = e.error_code(), "{e}");
                    }
                }
            }
            Step::Clear { viewer } => {
                if let Some(connected) = self.viewer(&viewer) {
                    if let Err(e) = selection::clear_overlays(&self.state, connected.id) {
                        warn!(viewer = %viewer, error = %e, "clear failed");
                    }
                }
            }
            Step::Toggle { viewer } => {
                if let Some(connected) = self.viewer(&viewer) {
                    session::toggle_proximity_mode(&self.state, connected.id);
                }
            }
            Step::Edit { viewer, x, y, edit } => {
                if let Some(connected) = self.viewer(&viewer) {
                    let verdict = admission::on_grid_edit_attempt(&self.state, connected.id, Point::new(x, y), edit);
                    info!(viewer = %viewer, x, y, ?edit, ?verdict, "edit attempted");
                }
            }
            Step::CreateRegion { name, area } => {
                self.regions.insert(name, area, self.world_id.as_str());
                reconcile::on_region_created(&self.state);
            }
            Step::ResizeRegion { name, area } => {
                if self.regions.resize(&name, area) {
                    reconcile::on_region_mutated(&self.state);
                } else {
                    warn!(region = %name, "no such region to resize");
                }
            }
            Step::DeleteRegion { name } => {
                if let Some(record) = self.regions.remove(&name) {
                    reconcile::on_region_deleted(&self.state, &record.name, &record.world_id);
                }
            }
            Step::Wait { ms } => tokio::time::sleep(Duration::from_millis(ms)).await,
        }
    }

    async fn shutdown(mut self) {
        for (_, connected) in self.viewers.drain() {
            session::on_session_end(&self.state, connected.id);
            drop(connected.link);
            let _ = connected.logger.await;
        }
    }
}

fn build_world(layout: &WorldFixture, regions: &[RegionFixture], items: Vec<ItemDef>) -> (World, Arc<MemoryRegions>) {
    let grid = MemoryGrid::new(layout.id.as_str(), layout.width, layout.height).with_no_attach(layout.no_attach.iter().copied());
    if let Some(ground) = layout.ground_level {
        grid.fill(Rect::new(0, ground, layout.width - 1, layout.height - 1 - ground), Tile::block(0));
    }

    let authority = Arc::new(MemoryRegions::new());
    for region in regions {
        authority.insert(region.name.as_str(), region.area, layout.id.as_str());
    }

    let world = World::new(Arc::new(grid), authority.clone(), Arc::new(MemoryCatalog::new(items)));
    (world, authority)
}

async fn run(path: &str) -> Result<(), HostError> {
    let fixture = load_fixture(path)?;
    let config = OverlayConfig::from_env();
    let (world, regions) = build_world(&fixture.world, &fixture.regions, fixture.items);
    let state = AppState::new(world, config);
    info!(
        fixture = %path,
        world = %fixture.world.id,
        regions = fixture.regions.len(),
        steps = fixture.script.len(),
        "fixture loaded"
    );

    let scheduler = scheduler::spawn_scheduler_task(state.clone());
    let mut host = Host { state, regions, world_id: fixture.world.id, viewers: HashMap::new() };
    for step in fixture.script {
        host.run(step).await;
    }
    host.shutdown().await;
    scheduler.abort();

    info!("script complete");
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let path = std::env::var("REGIONVISION_FIXTURE").unwrap_or_else(|_| DEFAULT_FIXTURE.into());
    if let Err(e) = run(&path).await {
        error!(error = %e, "demo host failed");
        std::process::exit(1);
    }
}
