//! Reconciliation scheduler: one adaptive timer shared by all viewers.
//!
//! DESIGN
//! ======
//! The timer is a deadline held in a `watch` channel: `None` when idle,
//! `Some(instant)` when armed. Arming replaces the deadline, so a fast arm
//! after a region mutation pulls the next pass forward and a steady arm
//! after a pass pushes it back. The background task sleeps until the
//! deadline, clears it, and runs one pass; the pass re-arms the steady
//! interval if any viewer still needs reconciling.
//!
//! Nothing arms the timer while no viewer has an overlay or proximity mode,
//! so an idle server does no periodic work.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::OverlayConfig;
use crate::state::AppState;

use super::reconcile;

#[derive(Clone)]
pub struct Scheduler {
    deadline: Arc<watch::Sender<Option<Instant>>>,
    fast: Duration,
    steady: Duration,
}

impl Scheduler {
    #[must_use]
    pub fn new(config: &OverlayConfig) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { deadline: Arc::new(tx), fast: config.fast_interval, steady: config.steady_interval }
    }

    /// Schedule the next pass `interval` from now, replacing any pending one.
    pub fn arm(&self, interval: Duration) {
        let at = Instant::now() + interval;
        self.deadline.send_replace(Some(at));
        debug!(?interval, "reconciliation armed");
    }

    /// Arm the short interval used right after regions change.
    pub fn arm_fast(&self) {
        self.arm(self.fast);
    }

    /// Arm the interval used while overlays stay active.
    pub fn arm_steady(&self) {
        self.arm(self.steady);
    }

    pub fn disable(&self) {
        if self.deadline.send_replace(None).is_some() {
            debug!("reconciliation disabled");
        }
    }

    /// Pending deadline, if armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        *self.deadline.borrow()
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline().is_some()
    }

    /// Clear the deadline if it is still `at`. False if it was re-armed meanwhile.
    fn take_deadline(&self, at: Instant) -> bool {
        self.deadline.send_if_modified(|deadline| {
            if *deadline == Some(at) {
                *deadline = None;
                true
            } else {
                false
            }
        })
    }
}

/// Spawn the background reconciliation task. Returns a handle for shutdown.
pub fn spawn_scheduler_task(state: AppState) -> JoinHandle<()> {
    let mut rx = state.scheduler.deadline.subscribe();
    info!(
        fast = ?state.scheduler.fast,
        steady = ?state.scheduler.steady,
        "reconciliation scheduler started"
    );

    tokio::spawn(async move {
        loop {
            let deadline = *rx.borrow_and_update();
            match deadline {
                None => {
                    if rx.changed().await.is_err() {
                        break;
                    }
                }
                Some(at) => {
                    tokio::select! {
                        () = tokio::time::sleep_until(at) => {
                            if state.scheduler.take_deadline(at) {
                                reconcile::run_pass(&state);
                            }
                        }
                        changed = rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;
