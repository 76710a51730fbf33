//! Channel-backed viewer link.
//!
//! Packets go into a bounded `mpsc` queue drained by the connection task.
//! Sends use `try_send` so overlay work under the registry lock never waits
//! on a slow client; a full queue drops the packet with a warning.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::warn;

use super::ViewerLink;
use crate::geometry::Point;
use crate::packet::Packet;

pub struct ChannelLink {
    tx: mpsc::Sender<Packet>,
    position: Mutex<Point>,
}

impl ChannelLink {
    /// Create a link and the receiver its connection task drains.
    #[must_use]
    pub fn new(capacity: usize, position: Point) -> (Arc<Self>, mpsc::Receiver<Packet>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Arc::new(Self { tx, position: Mutex::new(position) }), rx)
    }

    /// Record the viewer's latest tile position.
    pub fn move_to(&self, position: Point) {
        *self.position.lock().unwrap_or_else(PoisonError::into_inner) = position;
    }
}

impl ViewerLink for ChannelLink {
    fn position(&self) -> Point {
        *self.position.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, packet: Packet) {
        match self.tx.try_send(packet) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(packet)) => {
                warn!(%packet, "viewer packet queue full; dropping packet");
            }
            Err(mpsc::error::TrySendError::Closed(packet)) => {
                warn!(%packet, "viewer packet queue closed; dropping packet");
            }
        }
    }
}
