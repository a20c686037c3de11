//! Broadcast-based change notifier.
//!
//! One [`tokio::sync::broadcast`] channel per board. Delivery is
//! best-effort by contract: a receiver that falls behind skips ahead
//! (events are hints to refetch, so losing some under a burst is
//! equivalent to coalescing them), and events published before a
//! subscription simply never arrive.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use flowdeck_core::id::BoardId;
use flowdeck_core::notify::{ChangeEvent, ChangeEvents, ChangeNotifier};

/// Capacity of each per-board broadcast channel.
const CHANNEL_CAPACITY: usize = 64;

/// Per-board broadcast hub for change events.
#[derive(Default)]
pub struct ChangeHub {
    channels: Mutex<HashMap<BoardId, broadcast::Sender<ChangeEvent>>>,
}

impl ChangeHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes an event to all current subscribers of a board.
    ///
    /// A board with no subscribers drops the event; that is not an error.
    pub fn publish(&self, board_id: BoardId, event: ChangeEvent) {
        let channels = self.channels.lock();
        if let Some(tx) = channels.get(&board_id) {
            let _ = tx.send(event);
        }
    }

    /// Closes a board's channel, e.g. when the board is deleted.
    ///
    /// Live subscriptions yield any already-buffered events and then end.
    pub fn close(&self, board_id: BoardId) {
        self.channels.lock().remove(&board_id);
    }

    fn sender(&self, board_id: BoardId) -> broadcast::Sender<ChangeEvent> {
        self.channels
            .lock()
            .entry(board_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

impl ChangeNotifier for ChangeHub {
    type Events = BoardEvents;

    fn subscribe(&self, board_id: BoardId) -> BoardEvents {
        BoardEvents {
            rx: self.sender(board_id).subscribe(),
        }
    }
}

/// A live subscription to one board's events. Dropping it unsubscribes.
pub struct BoardEvents {
    rx: broadcast::Receiver<ChangeEvent>,
}

impl ChangeEvents for BoardEvents {
    async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "change events coalesced under burst");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
