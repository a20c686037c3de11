//! Debounced change reconciler.
//!
//! Listens to a board's change event stream and, after a quiet period,
//! refetches the authoritative snapshot and dispatches it as a sync. Each
//! event resets the timer, so a burst of remote edits produces one fetch
//! instead of one per event. Events carry no state; the refetch is the
//! only source of truth.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use flowdeck_core::action::BoardAction;
use flowdeck_core::id::{BoardId, UserId};
use flowdeck_core::notify::ChangeEvents;
use flowdeck_core::store::BoardStore;

use crate::board::BoardHandle;

/// Quiet period before a refetch, when not configured otherwise.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Background task that keeps a board view converged with the store.
///
/// Dropping the reconciler aborts the task; [`stop`] shuts it down
/// cleanly and waits for it to finish.
///
/// [`stop`]: Reconciler::stop
#[derive(Debug)]
pub struct Reconciler {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl Reconciler {
    /// Spawns the reconcile loop for one board.
    ///
    /// `events` is a live subscription to the board's change stream;
    /// refetches run as `actor`, so the reconciler sees exactly what that
    /// user is allowed to see.
    pub fn spawn<S, E>(
        board: BoardHandle,
        store: Arc<S>,
        actor: UserId,
        board_id: BoardId,
        events: E,
        debounce: Duration,
    ) -> Self
    where
        S: BoardStore + 'static,
        E: ChangeEvents + 'static,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run(
            board,
            store,
            actor,
            board_id,
            events,
            debounce,
            shutdown_rx,
        ));
        Self {
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    /// Signals the loop to exit and waits for it.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run<S, E>(
    board: BoardHandle,
    store: Arc<S>,
    actor: UserId,
    board_id: BoardId,
    mut events: E,
    debounce: Duration,
    mut shutdown: oneshot::Receiver<()>,
) where
    S: BoardStore,
    E: ChangeEvents,
{
    let timer = tokio::time::sleep(debounce);
    tokio::pin!(timer);
    // The timer branch is only polled while armed, so the initial sleep
    // never fires a fetch on its own.
    let mut armed = false;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            event = events.next() => {
                match event {
                    Some(event) => {
                        tracing::trace!(?event, "change event, debounce reset");
                        timer.as_mut().reset(Instant::now() + debounce);
                        armed = true;
                    }
                    // Stream ended. Flush a pending sync before exiting so
                    // the last burst is not lost.
                    None => {
                        if armed {
                            refetch(&board, store.as_ref(), actor, board_id).await;
                        }
                        break;
                    }
                }
            }
            () = &mut timer, if armed => {
                armed = false;
                refetch(&board, store.as_ref(), actor, board_id).await;
            }
        }
    }
    tracing::debug!(%board_id, "reconciler stopped");
}

/// Fetches the authoritative snapshot and syncs the local state to it.
///
/// A failed fetch keeps the optimistic state; the next change event will
/// trigger another attempt.
async fn refetch<S: BoardStore>(board: &BoardHandle, store: &S, actor: UserId, board_id: BoardId) {
    match store.fetch_board(actor, board_id).await {
        Ok(state) => {
            board.dispatch(&BoardAction::SyncState(state));
            tracing::debug!(%board_id, "board synced from store");
        }
        Err(err) => {
            tracing::debug!(%err, %board_id, "refetch failed, keeping local state");
        }
    }
}
