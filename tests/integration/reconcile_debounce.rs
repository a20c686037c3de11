//! Reconciler debounce behavior, under paused time so the timing
//! assertions are exact: a burst of change events produces one refetch,
//! a fetch failure keeps the optimistic state, and remote edits land in
//! the local view after the quiet period.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use flowdeck::board::BoardHandle;
use flowdeck::reconcile::Reconciler;
use flowdeck_core::action::{BoardPatch, ColumnPatch, TaskPatch};
use flowdeck_core::id::{BoardId, ColumnId, TaskId, UserId};
use flowdeck_core::model::{BoardState, Column, Task};
use flowdeck_core::notify::{ChangeEvent, ChangeNotifier};
use flowdeck_core::store::{BoardStore, StoreError};
use flowdeck_store::{ChangeHub, MemoryStore};

const DEBOUNCE: Duration = Duration::from_millis(300);

// ---------------------------------------------------------------------------
// Counting store wrapper
// ---------------------------------------------------------------------------

/// Delegates to a [`MemoryStore`] while counting board fetches.
struct CountingStore {
    inner: Arc<MemoryStore>,
    fetches: AtomicUsize,
}

impl CountingStore {
    fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl BoardStore for CountingStore {
    async fn fetch_board(
        &self,
        actor: UserId,
        board_id: BoardId,
    ) -> Result<BoardState, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_board(actor, board_id).await
    }

    async fn create_task(
        &self,
        actor: UserId,
        board_id: BoardId,
        column_id: ColumnId,
        title: &str,
    ) -> Result<Task, StoreError> {
        self.inner.create_task(actor, board_id, column_id, title).await
    }

    async fn update_task(
        &self,
        actor: UserId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        self.inner.update_task(actor, task_id, patch).await
    }

    async fn move_task(
        &self,
        actor: UserId,
        task_id: TaskId,
        target_column: ColumnId,
        new_position: usize,
    ) -> Result<(), StoreError> {
        self.inner
            .move_task(actor, task_id, target_column, new_position)
            .await
    }

    async fn delete_task(&self, actor: UserId, task_id: TaskId) -> Result<(), StoreError> {
        self.inner.delete_task(actor, task_id).await
    }

    async fn create_column(
        &self,
        actor: UserId,
        board_id: BoardId,
        title: &str,
    ) -> Result<Column, StoreError> {
        self.inner.create_column(actor, board_id, title).await
    }

    async fn update_column(
        &self,
        actor: UserId,
        column_id: ColumnId,
        patch: ColumnPatch,
    ) -> Result<Column, StoreError> {
        self.inner.update_column(actor, column_id, patch).await
    }

    async fn delete_column(&self, actor: UserId, column_id: ColumnId) -> Result<(), StoreError> {
        self.inner.delete_column(actor, column_id).await
    }

    async fn reorder_columns(
        &self,
        actor: UserId,
        board_id: BoardId,
        ordered: &[ColumnId],
    ) -> Result<(), StoreError> {
        self.inner.reorder_columns(actor, board_id, ordered).await
    }

    async fn update_board(
        &self,
        actor: UserId,
        board_id: BoardId,
        patch: BoardPatch,
    ) -> Result<(), StoreError> {
        self.inner.update_board(actor, board_id, patch).await
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seeded_store() -> (Arc<MemoryStore>, UserId, BoardId) {
    let store = Arc::new(MemoryStore::new());
    let user = store.register_user("editor").await.user_id;
    let board_id = store.create_board(user, "Board").await.unwrap();
    (store, user, board_id)
}

fn touch_event(actor: UserId) -> ChangeEvent {
    ChangeEvent::BoardUpdated { actor }
}

// ---------------------------------------------------------------------------
// Debounce timing
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn event_burst_produces_exactly_one_fetch() {
    let (inner, user, board_id) = seeded_store().await;
    let counting = Arc::new(CountingStore::new(Arc::clone(&inner)));
    let hub = ChangeHub::new();
    let board = BoardHandle::new(inner.fetch_board(user, board_id).await.unwrap());

    let reconciler = Reconciler::spawn(
        board,
        Arc::clone(&counting),
        user,
        board_id,
        hub.subscribe(board_id),
        DEBOUNCE,
    );

    // Five events inside one debounce window.
    for _ in 0..5 {
        hub.publish(board_id, touch_event(user));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(counting.fetch_count(), 0, "fetched before the quiet period");

    tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;
    assert_eq!(counting.fetch_count(), 1);

    reconciler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn each_quiet_period_fetches_once() {
    let (inner, user, board_id) = seeded_store().await;
    let counting = Arc::new(CountingStore::new(Arc::clone(&inner)));
    let hub = ChangeHub::new();
    let board = BoardHandle::new(inner.fetch_board(user, board_id).await.unwrap());

    let reconciler = Reconciler::spawn(
        board,
        Arc::clone(&counting),
        user,
        board_id,
        hub.subscribe(board_id),
        DEBOUNCE,
    );

    for expected in 1..=3 {
        hub.publish(board_id, touch_event(user));
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;
        assert_eq!(counting.fetch_count(), expected);
    }

    // Silence: no further fetches.
    tokio::time::sleep(DEBOUNCE * 4).await;
    assert_eq!(counting.fetch_count(), 3);

    reconciler.stop().await;
}

// ---------------------------------------------------------------------------
// Sync outcome
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn remote_edits_land_after_the_quiet_period() {
    let (store, user, board_id) = seeded_store().await;
    let board = BoardHandle::new(store.fetch_board(user, board_id).await.unwrap());
    let column = board.snapshot().columns[0].id;

    let reconciler = Reconciler::spawn(
        board.clone(),
        Arc::clone(&store),
        user,
        board_id,
        store.notifier().subscribe(board_id),
        DEBOUNCE,
    );

    // A mutation through the store publishes its own change event.
    let task = store
        .create_task(user, board_id, column, "From elsewhere")
        .await
        .unwrap();
    assert!(board.snapshot().task(task.id).is_none());

    tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;
    assert_eq!(
        board.snapshot().task(task.id).map(|t| t.title.as_str()),
        Some("From elsewhere")
    );

    reconciler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_keeps_the_local_state() {
    let (store, user, board_id) = seeded_store().await;
    let board = BoardHandle::new(store.fetch_board(user, board_id).await.unwrap());
    let before = board.snapshot();
    let hub = ChangeHub::new();

    // Refetches run as an unregistered user, so every one is rejected.
    let reconciler = Reconciler::spawn(
        board.clone(),
        Arc::clone(&store),
        UserId::new(),
        board_id,
        hub.subscribe(board_id),
        DEBOUNCE,
    );

    hub.publish(board_id, touch_event(user));
    tokio::time::sleep(DEBOUNCE * 2).await;

    assert_eq!(board.snapshot(), before);
    reconciler.stop().await;
}
