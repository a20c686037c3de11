//! Full-stack optimistic mutation tests: board handle + executor against
//! the in-memory store. Confirmed mutations converge with the store;
//! rejected ones leave the local view exactly as it was.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use tokio::sync::mpsc;

use flowdeck::board::BoardHandle;
use flowdeck::optimistic::{Notice, NoticeKind, OptimisticExecutor};
use flowdeck_core::action::{BoardAction, TaskPatch};
use flowdeck_core::id::{BoardId, ColumnId, TaskId, UserId};
use flowdeck_core::model::Role;
use flowdeck_core::store::{BoardStore, StoreError};
use flowdeck_store::MemoryStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    store: Arc<MemoryStore>,
    editor: UserId,
    viewer: UserId,
    board_id: BoardId,
    todo: ColumnId,
    doing: ColumnId,
    task_id: TaskId,
}

/// Store with one board: "A", "B" in To Do (editor-owned) plus a viewer.
async fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let editor = store.register_user("editor").await.user_id;
    let viewer = store.register_user("viewer").await.user_id;
    let board_id = store.create_board(editor, "Sprint board").await.unwrap();
    store
        .add_member(editor, board_id, viewer, Role::Viewer)
        .await
        .unwrap();

    let state = store.fetch_board(editor, board_id).await.unwrap();
    let todo = state.columns[0].id;
    let doing = state.columns[1].id;
    let task = store.create_task(editor, board_id, todo, "A").await.unwrap();
    store.create_task(editor, board_id, todo, "B").await.unwrap();

    Fixture {
        store,
        editor,
        viewer,
        board_id,
        todo,
        doing,
        task_id: task.id,
    }
}

/// Executor over a freshly fetched board for the given user.
async fn client_for(
    fx: &Fixture,
    user: UserId,
) -> (BoardHandle, OptimisticExecutor, mpsc::Receiver<Notice>) {
    let board = BoardHandle::new(fx.store.fetch_board(user, fx.board_id).await.unwrap());
    let (tx, rx) = mpsc::channel(8);
    let executor = OptimisticExecutor::new(board.clone(), tx);
    (board, executor, rx)
}

fn cross_move(fx: &Fixture) -> (BoardAction, BoardAction) {
    let forward = BoardAction::MoveTask {
        task_id: fx.task_id,
        from_column: fx.todo,
        to_column: fx.doing,
        from_index: 0,
        to_index: 0,
    };
    let inverse = forward.inverted().unwrap();
    (forward, inverse)
}

fn titles_in(board: &BoardHandle, column: ColumnId) -> Vec<String> {
    board
        .snapshot()
        .column(column)
        .map(|c| c.tasks.iter().map(|t| t.title.clone()).collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Confirmed path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn confirmed_move_converges_with_the_store() {
    let fx = fixture().await;
    let (board, executor, _notices) = client_for(&fx, fx.editor).await;

    let (forward, inverse) = cross_move(&fx);
    executor
        .execute(
            forward,
            inverse,
            "move task",
            fx.store.move_task(fx.editor, fx.task_id, fx.doing, 0),
        )
        .await
        .unwrap();

    // Local optimistic layout and the store's authoritative one agree.
    assert_eq!(titles_in(&board, fx.todo), vec!["B"]);
    assert_eq!(titles_in(&board, fx.doing), vec!["A"]);

    let server = fx.store.fetch_board(fx.editor, fx.board_id).await.unwrap();
    assert_eq!(server.task(fx.task_id).unwrap().column_id, fx.doing);
    assert_eq!(server.task(fx.task_id).unwrap().position, 0);
}

#[tokio::test]
async fn confirmed_move_emits_no_notice() {
    let fx = fixture().await;
    let (_board, executor, mut notices) = client_for(&fx, fx.editor).await;

    let (forward, inverse) = cross_move(&fx);
    executor
        .execute(
            forward,
            inverse,
            "move task",
            fx.store.move_task(fx.editor, fx.task_id, fx.doing, 0),
        )
        .await
        .unwrap();

    assert!(notices.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Rejected path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forbidden_move_rolls_the_viewer_back() {
    let fx = fixture().await;
    let (board, executor, mut notices) = client_for(&fx, fx.viewer).await;
    let before = board.snapshot();

    let (forward, inverse) = cross_move(&fx);
    let result = executor
        .execute(
            forward,
            inverse,
            "move task",
            fx.store.move_task(fx.viewer, fx.task_id, fx.doing, 0),
        )
        .await;

    assert_eq!(result, Err(StoreError::Forbidden));
    assert_eq!(board.snapshot(), before);

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.message, "Failed to move task");
    assert_eq!(notice.kind, NoticeKind::Error);

    // The store never saw the move.
    let server = fx.store.fetch_board(fx.editor, fx.board_id).await.unwrap();
    assert_eq!(server.task(fx.task_id).unwrap().column_id, fx.todo);
}

#[tokio::test]
async fn rollback_restores_dense_positions() {
    let fx = fixture().await;
    let (board, executor, _notices) = client_for(&fx, fx.viewer).await;

    let (forward, inverse) = cross_move(&fx);
    let _ = executor
        .execute(
            forward,
            inverse,
            "move task",
            fx.store.move_task(fx.viewer, fx.task_id, fx.doing, 0),
        )
        .await;

    let state = board.snapshot();
    for column in &state.columns {
        let positions: Vec<usize> = column.tasks.iter().map(|t| t.position).collect();
        let expected: Vec<usize> = (0..column.tasks.len()).collect();
        assert_eq!(positions, expected);
    }
}

#[tokio::test]
async fn validation_failure_restores_the_snapshot() {
    let fx = fixture().await;
    let (board, executor, mut notices) = client_for(&fx, fx.editor).await;

    let oversized = "x".repeat(300);
    let patch = TaskPatch {
        title: Some(oversized.clone()),
        ..TaskPatch::default()
    };
    let result = executor
        .execute_restoring(
            BoardAction::UpdateTask {
                task_id: fx.task_id,
                patch: patch.clone(),
            },
            "update task",
            fx.store.update_task(fx.editor, fx.task_id, patch),
        )
        .await;

    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert_eq!(board.snapshot().task(fx.task_id).unwrap().title, "A");
    assert_eq!(notices.try_recv().unwrap().message, "Failed to update task");
}
