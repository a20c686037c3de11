//! Property tests for the board reducer.
//!
//! Random sequences of task-level actions must keep every column's
//! positions dense and every task in exactly one column, and movement
//! actions must be undone exactly by their structural inverse.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::Utc;
use proptest::prelude::*;

use flowdeck_core::action::BoardAction;
use flowdeck_core::id::{ColumnId, TaskId, UserId};
use flowdeck_core::model::{BoardState, Column, Priority, Task};
use flowdeck_core::position::is_dense;
use flowdeck_core::reducer::apply;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_task(column_id: ColumnId, title: &str, position: usize) -> Task {
    Task {
        id: TaskId::new(),
        column_id,
        title: title.to_string(),
        description: None,
        priority: Priority::default(),
        labels: Vec::new(),
        due_date: None,
        assignee_id: None,
        created_by: UserId::new(),
        created_at: Utc::now(),
        position,
    }
}

/// Board with the given number of tasks per column.
fn make_board(tasks_per_column: &[usize]) -> BoardState {
    let columns = tasks_per_column
        .iter()
        .enumerate()
        .map(|(ci, &count)| {
            let id = ColumnId::new();
            Column {
                id,
                title: format!("Column {ci}"),
                color: None,
                position: ci,
                tasks: (0..count)
                    .map(|ti| make_task(id, &format!("task {ci}.{ti}"), ti))
                    .collect(),
            }
        })
        .collect();
    BoardState {
        columns,
        members: Vec::new(),
    }
}

/// Every column's task positions are dense, every task's `column_id`
/// matches its container, and no task id appears twice.
fn check_invariants(state: &BoardState) {
    let mut seen = std::collections::HashSet::new();
    for column in &state.columns {
        let positions: Vec<usize> = column.tasks.iter().map(|t| t.position).collect();
        assert!(is_dense(&positions), "positions not dense: {positions:?}");
        for task in &column.tasks {
            assert_eq!(task.column_id, column.id, "task container mismatch");
            assert!(seen.insert(task.id), "task present in two columns");
        }
    }
}

/// One raw action choice, interpreted against the evolving state.
#[derive(Debug, Clone, Copy)]
enum RawOp {
    Move {
        source: usize,
        task: usize,
        dest: usize,
        to_index: usize,
    },
    Delete {
        source: usize,
        task: usize,
    },
    Add {
        dest: usize,
        position: usize,
    },
}

fn raw_op() -> impl Strategy<Value = RawOp> {
    prop_oneof![
        (0..16usize, 0..16usize, 0..16usize, 0..16usize).prop_map(
            |(source, task, dest, to_index)| RawOp::Move {
                source,
                task,
                dest,
                to_index,
            }
        ),
        (0..16usize, 0..16usize).prop_map(|(source, task)| RawOp::Delete { source, task }),
        (0..16usize, 0..16usize).prop_map(|(dest, position)| RawOp::Add { dest, position }),
    ]
}

/// Resolves a raw op to a concrete action, or `None` when the chosen
/// container is empty.
fn resolve(state: &BoardState, op: RawOp) -> Option<BoardAction> {
    let ncols = state.columns.len();
    match op {
        RawOp::Move {
            source,
            task,
            dest,
            to_index,
        } => {
            let source_col = &state.columns[source % ncols];
            if source_col.tasks.is_empty() {
                return None;
            }
            let task = &source_col.tasks[task % source_col.tasks.len()];
            Some(BoardAction::MoveTask {
                task_id: task.id,
                from_column: source_col.id,
                to_column: state.columns[dest % ncols].id,
                from_index: task.position,
                to_index,
            })
        }
        RawOp::Delete { source, task } => {
            let source_col = &state.columns[source % ncols];
            if source_col.tasks.is_empty() {
                return None;
            }
            let task = &source_col.tasks[task % source_col.tasks.len()];
            Some(BoardAction::DeleteTask {
                task_id: task.id,
                column_id: source_col.id,
            })
        }
        RawOp::Add { dest, position } => {
            let dest_col = &state.columns[dest % ncols];
            Some(BoardAction::AddTask(make_task(
                dest_col.id,
                "generated",
                position,
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn task_actions_preserve_board_invariants(
        ops in prop::collection::vec(raw_op(), 0..48),
    ) {
        let mut state = make_board(&[3, 2, 0]);
        check_invariants(&state);

        for op in ops {
            if let Some(action) = resolve(&state, op) {
                state = apply(state, &action);
                check_invariants(&state);
            }
        }
    }

    #[test]
    fn same_column_move_is_undone_by_its_inverse(
        task_count in 1..8usize,
        from_seed in 0..8usize,
        to_seed in 0..8usize,
    ) {
        let state = make_board(&[task_count]);
        let from_index = from_seed % task_count;
        let to_index = to_seed % task_count;
        let column_id = state.columns[0].id;
        let task_id = state.columns[0].tasks[from_index].id;

        let forward = BoardAction::MoveTask {
            task_id,
            from_column: column_id,
            to_column: column_id,
            from_index,
            to_index,
        };
        let inverse = forward.inverted().unwrap();

        let moved = apply(state.clone(), &forward);
        let restored = apply(moved, &inverse);
        prop_assert_eq!(restored, state);
    }

    #[test]
    fn cross_column_move_is_undone_by_its_inverse(
        source_count in 1..6usize,
        dest_count in 0..6usize,
        from_seed in 0..8usize,
        to_seed in 0..8usize,
    ) {
        let state = make_board(&[source_count, dest_count]);
        let from_index = from_seed % source_count;
        let to_index = to_seed % (dest_count + 1);
        let from_column = state.columns[0].id;
        let to_column = state.columns[1].id;
        let task_id = state.columns[0].tasks[from_index].id;

        let forward = BoardAction::MoveTask {
            task_id,
            from_column,
            to_column,
            from_index,
            to_index,
        };
        let inverse = forward.inverted().unwrap();

        let moved = apply(state.clone(), &forward);
        let restored = apply(moved, &inverse);
        prop_assert_eq!(restored, state);
    }
}
