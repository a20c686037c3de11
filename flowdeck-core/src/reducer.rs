//! The pure board reducer: `apply(state, action) -> state`.
//!
//! Total over every [`BoardAction`] variant and never panics. Actions whose
//! preconditions do not hold against the current state (a stale index, a
//! task that a concurrent reconciliation already moved away) degrade to a
//! silent no-op: the view stays available and the next authoritative sync
//! repairs any divergence.

use crate::action::BoardAction;
use crate::model::BoardState;
use crate::position::{insert_clamped, renumber_tasks, renumber_columns};

/// Applies one action to the board state, returning the next state.
#[must_use]
pub fn apply(mut state: BoardState, action: &BoardAction) -> BoardState {
    match action {
        BoardAction::SyncState(snapshot) => snapshot.clone(),

        BoardAction::AddTask(task) => {
            if let Some(column) = state.columns.iter_mut().find(|c| c.id == task.column_id) {
                insert_clamped(&mut column.tasks, task.position, task.clone());
                renumber_tasks(&mut column.tasks);
            }
            state
        }

        BoardAction::UpdateTask { task_id, patch } => {
            // Lookup by id across every column: the task's column may have
            // changed since the edit dialog was opened.
            for column in &mut state.columns {
                if let Some(task) = column.tasks.iter_mut().find(|t| t.id == *task_id) {
                    patch.merge_into(task);
                    break;
                }
            }
            state
        }

        BoardAction::DeleteTask { task_id, column_id } => {
            if let Some(column) = state.columns.iter_mut().find(|c| c.id == *column_id) {
                column.tasks.retain(|t| t.id != *task_id);
                renumber_tasks(&mut column.tasks);
            }
            state
        }

        BoardAction::MoveTask {
            task_id,
            from_column,
            to_column,
            from_index,
            to_index,
        } => move_task(state, *task_id, *from_column, *to_column, *from_index, *to_index),

        BoardAction::AddColumn(column) => {
            state.columns.push(column.clone());
            renumber_columns(&mut state.columns);
            state
        }

        BoardAction::UpdateColumn { column_id, patch } => {
            if let Some(column) = state.columns.iter_mut().find(|c| c.id == *column_id) {
                patch.merge_into(column);
            }
            state
        }

        BoardAction::DeleteColumn { column_id } => {
            // Survivor positions are left as-is; the server's renumbering is
            // authoritative and arrives with the next sync.
            state.columns.retain(|c| c.id != *column_id);
            state
        }

        BoardAction::ReorderColumn {
            from_index,
            to_index,
        } => {
            if *from_index < state.columns.len() {
                let moved = state.columns.remove(*from_index);
                insert_clamped(&mut state.columns, *to_index, moved);
                renumber_columns(&mut state.columns);
            }
            state
        }

        // Board metadata lives outside this aggregate.
        BoardAction::UpdateBoard(_) => state,

        BoardAction::SyncMembers(members) => {
            state.members.clone_from(members);
            state
        }
    }
}

fn move_task(
    mut state: BoardState,
    task_id: crate::id::TaskId,
    from_column: crate::id::ColumnId,
    to_column: crate::id::ColumnId,
    from_index: usize,
    to_index: usize,
) -> BoardState {
    if from_column == to_column {
        // Same-column reorder: splice by index, renumber densely.
        if let Some(column) = state.columns.iter_mut().find(|c| c.id == from_column)
            && from_index < column.tasks.len()
        {
            let moved = column.tasks.remove(from_index);
            insert_clamped(&mut column.tasks, to_index, moved);
            renumber_tasks(&mut column.tasks);
        }
        return state;
    }

    // Cross-column move. The task is located by id, not by the passed
    // index — the index may be stale after a concurrent reconciliation.
    // If either end of the move is gone, this is a race with a concurrent
    // edit: leave the state untouched.
    let Some(source_idx) = state.columns.iter().position(|c| c.id == from_column) else {
        return state;
    };
    if !state.columns.iter().any(|c| c.id == to_column) {
        return state;
    }
    let Some(task_idx) = state.columns[source_idx]
        .tasks
        .iter()
        .position(|t| t.id == task_id)
    else {
        return state;
    };

    let mut moved = state.columns[source_idx].tasks.remove(task_idx);
    renumber_tasks(&mut state.columns[source_idx].tasks);

    moved.column_id = to_column;
    if let Some(dest) = state.columns.iter_mut().find(|c| c.id == to_column) {
        insert_clamped(&mut dest.tasks, to_index, moved);
        renumber_tasks(&mut dest.tasks);
    }
    state
}
