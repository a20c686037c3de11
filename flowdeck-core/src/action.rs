//! Board actions: the closed set of state transitions a view may dispatch.
//!
//! Every mutating user gesture becomes one [`BoardAction`]. Partial edits
//! travel as typed patch structs with named fields per kind rather than an
//! open property map, so a missing field is a compile error instead of an
//! `undefined` at render time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{ColumnId, TaskId, UserId};
use crate::model::{BoardMember, BoardState, Column, Priority, Task};

/// Tri-state patch field for nullable attributes.
///
/// `Keep` leaves the current value, `Set` replaces it, `Clear` nulls it.
/// Plain `Option<T>` cannot distinguish "leave alone" from "clear".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Patch<T> {
    /// Leave the current value unchanged.
    #[default]
    Keep,
    /// Replace the current value.
    Set(T),
    /// Clear the value to `None`.
    Clear,
}

impl<T> Patch<T> {
    /// Applies this patch to an optional field.
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *field = Some(value),
            Self::Clear => *field = None,
        }
    }
}

/// Partial update to a task, keyed by id.
///
/// Column ownership and position are deliberately absent: moves go through
/// [`BoardAction::MoveTask`] so the position invariant stays in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// Description change.
    pub description: Patch<String>,
    /// New priority, if changing.
    pub priority: Option<Priority>,
    /// Replacement label list, if changing.
    pub labels: Option<Vec<String>>,
    /// Due date change.
    pub due_date: Patch<NaiveDate>,
    /// Assignee change.
    pub assignee_id: Patch<UserId>,
}

impl TaskPatch {
    /// Merges this patch into a task in place.
    pub fn merge_into(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        self.description.clone().apply_to(&mut task.description);
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(labels) = &self.labels {
            task.labels.clone_from(labels);
        }
        self.due_date.apply_to(&mut task.due_date);
        self.assignee_id.apply_to(&mut task.assignee_id);
    }
}

/// Partial update to a column, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// Display color change.
    pub color: Patch<String>,
}

impl ColumnPatch {
    /// Merges this patch into a column in place.
    pub fn merge_into(&self, column: &mut Column) {
        if let Some(title) = &self.title {
            column.title.clone_from(title);
        }
        self.color.clone().apply_to(&mut column.color);
    }
}

/// Partial update to board metadata (title, description).
///
/// Board metadata lives outside the view aggregate, so the reducer treats
/// [`BoardAction::UpdateBoard`] as a no-op; the patch exists for the store
/// call and the activity feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardPatch {
    /// New board title, if changing.
    pub title: Option<String>,
    /// Board description change.
    pub description: Patch<String>,
}

/// A state transition on one board view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardAction {
    /// Replace state wholesale with an authoritative snapshot.
    SyncState(BoardState),
    /// Append a task to its column's sequence.
    AddTask(Task),
    /// Merge partial fields into the task with this id, wherever it lives.
    UpdateTask {
        /// Target task.
        task_id: TaskId,
        /// Fields to merge.
        patch: TaskPatch,
    },
    /// Remove a task from the named column.
    DeleteTask {
        /// Target task.
        task_id: TaskId,
        /// Column it is expected to live in.
        column_id: ColumnId,
    },
    /// Move a task within or across columns.
    MoveTask {
        /// The task being moved (identity, not index, is authoritative).
        task_id: TaskId,
        /// Source column.
        from_column: ColumnId,
        /// Destination column (may equal the source).
        to_column: ColumnId,
        /// Index in the source column at drag start (may be stale).
        from_index: usize,
        /// Target index in the destination column.
        to_index: usize,
    },
    /// Append a column to the board.
    AddColumn(Column),
    /// Merge partial fields into the column with this id.
    UpdateColumn {
        /// Target column.
        column_id: ColumnId,
        /// Fields to merge.
        patch: ColumnPatch,
    },
    /// Remove a column. Survivor positions are left alone; the server's
    /// renumbering is authoritative and arrives via the next sync.
    DeleteColumn {
        /// Target column.
        column_id: ColumnId,
    },
    /// Move a column from one index to another and renumber densely.
    ReorderColumn {
        /// Current index.
        from_index: usize,
        /// Target index.
        to_index: usize,
    },
    /// Board metadata edit: a no-op at this layer.
    UpdateBoard(BoardPatch),
    /// Replace the member set (e.g. after an invite is confirmed).
    SyncMembers(Vec<BoardMember>),
}

impl BoardAction {
    /// Builds the exact inverse of a movement action, for optimistic
    /// rollback: source and destination (and indices) swapped.
    ///
    /// Returns `None` for actions without a structural inverse; callers
    /// roll those back with a snapshot-based `SyncState` instead.
    #[must_use]
    pub fn inverted(&self) -> Option<Self> {
        match self {
            Self::MoveTask {
                task_id,
                from_column,
                to_column,
                from_index,
                to_index,
            } => Some(Self::MoveTask {
                task_id: *task_id,
                from_column: *to_column,
                to_column: *from_column,
                from_index: *to_index,
                to_index: *from_index,
            }),
            Self::ReorderColumn {
                from_index,
                to_index,
            } => Some(Self::ReorderColumn {
                from_index: *to_index,
                to_index: *from_index,
            }),
            Self::AddTask(task) => Some(Self::DeleteTask {
                task_id: task.id,
                column_id: task.column_id,
            }),
            Self::AddColumn(column) => Some(Self::DeleteColumn { column_id: column.id }),
            _ => None,
        }
    }
}
