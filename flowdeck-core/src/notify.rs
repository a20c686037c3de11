//! The change notifier contract: asynchronous "something changed" signals
//! scoped to one board.
//!
//! Delivery is best-effort: events may be coalesced, duplicated, or arrive
//! out of order relative to the writes that caused them. Consumers must not
//! read state out of an event — the payload exists for activity feeds, and
//! the reconciler ignores it entirely, treating every event as a hint to
//! refetch.

use serde::{Deserialize, Serialize};

use crate::id::{BoardId, ColumnId, TaskId, UserId};

/// One change notification, tagged by action kind with named fields.
///
/// Typed variants instead of an open metadata map: a feed renderer can only
/// ask for fields the event actually carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    /// A task was created.
    TaskCreated {
        /// The new task.
        task_id: TaskId,
        /// Its title, for feed display.
        title: String,
        /// Who created it.
        actor: UserId,
    },
    /// A task's fields were edited.
    TaskUpdated {
        /// The edited task.
        task_id: TaskId,
        /// Who edited it.
        actor: UserId,
    },
    /// A task was moved within or across columns.
    TaskMoved {
        /// The moved task.
        task_id: TaskId,
        /// Column it left.
        from_column: ColumnId,
        /// Column it entered (may equal `from_column`).
        to_column: ColumnId,
        /// Position before the move.
        from_position: usize,
        /// Position after the move.
        to_position: usize,
        /// Who moved it.
        actor: UserId,
    },
    /// A task was deleted.
    TaskDeleted {
        /// The deleted task.
        task_id: TaskId,
        /// Its title at deletion time, for feed display.
        title: String,
        /// Who deleted it.
        actor: UserId,
    },
    /// A column was created.
    ColumnCreated {
        /// The new column.
        column_id: ColumnId,
        /// Its title.
        title: String,
        /// Who created it.
        actor: UserId,
    },
    /// A column's fields were edited.
    ColumnUpdated {
        /// The edited column.
        column_id: ColumnId,
        /// Who edited it.
        actor: UserId,
    },
    /// A column (and its tasks) was deleted.
    ColumnDeleted {
        /// The deleted column.
        column_id: ColumnId,
        /// Its title at deletion time.
        title: String,
        /// Who deleted it.
        actor: UserId,
    },
    /// The board's columns were reordered.
    ColumnsReordered {
        /// Who reordered them.
        actor: UserId,
    },
    /// Board metadata was edited.
    BoardUpdated {
        /// Who edited it.
        actor: UserId,
    },
}

/// A live subscription to one board's change events.
///
/// Dropping the stream unsubscribes; no events are delivered afterwards.
pub trait ChangeEvents: Send {
    /// Waits for the next change event.
    ///
    /// Returns `None` when the subscription has ended (board deleted or
    /// notifier shut down).
    fn next(&mut self) -> impl std::future::Future<Output = Option<ChangeEvent>> + Send;
}

/// Factory for per-board change subscriptions.
pub trait ChangeNotifier: Send + Sync {
    /// The subscription stream type.
    type Events: ChangeEvents;

    /// Subscribes to all future change events for one board.
    fn subscribe(&self, board_id: BoardId) -> Self::Events;
}
