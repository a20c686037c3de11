//! The board store contract: the external persistence and authorization
//! collaborator every client talks to.
//!
//! Implementations own the durable copy of each board and the authoritative
//! position reindexing. All operations are authorization-checked; mutation
//! failures of every kind are surfaced as values, never panics, and the
//! optimistic executor treats them uniformly via its rollback path.

use crate::action::{BoardPatch, ColumnPatch, TaskPatch};
use crate::id::{BoardId, ColumnId, TaskId, UserId};
use crate::model::{BoardState, Column, Task};
use crate::validate::ValidationError;

/// Errors returned by board store operations.
///
/// The taxonomy exists for user-facing messaging; recovery logic does not
/// branch on it.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// No authenticated session.
    #[error("unauthorized")]
    Unauthorized,

    /// Authenticated but lacking the role required for this mutation.
    #[error("forbidden")]
    Forbidden,

    /// The target entity does not exist (e.g. an already-deleted task).
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed input.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Network or infrastructure failure; safe to retry.
    #[error("transient failure: {0}")]
    Transient(String),
}

/// Async contract for the external board store.
///
/// Methods return futures directly (no boxed trait objects); the store is
/// shared behind an `Arc` by the view, its executor, and its reconciler.
pub trait BoardStore: Send + Sync {
    /// Fetches the full board aggregate (columns with nested tasks, plus
    /// members) as one authoritative snapshot.
    fn fetch_board(
        &self,
        actor: UserId,
        board_id: BoardId,
    ) -> impl std::future::Future<Output = Result<BoardState, StoreError>> + Send;

    /// Creates a task at the end of the given column and returns it.
    fn create_task(
        &self,
        actor: UserId,
        board_id: BoardId,
        column_id: ColumnId,
        title: &str,
    ) -> impl std::future::Future<Output = Result<Task, StoreError>> + Send;

    /// Merges partial fields into a task and returns the updated task.
    fn update_task(
        &self,
        actor: UserId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> impl std::future::Future<Output = Result<Task, StoreError>> + Send;

    /// Moves a task to `new_position` in `target_column`, reindexing every
    /// affected sibling.
    fn move_task(
        &self,
        actor: UserId,
        task_id: TaskId,
        target_column: ColumnId,
        new_position: usize,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Deletes a task and closes the position gap it leaves behind.
    fn delete_task(
        &self,
        actor: UserId,
        task_id: TaskId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Creates a column at the end of the board and returns it.
    fn create_column(
        &self,
        actor: UserId,
        board_id: BoardId,
        title: &str,
    ) -> impl std::future::Future<Output = Result<Column, StoreError>> + Send;

    /// Merges partial fields into a column and returns the updated column.
    fn update_column(
        &self,
        actor: UserId,
        column_id: ColumnId,
        patch: ColumnPatch,
    ) -> impl std::future::Future<Output = Result<Column, StoreError>> + Send;

    /// Deletes a column (and its tasks) and renumbers the survivors.
    fn delete_column(
        &self,
        actor: UserId,
        column_id: ColumnId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Rewrites column positions to match the given id order.
    fn reorder_columns(
        &self,
        actor: UserId,
        board_id: BoardId,
        ordered: &[ColumnId],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Merges partial fields into board metadata.
    fn update_board(
        &self,
        actor: UserId,
        board_id: BoardId,
        patch: BoardPatch,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
