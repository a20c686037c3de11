//! Optimistic mutation executor.
//!
//! The executor applies a mutation to the local board immediately, then
//! confirms it against the store. A rejection rolls the local copy back
//! (structural inverse where one exists, snapshot restore otherwise) and
//! emits a [`Notice`] for the surface to display. The store's error comes
//! back to the caller unchanged; no retry happens here.

use tokio::sync::mpsc;

use flowdeck_core::action::BoardAction;
use flowdeck_core::store::StoreError;

use crate::board::BoardHandle;

/// User-facing message emitted by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Display text, e.g. "Failed to move task".
    pub message: String,
    /// Severity for styling.
    pub kind: NoticeKind,
}

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A mutation was rejected and rolled back.
    Error,
    /// Informational, nothing was lost.
    Info,
}

/// Applies mutations locally first and rolls back on store rejection.
#[derive(Debug, Clone)]
pub struct OptimisticExecutor {
    board: BoardHandle,
    notices: mpsc::Sender<Notice>,
}

impl OptimisticExecutor {
    /// Creates an executor over a board handle and a notice channel.
    #[must_use]
    pub fn new(board: BoardHandle, notices: mpsc::Sender<Notice>) -> Self {
        Self { board, notices }
    }

    /// The board this executor mutates.
    #[must_use]
    pub const fn board(&self) -> &BoardHandle {
        &self.board
    }

    /// Dispatches `forward`, awaits store confirmation, and dispatches
    /// `inverse` if the store rejects the mutation.
    ///
    /// `label` names the gesture for the failure notice ("move task",
    /// "reorder columns").
    ///
    /// # Errors
    ///
    /// Propagates the store's error after rolling back. Local state is
    /// already restored by the time the caller sees it.
    pub async fn execute<T>(
        &self,
        forward: BoardAction,
        inverse: BoardAction,
        label: &str,
        confirm: impl Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        self.board.dispatch(&forward);
        match confirm.await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.board.dispatch(&inverse);
                self.report_failure(label, &err);
                Err(err)
            }
        }
    }

    /// Like [`execute`], but rolls back by restoring the pre-dispatch
    /// snapshot. For mutations without a structural inverse (field edits,
    /// deletions).
    ///
    /// # Errors
    ///
    /// Propagates the store's error after restoring the snapshot.
    ///
    /// [`execute`]: OptimisticExecutor::execute
    pub async fn execute_restoring<T>(
        &self,
        forward: BoardAction,
        label: &str,
        confirm: impl Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        let before = self.board.snapshot();
        self.board.dispatch(&forward);
        match confirm.await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.board.dispatch(&BoardAction::SyncState(before));
                self.report_failure(label, &err);
                Err(err)
            }
        }
    }

    fn report_failure(&self, label: &str, err: &StoreError) {
        tracing::warn!(%err, action = label, "mutation rejected, local state rolled back");
        // A full notice channel just drops the message; the rollback
        // itself already happened.
        let _ = self.notices.try_send(Notice {
            message: format!("Failed to {label}"),
            kind: NoticeKind::Error,
        });
    }
}
