//! Shared handle to one board view's state.

use std::sync::Arc;

use parking_lot::RwLock;

use flowdeck_core::action::BoardAction;
use flowdeck_core::model::BoardState;
use flowdeck_core::reducer;

/// Cheaply cloneable handle to a board view's state.
///
/// All mutation goes through [`dispatch`], which runs the pure reducer
/// under a write lock, so every clone of the handle observes the same
/// sequence of states and no reader ever sees a half-applied action.
///
/// [`dispatch`]: BoardHandle::dispatch
#[derive(Debug, Clone, Default)]
pub struct BoardHandle {
    state: Arc<RwLock<BoardState>>,
}

impl BoardHandle {
    /// Creates a handle over an initial snapshot.
    #[must_use]
    pub fn new(initial: BoardState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    /// Clones the current state for rendering or rollback capture.
    #[must_use]
    pub fn snapshot(&self) -> BoardState {
        self.state.read().clone()
    }

    /// Applies one action through the reducer.
    ///
    /// Unknown targets reduce to a no-op, so dispatching never fails.
    pub fn dispatch(&self, action: &BoardAction) {
        let mut guard = self.state.write();
        let current = std::mem::take(&mut *guard);
        *guard = reducer::apply(current, action);
    }
}
