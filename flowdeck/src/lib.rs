//! Flowdeck client: the board view's state engine.
//!
//! Three cooperating pieces sit between a rendering layer and a
//! [`BoardStore`]:
//!
//! - [`BoardHandle`] holds the single in-memory [`BoardState`] a view
//!   renders from, mutated only through the pure reducer.
//! - [`OptimisticExecutor`] applies a mutation locally first, confirms it
//!   against the store, and rolls the local copy back if the store rejects
//!   it.
//! - [`Reconciler`] listens for change events from other collaborators and
//!   refetches the authoritative snapshot after a quiet period, so bursts
//!   of remote edits collapse into one sync.
//!
//! [`BoardStore`]: flowdeck_core::store::BoardStore
//! [`BoardState`]: flowdeck_core::model::BoardState

pub mod board;
pub mod config;
pub mod optimistic;
pub mod reconcile;

pub use board::BoardHandle;
pub use optimistic::{Notice, NoticeKind, OptimisticExecutor};
pub use reconcile::Reconciler;
