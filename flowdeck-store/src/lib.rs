//! In-memory reference implementation of the Flowdeck board store.
//!
//! [`MemoryStore`] is the authoritative collaborator the client crate is
//! written against: it owns the durable board records, performs membership
//! and role checks on every operation, maintains the dense position
//! invariant server-side, and publishes a [`ChangeEvent`] for every
//! committed write through a broadcast [`ChangeHub`].
//!
//! [`ChangeEvent`]: flowdeck_core::notify::ChangeEvent

pub mod notifier;
pub mod seed;
pub mod store;

pub use notifier::{BoardEvents, ChangeHub};
pub use store::MemoryStore;
