//! Shared board model and collaborator contracts for Flowdeck.

pub mod action;
pub mod id;
pub mod model;
pub mod notify;
pub mod position;
pub mod reducer;
pub mod store;
pub mod validate;
