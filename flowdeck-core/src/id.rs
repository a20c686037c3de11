//! Opaque, stable identifiers for boards, columns, tasks, and users.
//!
//! All ids are UUID v7 newtypes: time-ordered for friendly index locality,
//! never reused, and stable across moves (reassigning a task to another
//! column changes its `column_id`, never its [`TaskId`]).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new time-ordered identifier (UUID v7).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID value.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id! {
    /// Unique identifier for a board.
    BoardId
}

entity_id! {
    /// Unique identifier for a column within a board.
    ColumnId
}

entity_id! {
    /// Unique identifier for a task.
    TaskId
}

entity_id! {
    /// Unique identifier for a user profile.
    UserId
}
