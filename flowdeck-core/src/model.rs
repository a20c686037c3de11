//! The in-memory board aggregate held by one open board view.
//!
//! A [`BoardState`] is seeded from an authoritative fetch when a view opens
//! and discarded when it closes; the durable copy always lives in the
//! external board store. It is mutated only through
//! [`reducer::apply`](crate::reducer::apply) and replaced wholesale by the
//! reconciler's `SyncState`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ColumnId, TaskId, UserId};

/// Task priority, ordered by urgency for display only.
///
/// The core never compares priorities numerically; the ordering exists so a
/// UI can sort or color-code cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    /// No priority set.
    #[default]
    None,
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
    /// Urgent.
    Urgent,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Urgent => write!(f, "urgent"),
        }
    }
}

/// A member's role on a board. Mutations require `Owner` or `Editor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Full control, including membership changes.
    Owner,
    /// May create, edit, move, and delete tasks and columns.
    Editor,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// Whether this role may perform board mutations.
    #[must_use]
    pub const fn can_edit(self) -> bool {
        matches!(self, Self::Owner | Self::Editor)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Editor => write!(f, "editor"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

/// A user profile, referenced weakly from tasks and memberships.
///
/// Board state never owns profile lifecycle; profiles are lookup data
/// attached to the aggregate for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The user this profile belongs to.
    pub user_id: UserId,
    /// Display name.
    pub display_name: String,
}

/// A board membership: one user plus their role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMember {
    /// The member's user id (the logical key of the set).
    pub user_id: UserId,
    /// The member's role on this board.
    pub role: Role,
    /// The member's profile, for display.
    pub profile: Profile,
}

/// A unit of work owned by exactly one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier; never changes, even across moves.
    pub id: TaskId,
    /// The column currently owning this task.
    pub column_id: ColumnId,
    /// Task title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Display priority.
    pub priority: Priority,
    /// Labels: set semantics for membership, insertion order for display.
    pub labels: Vec<String>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional assignee (weak reference to a profile).
    pub assignee_id: Option<UserId>,
    /// Who created the task.
    pub created_by: UserId,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// Dense 0-based rank within the owning column.
    pub position: usize,
}

/// An ordered container of tasks within a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Stable identifier.
    pub id: ColumnId,
    /// Column title (e.g. "To Do").
    pub title: String,
    /// Optional display color (hex string).
    pub color: Option<String>,
    /// Dense 0-based rank among the board's columns.
    pub position: usize,
    /// Tasks in display order.
    pub tasks: Vec<Task>,
}

/// The root aggregate for one open board view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    /// Columns in display order.
    pub columns: Vec<Column>,
    /// Board members, keyed logically by user id; order is incidental.
    pub members: Vec<BoardMember>,
}

impl BoardState {
    /// Looks up a column by id.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Looks up a task by id, searching every column.
    ///
    /// Tasks are found by id rather than by column because a concurrent
    /// reconciliation may have moved them since the caller last looked.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.columns.iter().find_map(|c| c.tasks.iter().find(|t| t.id == id))
    }

    /// Returns the id of the column currently containing the given task.
    #[must_use]
    pub fn column_of(&self, task_id: TaskId) -> Option<ColumnId> {
        self.columns
            .iter()
            .find(|c| c.tasks.iter().any(|t| t.id == task_id))
            .map(|c| c.id)
    }

    /// Total number of tasks across all columns.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}
