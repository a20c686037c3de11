//! In-memory, authorization-checked board store.
//!
//! `MemoryStore` is the durable side of the position model: every mutation
//! re-derives dense `0..n-1` positions for the affected container(s) before
//! returning. All rewrites for one logical operation happen under a single
//! write lock over the board table, so a concurrent operation can never
//! observe (or interleave with) a half-reindexed container.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use flowdeck_core::action::{BoardPatch, ColumnPatch, TaskPatch};
use flowdeck_core::id::{BoardId, ColumnId, TaskId, UserId};
use flowdeck_core::model::{BoardMember, BoardState, Column, Priority, Profile, Role, Task};
use flowdeck_core::notify::ChangeEvent;
use flowdeck_core::position::{insert_clamped, insertion_position, renumber_columns, renumber_tasks};
use flowdeck_core::store::{BoardStore, StoreError};
use flowdeck_core::validate::{
    MAX_COLUMNS, ValidationError, validate_board_title, validate_column_title, validate_task_title,
};

use crate::notifier::ChangeHub;
use crate::seed::DEFAULT_COLUMNS;

/// One stored board: metadata, columns with nested tasks, and members.
#[derive(Debug, Clone)]
struct BoardRecord {
    title: String,
    description: Option<String>,
    columns: Vec<Column>,
    members: Vec<BoardMember>,
}

impl BoardRecord {
    fn role_of(&self, user: UserId) -> Option<Role> {
        self.members
            .iter()
            .find(|m| m.user_id == user)
            .map(|m| m.role)
    }

    /// Index of the column and task holding `task_id`, if present.
    fn locate_task(&self, task_id: TaskId) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(ci, column)| {
            column
                .tasks
                .iter()
                .position(|t| t.id == task_id)
                .map(|ti| (ci, ti))
        })
    }

    fn require_member(&self, user: UserId) -> Result<Role, StoreError> {
        self.role_of(user).ok_or(StoreError::Forbidden)
    }

    fn require_editor(&self, user: UserId) -> Result<(), StoreError> {
        if self.require_member(user)?.can_edit() {
            Ok(())
        } else {
            Err(StoreError::Forbidden)
        }
    }
}

/// In-memory board store with broadcast change notification.
#[derive(Default)]
pub struct MemoryStore {
    boards: RwLock<HashMap<BoardId, BoardRecord>>,
    profiles: RwLock<HashMap<UserId, Profile>>,
    hub: Arc<ChangeHub>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The change hub boards in this store publish to.
    #[must_use]
    pub fn notifier(&self) -> Arc<ChangeHub> {
        Arc::clone(&self.hub)
    }

    /// Registers a user profile (the "session" other operations check for).
    pub async fn register_user(&self, display_name: &str) -> Profile {
        let profile = Profile {
            user_id: UserId::new(),
            display_name: display_name.to_string(),
        };
        self.profiles
            .write()
            .await
            .insert(profile.user_id, profile.clone());
        profile
    }

    /// Creates a board owned by `actor`, seeded with the default columns.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for an unknown actor, `Validation` for a bad title.
    pub async fn create_board(&self, actor: UserId, title: &str) -> Result<BoardId, StoreError> {
        let profile = self.require_session(actor).await?;
        validate_board_title(title)?;

        let columns = DEFAULT_COLUMNS
            .iter()
            .enumerate()
            .map(|(position, (title, color))| Column {
                id: ColumnId::new(),
                title: (*title).to_string(),
                color: Some((*color).to_string()),
                position,
                tasks: Vec::new(),
            })
            .collect();

        let board_id = BoardId::new();
        let record = BoardRecord {
            title: title.to_string(),
            description: None,
            columns,
            members: vec![BoardMember {
                user_id: actor,
                role: Role::Owner,
                profile,
            }],
        };
        self.boards.write().await.insert(board_id, record);
        tracing::info!(%board_id, %actor, "board created");
        Ok(board_id)
    }

    /// Adds (or re-roles) a member. Only the board owner may do this.
    ///
    /// # Errors
    ///
    /// `Unauthorized` / `Forbidden` on auth failure, `NotFound` if the
    /// board or the invited user's profile does not exist.
    pub async fn add_member(
        &self,
        actor: UserId,
        board_id: BoardId,
        user: UserId,
        role: Role,
    ) -> Result<(), StoreError> {
        self.require_session(actor).await?;
        let profile = self
            .profiles
            .read()
            .await
            .get(&user)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("user".to_string()))?;

        let mut boards = self.boards.write().await;
        let record = boards
            .get_mut(&board_id)
            .ok_or_else(|| StoreError::NotFound("board".to_string()))?;
        if record.require_member(actor)? != Role::Owner {
            return Err(StoreError::Forbidden);
        }

        if let Some(member) = record.members.iter_mut().find(|m| m.user_id == user) {
            member.role = role;
        } else {
            record.members.push(BoardMember {
                user_id: user,
                role,
                profile,
            });
        }
        Ok(())
    }

    /// Removes a member. Only the board owner may do this.
    ///
    /// # Errors
    ///
    /// `Unauthorized` / `Forbidden` on auth failure, `NotFound` if the
    /// board does not exist or the user is not a member.
    pub async fn remove_member(
        &self,
        actor: UserId,
        board_id: BoardId,
        user: UserId,
    ) -> Result<(), StoreError> {
        self.require_session(actor).await?;

        let mut boards = self.boards.write().await;
        let record = boards
            .get_mut(&board_id)
            .ok_or_else(|| StoreError::NotFound("board".to_string()))?;
        if record.require_member(actor)? != Role::Owner {
            return Err(StoreError::Forbidden);
        }

        let before = record.members.len();
        record.members.retain(|m| m.user_id != user);
        if record.members.len() == before {
            return Err(StoreError::NotFound("member".to_string()));
        }
        tracing::info!(%board_id, %user, "member removed");
        Ok(())
    }

    /// Deletes a board, its columns, and its membership. Owner only.
    ///
    /// The board's change channel is closed, so live subscriptions end
    /// once they drain.
    ///
    /// # Errors
    ///
    /// `Unauthorized` / `Forbidden` on auth failure, `NotFound` for an
    /// unknown board.
    pub async fn delete_board(&self, actor: UserId, board_id: BoardId) -> Result<(), StoreError> {
        self.require_session(actor).await?;

        let mut boards = self.boards.write().await;
        let record = boards
            .get(&board_id)
            .ok_or_else(|| StoreError::NotFound("board".to_string()))?;
        if record.require_member(actor)? != Role::Owner {
            return Err(StoreError::Forbidden);
        }

        boards.remove(&board_id);
        self.hub.close(board_id);
        tracing::info!(%board_id, %actor, "board deleted");
        Ok(())
    }

    async fn require_session(&self, actor: UserId) -> Result<Profile, StoreError> {
        self.profiles
            .read()
            .await
            .get(&actor)
            .cloned()
            .ok_or(StoreError::Unauthorized)
    }
}

impl BoardStore for MemoryStore {
    async fn fetch_board(
        &self,
        actor: UserId,
        board_id: BoardId,
    ) -> Result<BoardState, StoreError> {
        self.require_session(actor).await?;
        let boards = self.boards.read().await;
        let record = boards
            .get(&board_id)
            .ok_or_else(|| StoreError::NotFound("board".to_string()))?;
        record.require_member(actor)?;
        Ok(BoardState {
            columns: record.columns.clone(),
            members: record.members.clone(),
        })
    }

    async fn create_task(
        &self,
        actor: UserId,
        board_id: BoardId,
        column_id: ColumnId,
        title: &str,
    ) -> Result<Task, StoreError> {
        self.require_session(actor).await?;
        validate_task_title(title)?;

        let mut boards = self.boards.write().await;
        let record = boards
            .get_mut(&board_id)
            .ok_or_else(|| StoreError::NotFound("board".to_string()))?;
        record.require_editor(actor)?;
        let column = record
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| StoreError::NotFound("column".to_string()))?;

        let task = Task {
            id: TaskId::new(),
            column_id,
            title: title.to_string(),
            description: None,
            priority: Priority::default(),
            labels: Vec::new(),
            due_date: None,
            assignee_id: None,
            created_by: actor,
            created_at: Utc::now(),
            position: insertion_position(column.tasks.iter().map(|t| t.position)),
        };
        column.tasks.push(task.clone());

        self.hub.publish(
            board_id,
            ChangeEvent::TaskCreated {
                task_id: task.id,
                title: task.title.clone(),
                actor,
            },
        );
        Ok(task)
    }

    async fn update_task(
        &self,
        actor: UserId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        self.require_session(actor).await?;
        if let Some(title) = &patch.title {
            validate_task_title(title)?;
        }

        let mut boards = self.boards.write().await;
        let (board_id, record) = board_of_task(&mut boards, task_id)?;
        record.require_editor(actor)?;
        let Some((ci, ti)) = record.locate_task(task_id) else {
            return Err(StoreError::NotFound("task".to_string()));
        };

        let task = &mut record.columns[ci].tasks[ti];
        patch.merge_into(task);
        let updated = task.clone();

        self.hub
            .publish(board_id, ChangeEvent::TaskUpdated { task_id, actor });
        Ok(updated)
    }

    async fn move_task(
        &self,
        actor: UserId,
        task_id: TaskId,
        target_column: ColumnId,
        new_position: usize,
    ) -> Result<(), StoreError> {
        self.require_session(actor).await?;

        let mut boards = self.boards.write().await;
        let (board_id, record) = board_of_task(&mut boards, task_id)?;
        record.require_editor(actor)?;
        let Some((src, ti)) = record.locate_task(task_id) else {
            return Err(StoreError::NotFound("task".to_string()));
        };

        let from_column = record.columns[src].id;
        let from_position = record.columns[src].tasks[ti].position;

        if from_column == target_column {
            // Same-container reorder: splice and rewrite every sibling.
            let moved = record.columns[src].tasks.remove(ti);
            insert_clamped(&mut record.columns[src].tasks, new_position, moved);
            renumber_tasks(&mut record.columns[src].tasks);
        } else {
            let dest = record
                .columns
                .iter()
                .position(|c| c.id == target_column)
                .ok_or_else(|| StoreError::NotFound("column".to_string()))?;

            // Close the gap in the source, then splice into the destination.
            let mut moved = record.columns[src].tasks.remove(ti);
            renumber_tasks(&mut record.columns[src].tasks);
            moved.column_id = target_column;
            insert_clamped(&mut record.columns[dest].tasks, new_position, moved);
            renumber_tasks(&mut record.columns[dest].tasks);
        }

        let to_position = record
            .locate_task(task_id)
            .map_or(new_position, |(ci, ti)| record.columns[ci].tasks[ti].position);

        self.hub.publish(
            board_id,
            ChangeEvent::TaskMoved {
                task_id,
                from_column,
                to_column: target_column,
                from_position,
                to_position,
                actor,
            },
        );
        Ok(())
    }

    async fn delete_task(&self, actor: UserId, task_id: TaskId) -> Result<(), StoreError> {
        self.require_session(actor).await?;

        let mut boards = self.boards.write().await;
        let (board_id, record) = board_of_task(&mut boards, task_id)?;
        record.require_editor(actor)?;
        let Some((ci, ti)) = record.locate_task(task_id) else {
            return Err(StoreError::NotFound("task".to_string()));
        };

        let removed = record.columns[ci].tasks.remove(ti);
        renumber_tasks(&mut record.columns[ci].tasks);

        self.hub.publish(
            board_id,
            ChangeEvent::TaskDeleted {
                task_id,
                title: removed.title,
                actor,
            },
        );
        Ok(())
    }

    async fn create_column(
        &self,
        actor: UserId,
        board_id: BoardId,
        title: &str,
    ) -> Result<Column, StoreError> {
        self.require_session(actor).await?;
        validate_column_title(title)?;

        let mut boards = self.boards.write().await;
        let record = boards
            .get_mut(&board_id)
            .ok_or_else(|| StoreError::NotFound("board".to_string()))?;
        record.require_editor(actor)?;
        if record.columns.len() >= MAX_COLUMNS {
            return Err(ValidationError::TooManyColumns { max: MAX_COLUMNS }.into());
        }

        let column = Column {
            id: ColumnId::new(),
            title: title.to_string(),
            color: None,
            position: insertion_position(record.columns.iter().map(|c| c.position)),
            tasks: Vec::new(),
        };
        record.columns.push(column.clone());

        self.hub.publish(
            board_id,
            ChangeEvent::ColumnCreated {
                column_id: column.id,
                title: column.title.clone(),
                actor,
            },
        );
        Ok(column)
    }

    async fn update_column(
        &self,
        actor: UserId,
        column_id: ColumnId,
        patch: ColumnPatch,
    ) -> Result<Column, StoreError> {
        self.require_session(actor).await?;
        if let Some(title) = &patch.title {
            validate_column_title(title)?;
        }

        let mut boards = self.boards.write().await;
        let (board_id, record) = board_of_column(&mut boards, column_id)?;
        record.require_editor(actor)?;
        let column = record
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| StoreError::NotFound("column".to_string()))?;
        patch.merge_into(column);
        let updated = column.clone();

        self.hub
            .publish(board_id, ChangeEvent::ColumnUpdated { column_id, actor });
        Ok(updated)
    }

    async fn delete_column(&self, actor: UserId, column_id: ColumnId) -> Result<(), StoreError> {
        self.require_session(actor).await?;

        let mut boards = self.boards.write().await;
        let (board_id, record) = board_of_column(&mut boards, column_id)?;
        record.require_editor(actor)?;

        let Some(idx) = record.columns.iter().position(|c| c.id == column_id) else {
            return Err(StoreError::NotFound("column".to_string()));
        };
        let removed = record.columns.remove(idx);
        renumber_columns(&mut record.columns);

        self.hub.publish(
            board_id,
            ChangeEvent::ColumnDeleted {
                column_id,
                title: removed.title,
                actor,
            },
        );
        Ok(())
    }

    async fn reorder_columns(
        &self,
        actor: UserId,
        board_id: BoardId,
        ordered: &[ColumnId],
    ) -> Result<(), StoreError> {
        self.require_session(actor).await?;

        let mut boards = self.boards.write().await;
        let record = boards
            .get_mut(&board_id)
            .ok_or_else(|| StoreError::NotFound("board".to_string()))?;
        record.require_editor(actor)?;

        // The given order must be a permutation of the board's columns.
        let complete = ordered.len() == record.columns.len()
            && record.columns.iter().all(|c| ordered.contains(&c.id))
            && ordered.iter().all(|id| record.columns.iter().any(|c| c.id == *id));
        if !complete {
            return Err(StoreError::NotFound("column".to_string()));
        }

        record
            .columns
            .sort_by_key(|c| ordered.iter().position(|id| *id == c.id));
        renumber_columns(&mut record.columns);

        self.hub
            .publish(board_id, ChangeEvent::ColumnsReordered { actor });
        Ok(())
    }

    async fn update_board(
        &self,
        actor: UserId,
        board_id: BoardId,
        patch: BoardPatch,
    ) -> Result<(), StoreError> {
        self.require_session(actor).await?;
        if let Some(title) = &patch.title {
            validate_board_title(title)?;
        }

        let mut boards = self.boards.write().await;
        let record = boards
            .get_mut(&board_id)
            .ok_or_else(|| StoreError::NotFound("board".to_string()))?;
        record.require_editor(actor)?;

        if let Some(title) = &patch.title {
            record.title.clone_from(title);
        }
        patch.description.clone().apply_to(&mut record.description);

        self.hub
            .publish(board_id, ChangeEvent::BoardUpdated { actor });
        Ok(())
    }
}

/// Finds the board containing a task, for operations keyed by task id only.
fn board_of_task(
    boards: &mut HashMap<BoardId, BoardRecord>,
    task_id: TaskId,
) -> Result<(BoardId, &mut BoardRecord), StoreError> {
    boards
        .iter_mut()
        .find(|(_, record)| record.locate_task(task_id).is_some())
        .map(|(id, record)| (*id, record))
        .ok_or_else(|| StoreError::NotFound("task".to_string()))
}

/// Finds the board containing a column.
fn board_of_column(
    boards: &mut HashMap<BoardId, BoardRecord>,
    column_id: ColumnId,
) -> Result<(BoardId, &mut BoardRecord), StoreError> {
    boards
        .iter_mut()
        .find(|(_, record)| record.columns.iter().any(|c| c.id == column_id))
        .map(|(id, record)| (*id, record))
        .ok_or_else(|| StoreError::NotFound("column".to_string()))
}
