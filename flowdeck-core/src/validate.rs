//! Input validation rules shared by the client and the board store.

use thiserror::Error;

/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 255;

/// Maximum allowed column title length in characters.
pub const MAX_COLUMN_TITLE_LENGTH: usize = 100;

/// Maximum allowed board title length in characters.
pub const MAX_BOARD_TITLE_LENGTH: usize = 50;

/// Maximum number of columns on one board.
pub const MAX_COLUMNS: usize = 8;

/// Errors for malformed user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Title cannot be empty.
    #[error("title cannot be empty")]
    TitleEmpty,
    /// Title exceeds the maximum length.
    #[error("title too long (max {max} characters)")]
    TitleTooLong {
        /// The limit that was exceeded.
        max: usize,
    },
    /// The board already has the maximum number of columns.
    #[error("board already has the maximum of {max} columns")]
    TooManyColumns {
        /// The column cap.
        max: usize,
    },
}

fn validate_title(title: &str, max: usize) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::TitleEmpty);
    }
    if title.chars().count() > max {
        return Err(ValidationError::TitleTooLong { max });
    }
    Ok(())
}

/// Validates a task title.
///
/// # Errors
///
/// Returns [`ValidationError::TitleEmpty`] or
/// [`ValidationError::TitleTooLong`].
pub fn validate_task_title(title: &str) -> Result<(), ValidationError> {
    validate_title(title, MAX_TASK_TITLE_LENGTH)
}

/// Validates a column title.
///
/// # Errors
///
/// Returns [`ValidationError::TitleEmpty`] or
/// [`ValidationError::TitleTooLong`].
pub fn validate_column_title(title: &str) -> Result<(), ValidationError> {
    validate_title(title, MAX_COLUMN_TITLE_LENGTH)
}

/// Validates a board title.
///
/// # Errors
///
/// Returns [`ValidationError::TitleEmpty`] or
/// [`ValidationError::TitleTooLong`].
pub fn validate_board_title(title: &str) -> Result<(), ValidationError> {
    validate_title(title, MAX_BOARD_TITLE_LENGTH)
}
