//! Default column layout for freshly created boards.

/// Title and color of each default column, in display order.
pub const DEFAULT_COLUMNS: [(&str, &str); 4] = [
    ("To Do", "#6366f1"),
    ("In Progress", "#f59e0b"),
    ("Review", "#8b5cf6"),
    ("Done", "#10b981"),
];
