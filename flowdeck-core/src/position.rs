//! Dense position maintenance for ordered containers.
//!
//! Both the client-side reducer and the server-side store keep the same
//! invariant: within a container, `position` values are exactly `0..n-1`
//! in sequence order. These helpers re-derive that invariant after every
//! splice. A full rewrite of all siblings is deliberate — simplicity over
//! write-minimization.

use crate::model::{Column, Task};

/// Renumbers a column's task positions densely in sequence order.
pub fn renumber_tasks(tasks: &mut [Task]) {
    for (index, task) in tasks.iter_mut().enumerate() {
        task.position = index;
    }
}

/// Renumbers a board's column positions densely in sequence order.
pub fn renumber_columns(columns: &mut [Column]) {
    for (index, column) in columns.iter_mut().enumerate() {
        column.position = index;
    }
}

/// Inserts an item at `index`, clamped to the sequence length.
///
/// A drag gesture can legitimately target one past the end (drop at the
/// bottom of a column), and a stale index past that is treated as "append"
/// rather than a fault.
pub fn insert_clamped<T>(items: &mut Vec<T>, index: usize, item: T) {
    let index = index.min(items.len());
    items.insert(index, item);
}

/// Position for a new entity appended to a container: max sibling
/// position + 1, or 0 for an empty container.
///
/// Robust against temporarily non-dense sibling positions (e.g. a
/// half-repaired container); equals `len` whenever the container is dense.
#[must_use]
pub fn insertion_position(sibling_positions: impl Iterator<Item = usize>) -> usize {
    sibling_positions.max().map_or(0, |max| max + 1)
}

/// Whether a container's positions are exactly `0..n-1` in sequence order.
#[must_use]
pub fn is_dense(positions: &[usize]) -> bool {
    positions.iter().enumerate().all(|(index, &p)| p == index)
}
