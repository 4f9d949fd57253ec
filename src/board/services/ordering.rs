//! Column position bookkeeping.
//!
//! Positions within a column form a dense ascending sequence starting at
//! 1. New and restored tasks take the next free slot; removing a task
//! from a column renumbers the remainder to close the gap.

use crate::board::domain::{BoardColumn, Task};

/// Returns the next free position at the bottom of a column.
pub(crate) fn next_position(tasks: &[Task], column: BoardColumn) -> u32 {
    tasks
        .iter()
        .filter(|task| task.column() == column)
        .map(Task::position)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Returns the number of tasks currently in a column.
pub(crate) fn column_len(tasks: &[Task], column: BoardColumn) -> u32 {
    let count = tasks.iter().filter(|task| task.column() == column).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Reassigns positions 1..n across a column, preserving relative order.
pub(crate) fn renumber_column(tasks: &mut [Task], column: BoardColumn) {
    let mut entries: Vec<(usize, u32)> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.column() == column)
        .map(|(index, task)| (index, task.position()))
        .collect();
    entries.sort_by_key(|&(_, position)| position);

    for (rank, (index, _)) in entries.into_iter().enumerate() {
        let position = u32::try_from(rank).unwrap_or(u32::MAX).saturating_add(1);
        if let Some(task) = tasks.get_mut(index) {
            task.set_position(position);
        }
    }
}

/// Shifts the tasks between two positions of a column by one step toward
/// the vacated slot, then places the moved task at the target position.
///
/// `new_position` must already be clamped to `[1, column length]`.
pub(crate) fn shift_within_column(
    tasks: &mut [Task],
    column: BoardColumn,
    moved: crate::board::domain::TaskId,
    old_position: u32,
    new_position: u32,
) {
    for task in tasks.iter_mut().filter(|task| task.column() == column) {
        if task.id() == moved {
            continue;
        }
        let position = task.position();
        if new_position < old_position && position >= new_position && position < old_position {
            task.set_position(position.saturating_add(1));
        } else if new_position > old_position && position > old_position && position <= new_position
        {
            task.set_position(position.saturating_sub(1));
        }
    }
    if let Some(task) = tasks.iter_mut().find(|task| task.id() == moved) {
        task.set_position(new_position);
    }
}
