//! Drag-and-drop reordering across the three status columns.

use board_protocol::{ReorderEntry, Task, TaskStatus};

/// A slot in a column: the column's status and a 0-based index into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPosition {
    pub status: TaskStatus,
    pub index: usize,
}

impl ColumnPosition {
    pub fn new(status: TaskStatus, index: usize) -> Self {
        Self { status, index }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    /// The recomputed task list, columns in display order.
    pub tasks: Vec<Task>,
    /// Dense `(id, status, order)` assignment for every task on the board.
    pub entries: Vec<ReorderEntry>,
    previous: Vec<ReorderEntry>,
}

impl ReorderPlan {
    /// Only the entries whose status or order differ from before the move.
    pub fn changed_entries(&self) -> Vec<ReorderEntry> {
        self.entries
            .iter()
            .filter(|entry| !self.previous.contains(entry))
            .copied()
            .collect()
    }
}

fn columns(tasks: &[Task]) -> [Vec<Task>; 3] {
    let mut columns: [Vec<Task>; 3] = Default::default();
    for task in tasks {
        columns[task.status.index()].push(task.clone());
    }
    // Stable: equal orders keep their incoming relative position.
    for column in &mut columns {
        column.sort_by_key(|task| task.order);
    }
    columns
}

/// Moves the task at `from` to `to` and renumbers every column densely.
///
/// Returns `None` when nothing would change: dropping a task back onto its own
/// slot, or a `from` index that names no task.
pub fn plan_move(tasks: &[Task], from: ColumnPosition, to: ColumnPosition) -> Option<ReorderPlan> {
    if from == to {
        return None;
    }

    let mut columns = columns(tasks);
    let source = &mut columns[from.status.index()];
    if from.index >= source.len() {
        return None;
    }
    let mut moved = source.remove(from.index);
    moved.status = to.status;

    let destination = &mut columns[to.status.index()];
    let index = to.index.min(destination.len());
    destination.insert(index, moved);

    let previous = tasks
        .iter()
        .map(|task| ReorderEntry {
            id: task.id,
            status: task.status,
            order: task.order,
        })
        .collect();

    let mut reordered = Vec::with_capacity(tasks.len());
    let mut entries = Vec::with_capacity(tasks.len());
    for status in TaskStatus::ALL {
        for (order, mut task) in std::mem::take(&mut columns[status.index()])
            .into_iter()
            .enumerate()
        {
            task.order = order as i32;
            entries.push(ReorderEntry {
                id: task.id,
                status,
                order: task.order,
            });
            reordered.push(task);
        }
    }

    Some(ReorderPlan {
        tasks: reordered,
        entries,
        previous,
    })
}

/// True when every column's orders are exactly `0..len`.
pub fn is_dense(tasks: &[Task]) -> bool {
    TaskStatus::ALL.iter().all(|&status| {
        let mut orders: Vec<i32> = tasks
            .iter()
            .filter(|task| task.status == status)
            .map(|task| task.order)
            .collect();
        orders.sort_unstable();
        orders.iter().enumerate().all(|(i, &order)| order == i as i32)
    })
}
