//! Filtered, sorted and column-grouped projections of a board's tasks.

use std::cmp::Ordering;

use board_protocol::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Priority,
    DueDate,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskQuery {
    pub filter: StatusFilter,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl TaskQuery {
    pub fn apply(&self, tasks: &[Task]) -> ColumnGroups {
        let mut selected = filter_tasks(tasks, self.filter);
        sort_tasks(&mut selected, self.sort, self.direction);
        group_by_status(selected)
    }
}

/// One task list per status, in `TaskStatus::ALL` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnGroups {
    columns: [Vec<Task>; 3],
}

impl ColumnGroups {
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        &self.columns[status.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> {
        TaskStatus::ALL
            .into_iter()
            .map(|status| (status, self.column(status)))
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn filter_tasks(tasks: &[Task], filter: StatusFilter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}

/// Stable sort by `field`.
pub fn sort_tasks(tasks: &mut [Task], field: SortField, direction: SortDirection) {
    tasks.sort_by(|a, b| compare(a, b, field, direction));
}

fn compare(a: &Task, b: &Task, field: SortField, direction: SortDirection) -> Ordering {
    match field {
        SortField::CreatedAt => direction
            .apply(a.created_at.cmp(&b.created_at).then(a.order.cmp(&b.order)))
            .then_with(|| a.id.cmp(&b.id)),
        SortField::Priority => direction.apply(a.priority.rank().cmp(&b.priority.rank())),
        // Undated tasks go last whichever way the dated ones run.
        SortField::DueDate => match (a.due_date, b.due_date) {
            (Some(a), Some(b)) => direction.apply(a.cmp(&b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortField::Title => direction.apply(a.title.trim().cmp(b.title.trim())),
    }
}

pub fn group_by_status(tasks: Vec<Task>) -> ColumnGroups {
    let mut groups = ColumnGroups::default();
    for task in tasks {
        groups.columns[task.status.index()].push(task);
    }
    groups
}
