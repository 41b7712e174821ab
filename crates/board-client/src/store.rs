use board_protocol::{Board, BoardDetail, Task};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    NotFound,
}

/// Local copy of one board and its tasks.
///
/// `in_flight` counts mutations awaiting a response and is independent of
/// `state`: a loaded board can be mutating, and a poll can land mid-mutation.
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    state: LoadState,
    board: Option<Board>,
    tasks: Vec<Task>,
    in_flight: usize,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_mutating(&self) -> bool {
        self.in_flight > 0
    }

    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    /// A failed first load leaves nothing to show.
    pub fn fail_load(&mut self) {
        if self.state == LoadState::Loading {
            self.state = if self.board.is_some() {
                LoadState::Loaded
            } else {
                LoadState::Idle
            };
        }
    }

    /// Overwrites local state with a full fetch. Last fetch wins.
    pub fn apply_snapshot(&mut self, detail: BoardDetail) {
        self.board = Some(detail.board);
        self.tasks = detail.tasks;
        self.state = LoadState::Loaded;
    }

    pub fn mark_not_found(&mut self) {
        self.board = None;
        self.tasks.clear();
        self.state = LoadState::NotFound;
    }

    /// Replaces the task with the same id. Returns false when it is not present.
    pub fn upsert_task(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// New tasks go first, matching the server's newest-first listing.
    pub fn insert_task(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    pub fn remove_task(&mut self, id: Uuid) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Applies `edit` to a task in place. Returns false when it is not present.
    pub fn modify_task(&mut self, id: Uuid, edit: impl FnOnce(&mut Task)) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                edit(task);
                true
            }
            None => false,
        }
    }

    pub fn begin_mutation(&mut self) {
        self.in_flight += 1;
    }

    pub fn end_mutation(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}
