use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use board_protocol::{
    Board, BoardDetail, CreateBoardRequest, CreateTaskRequest, ReorderEntry, Task, TaskStatus,
    UpdateBoardRequest, UpdateTaskRequest,
    validate::{validate_create_board, validate_create_task, validate_update_task},
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::api::{BoardApi, ClientError};

pub fn sample_board(name: &str) -> Board {
    let now = Utc::now();
    Board {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        color: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_task(board_id: Uuid, title: &str, status: TaskStatus, order: i32) -> Task {
    let now = Utc::now();
    Task {
        id: Uuid::new_v4(),
        board_id,
        title: title.to_string(),
        description: None,
        status,
        priority: Default::default(),
        order,
        due_date: None,
        created_at: now,
        updated_at: now,
    }
}

/// In-memory stand-in for the HTTP API with switchable failures.
#[derive(Default)]
pub struct FakeApi {
    boards: Mutex<Vec<Board>>,
    tasks: Mutex<HashMap<Uuid, Task>>,
    pub fail_mutations: AtomicBool,
    pub fail_reads: AtomicBool,
    pub board_fetches: AtomicUsize,
    pub reorder_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_board(board: Board, tasks: Vec<Task>) -> Self {
        let api = Self::default();
        api.boards.lock().unwrap().push(board);
        let mut stored = api.tasks.lock().unwrap();
        for task in tasks {
            stored.insert(task.id, task);
        }
        drop(stored);
        api
    }

    pub fn stored_task(&self, id: Uuid) -> Option<Task> {
        self.tasks.lock().unwrap().get(&id).cloned()
    }

    /// Simulates a change made by another client.
    pub fn put_task(&self, task: Task) {
        self.tasks.lock().unwrap().insert(task.id, task);
    }

    fn check_mutation(&self) -> Result<(), ClientError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ClientError::Rejected {
                status: 500,
                message: "Internal server error".to_string(),
            });
        }
        Ok(())
    }

    fn check_read(&self) -> Result<(), ClientError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Rejected {
                status: 500,
                message: "Failed to fetch board".to_string(),
            });
        }
        Ok(())
    }

    fn detail(&self, board: &Board) -> BoardDetail {
        let mut tasks: Vec<Task> = self
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|task| task.board_id == board.id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.order.cmp(&b.order).then(b.created_at.cmp(&a.created_at)));
        BoardDetail::new(board.clone(), tasks)
    }

    fn not_found(what: &str) -> ClientError {
        ClientError::NotFound(format!("{what} not found"))
    }
}

#[async_trait]
impl BoardApi for FakeApi {
    async fn list_boards(&self) -> Result<Vec<BoardDetail>, ClientError> {
        self.check_read()?;
        let boards = self.boards.lock().unwrap().clone();
        Ok(boards.iter().rev().map(|board| self.detail(board)).collect())
    }

    async fn get_board(&self, id: Uuid) -> Result<BoardDetail, ClientError> {
        self.board_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        let board = self
            .boards
            .lock()
            .unwrap()
            .iter()
            .find(|board| board.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Board"))?;
        Ok(self.detail(&board))
    }

    async fn create_board(&self, req: &CreateBoardRequest) -> Result<BoardDetail, ClientError> {
        self.check_mutation()?;
        let data = validate_create_board(req).map_err(|err| ClientError::Rejected {
            status: 400,
            message: err.to_string(),
        })?;
        let mut board = sample_board(&data.name);
        board.description = data.description;
        board.color = data.color;
        self.boards.lock().unwrap().push(board.clone());
        Ok(BoardDetail::new(board, Vec::new()))
    }

    async fn update_board(
        &self,
        id: Uuid,
        req: &UpdateBoardRequest,
    ) -> Result<BoardDetail, ClientError> {
        self.check_mutation()?;
        let updated = {
            let mut boards = self.boards.lock().unwrap();
            let board = boards
                .iter_mut()
                .find(|board| board.id == id)
                .ok_or_else(|| Self::not_found("Board"))?;
            if let Some(Some(name)) = &req.name {
                board.name = name.trim().to_string();
            }
            if let Some(description) = &req.description {
                board.description = description.clone();
            }
            board.clone()
        };
        Ok(self.detail(&updated))
    }

    async fn delete_board(&self, id: Uuid) -> Result<(), ClientError> {
        self.check_mutation()?;
        let mut boards = self.boards.lock().unwrap();
        let before = boards.len();
        boards.retain(|board| board.id != id);
        if boards.len() == before {
            return Err(Self::not_found("Board"));
        }
        self.tasks.lock().unwrap().retain(|_, task| task.board_id != id);
        Ok(())
    }

    async fn list_tasks(&self, board_id: Uuid) -> Result<Vec<Task>, ClientError> {
        self.check_read()?;
        let mut tasks: Vec<Task> = self
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|task| task.board_id == board_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn create_task(&self, req: &CreateTaskRequest) -> Result<Task, ClientError> {
        self.check_mutation()?;
        let data = validate_create_task(req).map_err(|err| ClientError::Rejected {
            status: 400,
            message: err.to_string(),
        })?;
        let mut task = sample_task(data.board_id, &data.title, data.status, 0);
        task.priority = data.priority;
        task.description = data.description;
        task.due_date = data.due_date;
        task.created_at += Duration::milliseconds(1);
        self.put_task(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, req: &UpdateTaskRequest) -> Result<Task, ClientError> {
        self.check_mutation()?;
        let changes = validate_update_task(req).map_err(|err| ClientError::Rejected {
            status: 400,
            message: err.to_string(),
        })?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks.get_mut(&id).ok_or_else(|| Self::not_found("Task"))?;
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = due_date;
        }
        if let Some(order) = changes.order {
            task.order = order;
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        self.check_mutation()?;
        self.tasks
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("Task"))
    }

    async fn reorder_tasks(&self, entries: &[ReorderEntry]) -> Result<(), ClientError> {
        self.reorder_calls.fetch_add(1, Ordering::SeqCst);
        self.check_mutation()?;
        let mut tasks = self.tasks.lock().unwrap();
        if entries.iter().any(|entry| !tasks.contains_key(&entry.id)) {
            return Err(Self::not_found("Task"));
        }
        for entry in entries {
            if let Some(task) = tasks.get_mut(&entry.id) {
                task.status = entry.status;
                task.order = entry.order;
            }
        }
        Ok(())
    }
}
