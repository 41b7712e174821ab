//! Board list session and the aggregate numbers shown above it.

use std::sync::Arc;

use board_protocol::{
    BoardDetail, CreateBoardRequest, Task, TaskPriority, TaskStatus, UpdateBoardRequest,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::{BoardApi, ClientError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    /// Indexed by `TaskStatus::index`.
    pub by_status: [usize; 3],
    /// In `TaskPriority::ALL` order.
    pub by_priority: [usize; 3],
    pub total: usize,
    pub completion_percent: u8,
}

impl DashboardStats {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            stats.by_status[task.status.index()] += 1;
            stats.by_priority[priority_slot(task.priority)] += 1;
            stats.total += 1;
        }
        stats.completion_percent = completion_percent(stats.status(TaskStatus::Done), stats.total);
        stats
    }

    pub fn from_boards(boards: &[BoardDetail]) -> Self {
        Self::from_tasks(boards.iter().flat_map(|board| board.tasks.iter()))
    }

    pub fn status(&self, status: TaskStatus) -> usize {
        self.by_status[status.index()]
    }

    pub fn priority(&self, priority: TaskPriority) -> usize {
        self.by_priority[priority_slot(priority)]
    }
}

fn priority_slot(priority: TaskPriority) -> usize {
    match priority {
        TaskPriority::Low => 0,
        TaskPriority::Medium => 1,
        TaskPriority::High => 2,
    }
}

fn completion_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (done as f64 * 100.0 / total as f64).round() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoardsOverview {
    pub boards: usize,
    pub total_tasks: u64,
    /// Rounded to one decimal place.
    pub average_per_board: f64,
}

impl BoardsOverview {
    pub fn from_boards(boards: &[BoardDetail]) -> Self {
        let total_tasks: u64 = boards.iter().map(|board| board.counts.tasks).sum();
        let average_per_board = if boards.is_empty() {
            0.0
        } else {
            (total_tasks as f64 / boards.len() as f64 * 10.0).round() / 10.0
        };
        Self {
            boards: boards.len(),
            total_tasks,
            average_per_board,
        }
    }
}

/// The board list, kept in newest-first order.
pub struct DashboardSession<A> {
    api: Arc<A>,
    boards: Arc<RwLock<Vec<BoardDetail>>>,
}

impl<A> Clone for DashboardSession<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            boards: Arc::clone(&self.boards),
        }
    }
}

impl<A: BoardApi> DashboardSession<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            boards: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn load(&self) -> Result<(), ClientError> {
        self.refresh().await.inspect_err(|err| {
            tracing::error!("Failed to load boards: {err}");
        })
    }

    pub async fn refresh(&self) -> Result<(), ClientError> {
        let boards = self.api.list_boards().await?;
        *self.boards.write().await = boards;
        Ok(())
    }

    pub async fn boards(&self) -> Vec<BoardDetail> {
        self.boards.read().await.clone()
    }

    pub async fn stats(&self) -> DashboardStats {
        DashboardStats::from_boards(&self.boards.read().await)
    }

    pub async fn overview(&self) -> BoardsOverview {
        BoardsOverview::from_boards(&self.boards.read().await)
    }

    pub async fn create_board(&self, req: &CreateBoardRequest) -> Result<BoardDetail, ClientError> {
        let created = self.api.create_board(req).await.inspect_err(|err| {
            tracing::error!("Failed to create board: {err}");
        })?;
        self.boards.write().await.insert(0, created.clone());
        Ok(created)
    }

    pub async fn update_board(
        &self,
        id: Uuid,
        req: &UpdateBoardRequest,
    ) -> Result<BoardDetail, ClientError> {
        let updated = self.api.update_board(id, req).await.inspect_err(|err| {
            tracing::error!("Failed to update board {id}: {err}");
        })?;
        if let Some(slot) = self
            .boards
            .write()
            .await
            .iter_mut()
            .find(|board| board.id == id)
        {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete_board(&self, id: Uuid) -> Result<(), ClientError> {
        self.api.delete_board(id).await.inspect_err(|err| {
            tracing::error!("Failed to delete board {id}: {err}");
        })?;
        self.boards.write().await.retain(|board| board.id != id);
        Ok(())
    }
}
