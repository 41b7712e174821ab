use std::sync::Arc;

use board_protocol::{Task, UpdateTaskRequest};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    api::{BoardApi, ClientError},
    command::{Outcome, Rollback, TaskCommand},
    dashboard::DashboardStats,
    reorder::plan_move,
    store::{BoardStore, LoadState},
    view::{ColumnGroups, TaskQuery},
};

/// One board view: a store plus the API it reconciles against.
///
/// The store lock is only taken around local edits, never across a request,
/// so concurrent commands and polls interleave and the last response wins.
pub struct BoardSession<A> {
    api: Arc<A>,
    board_id: Uuid,
    store: Arc<RwLock<BoardStore>>,
}

impl<A> Clone for BoardSession<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            board_id: self.board_id,
            store: Arc::clone(&self.store),
        }
    }
}

impl<A: BoardApi> BoardSession<A> {
    pub fn new(api: Arc<A>, board_id: Uuid) -> Self {
        Self {
            api,
            board_id,
            store: Arc::new(RwLock::new(BoardStore::new())),
        }
    }

    pub fn board_id(&self) -> Uuid {
        self.board_id
    }

    pub async fn state(&self) -> LoadState {
        self.store.read().await.state()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.store.read().await.tasks().to_vec()
    }

    pub async fn in_flight(&self) -> usize {
        self.store.read().await.in_flight()
    }

    pub async fn view(&self, query: &TaskQuery) -> ColumnGroups {
        query.apply(self.store.read().await.tasks())
    }

    pub async fn stats(&self) -> DashboardStats {
        DashboardStats::from_tasks(self.store.read().await.tasks())
    }

    /// First load, with a visible loading state.
    pub async fn load(&self) -> Result<LoadState, ClientError> {
        self.store.write().await.begin_load();
        let result = self.fetch().await;
        if let Err(err) = &result {
            tracing::error!("Failed to load board {}: {err}", self.board_id);
            self.store.write().await.fail_load();
        }
        result
    }

    /// Silent re-fetch used by polling and by `Rollback::Refetch`.
    pub async fn refresh(&self) -> Result<LoadState, ClientError> {
        self.fetch().await
    }

    async fn fetch(&self) -> Result<LoadState, ClientError> {
        match self.api.get_board(self.board_id).await {
            Ok(detail) => {
                let mut store = self.store.write().await;
                store.apply_snapshot(detail);
                Ok(store.state())
            }
            Err(err) if err.is_not_found() => {
                let mut store = self.store.write().await;
                store.mark_not_found();
                Ok(store.state())
            }
            Err(err) => Err(err),
        }
    }

    pub async fn execute(&self, command: TaskCommand) -> Result<Outcome, ClientError> {
        self.store.write().await.begin_mutation();
        let result = self.run(&command).await;
        self.store.write().await.end_mutation();

        if let Err(err) = &result {
            tracing::error!("Failed to {}: {err}", command.name());
            match command.rollback() {
                Rollback::Refetch => {
                    if let Err(refresh_err) = self.refresh().await {
                        tracing::warn!("Re-fetch after failed {} failed: {refresh_err}", command.name());
                    }
                }
                Rollback::None | Rollback::KeepUntilPoll => {}
            }
        }
        result
    }

    async fn run(&self, command: &TaskCommand) -> Result<Outcome, ClientError> {
        match command {
            TaskCommand::SetStatus { id, status } => {
                let status = *status;
                self.apply_local(*id, |task| task.status = status).await?;
                self.save(*id, &UpdateTaskRequest::status(status)).await
            }
            TaskCommand::SetPriority { id, priority } => {
                let priority = *priority;
                self.apply_local(*id, |task| task.priority = priority).await?;
                self.save(*id, &UpdateTaskRequest::priority(priority)).await
            }
            TaskCommand::Edit { id, changes } => self.save(*id, changes).await,
            TaskCommand::Create(request) => {
                let mut request = request.clone();
                request.board_id = Some(self.board_id.to_string());
                let task = self.api.create_task(&request).await?;
                self.store.write().await.insert_task(task);
                Ok(Outcome::Applied)
            }
            TaskCommand::Delete { id } => {
                self.api.delete_task(*id).await?;
                self.store.write().await.remove_task(*id);
                Ok(Outcome::Applied)
            }
            TaskCommand::Move { from, to } => {
                let plan = {
                    let mut store = self.store.write().await;
                    let Some(plan) = plan_move(store.tasks(), *from, *to) else {
                        return Ok(Outcome::Unchanged);
                    };
                    store.replace_tasks(plan.tasks.clone());
                    plan
                };
                self.api.reorder_tasks(&plan.entries).await?;
                Ok(Outcome::Applied)
            }
        }
    }

    async fn apply_local(&self, id: Uuid, edit: impl FnOnce(&mut Task)) -> Result<(), ClientError> {
        if self.store.write().await.modify_task(id, edit) {
            Ok(())
        } else {
            Err(ClientError::NotFound("Task not found".to_string()))
        }
    }

    /// Sends a patch and stores the server's canonical copy of the task.
    async fn save(&self, id: Uuid, changes: &UpdateTaskRequest) -> Result<Outcome, ClientError> {
        let updated = self.api.update_task(id, changes).await?;
        self.store.write().await.upsert_task(updated);
        Ok(Outcome::Applied)
    }
}
