use axum::{
    Extension, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, patch},
};
use board_protocol::{
    CreateTaskRequest, MessageResponse, OkResponse, ReorderEntry, Task, UpdateTaskRequest,
    validate::{validate_create_task, validate_update_task},
};
use db::{TransactionTrait, models::task};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, FailedAs},
    extract::ApiJson,
    middleware::load_task_middleware,
};

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    #[serde(rename = "boardId")]
    pub board_id: Option<String>,
}

pub async fn get_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<ResponseJson<Vec<Task>>, ApiError> {
    let raw = query
        .board_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("boardId query parameter is required".to_string()))?;
    let board_id = Uuid::parse_str(raw)
        .map_err(|_| ApiError::NotFound("Board not found".to_string()))?;

    let tasks = task::find_by_board_id(&state.db().pool, board_id)
        .await
        .failed_as("Failed to fetch tasks")?;
    Ok(ResponseJson(tasks))
}

pub async fn get_task(Extension(task): Extension<Task>) -> ResponseJson<Task> {
    ResponseJson(task)
}

pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, ResponseJson<Task>), ApiError> {
    let data = validate_create_task(&payload)?;
    tracing::debug!("Creating task '{}' in board {}", data.title, data.board_id);

    let created = task::create(&state.db().pool, &data, Uuid::new_v4())
        .await
        .failed_as("Failed to create task")?;
    Ok((StatusCode::CREATED, ResponseJson(created)))
}

pub async fn update_task(
    Extension(existing): Extension<Task>,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UpdateTaskRequest>,
) -> Result<ResponseJson<Task>, ApiError> {
    let changes = validate_update_task(&payload)?;
    let updated = task::update(&state.db().pool, existing.id, &changes)
        .await
        .failed_as("Failed to update task")?;
    Ok(ResponseJson(updated))
}

pub async fn delete_task(
    Extension(existing): Extension<Task>,
    State(state): State<AppState>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    task::delete(&state.db().pool, existing.id)
        .await
        .failed_as("Failed to delete task")?;

    tracing::info!("Deleted task {} from board {}", existing.id, existing.board_id);
    Ok(ResponseJson(MessageResponse::new("Task deleted successfully")))
}

/// Entries are decoded one by one so a bad element is reported by position.
fn parse_reorder_entries(body: &Value) -> Result<Vec<ReorderEntry>, ApiError> {
    let items = body
        .get("tasks")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::BadRequest("tasks array is required".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<ReorderEntry>(item.clone()).map_err(|err| {
                ApiError::BadRequest(format!("Invalid reorder entry at index {index}: {err}"))
            })
        })
        .collect()
}

pub async fn reorder_tasks(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<ResponseJson<OkResponse>, ApiError> {
    let entries = parse_reorder_entries(&body)?;

    let tx = state
        .db()
        .pool
        .begin()
        .await
        .failed_as("Failed to reorder tasks")?;
    task::reorder(&tx, &entries)
        .await
        .failed_as("Failed to reorder tasks")?;
    tx.commit().await.failed_as("Failed to reorder tasks")?;

    tracing::info!("Reordered {} tasks", entries.len());
    Ok(ResponseJson(OkResponse { ok: true }))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let task_id_router = Router::new()
        .route("/", get(get_task).patch(update_task).delete(delete_task))
        .layer(from_fn_with_state(state.clone(), load_task_middleware));

    let inner = Router::new()
        .route("/", get(get_tasks).post(create_task))
        .route("/reorder", patch(reorder_tasks))
        .nest("/{task_id}", task_id_router);

    Router::new().nest("/tasks", inner)
}
