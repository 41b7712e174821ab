use std::{fmt::Display, future::Future};

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use db::models::{board, task};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

async fn fetch_model<M, E, Fut>(
    model_name: &'static str,
    model_id: Uuid,
    load_future: Fut,
) -> Result<M, ApiError>
where
    E: Display,
    Fut: Future<Output = Result<Option<M>, E>>,
{
    match load_future.await {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            tracing::warn!("{model_name} {model_id} not found");
            Err(ApiError::NotFound(format!("{model_name} not found")))
        }
        Err(error) => {
            tracing::error!("Failed to fetch {model_name} {model_id}: {error}");
            Err(ApiError::Internal(format!("Failed to fetch {}", model_name.to_lowercase())))
        }
    }
}

/// Unparseable ids cannot name a stored row, so they read as not found.
fn parse_id(model_name: &'static str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        tracing::warn!("{model_name} {raw:?} not found (malformed id)");
        ApiError::NotFound(format!("{model_name} not found"))
    })
}

async fn load_request_extension<M, E, Fut>(
    mut request: Request,
    next: Next,
    model_name: &'static str,
    model_id: Uuid,
    load_future: Fut,
) -> Result<Response, ApiError>
where
    M: Clone + Send + Sync + 'static,
    E: Display,
    Fut: Future<Output = Result<Option<M>, E>>,
{
    let model = fetch_model(model_name, model_id, load_future).await?;
    request.extensions_mut().insert(model);
    Ok(next.run(request).await)
}

pub async fn load_board_middleware(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let board_id = parse_id("Board", &board_id)?;
    load_request_extension(
        request,
        next,
        "Board",
        board_id,
        board::find_by_id(&state.db().pool, board_id),
    )
    .await
}

pub async fn load_task_middleware(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let task_id = parse_id("Task", &task_id)?;
    load_request_extension(
        request,
        next,
        "Task",
        task_id,
        task::find_by_id(&state.db().pool, task_id),
    )
    .await
}
