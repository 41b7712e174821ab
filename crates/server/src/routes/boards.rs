use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use board_protocol::{
    Board, BoardDetail, CreateBoardRequest, MessageResponse, UpdateBoardRequest,
    validate::{validate_create_board, validate_update_board},
};
use db::{TransactionTrait, models::board};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, FailedAs},
    extract::ApiJson,
    middleware::load_board_middleware,
};

pub async fn list_boards(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<BoardDetail>>, ApiError> {
    let boards = board::find_all_with_tasks(&state.db().pool)
        .await
        .failed_as("Failed to fetch boards")?;
    Ok(ResponseJson(boards))
}

pub async fn create_board(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateBoardRequest>,
) -> Result<(StatusCode, ResponseJson<BoardDetail>), ApiError> {
    let data = validate_create_board(&payload)?;
    tracing::debug!("Creating board '{}'", data.name);

    let created = board::create(&state.db().pool, &data, Uuid::new_v4())
        .await
        .failed_as("Failed to create board")?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(BoardDetail::new(created, Vec::new())),
    ))
}

async fn load_detail(state: &AppState, board_id: Uuid) -> Result<BoardDetail, ApiError> {
    board::find_detail(&state.db().pool, board_id)
        .await
        .failed_as("Failed to fetch board")?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))
}

pub async fn get_board(
    Extension(board): Extension<Board>,
    State(state): State<AppState>,
) -> Result<ResponseJson<BoardDetail>, ApiError> {
    Ok(ResponseJson(load_detail(&state, board.id).await?))
}

pub async fn update_board(
    Extension(existing): Extension<Board>,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UpdateBoardRequest>,
) -> Result<ResponseJson<BoardDetail>, ApiError> {
    let changes = validate_update_board(&payload)?;
    board::update(&state.db().pool, existing.id, &changes)
        .await
        .failed_as("Failed to update board")?;
    Ok(ResponseJson(load_detail(&state, existing.id).await?))
}

pub async fn delete_board(
    Extension(existing): Extension<Board>,
    State(state): State<AppState>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    let tx = state
        .db()
        .pool
        .begin()
        .await
        .failed_as("Failed to delete board")?;
    board::delete(&tx, existing.id)
        .await
        .failed_as("Failed to delete board")?;
    tx.commit().await.failed_as("Failed to delete board")?;

    tracing::info!("Deleted board {} ('{}')", existing.id, existing.name);
    Ok(ResponseJson(MessageResponse::new("Board deleted successfully")))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let board_id_router = Router::new()
        .route("/", get(get_board).patch(update_board).delete(delete_board))
        .layer(from_fn_with_state(state.clone(), load_board_middleware));

    let inner = Router::new()
        .route("/", get(list_boards).post(create_board))
        .nest("/{board_id}", board_id_router);

    Router::new().nest("/boards", inner)
}
