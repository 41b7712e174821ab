use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use board_protocol::{ErrorResponse, ValidationError};
use db::{
    DbErr,
    models::{board::BoardError, task::TaskError},
};
use thiserror::Error;

const GENERIC_SERVER_ERROR: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Database(#[from] DbErr),
    /// A server-side failure reported to the client under a fixed per-operation message.
    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        #[source]
        source: Box<ApiError>,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(ValidationError::UnknownBoard) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Board(BoardError::BoardNotFound) => StatusCode::NOT_FOUND,
            ApiError::Task(TaskError::TaskNotFound | TaskError::BoardNotFound) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Board(BoardError::Database(_))
            | ApiError::Task(TaskError::Database(_))
            | ApiError::Database(_)
            | ApiError::Storage { .. }
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Text sent to the client. Server errors never echo their cause.
    fn client_message(&self) -> String {
        match self {
            ApiError::Storage { message, .. } => (*message).to_string(),
            ApiError::Internal(message) => message.clone(),
            _ if self.status().is_server_error() => GENERIC_SERVER_ERROR.to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status();
        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error = %self,
                "API request failed"
            );
        }
        let body = ErrorResponse {
            error: self.client_message(),
        };
        (status_code, Json(body)).into_response()
    }
}

/// Attaches the per-operation message that replaces server-side failure details.
pub trait FailedAs<T> {
    fn failed_as(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T, E> FailedAs<T> for Result<T, E>
where
    E: Into<ApiError>,
{
    fn failed_as(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|err| {
            let err = err.into();
            if err.status().is_server_error() {
                ApiError::Storage {
                    message,
                    source: Box::new(err),
                }
            } else {
                err
            }
        })
    }
}
