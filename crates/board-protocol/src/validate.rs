//! Input checks shared by every mutating entry point.
//!
//! Each function turns a loosely typed request body into the validated value
//! the storage layer accepts. Failures carry the precise, client-facing reason.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    board::{BoardChanges, CreateBoardRequest, NewBoard, UpdateBoardRequest},
    task::{CreateTaskRequest, NewTask, TaskChanges, TaskPriority, TaskStatus, UpdateTaskRequest},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Board name is required")]
    MissingBoardName,
    #[error("Board name cannot be empty")]
    EmptyBoardName,
    #[error("boardId is required")]
    MissingBoardId,
    /// The referenced board id cannot exist (not a UUID); reported as not found.
    #[error("Board not found")]
    UnknownBoard,
    #[error("Task title is required")]
    MissingTitle,
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("Status must be one of: {}", TaskStatus::valid_values())]
    InvalidStatus,
    #[error("Priority must be one of: {}", TaskPriority::valid_values())]
    InvalidPriority,
    #[error("Invalid due date: {0}")]
    InvalidDueDate(String),
}

/// Trims and drops empty strings.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn required_text(value: Option<&str>) -> Option<String> {
    normalize_optional(value)
}

/// Only a missing or empty value counts as absent; anything else is taken verbatim.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

pub fn validate_create_board(req: &CreateBoardRequest) -> Result<NewBoard, ValidationError> {
    let name = required_text(req.name.as_deref()).ok_or(ValidationError::MissingBoardName)?;
    Ok(NewBoard {
        name,
        description: normalize_optional(req.description.as_deref()),
        color: non_empty(req.color.as_deref()).map(str::to_string),
    })
}

pub fn validate_update_board(req: &UpdateBoardRequest) -> Result<BoardChanges, ValidationError> {
    let name = match &req.name {
        None => None,
        Some(value) => Some(
            required_text(value.as_deref()).ok_or(ValidationError::EmptyBoardName)?,
        ),
    };
    let description = req
        .description
        .as_ref()
        .map(|value| normalize_optional(value.as_deref()));
    Ok(BoardChanges { name, description })
}

pub fn validate_create_task(req: &CreateTaskRequest) -> Result<NewTask, ValidationError> {
    let board_ref =
        required_text(req.board_id.as_deref()).ok_or(ValidationError::MissingBoardId)?;
    let title = required_text(req.title.as_deref()).ok_or(ValidationError::MissingTitle)?;

    let status = match non_empty(req.status.as_deref()) {
        Some(raw) => TaskStatus::parse(raw)?,
        None => TaskStatus::default(),
    };
    let priority = match non_empty(req.priority.as_deref()) {
        Some(raw) => TaskPriority::parse(raw)?,
        None => TaskPriority::default(),
    };
    let due_date = parse_due_date(req.due_date.as_deref())?;
    let board_id = Uuid::parse_str(&board_ref).map_err(|_| ValidationError::UnknownBoard)?;

    Ok(NewTask {
        board_id,
        title,
        description: normalize_optional(req.description.as_deref()),
        status,
        priority,
        due_date,
    })
}

pub fn validate_update_task(req: &UpdateTaskRequest) -> Result<TaskChanges, ValidationError> {
    let title = match &req.title {
        None => None,
        Some(value) => Some(required_text(value.as_deref()).ok_or(ValidationError::EmptyTitle)?),
    };
    let status = match &req.status {
        None => None,
        Some(value) => Some(TaskStatus::parse(
            value.as_deref().ok_or(ValidationError::InvalidStatus)?,
        )?),
    };
    let priority = match &req.priority {
        None => None,
        Some(value) => Some(TaskPriority::parse(
            value.as_deref().ok_or(ValidationError::InvalidPriority)?,
        )?),
    };
    let due_date = match &req.due_date {
        None => None,
        Some(value) => Some(parse_due_date(value.as_deref())?),
    };

    Ok(TaskChanges {
        title,
        description: req
            .description
            .as_ref()
            .map(|value| normalize_optional(value.as_deref())),
        status,
        priority,
        due_date,
        order: req.order,
    })
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM[:SS]` values and plain
/// `YYYY-MM-DD` dates (midnight UTC). Absent or blank input means no due date.
pub fn parse_due_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(parsed.and_utc()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(Some(midnight.and_utc()));
    }

    Err(ValidationError::InvalidDueDate(raw.to_string()))
}
