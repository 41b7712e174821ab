use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{serde_helpers::deserialize_some, task::Task};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct BoardCounts {
    #[ts(type = "number")]
    pub tasks: u64,
}

/// A board together with its tasks, as returned by the board endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct BoardDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub board: Board,
    pub tasks: Vec<Task>,
    pub counts: BoardCounts,
}

impl BoardDetail {
    pub fn new(board: Board, tasks: Vec<Task>) -> Self {
        let counts = BoardCounts {
            tasks: tasks.len() as u64,
        };
        Self {
            board,
            tasks,
            counts,
        }
    }
}

impl std::ops::Deref for BoardDetail {
    type Target = Board;
    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

impl std::ops::DerefMut for BoardDetail {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.board
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CreateBoardRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CreateBoardRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Body of `PATCH /boards/{id}`. Color is fixed at creation and not accepted here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateBoardRequest {
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoard {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub error: String,
}
