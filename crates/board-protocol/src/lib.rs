//! Wire types shared by the HTTP API and the client state layer.

pub mod board;
mod serde_helpers;
pub mod task;
pub mod validate;

pub use board::{
    Board, BoardChanges, BoardCounts, BoardDetail, CreateBoardRequest, ErrorResponse,
    MessageResponse, NewBoard, OkResponse, UpdateBoardRequest,
};
pub use task::{
    CreateTaskRequest, NewTask, ReorderEntry, ReorderRequest, Task, TaskChanges, TaskPriority,
    TaskStatus, UpdateTaskRequest,
};
pub use validate::ValidationError;
