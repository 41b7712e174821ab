use board_protocol::{CreateTaskRequest, TaskPriority, TaskStatus, UpdateTaskRequest};
use uuid::Uuid;

use crate::reorder::ColumnPosition;

/// What happens to local state when a mutation's request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollback {
    /// Discard the optimistic guess by re-fetching the whole board.
    Refetch,
    /// Nothing was applied before the response, so there is nothing to undo.
    None,
    /// Keep the optimistic state; the next poll reconciles it.
    KeepUntilPoll,
}

/// A user mutation on the board's tasks.
#[derive(Debug, Clone)]
pub enum TaskCommand {
    SetStatus { id: Uuid, status: TaskStatus },
    SetPriority { id: Uuid, priority: TaskPriority },
    Edit { id: Uuid, changes: UpdateTaskRequest },
    Create(CreateTaskRequest),
    Delete { id: Uuid },
    Move { from: ColumnPosition, to: ColumnPosition },
}

impl TaskCommand {
    pub fn name(&self) -> &'static str {
        match self {
            TaskCommand::SetStatus { .. } => "set status",
            TaskCommand::SetPriority { .. } => "set priority",
            TaskCommand::Edit { .. } => "edit task",
            TaskCommand::Create(_) => "create task",
            TaskCommand::Delete { .. } => "delete task",
            TaskCommand::Move { .. } => "move task",
        }
    }

    /// Whether local state changes before the request is sent.
    pub fn is_optimistic(&self) -> bool {
        matches!(
            self,
            TaskCommand::SetStatus { .. } | TaskCommand::SetPriority { .. } | TaskCommand::Move { .. }
        )
    }

    pub fn rollback(&self) -> Rollback {
        match self {
            TaskCommand::SetStatus { .. } | TaskCommand::SetPriority { .. } => Rollback::Refetch,
            TaskCommand::Edit { .. } | TaskCommand::Create(_) | TaskCommand::Delete { .. } => {
                Rollback::None
            }
            TaskCommand::Move { .. } => Rollback::KeepUntilPoll,
        }
    }
}

/// Result of a command that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The command would not change anything and no request was sent.
    Unchanged,
}
