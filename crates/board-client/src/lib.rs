//! Client-side state for the task board: the HTTP API client, the board
//! store with optimistic mutations, and the pure view/reorder/export helpers.

pub mod api;
pub mod command;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod poller;
pub mod reorder;
pub mod session;
pub mod store;
pub mod view;

#[cfg(test)]
mod fake;

pub use api::{BoardApi, ClientError, HttpBoardApi};
pub use command::{Outcome, Rollback, TaskCommand};
pub use config::ClientConfig;
pub use dashboard::{BoardsOverview, DashboardSession, DashboardStats};
pub use poller::{PollerHandle, Refresh, spawn_poller};
pub use reorder::{ColumnPosition, ReorderPlan, plan_move};
pub use session::BoardSession;
pub use store::{BoardStore, LoadState};
pub use view::{ColumnGroups, SortDirection, SortField, StatusFilter, TaskQuery};
