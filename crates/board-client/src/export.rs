//! Board downloads: a JSON dump and a flat CSV of its tasks.

use board_protocol::{Board, BoardDetail, Task};
use chrono::{DateTime, SecondsFormat, Utc};

const CSV_HEADER: &str = "Task,Description,Status,Priority,Due Date,Created At";

pub fn to_json(board: &Board, tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&BoardDetail::new(board.clone(), tasks.to_vec()))
}

/// Title and description are always quoted; the other columns never need it.
pub fn to_csv(tasks: &[Task]) -> String {
    let mut rows = Vec::with_capacity(tasks.len() + 1);
    rows.push(CSV_HEADER.to_string());
    for task in tasks {
        rows.push(
            [
                quote(&task.title),
                quote(task.description.as_deref().unwrap_or_default()),
                task.status.to_string(),
                task.priority.to_string(),
                task.due_date.map(timestamp).unwrap_or_default(),
                timestamp(task.created_at),
            ]
            .join(","),
        );
    }
    rows.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `"Sprint  1"` with `csv` becomes `sprint-1-export.csv`.
pub fn export_file_name(board_name: &str, ext: &str) -> String {
    let mut slug = String::with_capacity(board_name.len());
    let mut in_space = false;
    for ch in board_name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    format!("{slug}-export.{ext}")
}
