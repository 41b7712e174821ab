use std::{env, fs, path::PathBuf};

use board_protocol::{
    Board, BoardCounts, BoardDetail, CreateBoardRequest, CreateTaskRequest, ErrorResponse,
    MessageResponse, OkResponse, ReorderEntry, ReorderRequest, Task, TaskPriority, TaskStatus,
    UpdateBoardRequest, UpdateTaskRequest,
};
use ts_rs::TS;

fn generate_types_content() -> String {
    let decls = [
        TaskStatus::decl(),
        TaskPriority::decl(),
        Task::decl(),
        Board::decl(),
        BoardCounts::decl(),
        BoardDetail::decl(),
        CreateBoardRequest::decl(),
        UpdateBoardRequest::decl(),
        CreateTaskRequest::decl(),
        UpdateTaskRequest::decl(),
        ReorderEntry::decl(),
        ReorderRequest::decl(),
        MessageResponse::decl(),
        OkResponse::decl(),
        ErrorResponse::decl(),
    ];

    let body = decls
        .into_iter()
        .map(|decl| format!("export {decl}"))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("// This file was generated by `generate_types`. Do not edit.\n\n{body}\n")
}

fn main() {
    let out = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shared/types.ts"));

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
        && let Err(err) = fs::create_dir_all(parent)
    {
        eprintln!("Failed to create {}: {err}", parent.display());
        std::process::exit(1);
    }

    if let Err(err) = fs::write(&out, generate_types_content()) {
        eprintln!("Failed to write {}: {err}", out.display());
        std::process::exit(1);
    }
    println!("Wrote {}", out.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declaration_is_exported() {
        let content = generate_types_content();
        assert!(content.starts_with("// This file was generated by `generate_types`."));
        assert!(content.contains("export type Task = {"));
        assert!(content.contains("export type BoardDetail = "));
        assert!(content.contains("export type TaskStatus = "));
        assert!(!content.contains("export export"));
    }

    #[test]
    fn timestamps_share_one_wire_type() {
        for decl in [Board::decl(), Task::decl()] {
            assert!(decl.contains("createdAt: string"), "{decl}");
            assert!(decl.contains("updatedAt: string"), "{decl}");
            assert!(!decl.contains(": Date"), "{decl}");
        }
        assert!(Task::decl().contains("dueDate: string | null"));
        assert!(BoardCounts::decl().contains("tasks: number"));
    }
}
