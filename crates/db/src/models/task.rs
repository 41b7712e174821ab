use board_protocol::{NewTask, ReorderEntry, Task, TaskChanges};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    entities::task,
    models::ids::{board_id_by_uuid, board_uuid_by_id},
};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Task not found")]
    TaskNotFound,
    #[error("Board not found")]
    BoardNotFound,
}

pub(crate) fn from_model(model: task::Model, board_id: Uuid) -> Task {
    Task {
        id: model.uuid,
        board_id,
        title: model.title,
        description: model.description,
        status: model.status,
        priority: model.priority,
        order: model.sort_order,
        due_date: model.due_date,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

async fn find_model<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<task::Model>, DbErr> {
    task::Entity::find()
        .filter(task::Column::Uuid.eq(id))
        .one(db)
        .await
}

async fn with_board_uuid<C: ConnectionTrait>(db: &C, model: task::Model) -> Result<Task, TaskError> {
    let board_id = board_uuid_by_id(db, model.board_id)
        .await?
        .ok_or(TaskError::BoardNotFound)?;
    Ok(from_model(model, board_id))
}

/// Tasks of one board, newest first.
pub async fn find_by_board_id<C: ConnectionTrait>(
    db: &C,
    board_id: Uuid,
) -> Result<Vec<Task>, TaskError> {
    let board_row_id = board_id_by_uuid(db, board_id)
        .await?
        .ok_or(TaskError::BoardNotFound)?;

    let records = task::Entity::find()
        .filter(task::Column::BoardId.eq(board_row_id))
        .order_by_desc(task::Column::CreatedAt)
        .order_by_desc(task::Column::Id)
        .all(db)
        .await?;
    Ok(records
        .into_iter()
        .map(|model| from_model(model, board_id))
        .collect())
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Task>, TaskError> {
    match find_model(db, id).await? {
        Some(model) => Ok(Some(with_board_uuid(db, model).await?)),
        None => Ok(None),
    }
}

/// Inserts a task at order 0 of its column. Nothing is written when the board is missing.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    data: &NewTask,
    task_id: Uuid,
) -> Result<Task, TaskError> {
    let board_row_id = board_id_by_uuid(db, data.board_id)
        .await?
        .ok_or(TaskError::BoardNotFound)?;

    let now = Utc::now();
    let active = task::ActiveModel {
        uuid: Set(task_id),
        board_id: Set(board_row_id),
        title: Set(data.title.clone()),
        description: Set(data.description.clone()),
        status: Set(data.status),
        priority: Set(data.priority),
        sort_order: Set(0),
        due_date: Set(data.due_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = active.insert(db).await?;
    Ok(from_model(model, data.board_id))
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: &TaskChanges,
) -> Result<Task, TaskError> {
    let record = find_model(db, id).await?.ok_or(TaskError::TaskNotFound)?;

    let mut active: task::ActiveModel = record.into();
    if let Some(title) = changes.title.clone() {
        active.title = Set(title);
    }
    if let Some(description) = changes.description.clone() {
        active.description = Set(description);
    }
    if let Some(status) = changes.status {
        active.status = Set(status);
    }
    if let Some(priority) = changes.priority {
        active.priority = Set(priority);
    }
    if let Some(due_date) = changes.due_date {
        active.due_date = Set(due_date);
    }
    if let Some(order) = changes.order {
        active.sort_order = Set(order);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;
    with_board_uuid(db, updated).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), TaskError> {
    let result = task::Entity::delete_many()
        .filter(task::Column::Uuid.eq(id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(TaskError::TaskNotFound);
    }
    Ok(())
}

/// Overwrites status and order for every entry. The caller owns the
/// transaction: an unknown id fails the batch and must roll everything back.
pub async fn reorder<C: ConnectionTrait>(db: &C, entries: &[ReorderEntry]) -> Result<(), TaskError> {
    let now = Utc::now();
    for entry in entries {
        let record = find_model(db, entry.id)
            .await?
            .ok_or(TaskError::TaskNotFound)?;
        let mut active: task::ActiveModel = record.into();
        active.status = Set(entry.status);
        active.sort_order = Set(entry.order);
        active.updated_at = Set(now);
        active.update(db).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use board_protocol::{NewBoard, TaskPriority, TaskStatus};
    use chrono::TimeZone;
    use sea_orm::TransactionTrait;
    use test_support::TempDatabase;

    use super::*;
    use crate::{DBService, models::board as board_model};

    async fn setup() -> (TempDatabase, DBService, Uuid) {
        let temp = TempDatabase::new().unwrap();
        let db = DBService::new(&temp.url()).await.unwrap();
        let board = board_model::create(
            &db.pool,
            &NewBoard {
                name: "Board".to_string(),
                description: None,
                color: None,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        (temp, db, board.id)
    }

    fn new_task(board_id: Uuid, title: &str, status: TaskStatus) -> NewTask {
        NewTask {
            board_id,
            title: title.to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn create_sets_defaults_and_board_reference() {
        let (_temp, db, board_id) = setup().await;
        let due = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let mut data = new_task(board_id, "Fix bug", TaskStatus::Todo);
        data.due_date = Some(due);

        let task = create(&db.pool, &data, Uuid::new_v4()).await.unwrap();
        assert_eq!(task.board_id, board_id);
        assert_eq!(task.order, 0);
        assert_eq!(task.due_date, Some(due));

        let loaded = find_by_id(&db.pool, task.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, task.id);
        assert_eq!(loaded.board_id, board_id);
        assert_eq!(loaded.status, TaskStatus::Todo);
        assert_eq!(loaded.priority, TaskPriority::Medium);
    }

    #[tokio::test]
    async fn create_with_missing_board_persists_nothing() {
        let (_temp, db, board_id) = setup().await;
        let task_id = Uuid::new_v4();
        let err = create(
            &db.pool,
            &new_task(Uuid::new_v4(), "orphan", TaskStatus::Todo),
            task_id,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TaskError::BoardNotFound));
        assert!(find_by_id(&db.pool, task_id).await.unwrap().is_none());
        assert!(find_by_board_id(&db.pool, board_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_by_board_id_is_newest_first() {
        let (_temp, db, board_id) = setup().await;
        for title in ["one", "two", "three"] {
            create(&db.pool, &new_task(board_id, title, TaskStatus::Todo), Uuid::new_v4())
                .await
                .unwrap();
        }
        let titles: Vec<_> = find_by_board_id(&db.pool, board_id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["three", "two", "one"]);

        let err = find_by_board_id(&db.pool, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, TaskError::BoardNotFound));
    }

    #[tokio::test]
    async fn update_applies_partial_changes() {
        let (_temp, db, board_id) = setup().await;
        let mut data = new_task(board_id, "Write docs", TaskStatus::Todo);
        data.description = Some("draft".to_string());
        data.due_date = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let task = create(&db.pool, &data, Uuid::new_v4()).await.unwrap();

        let updated = update(
            &db.pool,
            task.id,
            &TaskChanges {
                status: Some(TaskStatus::Done),
                due_date: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, "Write docs");
        assert_eq!(updated.description.as_deref(), Some("draft"));
        assert_eq!(updated.priority, TaskPriority::Medium);
        assert_eq!(updated.due_date, None);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn update_and_delete_missing_task_are_not_found() {
        let (_temp, db, _board_id) = setup().await;
        let err = update(&db.pool, Uuid::new_v4(), &TaskChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound));
        let err = delete(&db.pool, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound));
    }

    #[tokio::test]
    async fn reorder_moves_tasks_between_columns() {
        let (_temp, db, board_id) = setup().await;
        let a = create(&db.pool, &new_task(board_id, "a", TaskStatus::Todo), Uuid::new_v4())
            .await
            .unwrap();
        let b = create(&db.pool, &new_task(board_id, "b", TaskStatus::Done), Uuid::new_v4())
            .await
            .unwrap();

        let entries = [
            ReorderEntry {
                id: a.id,
                status: TaskStatus::Done,
                order: 0,
            },
            ReorderEntry {
                id: b.id,
                status: TaskStatus::Todo,
                order: 0,
            },
        ];
        let tx = db.pool.begin().await.unwrap();
        reorder(&tx, &entries).await.unwrap();
        tx.commit().await.unwrap();

        let a = find_by_id(&db.pool, a.id).await.unwrap().unwrap();
        let b = find_by_id(&db.pool, b.id).await.unwrap().unwrap();
        assert_eq!((a.status, a.order), (TaskStatus::Done, 0));
        assert_eq!((b.status, b.order), (TaskStatus::Todo, 0));
    }

    #[tokio::test]
    async fn reorder_with_unknown_id_rolls_back_the_batch() {
        let (_temp, db, board_id) = setup().await;
        let a = create(&db.pool, &new_task(board_id, "a", TaskStatus::Todo), Uuid::new_v4())
            .await
            .unwrap();

        let entries = [
            ReorderEntry {
                id: a.id,
                status: TaskStatus::InProgress,
                order: 3,
            },
            ReorderEntry {
                id: Uuid::new_v4(),
                status: TaskStatus::Todo,
                order: 0,
            },
        ];
        let tx = db.pool.begin().await.unwrap();
        let err = reorder(&tx, &entries).await.unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound));
        tx.rollback().await.unwrap();

        let a = find_by_id(&db.pool, a.id).await.unwrap().unwrap();
        assert_eq!((a.status, a.order), (TaskStatus::Todo, 0));
    }

    #[tokio::test]
    async fn reorder_twice_is_idempotent() {
        let (_temp, db, board_id) = setup().await;
        let a = create(&db.pool, &new_task(board_id, "a", TaskStatus::Todo), Uuid::new_v4())
            .await
            .unwrap();
        let b = create(&db.pool, &new_task(board_id, "b", TaskStatus::Todo), Uuid::new_v4())
            .await
            .unwrap();
        let entries = [
            ReorderEntry {
                id: b.id,
                status: TaskStatus::Todo,
                order: 0,
            },
            ReorderEntry {
                id: a.id,
                status: TaskStatus::Todo,
                order: 1,
            },
        ];

        let mut snapshots = Vec::new();
        for _ in 0..2 {
            reorder(&db.pool, &entries).await.unwrap();
            let detail = board_model::find_detail(&db.pool, board_id)
                .await
                .unwrap()
                .unwrap();
            snapshots.push(
                detail
                    .tasks
                    .iter()
                    .map(|t| (t.id, t.status, t.order))
                    .collect::<Vec<_>>(),
            );
        }
        assert_eq!(snapshots[0], snapshots[1]);
        assert_eq!(snapshots[0][0].0, b.id);
    }
}
