use std::collections::HashMap;

use board_protocol::{Board, BoardChanges, BoardDetail, NewBoard};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    entities::{board, task},
    models::task::from_model as task_from_model,
};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Board not found")]
    BoardNotFound,
}

pub(crate) fn from_model(model: board::Model) -> Board {
    Board {
        id: model.uuid,
        name: model.name,
        description: model.description,
        color: model.color,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

async fn find_model<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<board::Model>, DbErr> {
    board::Entity::find()
        .filter(board::Column::Uuid.eq(id))
        .one(db)
        .await
}

/// Every board, newest first, each with its tasks in column order.
pub async fn find_all_with_tasks<C: ConnectionTrait>(db: &C) -> Result<Vec<BoardDetail>, DbErr> {
    let boards = board::Entity::find()
        .order_by_desc(board::Column::CreatedAt)
        .order_by_desc(board::Column::Id)
        .all(db)
        .await?;

    let tasks = task::Entity::find()
        .order_by_asc(task::Column::SortOrder)
        .order_by_desc(task::Column::CreatedAt)
        .all(db)
        .await?;

    let uuids: HashMap<i64, Uuid> = boards.iter().map(|b| (b.id, b.uuid)).collect();
    let mut by_board: HashMap<i64, Vec<_>> = HashMap::new();
    for model in tasks {
        let Some(board_uuid) = uuids.get(&model.board_id).copied() else {
            continue;
        };
        by_board
            .entry(model.board_id)
            .or_default()
            .push(task_from_model(model, board_uuid));
    }

    Ok(boards
        .into_iter()
        .map(|model| {
            let tasks = by_board.remove(&model.id).unwrap_or_default();
            BoardDetail::new(from_model(model), tasks)
        })
        .collect())
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Board>, DbErr> {
    Ok(find_model(db, id).await?.map(from_model))
}

/// A board with its tasks ordered by `order` ascending, newest first on ties.
pub async fn find_detail<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<BoardDetail>, DbErr> {
    let Some(model) = find_model(db, id).await? else {
        return Ok(None);
    };

    let tasks = task::Entity::find()
        .filter(task::Column::BoardId.eq(model.id))
        .order_by_asc(task::Column::SortOrder)
        .order_by_desc(task::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|task| task_from_model(task, model.uuid))
        .collect();

    Ok(Some(BoardDetail::new(from_model(model), tasks)))
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    data: &NewBoard,
    board_id: Uuid,
) -> Result<Board, DbErr> {
    let now = Utc::now();
    let active = board::ActiveModel {
        uuid: Set(board_id),
        name: Set(data.name.clone()),
        description: Set(data.description.clone()),
        color: Set(data.color.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = active.insert(db).await?;
    Ok(from_model(model))
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: &BoardChanges,
) -> Result<Board, BoardError> {
    let record = find_model(db, id).await?.ok_or(BoardError::BoardNotFound)?;

    let mut active: board::ActiveModel = record.into();
    if let Some(name) = changes.name.clone() {
        active.name = Set(name);
    }
    if let Some(description) = changes.description.clone() {
        active.description = Set(description);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;
    Ok(from_model(updated))
}

/// Deletes the board and its tasks. Run inside a transaction so both go together.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), BoardError> {
    let record = find_model(db, id).await?.ok_or(BoardError::BoardNotFound)?;

    let removed = task::Entity::delete_many()
        .filter(task::Column::BoardId.eq(record.id))
        .exec(db)
        .await?;
    board::Entity::delete_by_id(record.id).exec(db).await?;

    tracing::debug!(
        "deleted board {} with {} tasks",
        record.uuid,
        removed.rows_affected
    );
    Ok(())
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    board::Entity::find().count(db).await
}

#[cfg(test)]
mod tests {
    use board_protocol::{NewTask, TaskPriority, TaskStatus};
    use sea_orm::TransactionTrait;
    use test_support::TempDatabase;

    use super::*;
    use crate::{DBService, models::task as task_model};

    async fn setup_db() -> (TempDatabase, DBService) {
        let temp = TempDatabase::new().unwrap();
        let db = DBService::new(&temp.url()).await.unwrap();
        (temp, db)
    }

    fn new_board(name: &str) -> NewBoard {
        NewBoard {
            name: name.to_string(),
            description: None,
            color: None,
        }
    }

    fn new_task(board_id: Uuid, title: &str) -> NewTask {
        NewTask {
            board_id,
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_with_counts() {
        let (_temp, db) = setup_db().await;
        let first = create(&db.pool, &new_board("First"), Uuid::new_v4())
            .await
            .unwrap();
        let second = create(&db.pool, &new_board("Second"), Uuid::new_v4())
            .await
            .unwrap();
        task_model::create(&db.pool, &new_task(first.id, "only"), Uuid::new_v4())
            .await
            .unwrap();

        let boards = find_all_with_tasks(&db.pool).await.unwrap();
        let names: Vec<_> = boards.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(boards[0].id, second.id);
        assert_eq!(boards[0].counts.tasks, 0);
        assert_eq!(boards[1].counts.tasks, 1);
        assert_eq!(boards[1].tasks[0].title, "only");
    }

    #[tokio::test]
    async fn update_touches_only_given_fields() {
        let (_temp, db) = setup_db().await;
        let board = create(
            &db.pool,
            &NewBoard {
                name: "Original".to_string(),
                description: Some("keep me".to_string()),
                color: Some("#58A6FF".to_string()),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let renamed = update(
            &db.pool,
            board.id,
            &BoardChanges {
                name: Some("Renamed".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Renamed");
        assert_eq!(renamed.description.as_deref(), Some("keep me"));
        assert_eq!(renamed.color.as_deref(), Some("#58A6FF"));
        assert!(renamed.updated_at >= board.updated_at);

        let cleared = update(
            &db.pool,
            board.id,
            &BoardChanges {
                name: None,
                description: Some(None),
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.description, None);
    }

    #[tokio::test]
    async fn update_missing_board_is_not_found() {
        let (_temp, db) = setup_db().await;
        let err = update(&db.pool, Uuid::new_v4(), &BoardChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::BoardNotFound));
    }

    #[tokio::test]
    async fn delete_cascades_to_tasks() {
        let (_temp, db) = setup_db().await;
        let doomed = create(&db.pool, &new_board("Doomed"), Uuid::new_v4())
            .await
            .unwrap();
        let keeper = create(&db.pool, &new_board("Keeper"), Uuid::new_v4())
            .await
            .unwrap();
        let doomed_task = task_model::create(&db.pool, &new_task(doomed.id, "a"), Uuid::new_v4())
            .await
            .unwrap();
        task_model::create(&db.pool, &new_task(keeper.id, "b"), Uuid::new_v4())
            .await
            .unwrap();

        let tx = db.pool.begin().await.unwrap();
        delete(&tx, doomed.id).await.unwrap();
        tx.commit().await.unwrap();

        assert!(find_detail(&db.pool, doomed.id).await.unwrap().is_none());
        assert!(
            task_model::find_by_id(&db.pool, doomed_task.id)
                .await
                .unwrap()
                .is_none()
        );
        let keeper = find_detail(&db.pool, keeper.id).await.unwrap().unwrap();
        assert_eq!(keeper.counts.tasks, 1);
        assert_eq!(count(&db.pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_missing_board_is_not_found() {
        let (_temp, db) = setup_db().await;
        let err = delete(&db.pool, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, BoardError::BoardNotFound));
    }
}
