use async_trait::async_trait;
use board_protocol::{
    BoardDetail, CreateBoardRequest, CreateTaskRequest, ErrorResponse, MessageResponse,
    OkResponse, ReorderEntry, ReorderRequest, Task, UpdateBoardRequest, UpdateTaskRequest,
};
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    NotFound(String),
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("Failed to reach the board API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to parse board API response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("Invalid board API url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

/// The HTTP contract the client layer depends on.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn list_boards(&self) -> Result<Vec<BoardDetail>, ClientError>;
    async fn get_board(&self, id: Uuid) -> Result<BoardDetail, ClientError>;
    async fn create_board(&self, req: &CreateBoardRequest) -> Result<BoardDetail, ClientError>;
    async fn update_board(
        &self,
        id: Uuid,
        req: &UpdateBoardRequest,
    ) -> Result<BoardDetail, ClientError>;
    async fn delete_board(&self, id: Uuid) -> Result<(), ClientError>;
    async fn list_tasks(&self, board_id: Uuid) -> Result<Vec<Task>, ClientError>;
    async fn create_task(&self, req: &CreateTaskRequest) -> Result<Task, ClientError>;
    async fn update_task(&self, id: Uuid, req: &UpdateTaskRequest) -> Result<Task, ClientError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), ClientError>;
    async fn reorder_tasks(&self, entries: &[ReorderEntry]) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpBoardApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBoardApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: normalize_base(base_url)?,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(error_from_body(status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// `Url::join` drops the last path segment unless the base ends with a slash.
fn normalize_base(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn error_from_body(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|err| err.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });
    if status == StatusCode::NOT_FOUND {
        ClientError::NotFound(message)
    } else {
        ClientError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn list_boards(&self) -> Result<Vec<BoardDetail>, ClientError> {
        self.send::<(), _>(Method::GET, self.url("boards")?, None)
            .await
    }

    async fn get_board(&self, id: Uuid) -> Result<BoardDetail, ClientError> {
        self.send::<(), _>(Method::GET, self.url(&format!("boards/{id}"))?, None)
            .await
    }

    async fn create_board(&self, req: &CreateBoardRequest) -> Result<BoardDetail, ClientError> {
        self.send(Method::POST, self.url("boards")?, Some(req)).await
    }

    async fn update_board(
        &self,
        id: Uuid,
        req: &UpdateBoardRequest,
    ) -> Result<BoardDetail, ClientError> {
        self.send(Method::PATCH, self.url(&format!("boards/{id}"))?, Some(req))
            .await
    }

    async fn delete_board(&self, id: Uuid) -> Result<(), ClientError> {
        self.send::<(), MessageResponse>(Method::DELETE, self.url(&format!("boards/{id}"))?, None)
            .await?;
        Ok(())
    }

    async fn list_tasks(&self, board_id: Uuid) -> Result<Vec<Task>, ClientError> {
        let mut url = self.url("tasks")?;
        url.query_pairs_mut()
            .append_pair("boardId", &board_id.to_string());
        self.send::<(), _>(Method::GET, url, None).await
    }

    async fn create_task(&self, req: &CreateTaskRequest) -> Result<Task, ClientError> {
        self.send(Method::POST, self.url("tasks")?, Some(req)).await
    }

    async fn update_task(&self, id: Uuid, req: &UpdateTaskRequest) -> Result<Task, ClientError> {
        self.send(Method::PATCH, self.url(&format!("tasks/{id}"))?, Some(req))
            .await
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        self.send::<(), MessageResponse>(Method::DELETE, self.url(&format!("tasks/{id}"))?, None)
            .await?;
        Ok(())
    }

    async fn reorder_tasks(&self, entries: &[ReorderEntry]) -> Result<(), ClientError> {
        let body = ReorderRequest {
            tasks: entries.to_vec(),
        };
        self.send::<_, OkResponse>(Method::PATCH, self.url("tasks/reorder")?, Some(&body))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use board_protocol::{TaskPriority, TaskStatus};
    use db::DBService;
    use server::{AppState, http};
    use test_support::TempDatabase;

    use super::*;

    #[test]
    fn base_url_keeps_its_path_prefix() {
        let api = HttpBoardApi::new("http://localhost:3000/api").unwrap();
        assert_eq!(
            api.url("boards").unwrap().as_str(),
            "http://localhost:3000/api/boards"
        );
        let api = HttpBoardApi::new("http://localhost:3000").unwrap();
        assert_eq!(
            api.url("/tasks/reorder").unwrap().as_str(),
            "http://localhost:3000/tasks/reorder"
        );
        assert!(matches!(
            HttpBoardApi::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn error_bodies_are_decoded() {
        let err = error_from_body(StatusCode::NOT_FOUND, r#"{"error":"Board not found"}"#);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Board not found");

        let err = error_from_body(StatusCode::BAD_REQUEST, r#"{"error":"Task title is required"}"#);
        assert!(matches!(
            err,
            ClientError::Rejected { status: 400, ref message } if message == "Task title is required"
        ));

        let err = error_from_body(StatusCode::BAD_GATEWAY, "<html>");
        assert!(matches!(
            err,
            ClientError::Rejected { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    async fn spawn_server() -> (TempDatabase, String) {
        let temp = TempDatabase::new().unwrap();
        let db = DBService::new(&temp.url()).await.unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, http::router(AppState::new(db)))
                .await
                .unwrap();
        });
        (temp, format!("http://{addr}/api"))
    }

    #[tokio::test]
    async fn http_client_drives_the_real_router() {
        let (_temp, base_url) = spawn_server().await;
        let api = HttpBoardApi::new(&base_url).unwrap();

        let board = api
            .create_board(&CreateBoardRequest::named("Sprint 1"))
            .await
            .unwrap();
        assert_eq!(board.counts.tasks, 0);

        let task = api
            .create_task(
                &CreateTaskRequest::new(board.id, "Fix bug").with_priority(TaskPriority::High),
            )
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Todo);

        let task = api
            .update_task(task.id, &UpdateTaskRequest::status(TaskStatus::Done))
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.priority, TaskPriority::High);

        api.reorder_tasks(&[ReorderEntry {
            id: task.id,
            status: TaskStatus::InProgress,
            order: 0,
        }])
        .await
        .unwrap();
        let tasks = api.list_tasks(board.id).await.unwrap();
        assert_eq!(tasks[0].status, TaskStatus::InProgress);

        let err = api
            .create_task(&CreateTaskRequest::new(board.id, "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Rejected { status: 400, .. }));

        api.delete_task(task.id).await.unwrap();
        api.delete_board(board.id).await.unwrap();
        let err = api.get_board(board.id).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(api.list_boards().await.unwrap().is_empty());
    }
}
