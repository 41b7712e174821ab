use db::DBService;

pub mod config;
pub mod error;
mod extract;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod seed;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
}

impl AppState {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }
}
