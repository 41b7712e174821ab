use std::time::Duration;

use db_migration::Migrator;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

pub mod entities;
pub mod models;

pub use sea_orm::{DatabaseConnection as DbPool, DbErr, TransactionTrait};

#[derive(Clone)]
pub struct DBService {
    pub pool: DbPool,
}

impl DBService {
    /// Connects to `database_url` and brings the schema up to date.
    pub async fn new(database_url: &str) -> Result<DBService, DbErr> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options
            .connect_timeout(Duration::from_secs(30))
            .sqlx_logging(false);
        // A second pooled connection to `:memory:` would see an empty database.
        if database_url.contains(":memory:") {
            options.max_connections(1);
        }

        let pool = Database::connect(options).await?;
        Migrator::up(&pool, None).await?;
        tracing::debug!("database ready at {}", redact(database_url));
        Ok(DBService { pool })
    }

    /// Wraps an already-migrated connection.
    pub fn from_pool(pool: DbPool) -> Self {
        DBService { pool }
    }
}

fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
