//! `db-migration up|down|status|fresh` against `DATABASE_URL`.
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(db_migration::Migrator).await;
}
