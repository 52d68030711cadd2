use migration::Migrator;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;

use crate::error::AppResult;

pub async fn connect_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options.max_connections(max_connections.max(1)).sqlx_logging(false);

    let db = Database::connect(options).await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA journal_mode=WAL".to_string(),
    ))
    .await?;

    Migrator::up(&db, None).await?;
    tracing::debug!(database_url, "database ready");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use sea_orm::EntityTrait;

    use super::*;
    use crate::entities::movie;

    #[tokio::test]
    async fn migrates_an_empty_movie_table() {
        let db = connect_and_migrate("sqlite::memory:", 1).await.unwrap();
        let rows = movie::Entity::find().all(&db).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn migrating_twice_is_harmless() {
        let db = connect_and_migrate("sqlite::memory:", 1).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
    }
}
