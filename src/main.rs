mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod models;
mod routes;
mod seed;
mod templates;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DatabaseConnection,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movie_catalog=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);
    tracing::info!(
        case_sensitive = config.search_case_sensitive,
        genre_filter = ?config.genre_filter,
        "listing options"
    );

    let db = db::connect_and_migrate(&config.database_url, config.database_max_connections).await?;
    if config.seed_data {
        seed::seed_if_empty(&db).await?;
    }

    let state = Arc::new(AppState { config: config.clone(), db });
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
