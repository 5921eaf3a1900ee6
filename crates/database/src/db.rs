use log::info;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

/// Creates a pooled database connection
pub async fn create_connection(url: &str) -> Result<DatabaseConnection, DbErr> {
    create_connection_with(url, None).await
}

/// Creates a database connection, optionally capping the pool size
///
/// In-memory SQLite needs a single connection, every new one gets its own empty database.
pub async fn create_connection_with(
    url: &str,
    max_connections: Option<u32>,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.to_owned());
    options.sqlx_logging(false);
    if let Some(max) = max_connections {
        options.max_connections(max).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Connected to {:?} database", db.get_database_backend());
    Ok(db)
}
