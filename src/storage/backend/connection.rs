use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::errors::{LinkVaultError, Result};

use migration::{Migrator, MigratorTrait};

/// Connect to SQLite with auto-create and the usual pragmas.
pub async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
    use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
    use sea_orm::sqlx::SqlitePool;
    use sea_orm::SqlxSqliteConnector;
    use std::str::FromStr;

    let opt = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| {
            LinkVaultError::database_config(format!("cannot parse SQLite URL: {}", e))
        })?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(5));

    let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
        LinkVaultError::database_connection(format!("cannot connect to SQLite database: {}", e))
    })?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// Connect to MySQL/MariaDB/PostgreSQL with pooling options.
pub async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(std::time::Duration::from_secs(8))
        .acquire_timeout(std::time::Duration::from_secs(8))
        .idle_timeout(std::time::Duration::from_secs(8))
        .sqlx_logging(false);

    Database::connect(opt).await.map_err(|e| {
        LinkVaultError::database_connection(format!(
            "cannot connect to {} database: {}",
            backend_name.to_uppercase(),
            e
        ))
    })
}

/// Run pending migrations. Safe to call repeatedly.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| LinkVaultError::database_operation(format!("migration failed: {}", e)))?;

    info!("Database migrations completed");
    Ok(())
}
