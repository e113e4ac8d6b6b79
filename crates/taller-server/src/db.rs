use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Open the SQLite connection pool.
///
/// A single shop does not need a large pool; keep it small and the
/// timeouts short so a wedged request fails fast.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options.max_connections(5);
    options.min_connections(1);
    options.connect_timeout(Duration::from_secs(5));
    options.acquire_timeout(Duration::from_secs(5));
    options.idle_timeout(Duration::from_secs(60));
    options.sqlx_logging(false);

    Database::connect(options).await
}

/// Apply pending migrations. Runs at boot; the schema is always current
/// before the listener opens.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}
