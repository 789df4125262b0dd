use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::{info, instrument};

use super::PostgresConfig;
use crate::common::{RetryConfig, retry_with_backoff};

/// Open a connection pool from a [`PostgresConfig`].
pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.into_connect_options()).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Open a connection pool, retrying with exponential backoff.
///
/// Meant for startup, where the database may still be coming up.
///
/// ```ignore
/// use database::common::RetryConfig;
/// use database::postgres::{PostgresConfig, connect_from_config_with_retry};
///
/// let config = PostgresConfig::from_env()?;
/// let db = connect_from_config_with_retry(config, RetryConfig::new().with_max_retries(5)).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: RetryConfig,
) -> Result<DatabaseConnection, DbErr> {
    let options = config.into_connect_options();

    retry_with_backoff(
        || {
            let opts = options.clone();
            async move {
                let db = Database::connect(opts).await?;
                info!("Connected to PostgreSQL");
                Ok(db)
            }
        },
        retry_config,
    )
    .await
}

/// Apply every pending migration of `M`.
#[instrument(skip(db))]
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DbErr> {
    let pending = M::get_pending_migrations(db).await?.len();
    info!(pending, "Running database migrations");
    M::up(db, None).await?;
    info!("Migrations completed");
    Ok(())
}
