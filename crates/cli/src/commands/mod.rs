//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use local_library_catalog::config::{CatalogConfig, ConfigError};
use local_library_catalog::db::{self, RepositoryError};

/// Errors surfaced by any subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Load configuration and require a database URL.
fn require_database_url(config: &CatalogConfig) -> Result<&SecretString, ConfigError> {
    config
        .database_url
        .as_ref()
        .ok_or_else(|| ConfigError::MissingEnvVar("CATALOG_DATABASE_URL".to_string()))
}

/// Connect to the catalog database named by the environment.
async fn connect() -> Result<PgPool, CommandError> {
    let config = CatalogConfig::from_env()?;
    let database_url = require_database_url(&config)?;

    tracing::info!("Connecting to catalog database...");
    let pool = db::create_pool(database_url, config.max_connections).await?;
    Ok(pool)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_required() {
        let err = require_database_url(&CatalogConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "CATALOG_DATABASE_URL"));
    }
}
