use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use crate::config::AppConfig;

const SCHEMA: &str = include_str!("../sql/schema.sql");

// Database connection manager
pub struct Database {
    pub pool: MySqlPool,
}

impl Database {
    // Create a new database connection pool
    pub async fn new(database_url: &str, max_connections: u32, acquire_timeout: Duration) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn from_config(config: &AppConfig, database_url: &str) -> Result<Self, sqlx::Error> {
        Self::new(
            database_url,
            config.db_max_connections,
            Duration::from_secs(config.db_acquire_timeout_secs),
        )
        .await
    }

    // Get a reference to the connection pool
    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Create any missing tables. Every statement is `CREATE TABLE IF NOT EXISTS`.
    pub async fn init_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
        for statement in schema_statements() {
            sqlx::query(statement).execute(pool).await?;
        }
        tracing::info!("database schema is up to date");
        Ok(())
    }
}

fn schema_statements() -> impl Iterator<Item = &'static str> {
    SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty())
}
