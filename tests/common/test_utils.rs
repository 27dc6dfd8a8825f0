#![allow(dead_code)]

use dotenv::dotenv;
use once_cell::sync::OnceCell;
use sqlx::mysql::MySqlPool as Pool;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::Error;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use hotel_booking_service::db::Database;

static TEST_DB: OnceCell<Mutex<Option<TestDb>>> = OnceCell::new();
static DB_NAME: OnceCell<String> = OnceCell::new();
static SCRATCH_DBS: OnceCell<Mutex<Vec<String>>> = OnceCell::new();

#[derive(Debug)]
pub struct TestDb {
    pub pool: Pool,
    pub db_name: String,
}

// Server URL without the database path, e.g. mysql://root:pw@localhost:3306
fn server_url() -> Option<String> {
    dotenv().ok();
    let db_url = env::var("TEST_DATABASE_URL").ok()?;
    Some(db_url.split('/').take(3).collect::<Vec<&str>>().join("/"))
}

async fn create_connection_pool(url: &str) -> Result<Pool, Error> {
    MySqlPoolOptions::new().max_connections(10).connect(url).await
}

fn base_name() -> String {
    DB_NAME
        .get_or_init(|| {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            format!("hotel_booking_test_{}", timestamp)
        })
        .clone()
}

async fn create_schema(server: &str, db_name: &str) -> Result<Pool, Error> {
    let admin_pool = create_connection_pool(server).await?;
    sqlx::query(&format!("CREATE DATABASE IF NOT EXISTS {}", db_name))
        .execute(&admin_pool)
        .await?;

    let pool = create_connection_pool(&format!("{}/{}", server, db_name)).await?;
    Database::init_schema(&pool).await?;
    Ok(pool)
}

impl TestDb {
    /// Shared pool for the whole test run, or `None` when `TEST_DATABASE_URL`
    /// is not set and the MySQL suite should be skipped.
    pub async fn get_instance() -> Result<Option<Pool>, Error> {
        let Some(server) = server_url() else {
            return Ok(None);
        };

        let test_db = TEST_DB.get_or_init(|| Mutex::new(None));
        let mut guard = test_db.lock().await;

        // Only one database is created per run. Each test runs on its own
        // runtime, so every caller gets a fresh pool onto it.
        if let Some(db) = guard.as_ref() {
            let pool = create_connection_pool(&format!("{}/{}", server, db.db_name)).await?;
            return Ok(Some(pool));
        }

        let db = Self::setup_database(&server).await?;
        let pool = db.pool.clone();
        *guard = Some(db);
        Ok(Some(pool))
    }

    /// A separate database for tests that alter the schema. It is dropped
    /// together with the shared one.
    pub async fn scratch_instance(suffix: &str) -> Result<Option<Pool>, Error> {
        let Some(server) = server_url() else {
            return Ok(None);
        };
        let db_name = format!("{}_{}", base_name(), suffix);
        let pool = create_schema(&server, &db_name).await?;
        SCRATCH_DBS
            .get_or_init(|| Mutex::new(Vec::new()))
            .lock()
            .await
            .push(db_name);
        Ok(Some(pool))
    }

    async fn setup_database(server: &str) -> Result<Self, Error> {
        let db_name = base_name();
        let pool = create_schema(server, &db_name).await?;
        Ok(Self { pool, db_name })
    }

    // Drop the database after the test run (not after each test)
    pub async fn cleanup_database() -> Result<(), Error> {
        let Some(server) = server_url() else {
            return Ok(());
        };
        let mut names = Vec::new();
        if let Some(test_db) = TEST_DB.get() {
            if let Some(db) = test_db.lock().await.take() {
                names.push(db.db_name);
            }
        }
        if let Some(scratch) = SCRATCH_DBS.get() {
            names.append(&mut *scratch.lock().await);
        }
        if names.is_empty() {
            return Ok(());
        }

        let admin_pool = create_connection_pool(&server).await?;
        for name in names {
            sqlx::query(&format!("DROP DATABASE IF EXISTS {}", name))
                .execute(&admin_pool)
                .await?;
        }
        Ok(())
    }

    /// Blocking variant for `#[dtor]` hooks, which run outside any runtime.
    pub fn cleanup_database_sync() -> Result<(), Error> {
        if TEST_DB.get().is_none() && SCRATCH_DBS.get().is_none() {
            return Ok(());
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Io)?;
        runtime.block_on(Self::cleanup_database())
    }
}
