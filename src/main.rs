use std::sync::Arc;

use hotel_booking_service::config::{AppConfig, StoreBackend};
use hotel_booking_service::db::Database;
use hotel_booking_service::logging;
use hotel_booking_service::store::memory::MemoryStore;
use hotel_booking_service::store::mysql::MySqlStore;
use hotel_booking_service::store::EntityStore;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    logging::init_subscriber(&config);

    let store: Arc<dyn EntityStore> = match config.store_backend {
        StoreBackend::Mysql => {
            let url = config.database_url.as_deref().unwrap_or_default();
            // Connect to the database
            let database = Database::from_config(&config, url).await?;
            Database::init_schema(database.get_pool()).await?;
            Arc::new(MySqlStore::new(database.pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store, data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    tracing::info!(
        address = %config.bind_address,
        port = config.port,
        backend = %config.store_backend,
        "starting hotel booking service"
    );

    let _rocket = hotel_booking_service::build_rocket(&config, store)
        .launch()
        .await?;

    Ok(())
}
