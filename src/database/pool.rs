// src/database/pool.rs
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::info;
use crate::error::BillingError;

pub type DbPool = Pool;

/// Builds the pool and proves the store is reachable with a round trip.
/// Pool creation alone does not open a connection.
pub async fn create_pool(database_url: &str) -> Result<Pool, BillingError> {
    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;

    let client = pool.get().await?;
    let server_version: String = client
        .query_one("SHOW server_version", &[])
        .await?
        .try_get(0)?;

    info!(server_version = %server_version, "Connected to PostgreSQL");

    Ok(pool)
}
