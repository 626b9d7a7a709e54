// src/database/tariff_repo.rs
use crate::database::DbPool;
use crate::error::BillingError;
use crate::models::Tariff;
use async_trait::async_trait;
use tracing::{debug, error};

const SELECT_ALL_TARIFFS: &str = "SELECT id::text, name, cost::numeric FROM tariff";

/// Backing store the tariff cache is populated from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TariffStore: Send + Sync {
    /// Returns every tariff row.
    async fn fetch_all(&self) -> Result<Vec<Tariff>, BillingError>;
}

pub struct PgTariffStore {
    db_pool: DbPool,
}

impl PgTariffStore {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

fn invalid_row(id: &str, e: impl std::fmt::Display) -> BillingError {
    error!(tariff_id = %id, error = %e, "❌ Unreadable tariff row");
    BillingError::InvalidTariffRow {
        id: id.to_string(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl TariffStore for PgTariffStore {
    async fn fetch_all(&self) -> Result<Vec<Tariff>, BillingError> {
        let client = self.db_pool.get().await?;

        let rows = client
            .query(SELECT_ALL_TARIFFS, &[])
            .await
            .map_err(|e| {
                error!("❌ Database error loading tariffs: {:?}", e);
                BillingError::Database(e)
            })?;

        let mut tariffs = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get(0)?;

            let name: String = row.try_get(1).map_err(|e| invalid_row(&id, e))?;
            let cost = row.try_get(2).map_err(|e| invalid_row(&id, e))?;

            tariffs.push(Tariff { id, name, cost });
        }

        debug!("Fetched {} tariff rows", tariffs.len());
        Ok(tariffs)
    }
}
