// src/database/mod.rs
pub mod pool;
pub mod tariff_repo;

pub use pool::{create_pool, DbPool};
pub use tariff_repo::{PgTariffStore, TariffStore};

#[cfg(test)]
pub use tariff_repo::MockTariffStore;
