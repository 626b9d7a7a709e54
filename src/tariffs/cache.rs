// src/tariffs/cache.rs
use crate::database::TariffStore;
use crate::error::BillingError;
use crate::models::Tariff;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// In-memory tariff table keyed by operator id.
///
/// Written by `load` during startup, read concurrently by every worker
/// afterwards.
#[derive(Default)]
pub struct TariffCache {
    tariffs: DashMap<String, Tariff>,
    loaded_at: RwLock<Option<DateTime<Utc>>>,
}

impl TariffCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached table with every row from `store`.
    ///
    /// The rows are fetched before anything is touched, so a failed query
    /// leaves the previous contents in place.
    pub async fn load(&self, store: &dyn TariffStore) -> Result<usize, BillingError> {
        let rows = store.fetch_all().await?;
        let fresh: HashSet<&str> = rows.iter().map(|t| t.id.as_str()).collect();

        self.tariffs.retain(|id, _| fresh.contains(id.as_str()));
        for tariff in &rows {
            debug!("Caching tariff {} ({}: {})", tariff.id, tariff.name, tariff.cost);
            self.tariffs.insert(tariff.id.clone(), tariff.clone());
        }

        if rows.is_empty() {
            warn!("⚠️  Tariff table is empty, every message will be rejected");
        }

        if let Ok(mut loaded_at) = self.loaded_at.write() {
            *loaded_at = Some(Utc::now());
        }

        let count = self.tariffs.len();
        info!("📊 Loaded {} tariffs", count);
        Ok(count)
    }

    /// Looks up the tariff for `operator_id`.
    pub fn lookup(&self, operator_id: &str) -> Result<Tariff, BillingError> {
        self.tariffs
            .get(operator_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BillingError::TariffNotFound(operator_id.to_string()))
    }

    pub fn insert(&self, tariff: Tariff) {
        self.tariffs.insert(tariff.id.clone(), tariff);
    }

    pub fn len(&self) -> usize {
        self.tariffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tariffs.is_empty()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at.read().ok().and_then(|guard| *guard)
    }
}

impl FromIterator<Tariff> for TariffCache {
    fn from_iter<I: IntoIterator<Item = Tariff>>(iter: I) -> Self {
        let cache = TariffCache::new();
        for tariff in iter {
            cache.insert(tariff);
        }
        cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MockTariffStore;
    use rust_decimal_macros::dec;

    fn sample_tariffs() -> Vec<Tariff> {
        vec![
            Tariff::new("mts", "MTS", dec!(1.5)),
            Tariff::new("beeline", "Beeline", dec!(3.5)),
        ]
    }

    #[tokio::test]
    async fn test_load_populates_cache() {
        let mut store = MockTariffStore::new();
        store
            .expect_fetch_all()
            .times(1)
            .returning(|| Ok(sample_tariffs()));

        let cache = TariffCache::new();
        assert!(cache.loaded_at().is_none());

        let loaded = cache.load(&store).await.unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(cache.len(), 2);
        assert!(cache.loaded_at().is_some());
        assert_eq!(cache.lookup("beeline").unwrap().cost, dec!(3.5));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_contents() {
        let mut store = MockTariffStore::new();
        store
            .expect_fetch_all()
            .times(1)
            .returning(|| Err(BillingError::Internal("connection reset".to_string())));

        let cache: TariffCache = sample_tariffs().into_iter().collect();
        let result = cache.load(&store).await;

        assert!(result.is_err());
        assert_eq!(cache.len(), 2);
        assert!(cache.loaded_at().is_none());
    }

    #[tokio::test]
    async fn test_reload_drops_removed_tariffs() {
        let mut store = MockTariffStore::new();
        store
            .expect_fetch_all()
            .times(1)
            .returning(|| Ok(vec![Tariff::new("mts", "MTS", dec!(2))]));

        let cache: TariffCache = sample_tariffs().into_iter().collect();
        cache.load(&store).await.unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup("mts").unwrap().cost, dec!(2));
        assert!(cache.lookup("beeline").is_err());
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let cache: TariffCache = sample_tariffs().into_iter().collect();

        let first = cache.lookup("mts").unwrap();
        let second = cache.lookup("mts").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_operator_is_not_found() {
        let cache: TariffCache = sample_tariffs().into_iter().collect();

        match cache.lookup("tele2") {
            Err(BillingError::TariffNotFound(id)) => assert_eq!(id, "tele2"),
            other => panic!("expected TariffNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_concurrent_lookups() {
        let cache = std::sync::Arc::new(sample_tariffs().into_iter().collect::<TariffCache>());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        assert_eq!(cache.lookup("mts").unwrap().name, "MTS");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
