// src/bootstrap.rs
//! Startup sequencing for dependencies that may not be up yet.
//!
//! The store, the tariff table and the broker are each retried with a fixed
//! delay until they succeed. There is no attempt limit: a slow dependency
//! delays startup, it never aborts it.

use crate::database::{create_pool, DbPool, TariffStore};
use crate::tariffs::TariffCache;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

/// Runs `attempt` until it returns `Ok`, sleeping `delay` after each failure.
pub async fn retry_forever<T, E, F, Fut>(what: &str, delay: Duration, mut attempt: F) -> T
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts: u64 = 0;

    loop {
        attempts += 1;

        match attempt().await {
            Ok(value) => {
                info!(attempts, "✅ {} succeeded", what);
                return value;
            }
            Err(e) => {
                error!(
                    attempt = attempts,
                    error = %e,
                    "❌ {} failed, retrying in {} seconds",
                    what,
                    delay.as_secs()
                );
                sleep(delay).await;
            }
        }
    }
}

/// Blocks until the store accepts connections.
pub async fn connect_database(database_url: &str, delay: Duration) -> DbPool {
    retry_forever("connect to database", delay, move || create_pool(database_url)).await
}

/// Blocks until the tariff table has been loaded into `cache`.
pub async fn load_tariffs(cache: &TariffCache, store: &dyn TariffStore, delay: Duration) -> usize {
    retry_forever("load tariffs", delay, move || cache.load(store)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MockTariffStore;
    use crate::error::BillingError;
    use crate::models::Tariff;
    use mockall::Sequence;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_retry_waits_fixed_interval_between_attempts() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let value = retry_forever("flaky", Duration::from_secs(20), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    Err(format!("attempt {} refused", n))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(60));
        assert!(waited < Duration::from_secs(61));
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_does_not_sleep() {
        let started = tokio::time::Instant::now();

        let value = retry_forever("stable", Duration::from_secs(20), || async {
            Ok::<_, BillingError>("ready")
        })
        .await;

        assert_eq!(value, "ready");
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_tariffs_retries_until_store_answers() {
        let mut seq = Sequence::new();
        let mut store = MockTariffStore::new();
        store
            .expect_fetch_all()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|| Err(BillingError::Internal("relation \"tariff\" does not exist".to_string())));
        store
            .expect_fetch_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![Tariff::new("mts", "MTS", dec!(1))]));

        let cache = TariffCache::new();
        let loaded = load_tariffs(&cache, &store, Duration::from_secs(20)).await;

        assert_eq!(loaded, 1);
        assert!(cache.lookup("mts").is_ok());
    }
}
