// src/intake/mod.rs
//! Broker intake: a single receiver feeding a fixed pool of rating workers
//! through a bounded queue.

use crate::broker::Delivery;
use crate::error::BillingError;
use crate::services::MessageHandler;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Counters for one run of the intake loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeSummary {
    pub received: u64,
    pub rated: u64,
    pub malformed: u64,
    pub unrated: u64,
}

impl IntakeSummary {
    fn merge(&mut self, other: IntakeSummary) {
        self.rated += other.rated;
        self.malformed += other.malformed;
        self.unrated += other.unrated;
    }
}

pub struct IntakeLoop {
    handler: Arc<MessageHandler>,
    workers: usize,
    queue_capacity: usize,
}

impl IntakeLoop {
    pub fn new(handler: Arc<MessageHandler>, workers: usize, queue_capacity: usize) -> Self {
        Self {
            handler,
            workers: workers.max(1),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Consumes `deliveries` until the stream ends.
    ///
    /// Deliveries are queued for the worker pool; a full queue suspends the
    /// receive side. Once the stream ends the queue is closed, the workers
    /// finish whatever is still queued and the combined counters are
    /// returned.
    pub async fn run<S, D>(&self, mut deliveries: S) -> IntakeSummary
    where
        S: Stream<Item = D> + Unpin,
        D: Delivery,
    {
        let (tx, rx) = mpsc::channel::<D>(self.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));

        let mut pool = JoinSet::new();
        for worker_id in 0..self.workers {
            pool.spawn(Self::worker(worker_id, rx.clone(), self.handler.clone()));
        }

        info!(
            workers = self.workers,
            queue_capacity = self.queue_capacity,
            "🚀 Intake loop consuming"
        );

        let mut summary = IntakeSummary::default();
        while let Some(delivery) = deliveries.next().await {
            summary.received += 1;
            if tx.send(delivery).await.is_err() {
                error!("Worker pool is gone, stopping intake");
                break;
            }
        }

        info!(received = summary.received, "Deliveries stream closed, draining workers");
        drop(tx);

        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(worker_summary) => summary.merge(worker_summary),
                Err(e) => error!(error = %e, "Rating worker terminated abnormally"),
            }
        }

        summary
    }

    async fn worker<D: Delivery>(
        worker_id: usize,
        queue: Arc<Mutex<mpsc::Receiver<D>>>,
        handler: Arc<MessageHandler>,
    ) -> IntakeSummary {
        let mut summary = IntakeSummary::default();

        loop {
            let next = queue.lock().await.recv().await;
            let Some(delivery) = next else {
                break;
            };

            match handler.handle(&delivery).await {
                Ok(_) => summary.rated += 1,
                Err(BillingError::Decode(_)) => summary.malformed += 1,
                Err(BillingError::TariffNotFound(_)) => summary.unrated += 1,
                Err(e) => error!(worker_id, error = %e, "Unexpected rating failure"),
            }
        }

        debug!(worker_id, rated = summary.rated, "Rating worker finished");
        summary
    }
}
