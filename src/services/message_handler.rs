// src/services/message_handler.rs
use crate::broker::Delivery;
use crate::error::BillingError;
use crate::models::Message;
use crate::services::cost::calculate_cost;
use crate::stats::StatsAggregator;
use crate::tariffs::TariffCache;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Rates a single delivery: decode, tariff lookup, ack, cost, record.
pub struct MessageHandler {
    tariffs: Arc<TariffCache>,
    stats: Arc<StatsAggregator>,
}

impl MessageHandler {
    pub fn new(tariffs: Arc<TariffCache>, stats: Arc<StatsAggregator>) -> Self {
        Self { tariffs, stats }
    }

    /// Returns the rated message, or the reason the delivery was dropped.
    ///
    /// A dropped delivery is never acknowledged, so the broker hands it out
    /// again. The ack happens as soon as a tariff is found: it reflects that
    /// the message is billable, not that bookkeeping succeeded.
    pub async fn handle<D: Delivery>(&self, delivery: &D) -> Result<Message, BillingError> {
        let started = Instant::now();

        let mut msg = Message::from_slice(delivery.payload()).map_err(|e| {
            error!(error = %e, "❌ Failed to parse message");
            BillingError::Decode(e)
        })?;

        let text_len = msg.text_len();

        let tariff = self.tariffs.lookup(&msg.operator).map_err(|e| {
            error!(message_id = %msg.id, operator = %msg.operator, "❌ Tariff not found");
            e
        })?;

        if let Err(e) = delivery.acknowledge().await {
            warn!(message_id = %msg.id, error = %e, "Failed to acknowledge delivery");
        }

        let cost = calculate_cost(text_len, &tariff);
        msg.cost = Some(cost);

        let elapsed = started.elapsed().as_secs_f64();
        self.stats.record(&msg.id, elapsed);

        info!(
            message_id = %msg.id,
            operator = %tariff.name,
            client_id = %msg.client_id,
            cost = %cost,
            "💰 Message rated"
        );

        Ok(msg)
    }
}
