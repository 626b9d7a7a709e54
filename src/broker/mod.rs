// src/broker/mod.rs
pub mod nats;

pub use nats::{NatsDelivery, NatsSubscriber};

use crate::error::BillingError;
use async_trait::async_trait;

/// One unit of work handed over by the broker.
///
/// A delivery that is never acknowledged is redelivered by the broker;
/// nothing in this crate retries it.
#[async_trait]
pub trait Delivery: Send + Sync + 'static {
    fn payload(&self) -> &[u8];

    async fn acknowledge(&self) -> Result<(), BillingError>;
}
