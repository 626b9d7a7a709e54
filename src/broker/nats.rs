// src/broker/nats.rs
use crate::bootstrap::retry_forever;
use crate::broker::Delivery;
use crate::config::BrokerConfig;
use crate::error::BillingError;
use crate::intake::IntakeLoop;
use async_nats::jetstream::{
    self,
    consumer::{pull, AckPolicy},
    stream,
};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A JetStream message awaiting acknowledgment.
pub struct NatsDelivery {
    message: jetstream::Message,
}

#[async_trait]
impl Delivery for NatsDelivery {
    fn payload(&self) -> &[u8] {
        &self.message.payload
    }

    async fn acknowledge(&self) -> Result<(), BillingError> {
        self.message
            .ack()
            .await
            .map_err(|e| BillingError::Broker(e.to_string()))
    }
}

/// Durable JetStream pull subscription feeding the intake loop.
pub struct NatsSubscriber {
    config: BrokerConfig,
}

impl NatsSubscriber {
    pub fn new(config: BrokerConfig) -> Self {
        Self { config }
    }

    /// Connects, makes sure the stream and the durable consumer exist and
    /// returns the delivery stream.
    ///
    /// The stream ends when the server side of the subscription goes away.
    pub async fn subscribe(&self) -> Result<BoxStream<'static, NatsDelivery>, BillingError> {
        let cfg = &self.config;
        info!("Connecting to NATS at {}", cfg.url);

        let client = async_nats::ConnectOptions::new()
            .connection_timeout(CONNECT_TIMEOUT)
            .connect(cfg.url.as_str())
            .await
            .map_err(|e| BillingError::Broker(format!("connect {}: {}", cfg.url, e)))?;

        let context = jetstream::new(client);

        let js_stream = context
            .get_or_create_stream(stream::Config {
                name: cfg.stream.clone(),
                subjects: vec![cfg.subject.clone()],
                description: Some("Usage events awaiting rating".to_string()),
                ..Default::default()
            })
            .await
            .map_err(|e| BillingError::Broker(format!("stream {}: {}", cfg.stream, e)))?;

        let consumer = js_stream
            .get_or_create_consumer(
                &cfg.consumer,
                pull::Config {
                    durable_name: Some(cfg.consumer.clone()),
                    filter_subject: cfg.subject.clone(),
                    ack_policy: AckPolicy::Explicit,
                    ack_wait: cfg.ack_wait,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| BillingError::Broker(format!("consumer {}: {}", cfg.consumer, e)))?;

        let messages = consumer
            .messages()
            .await
            .map_err(|e| BillingError::Broker(format!("subscribe {}: {}", cfg.subject, e)))?;

        info!(
            stream = %cfg.stream,
            consumer = %cfg.consumer,
            subject = %cfg.subject,
            "✅ Subscribed to broker"
        );

        let deliveries = messages.filter_map(|result| async move {
            match result {
                Ok(message) => {
                    debug!(subject = %message.subject, "Delivery received");
                    Some(NatsDelivery { message })
                }
                Err(e) => {
                    warn!(error = %e, "Error receiving delivery");
                    None
                }
            }
        });

        Ok(deliveries.boxed())
    }

    /// Keeps the intake loop fed for the lifetime of the process.
    ///
    /// Subscribing is retried with `delay` between attempts; when a
    /// subscription ends the intake drains and a new one is opened after
    /// the same delay.
    pub async fn run(&self, intake: &IntakeLoop, delay: Duration) {
        loop {
            let deliveries = retry_forever("subscribe to broker", delay, move || self.subscribe()).await;

            let summary = intake.run(deliveries).await;
            info!(
                received = summary.received,
                rated = summary.rated,
                malformed = summary.malformed,
                unrated = summary.unrated,
                "Delivery stream closed"
            );

            warn!("Resubscribing to broker in {} seconds...", delay.as_secs());
            sleep(delay).await;
        }
    }
}
