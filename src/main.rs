// src/main.rs
use actix_web::{web, App, HttpServer, middleware};
use std::sync::Arc;
use tracing::info;

use sms_billing::api;
use sms_billing::bootstrap;
use sms_billing::broker::NatsSubscriber;
use sms_billing::config::Config;
use sms_billing::database::PgTariffStore;
use sms_billing::intake::IntakeLoop;
use sms_billing::services::MessageHandler;
use sms_billing::stats::StatsAggregator;
use sms_billing::tariffs::TariffCache;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .json()
        .init();

    info!("🚀 Starting SMS Billing Processor");

    let config = Config::from_env()?;

    info!("Environment: {}", config.environment);

    // Store and tariffs must be ready before anything is consumed
    let db_pool = bootstrap::connect_database(&config.database_url, config.reconnect_delay).await;
    info!("✅ Database pool created");

    let tariffs = Arc::new(TariffCache::new());
    let store = PgTariffStore::new(db_pool);
    bootstrap::load_tariffs(&tariffs, &store, config.reconnect_delay).await;

    let stats = Arc::new(StatsAggregator::new());

    let handler = Arc::new(MessageHandler::new(tariffs.clone(), stats.clone()));
    let intake = IntakeLoop::new(handler, config.worker_count, config.queue_capacity);
    let subscriber = NatsSubscriber::new(config.broker.clone());
    let reconnect_delay = config.reconnect_delay;

    tokio::spawn(async move {
        subscriber.run(&intake, reconnect_delay).await;
    });

    info!("✅ Message intake started");

    // HTTP Server
    let bind_address = config.bind_address();
    info!("🌐 Starting HTTP server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(web::Data::new(stats.clone()))
            .app_data(web::Data::new(tariffs.clone()))
            .configure(api::routes::configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
