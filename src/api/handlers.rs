// src/api/handlers.rs
use actix_web::{web, HttpResponse};
use crate::error::BillingError;
use crate::models::HealthResponse;
use crate::stats::StatsAggregator;
use crate::tariffs::TariffCache;
use std::sync::Arc;

/// Latency statistics of every message rated so far. Always 200.
pub async fn get_stat(stats: web::Data<Arc<StatsAggregator>>) -> HttpResponse {
    HttpResponse::Ok().json(stats.snapshot())
}

pub async fn health_check(tariffs: web::Data<Arc<TariffCache>>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "sms-billing".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tariffs_loaded: tariffs.len(),
        tariffs_loaded_at: tariffs.loaded_at(),
    })
}

pub async fn get_tariff(
    path: web::Path<String>,
    tariffs: web::Data<Arc<TariffCache>>,
) -> Result<HttpResponse, BillingError> {
    let tariff = tariffs.lookup(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(tariff))
}
