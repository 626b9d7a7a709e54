// src/error.rs
use thiserror::Error;
use actix_web::{http::StatusCode, ResponseError, HttpResponse};
use serde_json::json;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Failed to create connection pool: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),

    #[error("Invalid tariff row {id}: {reason}")]
    InvalidTariffRow { id: String, reason: String },

    #[error("Malformed message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Tariff not found for operator: {0}")]
    TariffNotFound(String),

    #[error("Broker error: {0}")]
    Broker(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for BillingError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        HttpResponse::build(status_code).json(json!({
            "error": self.error_code(),
            "message": self.to_string(),
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BillingError::TariffNotFound(_) => StatusCode::NOT_FOUND,
            BillingError::Decode(_) => StatusCode::BAD_REQUEST,
            BillingError::Database(_) | BillingError::Pool(_) | BillingError::Broker(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl BillingError {
    pub fn error_code(&self) -> &str {
        match self {
            BillingError::Database(_) => "database_error",
            BillingError::Pool(_) => "database_error",
            BillingError::CreatePool(_) => "database_error",
            BillingError::InvalidTariffRow { .. } => "database_error",
            BillingError::Decode(_) => "malformed_message",
            BillingError::TariffNotFound(_) => "tariff_not_found",
            BillingError::Broker(_) => "broker_error",
            BillingError::Config(_) => "config_error",
            BillingError::Internal(_) => "internal_error",
        }
    }
}
