// src/models/mod.rs
pub mod message;
pub mod tariff;

pub use message::Message;
pub use tariff::Tariff;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ==================== API DTOs ====================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub tariffs_loaded: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tariffs_loaded_at: Option<DateTime<Utc>>,
}
