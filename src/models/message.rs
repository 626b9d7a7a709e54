// src/models/message.rs
use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

/// A rated usage event as delivered by the broker.
///
/// `cost` is output-only: it is never read from the wire and is filled in
/// once the message has been rated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub text: String,
    pub operator: String,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
}

impl Message {
    pub fn from_slice(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    /// Text length in characters, the unit the billing rule counts in.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}
