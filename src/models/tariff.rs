// src/models/tariff.rs
use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

/// Price of one billing unit for an operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tariff {
    pub id: String,
    pub name: String,
    pub cost: Decimal,
}

impl Tariff {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cost: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
        }
    }
}
