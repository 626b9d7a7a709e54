// src/services/mod.rs
pub mod cost;
pub mod message_handler;

pub use cost::{billing_units, calculate_cost};
pub use message_handler::MessageHandler;
