// src/lib.rs
pub mod api;
pub mod bootstrap;
pub mod broker;
pub mod config;
pub mod database;
pub mod error;
pub mod intake;
pub mod models;
pub mod services;
pub mod stats;
pub mod tariffs;

pub use error::BillingError;
