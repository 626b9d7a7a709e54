// src/tariffs/mod.rs
pub mod cache;

pub use cache::TariffCache;
