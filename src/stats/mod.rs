// src/stats/mod.rs
pub mod aggregator;

pub use aggregator::{StatsAggregator, StatsSnapshot};
