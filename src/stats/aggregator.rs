// src/stats/aggregator.rs
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

/// Processing latency per handled message id.
#[derive(Default)]
pub struct StatsAggregator {
    handled: DashMap<String, f64>,
}

/// Aggregates computed from the handled table at request time.
///
/// With no handled messages `avg_time_handle_one_msg` and `rps` are NaN,
/// which serializes as JSON `null`. `rps` is the reciprocal of the mean
/// latency, not a measured request rate.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub handled_messages: usize,
    pub sum_time: f64,
    pub avg_time_handle_one_msg: f64,
    pub rps: f64,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the latency for `message_id`. A repeated id replaces the
    /// earlier value; returns true when that happened.
    pub fn record(&self, message_id: &str, elapsed_secs: f64) -> bool {
        let replaced = self
            .handled
            .insert(message_id.to_string(), elapsed_secs)
            .is_some();

        if replaced {
            debug!(message_id, "Duplicate message id, latency overwritten");
        }
        replaced
    }

    pub fn len(&self) -> usize {
        self.handled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handled.is_empty()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let (count, sum_time) = self
            .handled
            .iter()
            .fold((0usize, 0.0f64), |(count, sum), entry| (count + 1, sum + *entry.value()));

        let avg = if count == 0 {
            f64::NAN
        } else {
            sum_time / count as f64
        };

        StatsSnapshot {
            handled_messages: count,
            sum_time,
            avg_time_handle_one_msg: avg,
            rps: 1.0 / avg,
        }
    }
}
