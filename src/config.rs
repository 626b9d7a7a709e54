// src/config.rs
use crate::error::BillingError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SQL_URI: &str =
    "host=localhost user=postgres password=postgres dbname=billing sslmode=disable";
pub const DEFAULT_PORT: u16 = 14501;
pub const DEFAULT_RECONNECT_DELAY_SECS: u64 = 20;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub broker: BrokerConfig,
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub reconnect_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub url: String,
    pub stream: String,
    pub subject: String,
    pub consumer: String,
    pub ack_wait: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, BillingError> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    /// Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, BillingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let worker_count = parse_or(get("WORKER_COUNT"), "WORKER_COUNT", num_cpus::get())?;
        if worker_count == 0 {
            return Err(BillingError::Config("WORKER_COUNT must be at least 1".to_string()));
        }

        let queue_capacity =
            parse_or(get("QUEUE_CAPACITY"), "QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY)?;
        if queue_capacity == 0 {
            return Err(BillingError::Config("QUEUE_CAPACITY must be at least 1".to_string()));
        }

        let stream = get("NATS_STREAM").unwrap_or_else(|| "messages".to_string());
        let subject = get("NATS_SUBJECT").unwrap_or_else(|| format!("{}.>", stream));

        Ok(Config {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "production".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            database_url: get("SQL_URI").unwrap_or_else(|| DEFAULT_SQL_URI.to_string()),
            broker: BrokerConfig {
                url: get("NATS_URL").unwrap_or_else(|| "nats://localhost:4222".to_string()),
                consumer: get("NATS_CONSUMER").unwrap_or_else(|| "billing".to_string()),
                ack_wait: Duration::from_secs(parse_or(
                    get("NATS_ACK_WAIT_SECS"),
                    "NATS_ACK_WAIT_SECS",
                    30u64,
                )?),
                stream,
                subject,
            },
            worker_count,
            queue_capacity,
            reconnect_delay: Duration::from_secs(parse_or(
                get("RECONNECT_DELAY_SECS"),
                "RECONNECT_DELAY_SECS",
                DEFAULT_RECONNECT_DELAY_SECS,
            )?),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, BillingError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| BillingError::Config(format!("{}={:?}: {}", key, value, e))),
        None => Ok(default),
    }
}
