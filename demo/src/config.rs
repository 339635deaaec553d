use anyhow::{Context, Result};
use ordersys_application::order_created_handler::DEFAULT_EXCHANGE;
use std::time::Duration;

/// Demo configuration loaded from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Exchange the order-created payload is published to.
    pub exchange: String,
    /// Upper bound for one dispatch; unset means wait for every handler.
    pub dispatch_timeout: Option<Duration>,
}

impl DemoConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let dispatch_timeout = match std::env::var("ORDERSYS_DISPATCH_TIMEOUT_MS") {
            Ok(raw) => Some(Duration::from_millis(
                raw.trim()
                    .parse()
                    .with_context(|| format!("ORDERSYS_DISPATCH_TIMEOUT_MS is not a number: {raw}"))?,
            )),
            Err(_) => None,
        };

        let config = Self {
            exchange: std::env::var("ORDERSYS_EXCHANGE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string()),
            dispatch_timeout,
        };

        tracing::info!(
            exchange = %config.exchange,
            dispatch_timeout_ms = config.dispatch_timeout.map(|d| d.as_millis() as u64),
            "config loaded"
        );
        Ok(config)
    }
}
