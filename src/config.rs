//! Runtime configuration.
//!
//! The host page may embed a JSON object in
//! `<script type="application/json" id="dashboard-config">`; any field left
//! out keeps its default.

use crate::domain::errors::ApiError;
use crate::domain::logging::LogLevel;
use crate::domain::market_data::{Symbol, TimeInterval};
use crate::domain::state::RetryPolicy;
use serde::Deserialize;

/// Id of the optional config element in the host document
pub const CONFIG_ELEMENT_ID: &str = "dashboard-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// REST base, without trailing slash
    pub api_base: String,
    pub refresh_interval_ms: u64,
    /// Upper bound for the failure backoff
    pub max_backoff_ms: u64,
    pub ohlcv_interval: TimeInterval,
    /// Candles requested for the token sparklines
    pub ohlcv_limit: u32,
    /// Candles requested for the detail chart
    pub detail_ohlcv_limit: u32,
    pub series_capacity: usize,
    pub chart_height: f64,
    pub fear_greed_limit: u32,
    pub funding_limit: u32,
    pub portfolio_assets: Vec<Symbol>,
    pub mmi_token: String,
    pub log_level: LogLevel,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: "/api/v1".to_string(),
            refresh_interval_ms: 30_000,
            max_backoff_ms: 300_000,
            ohlcv_interval: TimeInterval::OneHour,
            ohlcv_limit: 24,
            detail_ohlcv_limit: 90,
            series_capacity: 90,
            chart_height: 260.0,
            fear_greed_limit: 7,
            funding_limit: 100,
            portfolio_assets: ["BTC", "ETH", "SOL", "ONDO", "LINK"].into_iter().map(Symbol::from).collect(),
            mmi_token: "bitcoin".to_string(),
            log_level: LogLevel::Info,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.api_base = config.api_base.trim_end_matches('/').to_string();
        config.refresh_interval_ms = config.refresh_interval_ms.max(1_000);
        config.series_capacity = config.series_capacity.max(1);
        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.refresh_interval_ms, self.max_backoff_ms)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_keep_defaults() {
        let config =
            DashboardConfig::from_json(r#"{"api_base":"https://api.example.com/v1/","ohlcv_interval":"4h"}"#)
                .unwrap();
        assert_eq!(config.api_base, "https://api.example.com/v1");
        assert_eq!(config.ohlcv_interval, TimeInterval::FourHours);
        assert_eq!(config.refresh_interval_ms, 30_000);
        assert_eq!(config.endpoint("/market/movers"), "https://api.example.com/v1/market/movers");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(DashboardConfig::from_json("{"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn log_level_is_lowercase() {
        let config = DashboardConfig::from_json(r#"{"log_level":"debug"}"#).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
    }
}
