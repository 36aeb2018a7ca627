//! REST client for the dashboard backend.

pub mod dto;
pub mod normalize;

use crate::domain::defi::DefiOverview;
use crate::domain::errors::{ApiError, ApiResult};
use crate::domain::funding::FundingRound;
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{Candle, MarketMovers, PriceSnapshot, Symbol, TimeInterval};
use crate::domain::portfolio::{AssetStats, PortfolioAllocation, PortfolioStrategy};
use crate::domain::sentiment::{FearGreedIndex, MmiReading};
use dto::*;
use gloo::net::http::{Request, Response};
use normalize::*;
use serde::de::DeserializeOwned;

/// Backend operations the views depend on
#[allow(async_fn_in_trait)]
pub trait DashboardApi {
    async fn fetch_prices(&self, symbols: &[Symbol]) -> ApiResult<Vec<PriceSnapshot>>;
    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        interval: TimeInterval,
        limit: u32,
    ) -> ApiResult<Vec<Candle>>;
    async fn fetch_fear_greed(&self, limit: u32) -> ApiResult<FearGreedIndex>;
    async fn fetch_defi_overview(&self) -> ApiResult<DefiOverview>;
    async fn fetch_movers(&self) -> ApiResult<MarketMovers>;
    async fn fetch_funding_rounds(&self, limit: u32) -> ApiResult<Vec<FundingRound>>;
    async fn fetch_portfolio_stats(&self, assets: &[Symbol]) -> ApiResult<Vec<AssetStats>>;
    async fn optimize_portfolio(
        &self,
        assets: &[Symbol],
        strategy: PortfolioStrategy,
    ) -> ApiResult<PortfolioAllocation>;
    async fn fetch_mmi(&self, token: &str) -> ApiResult<MmiReading>;
}

fn join_symbols(symbols: &[Symbol]) -> String {
    symbols.iter().map(Symbol::value).collect::<Vec<_>>().join(",")
}

/// `DashboardApi` over `fetch` via gloo
#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    base_url: String,
}

impl HttpDashboardApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn prices_url(&self, symbols: &[Symbol]) -> String {
        format!("{}/market/prices?symbols={}", self.base_url, join_symbols(symbols))
    }

    /// The backend reads `timeframe`; `interval` is sent too for older deployments.
    pub fn ohlcv_url(&self, symbol: &Symbol, interval: TimeInterval, limit: u32) -> String {
        format!(
            "{}/market/ohlcv/{}?interval={}&timeframe={}&limit={}",
            self.base_url,
            symbol.value(),
            interval.as_query(),
            interval.as_query(),
            limit
        )
    }

    pub fn fear_greed_url(&self, limit: u32) -> String {
        format!("{}/mmi/sentiment/fear-greed?limit={}", self.base_url, limit)
    }

    pub fn funding_rounds_url(&self, limit: u32) -> String {
        format!("{}/vc/funding-rounds?limit={}", self.base_url, limit)
    }

    pub fn portfolio_stats_url(&self, assets: &[Symbol]) -> String {
        format!("{}/portfolio/stats?assets={}", self.base_url, join_symbols(assets))
    }

    pub fn mmi_url(&self, token: &str) -> String {
        format!("{}/mmi/{}", self.base_url, token.trim().to_lowercase())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> ApiResult<T> {
        if !response.ok() {
            get_logger().warn(
                LogComponent::Infrastructure("HttpDashboardApi"),
                &format!("{url} -> HTTP {}", response.status()),
            );
            return Err(ApiError::Status { code: response.status(), text: response.status_text() });
        }
        let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> ApiResult<T> {
        get_logger().debug(LogComponent::Infrastructure("HttpDashboardApi"), &format!("GET {url}"));
        let response = Request::get(&url).send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(&url, response).await
    }
}

impl DashboardApi for HttpDashboardApi {
    async fn fetch_prices(&self, symbols: &[Symbol]) -> ApiResult<Vec<PriceSnapshot>> {
        let envelope: DataEnvelope<PriceDto> = self.get_json(self.prices_url(symbols)).await?;
        normalize_prices(envelope.data).into_items("prices")
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        interval: TimeInterval,
        limit: u32,
    ) -> ApiResult<Vec<Candle>> {
        let envelope: DataEnvelope<CandleDto> =
            self.get_json(self.ohlcv_url(symbol, interval, limit)).await?;
        normalize_candles(envelope.data).into_items("ohlcv")
    }

    async fn fetch_fear_greed(&self, limit: u32) -> ApiResult<FearGreedIndex> {
        normalize_fear_greed(self.get_json(self.fear_greed_url(limit)).await?)
    }

    async fn fetch_defi_overview(&self) -> ApiResult<DefiOverview> {
        normalize_defi(self.get_json(self.url("/defi/overview")).await?)
    }

    async fn fetch_movers(&self) -> ApiResult<MarketMovers> {
        normalize_movers(self.get_json(self.url("/market/movers")).await?)
    }

    async fn fetch_funding_rounds(&self, limit: u32) -> ApiResult<Vec<FundingRound>> {
        let envelope: DataEnvelope<FundingRoundDto> =
            self.get_json(self.funding_rounds_url(limit)).await?;
        normalize_funding(envelope.data).into_items("funding-rounds")
    }

    async fn fetch_portfolio_stats(&self, assets: &[Symbol]) -> ApiResult<Vec<AssetStats>> {
        let envelope: DataEnvelope<AssetStatsDto> =
            self.get_json(self.portfolio_stats_url(assets)).await?;
        normalize_asset_stats(envelope.data).into_items("portfolio-stats")
    }

    async fn optimize_portfolio(
        &self,
        assets: &[Symbol],
        strategy: PortfolioStrategy,
    ) -> ApiResult<PortfolioAllocation> {
        let url = self.url("/portfolio/optimize");
        let body = OptimizeRequest {
            assets: assets.iter().map(|s| s.value().to_string()).collect(),
            strategy: strategy.as_ref().to_string(),
        };
        get_logger().debug(
            LogComponent::Infrastructure("HttpDashboardApi"),
            &format!("POST {url} ({strategy})"),
        );
        let response = Request::post(&url)
            .json(&body)
            .map_err(|e| ApiError::Decode(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        normalize_allocation(Self::decode(&url, response).await?)
    }

    async fn fetch_mmi(&self, token: &str) -> ApiResult<MmiReading> {
        let dto: MmiDto = self.get_json(self.mmi_url(token)).await?;
        normalize_mmi(dto, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_use_configured_base() {
        let api = HttpDashboardApi::new("/api/v1/");
        let symbols = [Symbol::from("btc"), Symbol::from("ONDO")];
        assert_eq!(api.prices_url(&symbols), "/api/v1/market/prices?symbols=BTC,ONDO");
        assert_eq!(
            api.ohlcv_url(&symbols[1], TimeInterval::OneDay, 90),
            "/api/v1/market/ohlcv/ONDO?interval=1d&timeframe=1d&limit=90"
        );
        assert_eq!(api.mmi_url("Bitcoin"), "/api/v1/mmi/bitcoin");
    }
}
