//! Fetch cycles, one per view.
//!
//! A cycle fans out its independent requests with `futures::join!`, then the
//! caller applies the collected outcomes to the view state in one step.
//! Sources that fail keep their previous data.

use super::view_state::{ChartCache, IntelligenceView, MarketView, PortfolioView};
use crate::config::DashboardConfig;
use crate::domain::defi::DefiOverview;
use crate::domain::errors::ApiResult;
use crate::domain::funding::{FundingRound, sort_by_date_desc};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{
    Candle, MarketMovers, PriceBoard, PriceSnapshot, Symbol, TOKEN_UNIVERSE,
};
use crate::domain::portfolio::{AssetStats, PortfolioAllocation, PortfolioStrategy};
use crate::domain::sentiment::{FearGreedIndex, MmiReading};
use crate::domain::state::SourceState;
use crate::infrastructure::http::DashboardApi;
use futures::future::join_all;

/// Token sparklines are requested this many at a time
pub const SPARKLINE_BATCH: usize = 5;

/// Settle one source and log the failure, if any.
fn settle<T>(state: &mut SourceState<T>, source: &str, outcome: ApiResult<T>, now: u64) {
    if let Err(err) = &outcome {
        get_logger().warn(
            LogComponent::Application("FetchCycle"),
            &format!("{source} failed (streak {}): {err}", state.consecutive_failures() + 1),
        );
    }
    state.settle(outcome, now);
}

pub fn universe_symbols() -> Vec<Symbol> {
    TOKEN_UNIVERSE.iter().map(|t| t.symbol()).collect()
}

/// Outcomes of one market overview cycle. `None` marks a source that was
/// not requested this time.
#[derive(Debug)]
pub struct MarketOverviewUpdate {
    pub prices: ApiResult<Vec<PriceSnapshot>>,
    pub fear_greed: Option<ApiResult<FearGreedIndex>>,
    pub defi: Option<ApiResult<DefiOverview>>,
    pub movers: Option<ApiResult<MarketMovers>>,
}

impl MarketOverviewUpdate {
    pub fn apply(self, view: &mut MarketView, now: u64) {
        settle(&mut view.prices, "prices", self.prices.map(PriceBoard::from_snapshots), now);
        if let Some(outcome) = self.fear_greed {
            settle(&mut view.fear_greed, "fear-greed", outcome, now);
        }
        if let Some(outcome) = self.defi {
            settle(&mut view.defi, "defi", outcome, now);
        }
        if let Some(outcome) = self.movers {
            settle(&mut view.movers, "movers", outcome, now);
        }
    }
}

/// Mark the sources a cycle is about to fetch. Returns `false` when the
/// previous price fetch is still in flight and this tick should be skipped.
pub fn begin_market_overview(view: &mut MarketView, with_supplementary: bool) -> bool {
    if !view.prices.begin() {
        return false;
    }
    if with_supplementary {
        view.fear_greed.begin();
        view.defi.begin();
        view.movers.begin();
    }
    true
}

/// Prices always; sentiment, DeFi and movers only when `with_supplementary`.
pub async fn fetch_market_overview<A: DashboardApi>(
    api: &A,
    config: &DashboardConfig,
    with_supplementary: bool,
) -> MarketOverviewUpdate {
    let symbols = universe_symbols();
    let prices = api.fetch_prices(&symbols);
    let fear_greed = async {
        if with_supplementary {
            Some(api.fetch_fear_greed(config.fear_greed_limit).await)
        } else {
            None
        }
    };
    let defi = async {
        if with_supplementary {
            Some(api.fetch_defi_overview().await)
        } else {
            None
        }
    };
    let movers = async {
        if with_supplementary {
            Some(api.fetch_movers().await)
        } else {
            None
        }
    };
    let (prices, fear_greed, defi, movers) = futures::join!(prices, fear_greed, defi, movers);
    MarketOverviewUpdate { prices, fear_greed, defi, movers }
}

/// Mini-chart series for every symbol, `SPARKLINE_BATCH` requests at a time.
/// Failed or empty series are left out.
pub async fn fetch_sparklines<A: DashboardApi>(
    api: &A,
    symbols: &[Symbol],
    config: &DashboardConfig,
) -> Vec<(Symbol, Vec<Candle>)> {
    let mut series = Vec::with_capacity(symbols.len());
    for batch in symbols.chunks(SPARKLINE_BATCH) {
        let requests = batch.iter().map(|symbol| async move {
            let outcome = api.fetch_ohlcv(symbol, config.ohlcv_interval, config.ohlcv_limit).await;
            (symbol.clone(), outcome)
        });
        for (symbol, outcome) in join_all(requests).await {
            match outcome {
                Ok(candles) if !candles.is_empty() => series.push((symbol, candles)),
                Ok(_) => {}
                Err(err) => get_logger().debug(
                    LogComponent::Application("Sparklines"),
                    &format!("{symbol}: {err}"),
                ),
            }
        }
    }
    series
}

pub fn apply_sparklines(view: &mut MarketView, series: Vec<(Symbol, Vec<Candle>)>) {
    view.sparklines.extend(series);
}

/// Detail chart series for one symbol.
pub async fn fetch_token_series<A: DashboardApi>(
    api: &A,
    symbol: &Symbol,
    config: &DashboardConfig,
) -> ApiResult<Vec<Candle>> {
    api.fetch_ohlcv(symbol, config.ohlcv_interval, config.detail_ohlcv_limit).await
}

pub fn apply_token_series(
    cache: &mut ChartCache,
    symbol: &Symbol,
    outcome: ApiResult<Vec<Candle>>,
    now: u64,
) {
    settle(cache.entry(symbol), symbol.value(), outcome, now);
}

/// Funding rounds, newest first.
pub async fn fetch_intelligence<A: DashboardApi>(
    api: &A,
    config: &DashboardConfig,
) -> ApiResult<Vec<FundingRound>> {
    let mut rounds = api.fetch_funding_rounds(config.funding_limit).await?;
    sort_by_date_desc(&mut rounds);
    Ok(rounds)
}

pub fn apply_intelligence(
    view: &mut IntelligenceView,
    outcome: ApiResult<Vec<FundingRound>>,
    now: u64,
) {
    settle(&mut view.rounds, "funding-rounds", outcome, now);
}

#[derive(Debug)]
pub struct PortfolioUpdate {
    pub mmi: ApiResult<MmiReading>,
    pub stats: ApiResult<Vec<AssetStats>>,
    pub allocation: ApiResult<PortfolioAllocation>,
}

impl PortfolioUpdate {
    pub fn apply(self, view: &mut PortfolioView, now: u64) {
        settle(&mut view.mmi, "mmi", self.mmi, now);
        settle(&mut view.stats, "portfolio-stats", self.stats, now);
        settle(&mut view.allocation, "portfolio-optimize", self.allocation, now);
    }
}

pub fn begin_portfolio(view: &mut PortfolioView) -> bool {
    if !view.allocation.begin() {
        return false;
    }
    view.mmi.begin();
    view.stats.begin();
    true
}

pub async fn fetch_portfolio<A: DashboardApi>(
    api: &A,
    config: &DashboardConfig,
    strategy: PortfolioStrategy,
) -> PortfolioUpdate {
    let assets = &config.portfolio_assets;
    let (mmi, stats, allocation) = futures::join!(
        api.fetch_mmi(&config.mmi_token),
        api.fetch_portfolio_stats(assets),
        api.optimize_portfolio(assets, strategy),
    );
    PortfolioUpdate { mmi, stats, allocation }
}
