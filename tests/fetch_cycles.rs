use futures::executor::block_on;
use market_dashboard_wasm::application::use_cases::*;
use market_dashboard_wasm::application::{
    ApiStatus, ChartCache, IntelligenceView, MarketView, MountGuard, Poller, PortfolioView,
};
use market_dashboard_wasm::config::DashboardConfig;
use market_dashboard_wasm::domain::defi::DefiOverview;
use market_dashboard_wasm::domain::errors::{ApiError, ApiResult};
use market_dashboard_wasm::domain::funding::FundingRound;
use market_dashboard_wasm::domain::market_data::{
    Candle, MarketMovers, Price, PriceSnapshot, Symbol, TimeInterval,
};
use market_dashboard_wasm::domain::portfolio::{AssetStats, PortfolioAllocation, PortfolioStrategy};
use market_dashboard_wasm::domain::sentiment::{FearGreedIndex, FearGreedReading, MmiReading};
use market_dashboard_wasm::domain::state::{FetchPhase, RetryPolicy};
use market_dashboard_wasm::infrastructure::http::DashboardApi;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::time::Duration;

/// In-memory backend that records every call and fails the endpoints it is told to.
#[derive(Default)]
struct FakeApi {
    failing: RefCell<HashSet<&'static str>>,
    calls: RefCell<Vec<String>>,
    price: Cell<f64>,
}

impl FakeApi {
    fn new() -> Self {
        let api = Self::default();
        api.price.set(100.0);
        api
    }

    fn fail(&self, endpoint: &'static str) {
        self.failing.borrow_mut().insert(endpoint);
    }

    fn recover(&self, endpoint: &'static str) {
        self.failing.borrow_mut().remove(endpoint);
    }

    fn calls_to(&self, endpoint: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.starts_with(endpoint)).count()
    }

    fn record(&self, endpoint: &'static str, detail: impl std::fmt::Display) -> ApiResult<()> {
        self.calls.borrow_mut().push(format!("{endpoint}:{detail}"));
        if self.failing.borrow().contains(endpoint) {
            return Err(ApiError::Status { code: 503, text: "Service Unavailable".into() });
        }
        Ok(())
    }
}

fn candles(n: usize) -> Vec<Candle> {
    (0..n).map(|i| Candle::from_ohlc(format!("{i}"), 1.0, 2.0, 0.5, 1.5)).collect()
}

fn round(name: &str, date: u64) -> FundingRound {
    FundingRound { name: name.into(), date: Some(date), ..Default::default() }
}

impl DashboardApi for FakeApi {
    async fn fetch_prices(&self, symbols: &[Symbol]) -> ApiResult<Vec<PriceSnapshot>> {
        self.record("prices", symbols.len())?;
        Ok(symbols
            .iter()
            .map(|symbol| PriceSnapshot {
                symbol: symbol.clone(),
                price: Price::from(self.price.get()),
                change_24h: Some(1.0),
                volume_24h: None,
                high_24h: None,
                low_24h: None,
            })
            .collect())
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        interval: TimeInterval,
        limit: u32,
    ) -> ApiResult<Vec<Candle>> {
        self.record("ohlcv", format!("{symbol}/{interval}/{limit}"))?;
        match symbol.value() {
            "MKR" => Err(ApiError::Network("reset".into())),
            "UNI" => Ok(Vec::new()),
            _ => Ok(candles(limit as usize)),
        }
    }

    async fn fetch_fear_greed(&self, limit: u32) -> ApiResult<FearGreedIndex> {
        self.record("fear-greed", limit)?;
        let reading = FearGreedReading { value: 55, label: "Greed".into(), timestamp: 1 };
        Ok(FearGreedIndex { current: Some(reading.clone()), history: vec![reading] })
    }

    async fn fetch_defi_overview(&self) -> ApiResult<DefiOverview> {
        self.record("defi", "")?;
        Ok(DefiOverview { total_tvl_usd: 9e10, ..Default::default() })
    }

    async fn fetch_movers(&self) -> ApiResult<MarketMovers> {
        self.record("movers", "")?;
        Ok(MarketMovers::default())
    }

    async fn fetch_funding_rounds(&self, limit: u32) -> ApiResult<Vec<FundingRound>> {
        self.record("funding", limit)?;
        Ok(vec![round("Old", 100), round("Undated", 0), round("New", 300)])
    }

    async fn fetch_portfolio_stats(&self, assets: &[Symbol]) -> ApiResult<Vec<AssetStats>> {
        self.record("stats", assets.len())?;
        Ok(assets
            .iter()
            .map(|asset| AssetStats {
                asset: asset.clone(),
                price: None,
                return_90d: None,
                volatility: None,
                sharpe: None,
            })
            .collect())
    }

    async fn optimize_portfolio(
        &self,
        assets: &[Symbol],
        strategy: PortfolioStrategy,
    ) -> ApiResult<PortfolioAllocation> {
        self.record("optimize", strategy.as_ref())?;
        let weight = 1.0 / assets.len() as f64;
        Ok(PortfolioAllocation::from_weights(assets.iter().map(|a| (a.clone(), weight))))
    }

    async fn fetch_mmi(&self, token: &str) -> ApiResult<MmiReading> {
        self.record("mmi", token)?;
        Ok(MmiReading {
            token: token.into(),
            score: 62.0,
            signal: "HOLD".into(),
            components: Vec::new(),
            fear_greed_label: None,
        })
    }
}

fn market_cycle(api: &FakeApi, view: &mut MarketView, full: bool, now: u64) -> bool {
    if !begin_market_overview(view, full) {
        return false;
    }
    let update = block_on(fetch_market_overview(api, &DashboardConfig::default(), full));
    update.apply(view, now);
    true
}

#[test]
fn full_cycle_fills_every_source() {
    let api = FakeApi::new();
    let mut view = MarketView::new();
    assert_eq!(view.api_status(), ApiStatus::Connecting);

    assert!(market_cycle(&api, &mut view, true, 1_000));

    assert_eq!(view.api_status(), ApiStatus::Live);
    assert_eq!(view.prices.data().map(|b| b.len()), Some(universe_symbols().len()));
    assert_eq!(view.fear_greed.phase(), FetchPhase::Success);
    assert_eq!(view.defi.phase(), FetchPhase::Success);
    assert_eq!(view.movers.phase(), FetchPhase::Success);
    assert_eq!(api.calls_to("fear-greed:7"), 1);
}

#[test]
fn prices_only_cycle_leaves_side_panels_alone() {
    let api = FakeApi::new();
    let mut view = MarketView::new();
    market_cycle(&api, &mut view, true, 1_000);
    let fear_greed = view.fear_greed.clone();

    api.price.set(110.0);
    market_cycle(&api, &mut view, false, 2_000);

    assert_eq!(api.calls_to("prices"), 2);
    assert_eq!(api.calls_to("defi"), 1);
    assert_eq!(view.fear_greed, fear_greed);
    assert_eq!(view.prices.updated_at(), Some(2_000));
    let btc = view.prices.data().and_then(|b| b.get(&Symbol::from("BTC")).cloned());
    assert_eq!(btc.map(|s| s.price.value()), Some(110.0));
}

#[test]
fn failed_source_keeps_stale_data_while_others_refresh() {
    let api = FakeApi::new();
    let mut view = MarketView::new();
    market_cycle(&api, &mut view, true, 1_000);

    api.fail("defi");
    market_cycle(&api, &mut view, true, 2_000);

    assert!(view.defi.is_stale());
    assert_eq!(view.defi.data().map(|d| d.total_tvl_usd), Some(9e10));
    assert_eq!(view.defi.updated_at(), Some(1_000));
    assert_eq!(view.prices.updated_at(), Some(2_000));
    assert_eq!(view.api_status(), ApiStatus::Live);
    assert_eq!(view.failures(), 1);

    api.recover("defi");
    market_cycle(&api, &mut view, true, 3_000);
    assert!(!view.defi.is_stale());
    assert_eq!(view.failures(), 0);
}

#[test]
fn price_failure_flags_the_status_badge() {
    let api = FakeApi::new();
    api.fail("prices");
    let mut view = MarketView::new();
    market_cycle(&api, &mut view, true, 1_000);

    assert_eq!(view.api_status(), ApiStatus::Error);
    assert_eq!(view.defi.phase(), FetchPhase::Success);
}

#[test]
fn overlapping_tick_is_skipped_until_cancelled() {
    let mut view = MarketView::new();
    assert!(begin_market_overview(&mut view, true));
    assert!(!begin_market_overview(&mut view, false));

    view.cancel_pending();
    assert!(begin_market_overview(&mut view, true));
}

#[test]
fn sparklines_skip_failed_and_empty_series() {
    let api = FakeApi::new();
    let config = DashboardConfig::default();
    let symbols = universe_symbols();
    let mut view = MarketView::new();

    let series = block_on(fetch_sparklines(&api, &symbols, &config));
    apply_sparklines(&mut view, series);

    assert_eq!(api.calls_to("ohlcv"), symbols.len());
    assert_eq!(view.sparklines.len(), symbols.len() - 2);
    assert!(view.sparkline(&Symbol::from("MKR")).is_empty());
    assert_eq!(view.sparkline(&Symbol::from("BTC")).len(), config.ohlcv_limit as usize);
}

#[test]
fn token_series_lands_in_the_cache() {
    let api = FakeApi::new();
    let config = DashboardConfig::default();
    let mut cache = ChartCache::default();
    let btc = Symbol::from("BTC");
    assert!(cache.needs_fetch(&btc));

    cache.entry(&btc).begin();
    assert!(!cache.needs_fetch(&btc));
    let outcome = block_on(fetch_token_series(&api, &btc, &config));
    apply_token_series(&mut cache, &btc, outcome, 1_000);

    assert_eq!(cache.candles(&btc).len(), config.detail_ohlcv_limit as usize);
    assert_eq!(api.calls_to("ohlcv:BTC/1h/90"), 1);

    let mkr = Symbol::from("MKR");
    let outcome = block_on(fetch_token_series(&api, &mkr, &config));
    apply_token_series(&mut cache, &mkr, outcome, 1_000);
    assert_eq!(cache.get(&mkr).map(|s| s.phase()), Some(FetchPhase::Error));
    assert!(cache.needs_fetch(&mkr));
}

#[test]
fn funding_rounds_come_back_newest_first() {
    let api = FakeApi::new();
    let mut view = IntelligenceView::default();
    view.rounds.begin();
    let outcome = block_on(fetch_intelligence(&api, &DashboardConfig::default()));
    apply_intelligence(&mut view, outcome, 1_000);

    let names: Vec<&str> = view.filtered().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["New", "Old", "Undated"]);
}

#[test]
fn portfolio_cycle_uses_the_selected_strategy() {
    let api = FakeApi::new();
    let config = DashboardConfig::default();
    let mut view = PortfolioView { strategy: PortfolioStrategy::MinVariance, ..Default::default() };

    assert!(begin_portfolio(&mut view));
    assert!(!begin_portfolio(&mut view));
    block_on(fetch_portfolio(&api, &config, view.strategy)).apply(&mut view, 1_000);

    assert_eq!(api.calls_to("optimize:min_variance"), 1);
    assert_eq!(api.calls_to("mmi:bitcoin"), 1);
    assert_eq!(view.allocation.data().map(|a| a.weights().len()), Some(config.portfolio_assets.len()));
    assert_eq!(view.failures(), 0);
}

#[test]
fn portfolio_failure_is_counted_per_source() {
    let api = FakeApi::new();
    api.fail("optimize");
    let config = DashboardConfig::default();
    let mut view = PortfolioView::default();

    begin_portfolio(&mut view);
    block_on(fetch_portfolio(&api, &config, view.strategy)).apply(&mut view, 1_000);

    assert_eq!(view.allocation.phase(), FetchPhase::Error);
    assert_eq!(view.mmi.phase(), FetchPhase::Success);
    assert_eq!(view.failures(), 1);
}

#[test]
fn guard_drops_writes_after_unmount() {
    let guard = MountGuard::new();
    let mut writes = 0;
    assert!(guard.apply(|| writes += 1));

    guard.clone().unmount();
    assert!(!guard.apply(|| writes += 1));
    assert_eq!(writes, 1);
}

#[test]
fn poll_loop_backs_off_and_stops_on_unmount() {
    let guard = MountGuard::new();
    let cycles = Cell::new(0u32);
    let delays = RefCell::new(Vec::new());

    let cycle = |_guard: MountGuard| {
        let n = cycles.get();
        cycles.set(n + 1);
        // first cycle succeeds, then two failures in a row
        async move { n }
    };
    let sleep = |delay: Duration| {
        delays.borrow_mut().push(delay.as_millis() as u64);
        if delays.borrow().len() == 3 {
            guard.unmount();
        }
        futures::future::ready(())
    };
    block_on(Poller::run("test", guard.clone(), cycle, RetryPolicy::new(1_000, 3_000), sleep));

    assert_eq!(cycles.get(), 3);
    assert_eq!(*delays.borrow(), vec![1_000, 2_000, 3_000]);
}

#[test]
fn poll_loop_skips_sleep_when_unmounted_mid_cycle() {
    let guard = MountGuard::new();
    let slept = Cell::new(false);

    let cycle = |guard: MountGuard| {
        guard.unmount();
        async { 0 }
    };
    let sleep = |_: Duration| {
        slept.set(true);
        futures::future::ready(())
    };
    block_on(Poller::run("test", guard, cycle, RetryPolicy::new(1_000, 1_000), sleep));

    assert!(!slept.get());
}
