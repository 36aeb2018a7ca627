//! Per-view aggregates built from polled sources.
//!
//! Each view owns one `SourceState` per endpoint. A fetch cycle settles every
//! source it touched in a single `apply`, so the UI sees one update per cycle.

use crate::domain::defi::DefiOverview;
use crate::domain::funding::{FundingFilter, FundingRound, FundingStats};
use crate::domain::market_data::{Candle, MarketMovers, PriceBoard, Symbol, TokenCategory};
use crate::domain::portfolio::{AssetStats, PortfolioAllocation, PortfolioStrategy};
use crate::domain::sentiment::{FearGreedIndex, MmiReading};
use crate::domain::state::{FetchPhase, SourceState};
use derive_more::Display;
use std::collections::HashMap;

/// Connection badge in the market header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ApiStatus {
    #[display(fmt = "connecting")]
    Connecting,
    #[display(fmt = "live")]
    Live,
    #[display(fmt = "error")]
    Error,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketView {
    pub prices: SourceState<PriceBoard>,
    pub fear_greed: SourceState<FearGreedIndex>,
    pub defi: SourceState<DefiOverview>,
    pub movers: SourceState<MarketMovers>,
    /// Token list mini charts
    pub sparklines: HashMap<Symbol, Vec<Candle>>,
    pub category: Option<TokenCategory>,
    pub selected: Option<Symbol>,
    pub live: bool,
}

impl MarketView {
    pub fn new() -> Self {
        Self { live: true, ..Self::default() }
    }

    /// Derived from the price board only; the side panels degrade silently.
    pub fn api_status(&self) -> ApiStatus {
        match self.prices.phase() {
            FetchPhase::Success => ApiStatus::Live,
            FetchPhase::Error => ApiStatus::Error,
            FetchPhase::Idle | FetchPhase::Fetching if self.prices.data().is_some() => ApiStatus::Live,
            FetchPhase::Idle | FetchPhase::Fetching => ApiStatus::Connecting,
        }
    }

    /// Worst failure streak across the polled sources
    pub fn failures(&self) -> u32 {
        [
            self.prices.consecutive_failures(),
            self.fear_greed.consecutive_failures(),
            self.defi.consecutive_failures(),
            self.movers.consecutive_failures(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    pub fn cancel_pending(&mut self) {
        self.prices.cancel();
        self.fear_greed.cancel();
        self.defi.cancel();
        self.movers.cancel();
    }

    pub fn sparkline(&self, symbol: &Symbol) -> &[Candle] {
        self.sparklines.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Last fetched detail series per symbol, so switching back to a token
/// shows its chart before the refresh lands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartCache {
    entries: HashMap<Symbol, SourceState<Vec<Candle>>>,
}

impl ChartCache {
    pub fn get(&self, symbol: &Symbol) -> Option<&SourceState<Vec<Candle>>> {
        self.entries.get(symbol)
    }

    pub fn candles(&self, symbol: &Symbol) -> &[Candle] {
        self.entries.get(symbol).and_then(SourceState::data).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entry(&mut self, symbol: &Symbol) -> &mut SourceState<Vec<Candle>> {
        self.entries.entry(symbol.clone()).or_default()
    }

    /// Whether the symbol has neither data nor a fetch in flight.
    pub fn needs_fetch(&self, symbol: &Symbol) -> bool {
        self.entries
            .get(symbol)
            .is_none_or(|state| state.data().is_none() && state.phase() != FetchPhase::Fetching)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntelligenceView {
    /// Newest first
    pub rounds: SourceState<Vec<FundingRound>>,
    pub filter: FundingFilter,
}

impl IntelligenceView {
    fn all(&self) -> &[FundingRound] {
        self.rounds.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn filtered(&self) -> Vec<&FundingRound> {
        self.all().iter().filter(|r| self.filter.matches(r)).collect()
    }

    pub fn rwa_rounds(&self) -> Vec<&FundingRound> {
        self.all().iter().filter(|r| r.is_rwa_related()).collect()
    }

    pub fn stats(&self, now_secs: u64) -> FundingStats {
        FundingStats::compute(self.all(), now_secs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioView {
    pub mmi: SourceState<MmiReading>,
    pub stats: SourceState<Vec<AssetStats>>,
    pub allocation: SourceState<PortfolioAllocation>,
    pub strategy: PortfolioStrategy,
}

impl Default for PortfolioView {
    fn default() -> Self {
        Self {
            mmi: SourceState::new(),
            stats: SourceState::new(),
            allocation: SourceState::new(),
            strategy: PortfolioStrategy::Hrp,
        }
    }
}

impl PortfolioView {
    pub fn cancel_pending(&mut self) {
        self.mmi.cancel();
        self.stats.cancel();
        self.allocation.cancel();
    }

    pub fn failures(&self) -> u32 {
        self.mmi
            .consecutive_failures()
            .max(self.stats.consecutive_failures())
            .max(self.allocation.consecutive_failures())
    }
}
