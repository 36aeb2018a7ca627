use super::value_objects::{Price, Symbol, Volume};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// 24h ticker for one symbol, refreshed wholesale on every poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub symbol: Symbol,
    pub price: Price,
    pub change_24h: Option<f64>,
    pub volume_24h: Option<Volume>,
    pub high_24h: Option<Price>,
    pub low_24h: Option<Price>,
}

impl PriceSnapshot {
    /// Missing change counts as flat, which renders as positive.
    pub fn is_positive(&self) -> bool {
        self.change_24h.unwrap_or(0.0) >= 0.0
    }
}

/// Latest snapshot per symbol
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBoard {
    by_symbol: BTreeMap<Symbol, PriceSnapshot>,
}

impl PriceBoard {
    /// Build a board from one poll response. A symbol listed twice keeps its last entry.
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = PriceSnapshot>) -> Self {
        let by_symbol = snapshots.into_iter().map(|s| (s.symbol.clone(), s)).collect();
        Self { by_symbol }
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&PriceSnapshot> {
        self.by_symbol.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSnapshot> {
        self.by_symbol.values()
    }

    /// Best and worst 24h performer among the listed symbols.
    pub fn extremes(&self) -> Option<(&PriceSnapshot, &PriceSnapshot)> {
        let with_change = || self.by_symbol.values().filter(|s| s.change_24h.is_some());
        let by_change = |a: &&PriceSnapshot, b: &&PriceSnapshot| {
            a.change_24h.partial_cmp(&b.change_24h).unwrap_or(Ordering::Equal)
        };
        let best = with_change().max_by(by_change)?;
        let worst = with_change().min_by(by_change)?;
        Some((best, worst))
    }
}

/// One entry of the market-wide top gainers / losers list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub symbol: Symbol,
    pub change_pct: f64,
    pub price: Price,
    pub volume: Option<Volume>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketMovers {
    pub gainers: Vec<Mover>,
    pub losers: Vec<Mover>,
}
