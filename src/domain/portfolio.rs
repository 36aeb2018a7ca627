use crate::domain::market_data::{Price, Symbol};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Trailing-window statistics served per asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetStats {
    pub asset: Symbol,
    pub price: Option<Price>,
    pub return_90d: Option<f64>,
    pub volatility: Option<f64>,
    pub sharpe: Option<f64>,
}

/// Server-side optimizer selection
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum PortfolioStrategy {
    #[display(fmt = "Hierarchical Risk Parity")]
    #[strum(serialize = "hrp")]
    #[serde(rename = "hrp")]
    Hrp,
    #[display(fmt = "Minimum Variance")]
    #[strum(serialize = "min_variance")]
    #[serde(rename = "min_variance")]
    MinVariance,
    #[display(fmt = "Equal Weight")]
    #[strum(serialize = "equal_weight")]
    #[serde(rename = "equal_weight")]
    EqualWeight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationWeight {
    pub asset: Symbol,
    /// Fraction of the portfolio, `0.0..=1.0`
    pub weight: f64,
}

/// Annualized figures the optimizer reports for the chosen weights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub method: Option<String>,
    pub expected_annual_return: Option<f64>,
    pub annual_volatility: Option<f64>,
    pub sharpe_ratio: Option<f64>,
}

/// Optimizer output ordered by weight, largest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAllocation {
    weights: Vec<AllocationWeight>,
    pub metrics: PortfolioMetrics,
}

impl PortfolioAllocation {
    pub fn from_weights(weights: impl IntoIterator<Item = (Symbol, f64)>) -> Self {
        let mut weights: Vec<AllocationWeight> = weights
            .into_iter()
            .map(|(asset, weight)| AllocationWeight { asset, weight })
            .collect();
        weights.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.asset.cmp(&b.asset)));
        Self { weights, metrics: PortfolioMetrics::default() }
    }

    pub fn with_metrics(mut self, metrics: PortfolioMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn weights(&self) -> &[AllocationWeight] {
        &self.weights
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().map(|w| w.weight).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sorted_descending_with_stable_ties() {
        let allocation = PortfolioAllocation::from_weights([
            (Symbol::from("SOL"), 0.2),
            (Symbol::from("BTC"), 0.4),
            (Symbol::from("ETH"), 0.2),
            (Symbol::from("AVAX"), 0.2),
        ]);
        let order: Vec<&str> = allocation.weights().iter().map(|w| w.asset.value()).collect();
        assert_eq!(order, ["BTC", "AVAX", "ETH", "SOL"]);
        assert!((allocation.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn strategy_query_names() {
        assert_eq!(PortfolioStrategy::MinVariance.as_ref(), "min_variance");
        assert_eq!("hrp".parse::<PortfolioStrategy>().unwrap(), PortfolioStrategy::Hrp);
    }
}
