//! Wire shapes of the dashboard REST API.
//!
//! Every field is optional so that one bad record never fails a whole
//! response; the normalizers decide what is required.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A number that may arrive as JSON number or numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    /// Parsed value, which may still be non-finite.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberLike::Number(n) => Some(*n),
            NumberLike::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for NumberLike {
    fn from(value: f64) -> Self {
        NumberLike::Number(value)
    }
}

/// Candle time: ISO string or epoch number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LabelLike {
    Text(String),
    Number(f64),
}

impl LabelLike {
    pub fn to_label(&self) -> Option<String> {
        match self {
            LabelLike::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            LabelLike::Number(n) if n.is_finite() && *n >= 0.0 => Some(format!("{}", n.trunc() as u64)),
            LabelLike::Number(_) => None,
        }
    }
}

/// `{ "data": [...] }`
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PriceDto {
    pub symbol: Option<String>,
    #[serde(alias = "last")]
    pub price: Option<NumberLike>,
    #[serde(alias = "percentage")]
    pub change_24h: Option<NumberLike>,
    #[serde(alias = "volume_24h", alias = "quoteVolume")]
    pub volume_24h_usdt: Option<NumberLike>,
    #[serde(alias = "high")]
    pub high_24h: Option<NumberLike>,
    #[serde(alias = "low")]
    pub low_24h: Option<NumberLike>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CandleDto {
    #[serde(alias = "time")]
    pub timestamp: Option<LabelLike>,
    pub open: Option<NumberLike>,
    pub high: Option<NumberLike>,
    pub low: Option<NumberLike>,
    pub close: Option<NumberLike>,
    pub volume: Option<NumberLike>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FearGreedPointDto {
    pub value: Option<NumberLike>,
    #[serde(alias = "value_classification", alias = "classification")]
    pub label: Option<String>,
    pub timestamp: Option<NumberLike>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FearGreedDto {
    pub current: Option<FearGreedPointDto>,
    #[serde(alias = "data")]
    pub history: Vec<FearGreedPointDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProtocolDto {
    pub name: Option<String>,
    pub tvl: Option<NumberLike>,
    pub change_1d: Option<NumberLike>,
    pub change_7d: Option<NumberLike>,
    pub category: Option<String>,
    pub chains: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DefiOverviewDto {
    #[serde(alias = "total_tvl_usd")]
    pub total_tvl: Option<NumberLike>,
    pub total_tvl_formatted: Option<String>,
    pub top_protocols: Vec<ProtocolDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MoverDto {
    pub symbol: Option<String>,
    #[serde(alias = "change_24h", alias = "change")]
    pub change_pct: Option<NumberLike>,
    pub price: Option<NumberLike>,
    #[serde(alias = "volume_24h_usdt", alias = "volume_24h")]
    pub volume: Option<NumberLike>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MoversDto {
    pub gainers: Vec<MoverDto>,
    pub losers: Vec<MoverDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FundingRoundDto {
    #[serde(alias = "project")]
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "categoryGroup")]
    pub category_group: Option<String>,
    pub sector: Option<String>,
    #[serde(alias = "round_type")]
    pub round: Option<String>,
    /// Millions of USD
    #[serde(alias = "amount_usd")]
    pub amount: Option<NumberLike>,
    /// Unix seconds
    pub date: Option<NumberLike>,
    #[serde(alias = "leadInvestors")]
    pub lead_investors: Vec<Option<String>>,
    #[serde(alias = "otherInvestors", alias = "investors")]
    pub other_investors: Vec<Option<String>>,
    pub chains: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetStatsDto {
    pub asset: Option<String>,
    pub price: Option<NumberLike>,
    pub return_90d: Option<NumberLike>,
    pub volatility: Option<NumberLike>,
    pub sharpe: Option<NumberLike>,
}

/// Body of `POST /portfolio/optimize`
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeRequest {
    pub assets: Vec<String>,
    pub strategy: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OptimizeResultDto {
    pub method: Option<String>,
    pub weights: BTreeMap<String, Option<NumberLike>>,
    pub expected_annual_return: Option<NumberLike>,
    pub annual_volatility: Option<NumberLike>,
    pub sharpe_ratio: Option<NumberLike>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OptimizeResponse {
    pub result: Option<OptimizeResultDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MmiDto {
    pub token: Option<String>,
    #[serde(alias = "score")]
    pub mmi_score: Option<NumberLike>,
    pub signal: Option<String>,
    /// Nested component tree, flattened during normalization
    pub components: serde_json::Value,
}
