//! DTO -> domain conversion.
//!
//! Records missing a required number are rejected and counted, never patched
//! with a placeholder value. Optional display fields become `None`.

use super::dto::*;
use crate::domain::defi::{DefiOverview, ProtocolTvl};
use crate::domain::errors::{ApiError, ApiResult, NormalizeError};
use crate::domain::funding::FundingRound;
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{
    Candle, MarketMovers, Mover, OHLCV, Price, PriceSnapshot, Symbol, TimeLabel, Volume,
};
use crate::domain::portfolio::{AssetStats, PortfolioAllocation, PortfolioMetrics};
use crate::domain::sentiment::{FearGreedIndex, FearGreedReading, MmiReading};

/// Accepted records plus the index and reason of every rejected one
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub items: Vec<T>,
    pub rejected: Vec<(usize, NormalizeError)>,
}

impl<T> Normalized<T> {
    fn collect<D>(records: impl IntoIterator<Item = D>, f: impl Fn(D) -> Result<T, NormalizeError>) -> Self {
        let mut items = Vec::new();
        let mut rejected = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            match f(record) {
                Ok(item) => items.push(item),
                Err(err) => rejected.push((index, err)),
            }
        }
        Self { items, rejected }
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Log rejections and hand out the accepted items.
    ///
    /// A response whose every record was rejected is a validation error;
    /// an empty response is not.
    pub fn into_items(self, source: &str) -> ApiResult<Vec<T>> {
        if let Some((index, first)) = self.rejected.first() {
            get_logger().warn(
                LogComponent::Infrastructure("Normalize"),
                &format!(
                    "{source}: rejected {} of {} records (first at #{index}: {first})",
                    self.rejected.len(),
                    self.rejected.len() + self.items.len()
                ),
            );
        }
        match self.rejected.into_iter().next() {
            Some((_, err)) if self.items.is_empty() => Err(ApiError::Validation(err)),
            _ => Ok(self.items),
        }
    }
}

fn required(value: Option<&NumberLike>, field: &'static str) -> Result<f64, NormalizeError> {
    let raw = value.ok_or(NormalizeError::MissingField(field))?;
    raw.as_f64().filter(|v| v.is_finite()).ok_or(NormalizeError::NonFinite(field))
}

fn optional(value: Option<&NumberLike>) -> Option<f64> {
    value.and_then(NumberLike::as_f64).filter(|v| v.is_finite())
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, NormalizeError> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(NormalizeError::MissingField(field))
}

/// `BTC/USDT` and `btc` both become `BTC`.
fn symbol(value: Option<String>) -> Result<Symbol, NormalizeError> {
    let raw = required_text(value, "symbol")?;
    let base = raw.split('/').next().unwrap_or(&raw).to_string();
    Symbol::new(base).map_err(|reason| NormalizeError::Invalid { field: "symbol", reason })
}

fn volume(value: Option<&NumberLike>) -> Option<Volume> {
    optional(value).filter(|v| *v >= 0.0).map(Volume::from)
}

fn unix_seconds(value: Option<&NumberLike>) -> Option<u64> {
    let secs = optional(value).filter(|v| *v > 0.0)?;
    // millisecond epochs are scaled down
    Some(if secs > 1e11 { (secs / 1000.0) as u64 } else { secs as u64 })
}

pub fn normalize_prices(records: Vec<PriceDto>) -> Normalized<PriceSnapshot> {
    Normalized::collect(records, |dto| {
        Ok(PriceSnapshot {
            price: Price::from(required(dto.price.as_ref(), "price")?),
            change_24h: optional(dto.change_24h.as_ref()),
            volume_24h: volume(dto.volume_24h_usdt.as_ref()),
            high_24h: optional(dto.high_24h.as_ref()).map(Price::from),
            low_24h: optional(dto.low_24h.as_ref()).map(Price::from),
            symbol: symbol(dto.symbol)?,
        })
    })
}

/// Candles come out in ascending time order.
pub fn normalize_candles(records: Vec<CandleDto>) -> Normalized<Candle> {
    let mut normalized = Normalized::collect(records, |dto| {
        let time = dto
            .timestamp
            .as_ref()
            .and_then(LabelLike::to_label)
            .ok_or(NormalizeError::MissingField("timestamp"))?;
        let ohlcv = OHLCV::new(
            Price::from(required(dto.open.as_ref(), "open")?),
            Price::from(required(dto.high.as_ref(), "high")?),
            Price::from(required(dto.low.as_ref(), "low")?),
            Price::from(required(dto.close.as_ref(), "close")?),
            volume(dto.volume.as_ref()),
        );
        Ok(Candle::new(TimeLabel::new(time), ohlcv))
    });
    normalized.items.sort_by(|a, b| a.time.cmp(&b.time));
    normalized
}

fn fear_greed_point(dto: &FearGreedPointDto) -> Result<FearGreedReading, NormalizeError> {
    let value = required(dto.value.as_ref(), "value")?;
    if !(0.0..=100.0).contains(&value) {
        return Err(NormalizeError::Invalid { field: "value", reason: format!("{value} outside 0..=100") });
    }
    Ok(FearGreedReading {
        value: value.round() as u8,
        label: dto.label.clone().unwrap_or_default(),
        timestamp: unix_seconds(dto.timestamp.as_ref()).unwrap_or(0),
    })
}

/// Falls back to the newest history point when `current` is absent.
pub fn normalize_fear_greed(dto: FearGreedDto) -> ApiResult<FearGreedIndex> {
    let history = Normalized::collect(dto.history.iter(), fear_greed_point);
    let current = match dto.current.as_ref() {
        Some(point) => Some(fear_greed_point(point)?),
        None => history.items.first().cloned(),
    };
    let history = history.into_items("fear-greed")?;
    Ok(FearGreedIndex { current, history })
}

pub fn normalize_defi(dto: DefiOverviewDto) -> ApiResult<DefiOverview> {
    let protocols = Normalized::collect(dto.top_protocols, |p| {
        Ok(ProtocolTvl {
            tvl: required(p.tvl.as_ref(), "tvl")?,
            change_1d: optional(p.change_1d.as_ref()),
            change_7d: optional(p.change_7d.as_ref()),
            name: required_text(p.name, "name")?,
            category: p.category,
            chains: p.chains,
        })
    });
    Ok(DefiOverview {
        total_tvl_usd: required(dto.total_tvl.as_ref(), "total_tvl")?,
        total_tvl_formatted: dto.total_tvl_formatted.filter(|s| !s.trim().is_empty()),
        top_protocols: protocols.into_items("defi")?,
    })
}

fn mover(dto: MoverDto) -> Result<Mover, NormalizeError> {
    Ok(Mover {
        change_pct: required(dto.change_pct.as_ref(), "change_pct")?,
        price: Price::from(required(dto.price.as_ref(), "price")?),
        volume: volume(dto.volume.as_ref()),
        symbol: symbol(dto.symbol)?,
    })
}

pub fn normalize_movers(dto: MoversDto) -> ApiResult<MarketMovers> {
    Ok(MarketMovers {
        gainers: Normalized::collect(dto.gainers, mover).into_items("movers.gainers")?,
        losers: Normalized::collect(dto.losers, mover).into_items("movers.losers")?,
    })
}

fn names(values: Vec<Option<String>>) -> Vec<String> {
    values.into_iter().flatten().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

pub fn normalize_funding(records: Vec<FundingRoundDto>) -> Normalized<FundingRound> {
    Normalized::collect(records, |dto| {
        Ok(FundingRound {
            name: required_text(dto.name, "name")?,
            amount_musd: optional(dto.amount.as_ref()).filter(|v| *v >= 0.0),
            date: unix_seconds(dto.date.as_ref()),
            category: dto.category,
            category_group: dto.category_group,
            sector: dto.sector,
            round: dto.round,
            lead_investors: names(dto.lead_investors),
            other_investors: names(dto.other_investors),
            chains: names(dto.chains),
        })
    })
}

pub fn normalize_asset_stats(records: Vec<AssetStatsDto>) -> Normalized<AssetStats> {
    Normalized::collect(records, |dto| {
        Ok(AssetStats {
            asset: symbol(dto.asset)?,
            price: optional(dto.price.as_ref()).map(Price::from),
            return_90d: optional(dto.return_90d.as_ref()),
            volatility: optional(dto.volatility.as_ref()),
            sharpe: optional(dto.sharpe.as_ref()),
        })
    })
}

pub fn normalize_allocation(response: OptimizeResponse) -> ApiResult<PortfolioAllocation> {
    let result = response.result.ok_or(NormalizeError::MissingField("result"))?;
    let weights = Normalized::collect(result.weights, |(asset, weight)| {
        let weight = required(weight.as_ref(), "weight")?;
        if weight < 0.0 {
            return Err(NormalizeError::Invalid { field: "weight", reason: format!("negative weight {weight}") });
        }
        Ok((symbol(Some(asset))?, weight))
    })
    .into_items("portfolio.weights")?;

    Ok(PortfolioAllocation::from_weights(weights).with_metrics(PortfolioMetrics {
        method: result.method,
        expected_annual_return: optional(result.expected_annual_return.as_ref()),
        annual_volatility: optional(result.annual_volatility.as_ref()),
        sharpe_ratio: optional(result.sharpe_ratio.as_ref()),
    }))
}

/// Depth-first walk collecting numeric leaves under dotted paths, plus the
/// first string leaf named like a label.
fn flatten_components(
    prefix: &str,
    value: &serde_json::Value,
    numbers: &mut Vec<(String, f64)>,
    label: &mut Option<String>,
) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
                flatten_components(&path, child, numbers, label);
            }
        }
        serde_json::Value::Number(n) => {
            if let Some(v) = n.as_f64().filter(|v| v.is_finite()) {
                numbers.push((prefix.to_string(), v));
            }
        }
        serde_json::Value::String(s) if label.is_none() && prefix.ends_with("label") => {
            *label = Some(s.clone());
        }
        _ => {}
    }
}

pub fn normalize_mmi(dto: MmiDto, requested_token: &str) -> ApiResult<MmiReading> {
    let score = required(dto.mmi_score.as_ref(), "mmi_score")?;
    let mut components = Vec::new();
    let mut fear_greed_label = None;
    flatten_components("", &dto.components, &mut components, &mut fear_greed_label);
    Ok(MmiReading {
        token: dto.token.unwrap_or_else(|| requested_token.to_string()),
        score,
        signal: dto.signal.unwrap_or_default(),
        components,
        fear_greed_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_close_is_rejected_not_zeroed() {
        let records: Vec<CandleDto> = serde_json::from_str(
            r#"[{"time":"2024-01-02","open":1,"high":2,"low":0.5,"close":1.5},
                {"timestamp":"2024-01-01","open":1,"high":2,"low":0.5}]"#,
        )
        .unwrap();
        let normalized = normalize_candles(records);
        assert_eq!(normalized.items.len(), 1);
        assert_eq!(normalized.rejected, vec![(1, NormalizeError::MissingField("close"))]);
    }

    #[test]
    fn component_tree_is_flattened() {
        let dto: MmiDto = serde_json::from_str(
            r#"{"mmi_score":62.5,"signal":"BUY","components":{"historical":{"price_change_30d":-4.2},
                "sentiment":{"fear_greed_label":"Greed"}}}"#,
        )
        .unwrap();
        let reading = normalize_mmi(dto, "bitcoin").unwrap();
        assert_eq!(reading.token, "bitcoin");
        assert_eq!(reading.component("price_change_30d"), Some(-4.2));
        assert_eq!(reading.fear_greed_label.as_deref(), Some("Greed"));
    }
}
