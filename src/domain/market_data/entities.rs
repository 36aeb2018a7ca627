pub use super::value_objects::{OHLCV, Price, TimeLabel, Volume};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Domain entity - Candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: TimeLabel,
    pub ohlcv: OHLCV,
}

impl Candle {
    pub fn new(time: TimeLabel, ohlcv: OHLCV) -> Self {
        Self { time, ohlcv }
    }

    /// Candle without a volume figure.
    pub fn from_ohlc(time: impl Into<TimeLabel>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self::new(
            time.into(),
            OHLCV::new(Price::from(open), Price::from(high), Price::from(low), Price::from(close), None),
        )
    }

    /// Ties count as bullish.
    pub fn is_bullish(&self) -> bool {
        self.ohlcv.close >= self.ohlcv.open
    }

    /// Close-over-open change in percent, `None` when open is zero.
    pub fn change_percent(&self) -> Option<f64> {
        let open = self.ohlcv.open.value();
        (open != 0.0).then(|| (self.ohlcv.close.value() - open) / open * 100.0)
    }
}

/// Domain entity - fixed-capacity chronological window of candles
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    candles: VecDeque<Candle>,
    max_size: usize,
}

impl CandleSeries {
    pub fn new(max_size: usize) -> Self {
        Self { candles: VecDeque::new(), max_size: max_size.max(1) }
    }

    /// Series seeded with the newest `max_size` candles of `candles`.
    pub fn seeded(max_size: usize, candles: impl IntoIterator<Item = Candle>) -> Self {
        let mut series = Self::new(max_size);
        series.merge(candles);
        series
    }

    /// Append a candle, replacing the last one when it shares its time bucket.
    ///
    /// Candles older than the newest held one are dropped: the window only
    /// moves forward.
    pub fn push(&mut self, candle: Candle) -> bool {
        if let Some(last) = self.candles.back_mut() {
            if last.time == candle.time {
                *last = candle;
                return true;
            }
            if candle.time < last.time {
                return false;
            }
        }

        self.candles.push_back(candle);
        while self.candles.len() > self.max_size {
            self.candles.pop_front();
        }
        true
    }

    /// Fold a freshly polled batch into the window. Returns how many candles were taken.
    pub fn merge(&mut self, batch: impl IntoIterator<Item = Candle>) -> usize {
        let mut taken = 0;
        for candle in batch {
            if self.push(candle) {
                taken += 1;
            }
        }
        taken
    }

    pub fn clear(&mut self) {
        self.candles.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }

    /// Contiguous copy for the renderer.
    pub fn to_vec(&self) -> Vec<Candle> {
        self.candles.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.back()
    }

    pub fn oldest(&self) -> Option<&Candle> {
        self.candles.front()
    }

    pub fn count(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    pub fn latest_price(&self) -> Option<Price> {
        self.candles.back().map(|candle| candle.ohlcv.close)
    }

    /// Lowest and highest price across the window
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.candles.iter().map(|c| c.ohlcv.bounds()).fold(None, |acc, (lo, hi)| match acc {
            None => Some((lo, hi)),
            Some((min, max)) => Some((min.min(lo), max.max(hi))),
        })
    }
}
