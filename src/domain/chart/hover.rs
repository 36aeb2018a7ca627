use super::layout::{CandleGeometry, ChartLayout};
use crate::domain::market_data::Candle;
use crate::formatting::format_price;

/// What a pointer event changed: the previously hovered candle to clear
/// and the newly hovered one to highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverChange {
    pub cleared: Option<usize>,
    pub shown: Option<usize>,
}

impl HoverChange {
    pub fn is_noop(&self) -> bool {
        self.cleared.is_none() && self.shown.is_none()
    }
}

/// Hover state of one chart instance. At most one candle is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverState {
    hovered: Option<usize>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn hover(&mut self, index: usize) -> HoverChange {
        if self.hovered == Some(index) {
            return HoverChange::default();
        }
        let cleared = self.hovered.replace(index);
        HoverChange { cleared, shown: Some(index) }
    }

    pub fn leave(&mut self) -> HoverChange {
        HoverChange { cleared: self.hovered.take(), shown: None }
    }

    /// Hit-test `(x, y)` against `layout` and hover or leave accordingly.
    pub fn pointer_move(&mut self, layout: &ChartLayout, x: f64, y: f64) -> HoverChange {
        match layout.hit_test(x, y) {
            Some(index) => self.hover(index),
            None => self.leave(),
        }
    }
}

/// Readout shown next to the hovered candle
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub index: usize,
    pub time: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub change_percent: Option<f64>,
    pub bullish: bool,
    /// Anchor: slot center and top of the wick
    pub x: f64,
    pub y: f64,
}

impl Tooltip {
    pub fn for_candle(candle: &Candle, geometry: &CandleGeometry) -> Self {
        let ohlcv = &candle.ohlcv;
        Self {
            index: geometry.index,
            time: candle.time.as_str().to_string(),
            open: format_price(Some(ohlcv.open.value())),
            high: format_price(Some(ohlcv.high.value())),
            low: format_price(Some(ohlcv.low.value())),
            close: format_price(Some(ohlcv.close.value())),
            change_percent: candle.change_percent(),
            bullish: geometry.bullish,
            x: geometry.x,
            y: geometry.wick_top,
        }
    }

    /// Rows as `(label, value)` pairs in display order.
    pub fn rows(&self) -> [(&'static str, &str); 4] {
        [("O", &self.open), ("H", &self.high), ("L", &self.low), ("C", &self.close)]
    }
}
