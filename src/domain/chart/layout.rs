//! Pure candlestick layout.
//!
//! `ChartLayout::compute` maps a candle slice and a drawing surface to pixel
//! geometry. No rendering backend is involved, so the same frame can feed the
//! SVG renderer, hit testing and the tests.

use super::value_objects::{ChartDimensions, ChartMargins};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::market_data::Candle;
use crate::formatting::format_axis_price;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Headroom added above and below the data range
pub const DOMAIN_PADDING_RATIO: f64 = 0.05;
/// Half-range used when every price in view is identical
pub const FALLBACK_HALF_RANGE: f64 = 1.0;
/// Share of a slot taken by a candle body
pub const BODY_RATIO: f64 = 0.7;
pub const MIN_BODY_WIDTH: f64 = 3.0;
pub const MAX_BODY_WIDTH: f64 = 24.0;
/// Doji candles still get a visible body
pub const MIN_BODY_HEIGHT: f64 = 1.0;
pub const PRICE_TICK_COUNT: usize = 5;
/// Roughly how many time labels fit under the plot
pub const X_LABEL_TARGET: usize = 7;
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 100;

/// Vertical price range mapped onto the plot height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceDomain {
    pub min: f64,
    pub max: f64,
    fallback: bool,
}

impl PriceDomain {
    /// Pad `[lo, hi]` by `DOMAIN_PADDING_RATIO` of its range. A zero range
    /// falls back to `value ± FALLBACK_HALF_RANGE`.
    pub fn from_bounds(lo: f64, hi: f64) -> Self {
        let range = hi - lo;
        if range == 0.0 {
            return Self {
                min: lo - FALLBACK_HALF_RANGE,
                max: hi + FALLBACK_HALF_RANGE,
                fallback: true,
            };
        }
        let pad = range * DOMAIN_PADDING_RATIO;
        Self { min: lo - pad, max: hi + pad, fallback: false }
    }

    /// Padded `[min(low), max(high)]` over the series, `None` when it is empty.
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        let (lo, hi) = candles.iter().map(|c| c.ohlcv.low_high()).fold(None, |acc, (lo, hi)| {
            Some(match acc {
                None => (lo, hi),
                Some((min, max)) => (f64::min(min, lo), f64::max(max, hi)),
            })
        })?;
        Some(Self::from_bounds(lo, hi))
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether the flat-data fallback produced this domain.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Inner drawing rectangle after margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    fn new(dimensions: ChartDimensions, margins: ChartMargins) -> Self {
        Self {
            left: margins.left,
            top: margins.top,
            width: (dimensions.width - margins.left - margins.right).max(0.0),
            height: (dimensions.height - margins.top - margins.bottom).max(0.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Half-open on the right and bottom edges.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }
}

/// Pixel geometry of one candle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleGeometry {
    pub index: usize,
    /// Horizontal center of the slot
    pub x: f64,
    pub body_left: f64,
    pub body_width: f64,
    pub body_top: f64,
    pub body_height: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub open_y: f64,
    pub close_y: f64,
    pub bullish: bool,
}

impl CandleGeometry {
    pub fn high_y(&self) -> f64 {
        self.wick_top
    }

    pub fn low_y(&self) -> f64 {
        self.wick_bottom
    }

    pub fn body_bottom(&self) -> f64 {
        self.body_top + self.body_height
    }
}

/// Horizontal grid line with its axis label
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub price: f64,
    pub y: f64,
    pub label: String,
}

/// Time axis label anchored under a candle
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTick {
    pub index: usize,
    pub x: f64,
    /// Raw bucket label; display formatting is up to the renderer
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub dimensions: ChartDimensions,
    pub plot: PlotArea,
    pub domain: PriceDomain,
    /// Horizontal space allotted to each candle
    pub slot_width: f64,
    pub candles: Vec<CandleGeometry>,
    pub price_ticks: Vec<PriceTick>,
    pub time_ticks: Vec<TimeTick>,
}

/// Result of a layout pass
#[derive(Debug, Clone, PartialEq)]
pub enum ChartFrame {
    /// No candles: the view shows an empty state instead of axes
    Empty,
    Plotted(ChartLayout),
}

impl ChartFrame {
    pub fn layout(&self) -> Option<&ChartLayout> {
        match self {
            ChartFrame::Empty => None,
            ChartFrame::Plotted(layout) => Some(layout),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ChartFrame::Empty)
    }
}

/// Shared projection parameters for one pass
#[derive(Clone, Copy)]
struct Projection {
    plot: PlotArea,
    domain: PriceDomain,
    slot_width: f64,
    body_width: f64,
}

impl Projection {
    fn y(&self, price: f64) -> f64 {
        self.plot.top + (self.domain.max - price) / self.domain.span() * self.plot.height
    }

    fn x(&self, index: usize) -> f64 {
        self.plot.left + self.slot_width * (index as f64 + 0.5)
    }

    /// Pins a projected y to the plot rectangle.
    fn clip_y(&self, y: f64) -> f64 {
        y.max(self.plot.top).min(self.plot.bottom())
    }

    /// Open or close outside `[low, high]` projects past the domain, so
    /// every vertical coordinate is clipped to the plot.
    fn candle(&self, index: usize, candle: &Candle) -> CandleGeometry {
        let ohlcv = &candle.ohlcv;
        let (lo, hi) = ohlcv.bounds();
        let open_y = self.clip_y(self.y(ohlcv.open.value()));
        let close_y = self.clip_y(self.y(ohlcv.close.value()));

        let top = open_y.min(close_y);
        let natural = (open_y - close_y).abs();
        let body_height = natural.max(MIN_BODY_HEIGHT).min(self.plot.height);
        let body_top = (top - (body_height - natural) / 2.0)
            .min(self.plot.bottom() - body_height)
            .max(self.plot.top);

        let x = self.x(index);
        CandleGeometry {
            index,
            x,
            body_left: x - self.body_width / 2.0,
            body_width: self.body_width,
            body_top,
            body_height,
            wick_top: self.clip_y(self.y(hi)),
            wick_bottom: self.clip_y(self.y(lo)),
            open_y,
            close_y,
            bullish: candle.is_bullish(),
        }
    }
}

impl ChartLayout {
    /// Lay out `candles` on a `dimensions` surface.
    ///
    /// Fails on non-finite prices or an unusable surface; an empty slice
    /// yields `ChartFrame::Empty`. The output depends only on the inputs.
    pub fn compute(
        candles: &[Candle],
        dimensions: ChartDimensions,
        margins: ChartMargins,
    ) -> ChartResult<ChartFrame> {
        if !dimensions.is_valid() {
            return Err(ChartError::InvalidDimensions {
                width: dimensions.width,
                height: dimensions.height,
            });
        }
        if let Some((index, field)) = candles
            .iter()
            .enumerate()
            .find_map(|(i, c)| c.ohlcv.first_non_finite().map(|field| (i, field)))
        {
            return Err(ChartError::MalformedRecord { index, field });
        }
        let Some(domain) = PriceDomain::from_candles(candles) else {
            return Ok(ChartFrame::Empty);
        };

        let plot = PlotArea::new(dimensions, margins);
        let slot_width = plot.width / candles.len() as f64;
        let projection = Projection {
            plot,
            domain,
            slot_width,
            body_width: (slot_width * BODY_RATIO).clamp(MIN_BODY_WIDTH, MAX_BODY_WIDTH),
        };

        Ok(ChartFrame::Plotted(Self {
            dimensions,
            plot,
            domain,
            slot_width,
            candles: candle_geometries(&projection, candles),
            price_ticks: price_ticks(&projection),
            time_ticks: time_ticks(&projection, candles),
        }))
    }

    /// Index of the candle slot under `(x, y)`, if the point is inside the plot.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        if self.candles.is_empty() || !self.plot.contains(x, y) {
            return None;
        }
        let slot = ((x - self.plot.left) / self.slot_width).floor() as usize;
        Some(slot.min(self.candles.len() - 1))
    }

    pub fn candle(&self, index: usize) -> Option<&CandleGeometry> {
        self.candles.get(index)
    }

    /// Price at a vertical pixel position, used by the crosshair readout.
    pub fn price_at(&self, y: f64) -> f64 {
        if self.plot.height == 0.0 {
            return self.domain.max;
        }
        self.domain.max - (y - self.plot.top) / self.plot.height * self.domain.span()
    }
}

fn candle_geometries(projection: &Projection, candles: &[Candle]) -> Vec<CandleGeometry> {
    #[cfg(feature = "parallel")]
    if candles.len() >= PARALLEL_THRESHOLD {
        return candles.par_iter().enumerate().map(|(i, c)| projection.candle(i, c)).collect();
    }
    candles.iter().enumerate().map(|(i, c)| projection.candle(i, c)).collect()
}

fn price_ticks(projection: &Projection) -> Vec<PriceTick> {
    let domain = projection.domain;
    let steps = (PRICE_TICK_COUNT - 1) as f64;
    (0..PRICE_TICK_COUNT)
        .map(|i| {
            let price = domain.min + domain.span() * i as f64 / steps;
            PriceTick { price, y: projection.y(price), label: format_axis_price(price) }
        })
        .collect()
}

/// Every `ceil(n / X_LABEL_TARGET)`-th candle gets a label, starting at the first.
fn time_ticks(projection: &Projection, candles: &[Candle]) -> Vec<TimeTick> {
    let step = candles.len().div_ceil(X_LABEL_TARGET).max(1);
    candles
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(index, candle)| TimeTick {
            index,
            x: projection.x(index),
            label: candle.time.as_str().to_string(),
        })
        .collect()
}

/// Close-price polyline for a token's mini chart, scaled to `width x height`
/// with no margins. Non-finite closes are skipped; fewer than two usable
/// points yield an empty line.
pub fn sparkline_points(candles: &[Candle], width: f64, height: f64) -> Vec<(f64, f64)> {
    let closes: Vec<f64> =
        candles.iter().map(|c| c.ohlcv.close.value()).filter(|v| v.is_finite()).collect();
    if closes.len() < 2 {
        return Vec::new();
    }
    let lo = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let domain = PriceDomain::from_bounds(lo, hi);
    let step = width / (closes.len() - 1) as f64;
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| (i as f64 * step, (domain.max - close) / domain.span() * height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_range_uses_fallback_domain() {
        let domain = PriceDomain::from_bounds(50.0, 50.0);
        assert_eq!((domain.min, domain.max), (49.0, 51.0));
        assert!(domain.is_fallback());
    }

    #[test]
    fn padding_is_five_percent_of_range() {
        let domain = PriceDomain::from_bounds(100.0, 200.0);
        assert_eq!((domain.min, domain.max), (95.0, 205.0));
        assert!(!domain.is_fallback());
    }
}
