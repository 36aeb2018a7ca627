use super::hover::{HoverChange, HoverState, Tooltip};
use super::layout::{ChartFrame, ChartLayout};
use super::value_objects::{ChartDimensions, ChartMargins, ChartTheme};
use crate::domain::errors::ChartResult;
use crate::domain::market_data::{Candle, CandleSeries, TimeInterval};

/// Domain entity - Chart
///
/// One candlestick chart instance: its data window, surface size, theme and
/// hover state. The frame is recomputed whenever data or size change, and the
/// hover is reset with it so a stale index never points past the new data.
#[derive(Debug, Clone)]
pub struct Chart {
    pub id: String,
    pub interval: TimeInterval,
    pub theme: ChartTheme,
    series: CandleSeries,
    dimensions: ChartDimensions,
    margins: ChartMargins,
    frame: ChartResult<ChartFrame>,
    hover: HoverState,
}

impl Chart {
    pub fn new(
        id: String,
        interval: TimeInterval,
        max_candles: usize,
        dimensions: ChartDimensions,
    ) -> Self {
        let mut chart = Self {
            id,
            interval,
            theme: ChartTheme::default(),
            series: CandleSeries::new(max_candles),
            dimensions,
            margins: ChartMargins::default(),
            frame: Ok(ChartFrame::Empty),
            hover: HoverState::new(),
        };
        chart.relayout();
        chart
    }

    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Replace the whole window, e.g. after a symbol or interval switch.
    pub fn set_candles(&mut self, candles: impl IntoIterator<Item = Candle>) {
        self.series = CandleSeries::seeded(self.series.capacity(), candles);
        self.relayout();
    }

    /// Merge a freshly polled batch into the window.
    pub fn update(&mut self, batch: impl IntoIterator<Item = Candle>) -> usize {
        let taken = self.series.merge(batch);
        if taken > 0 {
            self.relayout();
        }
        taken
    }

    pub fn resize(&mut self, dimensions: ChartDimensions) {
        if self.dimensions != dimensions {
            self.dimensions = dimensions;
            self.relayout();
        }
    }

    pub fn series(&self) -> &CandleSeries {
        &self.series
    }

    pub fn dimensions(&self) -> ChartDimensions {
        self.dimensions
    }

    pub fn frame(&self) -> &ChartResult<ChartFrame> {
        &self.frame
    }

    pub fn layout(&self) -> Option<&ChartLayout> {
        self.frame.as_ref().ok().and_then(ChartFrame::layout)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> HoverChange {
        match self.frame.as_ref().ok().and_then(ChartFrame::layout) {
            Some(layout) => self.hover.pointer_move(layout, x, y),
            None => self.hover.leave(),
        }
    }

    pub fn pointer_leave(&mut self) -> HoverChange {
        self.hover.leave()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover.hovered()
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        let index = self.hover.hovered()?;
        let geometry = self.layout()?.candle(index)?;
        let candle = self.series.iter().nth(index)?;
        Some(Tooltip::for_candle(candle, geometry))
    }

    fn relayout(&mut self) {
        let candles = self.series.to_vec();
        self.frame = ChartLayout::compute(&candles, self.dimensions, self.margins);
        self.hover.leave();
    }
}
