use market_dashboard_wasm::domain::chart::{ChartDimensions, ChartFrame, ChartLayout, ChartMargins};
use market_dashboard_wasm::domain::market_data::Candle;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

/// Well-formed candles from arbitrary seeds: open/close inside `[low, high]`.
fn candles_from(seeds: &[(u16, u8, u8, bool)]) -> Vec<Candle> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, &(base, spread, body, up))| {
            let low = f64::from(base) / 10.0 + 1.0;
            let high = low + f64::from(spread) / 10.0;
            let inner = (high - low) * f64::from(body) / 255.0;
            let (open, close) = if up { (low, low + inner) } else { (high, high - inner) };
            Candle::from_ohlc(format!("{}", 1_700_000_000 + i * 60), open, high, low, close)
        })
        .collect()
}

fn layout(candles: &[Candle], width: u16, height: u16) -> Option<ChartLayout> {
    let dimensions = ChartDimensions::new(f64::from(width), f64::from(height));
    match ChartLayout::compute(candles, dimensions, ChartMargins::default()) {
        Ok(ChartFrame::Plotted(layout)) => Some(layout),
        _ => None,
    }
}

#[quickcheck]
fn high_never_drawn_below_low(seeds: Vec<(u16, u8, u8, bool)>, width: u16, height: u16) -> TestResult {
    let candles = candles_from(&seeds);
    let Some(layout) = layout(&candles, width, height) else {
        return TestResult::from_bool(candles.is_empty());
    };
    TestResult::from_bool(layout.candles.iter().all(|c| {
        c.high_y() <= c.low_y()
            && c.high_y() <= c.open_y.min(c.close_y) + 1e-9
            && c.open_y.max(c.close_y) <= c.low_y() + 1e-9
    }))
}

#[quickcheck]
fn constant_series_stays_finite(price: u32, len: u8, width: u16, height: u16) -> TestResult {
    if len == 0 {
        return TestResult::discard();
    }
    let price = f64::from(price) / 100.0;
    let candles: Vec<Candle> = (0..len)
        .map(|i| Candle::from_ohlc(format!("{i}"), price, price, price, price))
        .collect();
    let Some(layout) = layout(&candles, width, height) else {
        return TestResult::failed();
    };
    TestResult::from_bool(
        layout.domain.is_fallback()
            && layout.candles.iter().all(|c| {
                [c.x, c.body_left, c.body_top, c.body_height, c.wick_top, c.wick_bottom]
                    .iter()
                    .all(|v| v.is_finite())
            }),
    )
}

#[quickcheck]
fn layout_is_deterministic(seeds: Vec<(u16, u8, u8, bool)>, width: u16, height: u16) -> bool {
    let candles = candles_from(&seeds);
    let dimensions = ChartDimensions::new(f64::from(width), f64::from(height));
    let first = ChartLayout::compute(&candles, dimensions, ChartMargins::default());
    let second = ChartLayout::compute(&candles, dimensions, ChartMargins::default());
    first == second
}

#[quickcheck]
fn every_candle_gets_one_slot(seeds: Vec<(u16, u8, u8, bool)>) -> TestResult {
    if seeds.is_empty() {
        return TestResult::discard();
    }
    let candles = candles_from(&seeds);
    let Some(layout) = layout(&candles, 900, 260) else {
        return TestResult::failed();
    };
    let ordered = layout.candles.windows(2).all(|pair| pair[0].x < pair[1].x);
    TestResult::from_bool(layout.candles.len() == candles.len() && ordered)
}
