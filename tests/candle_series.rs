use market_dashboard_wasm::domain::market_data::{Candle, CandleSeries};

fn candle(time: &str, close: f64) -> Candle {
    Candle::from_ohlc(time, close, close + 1.0, close - 1.0, close)
}

#[test]
fn series_keeps_the_newest_candles() {
    let mut series = CandleSeries::new(3);
    for (i, time) in ["01", "02", "03", "04", "05"].iter().enumerate() {
        series.push(candle(time, i as f64));
    }

    assert_eq!(series.count(), 3);
    assert_eq!(series.oldest().map(|c| c.time.as_str()), Some("03"));
    assert_eq!(series.latest().map(|c| c.time.as_str()), Some("05"));
}

#[test]
fn same_bucket_replaces_the_last_candle() {
    let mut series = CandleSeries::new(10);
    series.push(candle("01", 1.0));
    series.push(candle("02", 2.0));
    assert!(series.push(candle("02", 2.5)));

    assert_eq!(series.count(), 2);
    assert_eq!(series.latest_price().map(|p| p.value()), Some(2.5));
}

#[test]
fn older_candles_are_ignored() {
    let mut series = CandleSeries::new(10);
    series.push(candle("05", 5.0));
    assert!(!series.push(candle("04", 4.0)));
    assert_eq!(series.count(), 1);
}

#[test]
fn merge_counts_taken_candles() {
    let mut series = CandleSeries::seeded(10, vec![candle("01", 1.0), candle("02", 2.0)]);
    let taken = series.merge(vec![candle("01", 9.0), candle("02", 2.2), candle("03", 3.0)]);

    assert_eq!(taken, 2);
    assert_eq!(series.count(), 3);
}

#[test]
fn seeding_trims_to_capacity() {
    let candles: Vec<Candle> = (0..20).map(|i| candle(&format!("{i:02}"), i as f64)).collect();
    let series = CandleSeries::seeded(5, candles);

    assert_eq!(series.count(), 5);
    assert_eq!(series.capacity(), 5);
    assert_eq!(series.oldest().map(|c| c.time.as_str()), Some("15"));
}

#[test]
fn price_range_covers_every_candle() {
    let series = CandleSeries::seeded(10, vec![candle("01", 10.0), candle("02", 20.0)]);
    assert_eq!(series.price_range(), Some((9.0, 21.0)));
    assert_eq!(CandleSeries::new(4).price_range(), None);
}

#[test]
fn change_percent_needs_a_nonzero_open() {
    let up = Candle::from_ohlc("01", 100.0, 110.0, 95.0, 105.0);
    assert!((up.change_percent().unwrap_or_default() - 5.0).abs() < 1e-9);
    assert!(up.is_bullish());
    assert_eq!(Candle::from_ohlc("01", 0.0, 1.0, 0.0, 1.0).change_percent(), None);
    // ties count as bullish
    assert!(Candle::from_ohlc("01", 3.0, 3.0, 3.0, 3.0).is_bullish());
}
