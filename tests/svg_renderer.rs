use market_dashboard_wasm::domain::chart::{
    ChartDimensions, ChartFrame, ChartLayout, ChartMargins, ChartTheme, Color,
};
use market_dashboard_wasm::domain::market_data::{Candle, TimeInterval};
use market_dashboard_wasm::infrastructure::rendering::SvgChartRenderer;

fn frame() -> ChartFrame {
    let candles = vec![
        Candle::from_ohlc("2024-03-05T10:00:00Z", 100.0, 105.0, 98.0, 102.0),
        Candle::from_ohlc("2024-03-05T11:00:00Z", 102.0, 104.0, 99.0, 97.0),
    ];
    ChartLayout::compute(&candles, ChartDimensions::new(900.0, 260.0), ChartMargins::default())
        .expect("valid layout")
}

#[test]
fn same_layout_renders_identical_markup() {
    let renderer = SvgChartRenderer::new(Some(TimeInterval::OneHour));
    let theme = ChartTheme::default();
    assert_eq!(renderer.render_frame(&frame(), &theme), renderer.render_frame(&frame(), &theme));
}

#[test]
fn empty_frame_renders_nothing() {
    let renderer = SvgChartRenderer::default();
    assert_eq!(renderer.render_frame(&ChartFrame::Empty, &ChartTheme::default()), "");
}

#[test]
fn candles_use_theme_colors() {
    let svg = SvgChartRenderer::default().render_frame(&frame(), &ChartTheme::default());

    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains(r##"fill="#22c55e""##));
    assert!(svg.contains(r##"fill="#ef4444""##));
    assert_eq!(svg.matches("<rect").count(), 2);
}

#[test]
fn opaque_background_is_painted() {
    let theme = ChartTheme { background: Color::from_hex(0x0B0B12), ..ChartTheme::default() };
    let svg = SvgChartRenderer::default().render_frame(&frame(), &theme);
    assert!(svg.contains(r##"<rect x="0" y="0" width="900.00" height="260.00" fill="#0b0b12"/>"##));
}

#[test]
fn time_labels_follow_the_interval() {
    let theme = ChartTheme::default();
    let hourly = SvgChartRenderer::new(Some(TimeInterval::OneHour)).render_frame(&frame(), &theme);
    assert!(hourly.contains(">10:00</text>"));
    assert!(hourly.contains(">11:00</text>"));

    let raw = SvgChartRenderer::default().render_frame(&frame(), &theme);
    assert!(raw.contains(">2024-03-05T10:00:00Z</text>"));
}

#[test]
fn sparkline_markup() {
    let candles: Vec<Candle> = [1.0, 2.0, 3.0]
        .iter()
        .enumerate()
        .map(|(i, close)| Candle::from_ohlc(format!("{i}"), *close, *close, *close, *close))
        .collect();
    let svg = SvgChartRenderer::render_sparkline(&candles, 90.0, 30.0, Color::from_hex(0x22C55E));
    insta::assert_snapshot!(svg, @r##"<svg xmlns="http://www.w3.org/2000/svg" width="90.00" height="30.00" viewBox="0 0 90.00 30.00"><polyline points="0.00,28.64 45.00,15.00 90.00,1.36" fill="none" stroke="#22c55e" stroke-width="1.5"/></svg>"##);
}

#[test]
fn sparkline_needs_two_points() {
    let one = [Candle::from_ohlc("0", 1.0, 1.0, 1.0, 1.0)];
    assert_eq!(SvgChartRenderer::render_sparkline(&one, 90.0, 30.0, Color::from_hex(0xFFFFFF)), "");
}
