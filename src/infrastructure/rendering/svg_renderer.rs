use crate::domain::chart::{ChartFrame, ChartLayout, ChartTheme, Color, sparkline_points};
use crate::domain::market_data::{Candle, TimeInterval};
use crate::time_utils::format_time_label;
use std::fmt::Write;

/// Fixed-precision coordinate so equal layouts give byte-identical markup.
fn px(value: f64) -> String {
    format!("{value:.2}")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Turns a `ChartLayout` into standalone SVG markup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgChartRenderer {
    /// Formats time labels; raw labels are printed when `None`
    pub label_interval: Option<TimeInterval>,
    pub font_size: f64,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self { label_interval: None, font_size: 10.0 }
    }
}

impl SvgChartRenderer {
    pub fn new(label_interval: Option<TimeInterval>) -> Self {
        Self { label_interval, ..Self::default() }
    }

    /// Empty frames render to an empty string; the caller shows its own empty state.
    pub fn render_frame(&self, frame: &ChartFrame, theme: &ChartTheme) -> String {
        frame.layout().map(|layout| self.render(layout, theme)).unwrap_or_default()
    }

    pub fn render(&self, layout: &ChartLayout, theme: &ChartTheme) -> String {
        let (w, h) = (layout.dimensions.width, layout.dimensions.height);
        let mut svg = String::with_capacity(256 + layout.candles.len() * 160);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            px(w),
            px(h),
            px(w),
            px(h)
        );
        if theme.background.a > 0.0 {
            let _ = write!(
                svg,
                r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
                px(w),
                px(h),
                theme.background.to_css()
            );
        }
        self.write_grid(&mut svg, layout, theme);
        self.write_time_labels(&mut svg, layout, theme);
        Self::write_candles(&mut svg, layout, theme);
        svg.push_str("</svg>");
        svg
    }

    fn write_grid(&self, svg: &mut String, layout: &ChartLayout, theme: &ChartTheme) {
        let plot = &layout.plot;
        let grid = theme.grid.to_css();
        let text = theme.axis_text.to_css();
        svg.push_str(r#"<g class="grid">"#);
        for tick in &layout.price_ticks {
            let _ = write!(
                svg,
                r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{grid}" stroke-width="1"/>"#,
                px(plot.left),
                px(plot.right()),
                y = px(tick.y),
            );
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" fill="{text}" font-size="{}" text-anchor="end">{}</text>"#,
                px(plot.left - 6.0),
                px(tick.y + self.font_size * 0.35),
                px(self.font_size),
                escape(&tick.label),
            );
        }
        svg.push_str("</g>");
    }

    fn write_time_labels(&self, svg: &mut String, layout: &ChartLayout, theme: &ChartTheme) {
        let text = theme.axis_text.to_css();
        let y = layout.plot.bottom() + self.font_size + 6.0;
        svg.push_str(r#"<g class="time-axis">"#);
        for tick in &layout.time_ticks {
            let label = match self.label_interval {
                Some(interval) => format_time_label(&tick.label, interval),
                None => tick.label.clone(),
            };
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" fill="{text}" font-size="{}" text-anchor="middle">{}</text>"#,
                px(tick.x),
                px(y),
                px(self.font_size),
                escape(&label),
            );
        }
        svg.push_str("</g>");
    }

    fn write_candles(svg: &mut String, layout: &ChartLayout, theme: &ChartTheme) {
        let bullish = theme.bullish.to_css();
        let bearish = theme.bearish.to_css();
        svg.push_str(r#"<g class="candles">"#);
        for candle in &layout.candles {
            let color = if candle.bullish { &bullish } else { &bearish };
            let _ = write!(
                svg,
                r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{color}" stroke-width="1"/>"#,
                px(candle.wick_top),
                px(candle.wick_bottom),
                x = px(candle.x),
            );
            let _ = write!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{color}"/>"#,
                px(candle.body_left),
                px(candle.body_top),
                px(candle.body_width),
                px(candle.body_height),
            );
        }
        svg.push_str("</g>");
    }

    /// Mini close-price line used in the token list.
    pub fn render_sparkline(candles: &[Candle], width: f64, height: f64, color: Color) -> String {
        let points = sparkline_points(candles, width, height);
        if points.is_empty() {
            return String::new();
        }
        let path = points
            .iter()
            .map(|(x, y)| format!("{},{}", px(*x), px(*y)))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><polyline points="{path}" fill="none" stroke="{}" stroke-width="1.5"/></svg>"#,
            color.to_css(),
            w = px(width),
            h = px(height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_label_markup() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
