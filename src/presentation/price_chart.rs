use leptos::html::Div;
use leptos::*;

use super::app::use_dashboard;
use crate::{
    domain::{
        chart::{Chart, ChartDimensions, ChartFrame, HoverChange, Tooltip},
        logging::{LogComponent, get_logger},
        market_data::{Candle, TimeInterval},
    },
    formatting::format_change,
    infrastructure::rendering::SvgChartRenderer,
    time_utils::format_time_label,
};

/// Width used until the container has been measured
const INITIAL_WIDTH: f64 = 640.0;

/// What the chart surface currently shows
#[derive(Debug, Clone, PartialEq)]
enum Surface {
    Empty,
    Svg(String),
    Failed(String),
}

fn draw(chart: &Chart, renderer: &SvgChartRenderer) -> Surface {
    match chart.frame() {
        Ok(ChartFrame::Empty) => Surface::Empty,
        Ok(frame) => Surface::Svg(renderer.render_frame(frame, &chart.theme)),
        Err(err) => {
            get_logger()
                .warn(LogComponent::Presentation("PriceChart"), &format!("{}: {err}", chart.id));
            Surface::Failed(err.to_string())
        }
    }
}

/// SVG candlestick chart with crosshair and hover readout.
///
/// `candles` is merged into a sliding window of `series_capacity` candles on
/// every change. Hover state is local to this instance.
#[component]
pub fn PriceChart(
    #[prop(into)] candles: Signal<Vec<Candle>>,
    interval: TimeInterval,
    #[prop(into, optional)] id: String,
) -> impl IntoView {
    let ctx = use_dashboard();
    let height = ctx.config.chart_height;
    let renderer = SvgChartRenderer::new(Some(interval));
    let chart = store_value(
        Chart::new(
            id,
            interval,
            ctx.config.series_capacity,
            ChartDimensions::new(INITIAL_WIDTH, height),
        )
        .with_theme(ctx.theme),
    );
    let surface = create_rw_signal(Surface::Empty);
    let tooltip = create_rw_signal(None::<Tooltip>);
    let container = create_node_ref::<Div>();

    let redraw = move || {
        surface.set(chart.with_value(|c| draw(c, &renderer)));
        tooltip.set(None);
    };

    create_effect(move |_| {
        let batch = candles.get();
        let mut taken = 0;
        chart.update_value(|c| taken = c.update(batch));
        if taken > 0 {
            redraw();
        }
    });

    let measure = move || {
        let Some(el) = container.get_untracked() else {
            return;
        };
        let width = f64::from(el.client_width());
        if width <= 0.0 {
            return;
        }
        let mut changed = false;
        chart.update_value(|c| {
            let dimensions = ChartDimensions::new(width, height);
            changed = c.dimensions() != dimensions;
            c.resize(dimensions);
        });
        if changed {
            redraw();
        }
    };
    container.on_load(move |_| measure());
    let resize =
        gloo::events::EventListener::new(&gloo::utils::window(), "resize", move |_| measure());
    on_cleanup(move || drop(resize));

    // Pointer position relative to the wrapper, which the SVG fills from its origin.
    let on_move = move |ev: web_sys::MouseEvent| {
        let Some(el) = container.get_untracked() else {
            return;
        };
        let rect = el.get_bounding_client_rect();
        let x = f64::from(ev.client_x()) - rect.left();
        let y = f64::from(ev.client_y()) - rect.top();
        let mut change = HoverChange::default();
        chart.update_value(|c| change = c.pointer_move(x, y));
        if !change.is_noop() {
            tooltip.set(chart.with_value(Chart::tooltip));
        }
    };
    let on_leave = move |_| {
        chart.update_value(|c| {
            c.pointer_leave();
        });
        tooltip.set(None);
    };

    let crosshair_color = ctx.theme.crosshair.to_css();
    let palette = ctx.palette;

    view! {
        <div class="chart-wrapper" node_ref=container style:height=format!("{height}px")>
            {move || match surface.get() {
                Surface::Empty => {
                    view! { <div class="empty-state">"No price data for this range"</div> }.into_view()
                }
                Surface::Failed(err) => {
                    view! { <div class="empty-state">{format!("Chart unavailable: {err}")}</div> }
                        .into_view()
                }
                Surface::Svg(svg) => {
                    view! {
                        <div inner_html=svg on:mousemove=on_move on:mouseleave=on_leave></div>
                    }
                        .into_view()
                }
            }}
            {move || {
                tooltip
                    .get()
                    .map(|t| {
                        let change_color = palette.change(t.change_percent).to_css();
                        view! {
                            <div
                                class="crosshair"
                                style:left=format!("{:.1}px", t.x)
                                style:background=crosshair_color.clone()
                            ></div>
                            <div
                                class="tooltip mono"
                                style:left=format!("{:.1}px", t.x)
                                style:top=format!("{:.1}px", t.y)
                            >
                                <div>{format_time_label(&t.time, interval)}</div>
                                {t
                                    .rows()
                                    .into_iter()
                                    .map(|(label, value)| {
                                        view! {
                                            <div>
                                                <span class="muted">{label}</span>
                                                " "
                                                {value.to_string()}
                                            </div>
                                        }
                                    })
                                    .collect_view()}
                                <div style:color=change_color>{format_change(t.change_percent)}</div>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
