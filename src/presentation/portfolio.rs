use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use super::app::{DashboardContext, use_dashboard};
use super::now_ms;
use crate::{
    application::{
        MountGuard, PollHandle, Poller, PortfolioView,
        use_cases::{begin_portfolio, fetch_portfolio},
    },
    domain::{
        market_data::find_token,
        portfolio::{AllocationWeight, AssetStats, PortfolioAllocation, PortfolioStrategy},
        sentiment::MmiReading,
        state::SourceState,
    },
    formatting::{
        PLACEHOLDER, format_fixed, format_multiplier, format_percent, format_percent_weight,
        format_price,
    },
};
use strum::IntoEnumIterator;

/// Bar color for assets outside the token universe
const FALLBACK_ASSET_COLOR: &str = "#6366F1";

async fn portfolio_cycle(
    ctx: DashboardContext,
    state: RwSignal<PortfolioView>,
    guard: MountGuard,
) -> u32 {
    let mut strategy = None;
    guard.apply(|| {
        state.update(|view| {
            if begin_portfolio(view) {
                strategy = Some(view.strategy);
            }
        })
    });
    if let Some(strategy) = strategy {
        let update = fetch_portfolio(ctx.api.as_ref(), &ctx.config, strategy).await;
        let now = now_ms();
        guard.apply(|| state.update(|view| update.apply(view, now)));
    }
    state.try_with_untracked(PortfolioView::failures).unwrap_or(0)
}

fn spawn_portfolio_poller(ctx: DashboardContext, state: RwSignal<PortfolioView>) -> PollHandle {
    let policy = ctx.config.retry_policy();
    Poller::spawn("portfolio", move |guard| portfolio_cycle(ctx.clone(), state, guard), policy)
}

/// Placeholder line for a source with nothing to show yet.
fn pending_text<T>(source: &SourceState<T>) -> &'static str {
    if source.is_loading() { "Loading..." } else { "Unavailable" }
}

/// Portfolio view: mood gauge, per-asset stats and the optimizer allocation.
#[component]
pub fn PortfolioPage() -> impl IntoView {
    let ctx = use_dashboard();
    let state = create_rw_signal(PortfolioView::default());
    let poll: Rc<RefCell<Option<PollHandle>>> = Rc::default();

    *poll.borrow_mut() = Some(spawn_portfolio_poller(ctx.clone(), state));
    {
        let poll = poll.clone();
        on_cleanup(move || {
            poll.borrow_mut().take();
        });
    }

    let select_strategy = Callback::new(move |strategy: PortfolioStrategy| {
        if state.with_untracked(|view| view.strategy) == strategy {
            return;
        }
        poll.borrow_mut().take();
        state.update(|view| {
            view.cancel_pending();
            view.strategy = strategy;
        });
        *poll.borrow_mut() = Some(spawn_portfolio_poller(ctx.clone(), state));
    });

    let mmi = create_memo(move |_| state.with(|view| view.mmi.clone()));
    let stats = create_memo(move |_| state.with(|view| view.stats.clone()));
    let allocation = create_memo(move |_| state.with(|view| view.allocation.clone()));
    let strategy = create_memo(move |_| state.with(|view| view.strategy));

    view! {
        <div class="summary-row">
            <div class="card">
                <div class="card-title">"Market Mood Index"</div>
                <MmiGauge source=mmi/>
            </div>
            <div class="card" style="grid-column: span 3">
                <div class="card-title">"Assets (90d)"</div>
                <AssetTable source=stats/>
            </div>
        </div>
        <div class="card">
            <div class="card-title">"Allocation"</div>
            <PortfolioAllocationView source=allocation strategy=strategy on_select=select_strategy/>
        </div>
    }
}

/// Composite mood score colored by band, with its headline components.
#[component]
pub fn MmiGauge(#[prop(into)] source: Signal<SourceState<MmiReading>>) -> impl IntoView {
    let palette = use_dashboard().palette;

    move || {
        source.with(|state| match state.data() {
            Some(reading) => {
                let color = palette.mood(reading.band()).to_css();
                let change_30d = reading.component("price_change_30d");
                view! {
                    <div class:stale=state.is_stale()>
                        <div class="big-number" style:color=color>
                            {format_fixed(Some(reading.score), 1)}
                        </div>
                        <div class="muted">{reading.signal.clone()}</div>
                        <table>
                            <tr>
                                <td class="muted">"Fear & Greed"</td>
                                <td class="right mono">
                                    {reading
                                        .component("fear_greed")
                                        .map(|v| format_fixed(Some(v), 0))
                                        .or_else(|| reading.fear_greed_label.clone())
                                        .unwrap_or_else(|| PLACEHOLDER.to_string())}
                                </td>
                            </tr>
                            <tr>
                                <td class="muted">"30d Change"</td>
                                <td class="right mono" style:color=palette.change(change_30d).to_css()>
                                    {format_percent(change_30d, 1)}
                                </td>
                            </tr>
                            <tr>
                                <td class="muted">"Volume Ratio"</td>
                                <td class="right mono">
                                    {format_multiplier(reading.component("vol_ratio"))}
                                </td>
                            </tr>
                        </table>
                    </div>
                }
                    .into_view()
            }
            None => view! { <div class="muted">{pending_text(state)}</div> }.into_view(),
        })
    }
}

/// Price, 90d return, volatility and Sharpe per asset.
#[component]
pub fn AssetTable(#[prop(into)] source: Signal<SourceState<Vec<AssetStats>>>) -> impl IntoView {
    let palette = use_dashboard().palette;

    move || {
        source.with(|state| match state.data().filter(|rows| !rows.is_empty()) {
            Some(rows) => view! {
                <table class:stale=state.is_stale()>
                    <thead>
                        <tr class="card-title">
                            <th>"Asset"</th>
                            <th class="right">"Price"</th>
                            <th class="right">"90d Return"</th>
                            <th class="right">"Volatility"</th>
                            <th class="right">"Sharpe"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {rows
                            .iter()
                            .map(|row| {
                                view! {
                                    <tr>
                                        <td><strong>{row.asset.to_string()}</strong></td>
                                        <td class="right mono">
                                            {format_price(row.price.map(|p| p.value()))}
                                        </td>
                                        <td class="right mono" style:color=palette.change(row.return_90d).to_css()>
                                            {format_percent(row.return_90d, 1)}
                                        </td>
                                        <td class="right mono" style:color=palette.caution.to_css()>
                                            {format_percent(row.volatility, 1)}
                                        </td>
                                        <td class="right mono" style:color=palette.change(row.sharpe).to_css()>
                                            {format_fixed(row.sharpe, 2)}
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            }
                .into_view(),
            None => view! { <div class="muted">{pending_text(state)}</div> }.into_view(),
        })
    }
}

fn weight_bar(weight: &AllocationWeight) -> impl IntoView {
    let color = find_token(weight.asset.value()).map_or(FALLBACK_ASSET_COLOR, |t| t.color);
    let percent = format_percent_weight(weight.weight);
    view! {
        <div>
            <div class="status-header">
                <span>{weight.asset.to_string()}</span>
                <span class="mono">{percent.clone()}</span>
            </div>
            <div class="bar-track">
                <div
                    class="bar-fill"
                    style:width=format!("{:.1}%", (weight.weight * 100.0).clamp(0.0, 100.0))
                    style:background=color
                ></div>
            </div>
        </div>
    }
}

/// Weight bars sorted largest first, optimizer metrics and the strategy selector.
#[component]
pub fn PortfolioAllocationView(
    #[prop(into)] source: Signal<SourceState<PortfolioAllocation>>,
    #[prop(into)] strategy: Signal<PortfolioStrategy>,
    on_select: Callback<PortfolioStrategy>,
) -> impl IntoView {
    view! {
        <div class="status-header">
            <div>
                {PortfolioStrategy::iter()
                    .map(|s| {
                        view! {
                            <button
                                class="chip"
                                class:active=move || strategy.get() == s
                                on:click=move |_| on_select.call(s)
                            >
                                {s.to_string()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
        {move || {
            source.with(|state| match state.data().filter(|a| !a.is_empty()) {
                Some(allocation) => {
                    let metrics = &allocation.metrics;
                    view! {
                        <div class:stale=state.is_stale()>
                            {allocation.weights().iter().map(weight_bar).collect_view()}
                            <div class="status-header muted mono">
                                <span>
                                    {format!("Return {}", format_percent(metrics.expected_annual_return, 1))}
                                </span>
                                <span>
                                    {format!("Volatility {}", format_percent(metrics.annual_volatility, 1))}
                                </span>
                                <span>{format!("Sharpe {}", format_fixed(metrics.sharpe_ratio, 2))}</span>
                            </div>
                        </div>
                    }
                        .into_view()
                }
                None => view! { <div class="muted">{pending_text(state)}</div> }.into_view(),
            })
        }}
    }
}
