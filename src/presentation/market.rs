use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use super::app::{DashboardContext, use_dashboard};
use super::price_chart::PriceChart;
use super::{now_ms, stop_on_cleanup};
use crate::{
    application::{
        ApiStatus, ChartCache, MarketView, MountGuard, PollHandle, Poller,
        use_cases::{
            apply_sparklines, apply_token_series, begin_market_overview, fetch_market_overview,
            fetch_sparklines, fetch_token_series, universe_symbols,
        },
    },
    domain::{
        defi::ProtocolTvl,
        logging::{LogComponent, get_logger},
        market_data::{Mover, Symbol, Token, TokenCategory, find_token, tokens_in},
        sentiment::fear_greed_tone,
        state::SourceState,
    },
    formatting::{PLACEHOLDER, format_change, format_price, format_tvl, format_volume},
    infrastructure::rendering::SvgChartRenderer,
    time_utils::format_clock,
};
use strum::IntoEnumIterator;

const SPARKLINE_WIDTH: f64 = 96.0;
const SPARKLINE_HEIGHT: f64 = 28.0;
const TOP_PROTOCOLS: usize = 8;
const MOVERS_SHOWN: usize = 5;

/// One market tick: prices always, side panels and sparklines when `full`.
/// Resolves to the worst failure streak so the poller can back off.
async fn market_cycle(
    ctx: DashboardContext,
    state: RwSignal<MarketView>,
    guard: MountGuard,
    full: bool,
) -> u32 {
    let mut proceed = false;
    guard.apply(|| state.update(|view| proceed = begin_market_overview(view, full)));
    if proceed {
        let update = fetch_market_overview(ctx.api.as_ref(), &ctx.config, full).await;
        let now = now_ms();
        guard.apply(|| state.update(|view| update.apply(view, now)));

        if full {
            let series = fetch_sparklines(ctx.api.as_ref(), &universe_symbols(), &ctx.config).await;
            guard.apply(|| state.update(|view| apply_sparklines(view, series)));
        }
    }
    state.try_with_untracked(MarketView::failures).unwrap_or(0)
}

fn spawn_market_poller(
    ctx: DashboardContext,
    state: RwSignal<MarketView>,
    initial_full: bool,
) -> PollHandle {
    let policy = ctx.config.retry_policy();
    let mut full = initial_full;
    Poller::spawn(
        "market",
        move |guard| {
            let tick_full = std::mem::replace(&mut full, false);
            market_cycle(ctx.clone(), state, guard, tick_full)
        },
        policy,
    )
}

async fn token_series_cycle(
    ctx: DashboardContext,
    cache: RwSignal<ChartCache>,
    symbol: Symbol,
    guard: MountGuard,
) -> u32 {
    let mut proceed = false;
    guard.apply(|| cache.update(|c| proceed = c.entry(&symbol).begin()));
    if proceed {
        let outcome = fetch_token_series(ctx.api.as_ref(), &symbol, &ctx.config).await;
        let now = now_ms();
        guard.apply(|| cache.update(|c| apply_token_series(c, &symbol, outcome, now)));
    }
    cache
        .try_with_untracked(|c| c.get(&symbol).map_or(0, SourceState::consecutive_failures))
        .unwrap_or(0)
}

/// Market overview: status bar, headline cards, token list with detail chart,
/// DeFi protocols and market movers.
#[component]
pub fn MarketDashboard() -> impl IntoView {
    let ctx = use_dashboard();
    let state = create_rw_signal(MarketView::new());
    let cache = create_rw_signal(ChartCache::default());
    let mounted = MountGuard::new();
    let live_poll: Rc<RefCell<Option<PollHandle>>> = Rc::default();

    *live_poll.borrow_mut() = Some(spawn_market_poller(ctx.clone(), state, true));
    {
        let live_poll = live_poll.clone();
        let mounted = mounted.clone();
        on_cleanup(move || {
            mounted.unmount();
            live_poll.borrow_mut().take();
        });
    }

    let toggle_live = {
        let ctx = ctx.clone();
        move |_| {
            let live = !state.with_untracked(|view| view.live);
            state.update(|view| view.live = live);
            get_logger().info(
                LogComponent::Presentation("MarketDashboard"),
                if live { "live updates resumed" } else { "live updates paused" },
            );
            // Replacing the handle drops, and so aborts, the previous loop.
            live_poll.borrow_mut().take();
            state.update(MarketView::cancel_pending);
            *live_poll.borrow_mut() = live.then(|| spawn_market_poller(ctx.clone(), state, false));
        }
    };

    let refresh = {
        let ctx = ctx.clone();
        move |_| {
            let cycle = market_cycle(ctx.clone(), state, mounted.clone(), true);
            spawn_local(async move {
                cycle.await;
            });
        }
    };

    let status = create_memo(move |_| state.with(MarketView::api_status));
    let updated_at = create_memo(move |_| state.with(|view| view.prices.updated_at()));
    let live = create_memo(move |_| state.with(|view| view.live));
    let category = create_memo(move |_| state.with(|view| view.category));
    let palette = ctx.palette;

    view! {
        <div class="market">
            <div class="status-header">
                <div
                    class="mono"
                    style:color=move || match status.get() {
                        ApiStatus::Live => palette.positive.to_css(),
                        ApiStatus::Error => palette.negative.to_css(),
                        ApiStatus::Connecting => palette.caution.to_css(),
                    }
                >
                    {move || status.get().to_string().to_uppercase()}
                </div>
                <span class="muted mono">
                    {move || updated_at.get().map(format_clock).unwrap_or_default()}
                </span>
                <button class="toggle" class:active=move || live.get() on:click=toggle_live>
                    {move || if live.get() { "LIVE" } else { "PAUSED" }}
                </button>
                <button class="toggle" on:click=refresh>"Refresh"</button>
            </div>

            <SummaryRow state=state/>

            <div class="status-header">
                <div>
                    <button
                        class="chip"
                        class:active=move || category.get().is_none()
                        on:click=move |_| state.update(|view| {
                            view.category = None;
                            view.selected = None;
                        })
                    >
                        "All"
                    </button>
                    {TokenCategory::iter()
                        .map(|c| {
                            view! {
                                <button
                                    class="chip"
                                    class:active=move || category.get() == Some(c)
                                    on:click=move |_| state.update(|view| {
                                        view.category = Some(c);
                                        view.selected = None;
                                    })
                                >
                                    {c.to_string()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                <span class="muted mono">
                    {move || format!("{} assets", tokens_in(category.get()).count())}
                </span>
            </div>

            <div class="card" class:stale=move || state.with(|view| view.prices.is_stale())>
                <div class="token-row card-title">
                    <span>"Asset"</span>
                    <span class="right">"Price"</span>
                    <span class="right">"24h Change"</span>
                    <span class="right">"Volume"</span>
                    <span class="right">"Trend"</span>
                </div>
                {move || {
                    tokens_in(category.get())
                        .map(|token| view! { <TokenRow token=token state=state cache=cache/> })
                        .collect_view()
                }}
            </div>

            <DefiProtocols state=state/>
            <MoversPanel state=state/>
        </div>
    }
}

#[component]
fn SummaryRow(state: RwSignal<MarketView>) -> impl IntoView {
    let palette = use_dashboard().palette;
    let fear_greed = create_memo(move |_| state.with(|view| view.fear_greed.data().cloned()));
    let defi_headline = create_memo(move |_| {
        state.with(|view| {
            view.defi.data().map(|d| {
                d.total_tvl_formatted.clone().unwrap_or_else(|| format_tvl(Some(d.total_tvl_usd)))
            })
        })
    });
    let best = create_memo(move |_| {
        state.with(|view| {
            view.prices
                .data()
                .and_then(|board| board.extremes())
                .map(|(best, _)| (best.symbol.clone(), best.change_24h))
        })
    });
    let worst = create_memo(move |_| {
        state.with(|view| {
            view.prices
                .data()
                .and_then(|board| board.extremes())
                .map(|(_, worst)| (worst.symbol.clone(), worst.change_24h))
        })
    });

    view! {
        <div class="summary-row">
            <div class="card">
                <div class="card-title">"Fear & Greed"</div>
                {move || match fear_greed.get().and_then(|index| {
                    let trend = index.trend();
                    index.current.map(|reading| (reading, trend))
                }) {
                    Some((reading, trend)) => {
                        let color = palette.tone(fear_greed_tone(reading.value)).to_css();
                        view! {
                            <div>
                                <span class="big-number" style:color=color.clone()>
                                    {reading.value}
                                </span>
                                " "
                                <span style:color=color>{reading.label}</span>
                                <div class="muted">
                                    {trend.map(|t| format!("trend {t:+}")).unwrap_or_default()}
                                </div>
                            </div>
                        }
                            .into_view()
                    }
                    None => view! { <div class="muted">{PLACEHOLDER}</div> }.into_view(),
                }}
            </div>
            <div class="card">
                <div class="card-title">"DeFi TVL"</div>
                <div class="big-number">
                    {move || defi_headline.get().unwrap_or_else(|| PLACEHOLDER.to_string())}
                </div>
            </div>
            <Performer title="Top Gainer (24h)" entry=best/>
            <Performer title="Top Loser (24h)" entry=worst/>
        </div>
    }
}

#[component]
fn Performer(title: &'static str, entry: Memo<Option<(Symbol, Option<f64>)>>) -> impl IntoView {
    let palette = use_dashboard().palette;

    view! {
        <div class="card">
            <div class="card-title">{title}</div>
            {move || match entry.get() {
                Some((symbol, change)) => {
                    let name = find_token(symbol.value()).map(|t| t.name).unwrap_or_default();
                    view! {
                        <div>
                            <strong>{symbol.to_string()}</strong>
                            " "
                            <span class="mono" style:color=palette.change(change).to_css()>
                                {format_change(change)}
                            </span>
                            <div class="muted">{name}</div>
                        </div>
                    }
                        .into_view()
                }
                None => view! { <div class="muted">{PLACEHOLDER}</div> }.into_view(),
            }}
        </div>
    }
}

#[component]
fn TokenRow(
    token: &'static Token,
    state: RwSignal<MarketView>,
    cache: RwSignal<ChartCache>,
) -> impl IntoView {
    let palette = use_dashboard().palette;
    let symbol = token.symbol();

    let snapshot = {
        let symbol = symbol.clone();
        create_memo(move |_| {
            state.with(|view| view.prices.data().and_then(|board| board.get(&symbol).cloned()))
        })
    };
    let sparkline = {
        let symbol = symbol.clone();
        create_memo(move |_| state.with(|view| view.sparkline(&symbol).to_vec()))
    };
    let is_selected = {
        let symbol = symbol.clone();
        create_memo(move |_| state.with(|view| view.selected.as_ref() == Some(&symbol)))
    };
    let change = move || snapshot.with(|s| s.as_ref().and_then(|s| s.change_24h));

    let toggle = move |_| {
        state.update(|view| {
            view.selected =
                if view.selected.as_ref() == Some(&symbol) { None } else { Some(symbol.clone()) };
        })
    };

    view! {
        <div class="token-row" class:selected=move || is_selected.get() on:click=toggle>
            <div>
                <span
                    class="token-avatar mono"
                    style:background=format!("{}18", token.color)
                    style:color=token.color
                >
                    {token.initials()}
                </span>
                <strong>{token.symbol}</strong>
                " "
                <span class="muted">{format!("{} · {}", token.name, token.category)}</span>
            </div>
            <span class="right mono">
                {move || snapshot.with(|s| format_price(s.as_ref().map(|s| s.price.value())))}
            </span>
            <span class="right mono" style:color=move || palette.change(change()).to_css()>
                {move || format_change(change())}
            </span>
            <span class="right mono muted">
                {move || {
                    snapshot.with(|s| format_volume(s.as_ref().and_then(|s| s.volume_24h).map(|v| v.value())))
                }}
            </span>
            <div
                class="right"
                inner_html=move || {
                    sparkline.with(|candles| {
                        SvgChartRenderer::render_sparkline(
                            candles,
                            SPARKLINE_WIDTH,
                            SPARKLINE_HEIGHT,
                            palette.change(change()),
                        )
                    })
                }
            ></div>
        </div>
        {move || {
            is_selected.get().then(|| view! { <TokenDetail token=token state=state cache=cache/> })
        }}
    }
}

/// Expanded row: 24h ranges plus the polled detail chart.
#[component]
fn TokenDetail(
    token: &'static Token,
    state: RwSignal<MarketView>,
    cache: RwSignal<ChartCache>,
) -> impl IntoView {
    let ctx = use_dashboard();
    let symbol = token.symbol();
    let interval = ctx.config.ohlcv_interval;

    let policy = ctx.config.retry_policy();
    let handle = {
        let symbol = symbol.clone();
        Poller::spawn(
            "token-series",
            move |guard| token_series_cycle(ctx.clone(), cache, symbol.clone(), guard),
            policy,
        )
    };
    stop_on_cleanup(handle);
    {
        let symbol = symbol.clone();
        on_cleanup(move || {
            cache.try_update(|c| c.entry(&symbol).cancel());
        });
    }

    let candles = {
        let symbol = symbol.clone();
        create_memo(move |_| cache.with(|c| c.candles(&symbol).to_vec()))
    };
    let series_error = {
        let symbol = symbol.clone();
        create_memo(move |_| {
            cache.with(|c| c.get(&symbol).and_then(|s| s.last_error().map(str::to_string)))
        })
    };
    let ranges = create_memo(move |_| {
        state.with(|view| {
            view.prices.data().and_then(|board| board.get(&symbol)).map(|s| {
                (s.high_24h.map(|p| p.value()), s.low_24h.map(|p| p.value()))
            })
        })
    });

    view! {
        <div class="card">
            <div class="status-header">
                <div>
                    <strong>{token.name}</strong>
                    " "
                    <span class="muted">{format!("{}/USDT · {}", token.symbol, interval)}</span>
                </div>
                <span class="muted mono">
                    {move || {
                        let (high, low) = ranges.get().unwrap_or_default();
                        format!("24h H {} · L {}", format_price(high), format_price(low))
                    }}
                </span>
                <button
                    class="chip"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        state.update(|view| view.selected = None);
                    }
                >
                    "Close"
                </button>
            </div>
            <PriceChart candles=candles interval=interval id=format!("chart-{}", token.symbol)/>
            {move || {
                series_error.get().map(|err| view! { <div class="muted">{format!("Refresh failed: {err}")}</div> })
            }}
        </div>
    }
}

#[component]
fn DefiProtocols(state: RwSignal<MarketView>) -> impl IntoView {
    let palette = use_dashboard().palette;
    let protocols = create_memo(move |_| {
        state.with(|view| view.defi.data().map(|d| d.top(TOP_PROTOCOLS).to_vec()).unwrap_or_default())
    });

    view! {
        <Show when=move || protocols.with(|p| !p.is_empty())>
            <div class="card-title">"Top Protocols by TVL"</div>
            <div class="grid">
                <For
                    each=move || protocols.get()
                    key=|p: &ProtocolTvl| p.name.clone()
                    children=move |p| {
                        view! {
                            <div class="card">
                                <strong>{p.name.clone()}</strong>
                                <div class="mono">{format_tvl(Some(p.tvl))}</div>
                                <span class="muted">{p.category.clone().unwrap_or_default()}</span>
                                " "
                                <span class="mono" style:color=palette.change(p.change_1d).to_css()>
                                    {p.change_1d.map(|c| format_change(Some(c))).unwrap_or_default()}
                                </span>
                            </div>
                        }
                    }
                />
            </div>
        </Show>
    }
}

#[component]
fn MoversPanel(state: RwSignal<MarketView>) -> impl IntoView {
    let palette = use_dashboard().palette;
    let movers = create_memo(move |_| state.with(|view| view.movers.data().cloned()));

    let column = move |title: &'static str, rows: Vec<Mover>| {
        view! {
            <div class="card">
                <div class="card-title">{title}</div>
                {rows
                    .into_iter()
                    .take(MOVERS_SHOWN)
                    .map(|m| {
                        view! {
                            <div class="status-header">
                                <strong>{m.symbol.to_string()}</strong>
                                <span class="mono">{format_price(Some(m.price.value()))}</span>
                                <span class="mono" style:color=palette.change(Some(m.change_pct)).to_css()>
                                    {format_change(Some(m.change_pct))}
                                </span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        }
    };

    move || {
        movers.get().filter(|m| !m.gainers.is_empty() || !m.losers.is_empty()).map(|m| {
            view! {
                <div class="summary-row">
                    {column("Top Gainers", m.gainers)}
                    {column("Top Losers", m.losers)}
                </div>
            }
        })
    }
}
