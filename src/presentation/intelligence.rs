use leptos::*;

use super::app::{DashboardContext, use_dashboard};
use super::{now_ms, stop_on_cleanup};
use crate::{
    application::{
        IntelligenceView, MountGuard, Poller,
        use_cases::{apply_intelligence, fetch_intelligence},
    },
    domain::{
        funding::{FundingFilter, FundingRound},
        state::FetchPhase,
    },
    formatting::{PLACEHOLDER, format_funding_amount},
    time_utils::format_date_relative,
};
use strum::IntoEnumIterator;

const ROWS_SHOWN: usize = 50;
const RWA_SHOWN: usize = 4;

async fn intelligence_cycle(
    ctx: DashboardContext,
    state: RwSignal<IntelligenceView>,
    guard: MountGuard,
) -> u32 {
    let mut proceed = false;
    guard.apply(|| state.update(|view| proceed = view.rounds.begin()));
    if proceed {
        let outcome = fetch_intelligence(ctx.api.as_ref(), &ctx.config).await;
        let now = now_ms();
        guard.apply(|| state.update(|view| apply_intelligence(view, outcome, now)));
    }
    state.try_with_untracked(|view| view.rounds.consecutive_failures()).unwrap_or(0)
}

fn lead_investor(round: &FundingRound) -> String {
    round.investors().next().cloned().unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn amount_text(round: &FundingRound) -> String {
    match round.amount_musd {
        Some(amount) if amount > 0.0 => format_funding_amount(Some(amount)),
        _ => "Undisclosed".to_string(),
    }
}

/// Venture funding intelligence: 90-day stats, filterable deal table and the
/// latest RWA raises.
#[component]
pub fn IntelligencePage() -> impl IntoView {
    let ctx = use_dashboard();
    let palette = ctx.palette;
    let state = create_rw_signal(IntelligenceView::default());

    let policy = ctx.config.retry_policy();
    stop_on_cleanup(Poller::spawn(
        "intelligence",
        move |guard| intelligence_cycle(ctx.clone(), state, guard),
        policy,
    ));

    let now_secs = move || now_ms() / 1000;
    let stats = create_memo(move |_| state.with(|view| view.stats(now_secs())));
    let filter = create_memo(move |_| state.with(|view| view.filter));
    let loading = create_memo(move |_| state.with(|view| view.rounds.is_loading()));
    let failed = create_memo(move |_| {
        state.with(|view| {
            (view.rounds.phase() == FetchPhase::Error)
                .then(|| view.rounds.last_error().unwrap_or_default().to_string())
        })
    });
    let rows = create_memo(move |_| {
        state.with(|view| view.filtered().into_iter().take(ROWS_SHOWN).cloned().collect::<Vec<_>>())
    });
    let rwa = create_memo(move |_| {
        state.with(|view| view.rwa_rounds().into_iter().take(RWA_SHOWN).cloned().collect::<Vec<_>>())
    });

    let stat_card = move |title: &'static str, value: Signal<String>, sub: Signal<String>| {
        view! {
            <div class="card">
                <div class="card-title">{title}</div>
                <div class="big-number">{value}</div>
                <div class="muted">{sub}</div>
            </div>
        }
    };

    view! {
        <div class="intelligence">
            <div class="summary-row">
                {stat_card(
                    "90d Total Raised",
                    Signal::derive(move || {
                        stats.with(|s| format_funding_amount(Some(s.total_amount_musd)))
                    }),
                    Signal::derive(move || format!("{} deals", stats.with(|s| s.total_deals))),
                )}
                {stat_card(
                    "RWA Sector (90d)",
                    Signal::derive(move || {
                        stats.with(|s| format_funding_amount(Some(s.rwa_amount_musd)))
                    }),
                    Signal::derive(move || format!("{} RWA deals", stats.with(|s| s.rwa_deals))),
                )}
                {stat_card(
                    "Most Active VC",
                    Signal::derive(move || {
                        stats.with(|s| {
                            s.top_investor
                                .as_ref()
                                .map(|(name, _)| name.clone())
                                .unwrap_or_else(|| PLACEHOLDER.to_string())
                        })
                    }),
                    Signal::derive(move || {
                        stats.with(|s| {
                            s.top_investor
                                .as_ref()
                                .map(|(_, deals)| format!("{deals} deals"))
                                .unwrap_or_default()
                        })
                    }),
                )}
            </div>

            <div class="status-header">
                <div>
                    {FundingFilter::iter()
                        .map(|f| {
                            view! {
                                <button
                                    class="chip"
                                    class:active=move || filter.get() == f
                                    on:click=move |_| state.update(|view| view.filter = f)
                                >
                                    {f.to_string()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                {move || failed.get().map(|err| view! { <span class="muted">{err}</span> })}
            </div>

            <div class="card" class:stale=move || state.with(|view| view.rounds.is_stale())>
                <table>
                    <thead>
                        <tr class="card-title">
                            <th>"Project"</th>
                            <th>"Round"</th>
                            <th class="right">"Amount"</th>
                            <th>"Lead Investor"</th>
                            <th class="right">"Date"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <Show
                            when=move || !loading.get()
                            fallback=|| view! { <tr><td class="empty-state">"Loading deals"</td></tr> }
                        >
                            {move || {
                                let now = now_secs();
                                rows.get()
                                    .into_iter()
                                    .map(|round| {
                                        let rwa = round.is_rwa_related();
                                        view! {
                                            <tr>
                                                <td>
                                                    <strong>{round.name.clone()}</strong>
                                                    {rwa.then(|| view! {
                                                        <span class="chip" style:color=palette.caution.to_css()>"RWA"</span>
                                                    })}
                                                    <div class="muted">
                                                        {round.sector.clone().or(round.category.clone()).unwrap_or_default()}
                                                    </div>
                                                </td>
                                                <td>{round.round.clone().unwrap_or_else(|| PLACEHOLDER.to_string())}</td>
                                                <td class="right mono">{amount_text(&round)}</td>
                                                <td>{lead_investor(&round)}</td>
                                                <td class="right muted">{format_date_relative(round.date, now)}</td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </Show>
                    </tbody>
                </table>
            </div>

            <div class="card-title">"RWA Funding"</div>
            <div class="grid">
                {move || {
                    let now = now_secs();
                    rwa.get()
                        .into_iter()
                        .map(|round| {
                            view! {
                                <div class="card">
                                    <strong>{round.name.clone()}</strong>
                                    <div class="mono">{amount_text(&round)}</div>
                                    <span class="muted">{format_date_relative(round.date, now)}</span>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </div>
    }
}
