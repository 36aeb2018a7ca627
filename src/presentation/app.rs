use leptos::*;
use std::rc::Rc;

use super::intelligence::IntelligencePage;
use super::market::MarketDashboard;
use super::portfolio::PortfolioPage;
use crate::{
    config::DashboardConfig,
    domain::{
        chart::{ChartTheme, Palette},
        logging::{LogComponent, get_logger},
    },
    infrastructure::http::HttpDashboardApi,
};
use derive_more::Display;
use strum::{EnumIter, IntoEnumIterator};

/// Shared handles every view reads from context
#[derive(Clone)]
pub struct DashboardContext {
    pub config: Rc<DashboardConfig>,
    pub api: Rc<HttpDashboardApi>,
    pub palette: Palette,
    pub theme: ChartTheme,
}

impl DashboardContext {
    pub fn new(config: DashboardConfig) -> Self {
        let api = HttpDashboardApi::new(config.api_base.clone());
        Self {
            config: Rc::new(config),
            api: Rc::new(api),
            palette: Palette::default(),
            theme: ChartTheme::default(),
        }
    }
}

/// Context installed by `App`, or a default one for components mounted on their own.
pub fn use_dashboard() -> DashboardContext {
    use_context::<DashboardContext>().unwrap_or_else(|| {
        get_logger().warn(
            LogComponent::Presentation("App"),
            "no dashboard context provided, using defaults",
        );
        DashboardContext::new(DashboardConfig::default())
    })
}

/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter)]
pub enum Tab {
    #[default]
    #[display(fmt = "Market")]
    Market,
    #[display(fmt = "Intelligence")]
    Intelligence,
    #[display(fmt = "Portfolio")]
    Portfolio,
}

/// Root composer: tab bar plus exactly one mounted view
#[component]
pub fn App(config: DashboardConfig) -> impl IntoView {
    provide_context(DashboardContext::new(config));
    let (tab, set_tab) = create_signal(Tab::default());

    view! {
        <style>{STYLES}</style>
        <div class="dashboard">
            <nav class="tab-bar">
                <span class="brand">"LOOLOOMI"</span>
                {Tab::iter()
                    .map(|t| {
                        view! {
                            <button
                                class="tab"
                                class:active=move || tab.get() == t
                                on:click=move |_| {
                                    get_logger().debug(
                                        LogComponent::Presentation("App"),
                                        &format!("switching to {t}"),
                                    );
                                    set_tab.set(t);
                                }
                            >
                                {t.to_string()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
            {move || match tab.get() {
                Tab::Market => view! { <MarketDashboard/> }.into_view(),
                Tab::Intelligence => view! { <IntelligencePage/> }.into_view(),
                Tab::Portfolio => view! { <PortfolioPage/> }.into_view(),
            }}
        </div>
    }
}

const STYLES: &str = r#"
.dashboard {
    font-family: 'DM Sans', -apple-system, BlinkMacSystemFont, sans-serif;
    background: #0a0a12;
    min-height: 100vh;
    padding: 0 24px 48px;
    color: #e8e6f0;
}

.tab-bar {
    display: flex;
    align-items: center;
    gap: 8px;
    padding: 20px 0;
    border-bottom: 1px solid #1f1f2e;
}

.brand {
    font-weight: 800;
    font-size: 22px;
    margin-right: 16px;
}

.tab, .chip, .toggle {
    padding: 6px 16px;
    border-radius: 6px;
    font-size: 12px;
    background: transparent;
    border: 1px solid #1f1f2e;
    color: #9b98b8;
    cursor: pointer;
}

.tab.active, .chip.active, .toggle.active {
    background: rgba(79, 110, 247, 0.13);
    border-color: #4f6ef7;
    color: #4f6ef7;
}

.card {
    background: #12121c;
    border: 1px solid #1f1f2e;
    border-radius: 10px;
    padding: 16px;
}

.card-title {
    font-size: 10px;
    color: #5c5888;
    letter-spacing: 0.1em;
    text-transform: uppercase;
    margin-bottom: 8px;
}

.summary-row {
    display: grid;
    grid-template-columns: repeat(4, 1fr);
    gap: 12px;
    margin: 20px 0;
}

.big-number {
    font-size: 32px;
    font-weight: 700;
    font-family: 'JetBrains Mono', monospace;
}

.mono {
    font-family: 'JetBrains Mono', monospace;
}

.muted {
    color: #5c5888;
    font-size: 11px;
}

.stale {
    opacity: 0.6;
}

.status-header {
    display: flex;
    align-items: center;
    justify-content: space-between;
    gap: 16px;
    margin-top: 16px;
}

.token-row {
    display: grid;
    grid-template-columns: 2fr 1fr 1fr 1fr 1fr;
    gap: 12px;
    padding: 14px 20px;
    border-bottom: 1px solid #1f1f2e;
    cursor: pointer;
    align-items: center;
}

.token-row.selected {
    background: rgba(79, 110, 247, 0.05);
}

.token-avatar {
    width: 32px;
    height: 32px;
    border-radius: 50%;
    display: inline-flex;
    align-items: center;
    justify-content: center;
    font-size: 10px;
    font-weight: 700;
    margin-right: 12px;
}

.right {
    text-align: right;
}

.chart-wrapper {
    position: relative;
    width: 100%;
    cursor: crosshair;
}

.crosshair {
    position: absolute;
    top: 0;
    bottom: 0;
    width: 1px;
    pointer-events: none;
}

.tooltip {
    position: absolute;
    background: rgba(10, 10, 18, 0.92);
    border: 1px solid #1f1f2e;
    border-radius: 6px;
    padding: 8px 10px;
    font-size: 11px;
    pointer-events: none;
    transform: translate(-50%, calc(-100% - 8px));
    white-space: nowrap;
}

.empty-state {
    padding: 40px;
    text-align: center;
    color: #5c5888;
}

.grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(200px, 1fr));
    gap: 10px;
}

.bar-track {
    height: 8px;
    background: #1f1f2e;
    border-radius: 4px;
    overflow: hidden;
}

.bar-fill {
    height: 100%;
    border-radius: 4px;
    transition: width 0.5s;
}

table {
    width: 100%;
    border-collapse: collapse;
}

th, td {
    padding: 10px 8px;
    border-bottom: 1px solid #1f1f2e;
    font-size: 13px;
}
"#;
