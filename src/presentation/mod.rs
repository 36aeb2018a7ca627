//! Leptos views.
//!
//! Components own their view state in signals and drive it through the
//! application fetch cycles. Every poll loop a component starts is aborted
//! from `on_cleanup`, so nothing writes into a view after it unmounts.

mod app;
mod intelligence;
mod market;
mod portfolio;
mod price_chart;

pub use app::{App, DashboardContext, Tab, use_dashboard};
pub use intelligence::IntelligencePage;
pub use market::MarketDashboard;
pub use portfolio::{AssetTable, MmiGauge, PortfolioAllocationView, PortfolioPage};
pub use price_chart::PriceChart;

use crate::application::PollHandle;
use crate::domain::logging::get_time_provider;

/// Milliseconds since the epoch, as recorded in `SourceState::updated_at`.
fn now_ms() -> u64 {
    get_time_provider().current_timestamp()
}

/// Tie a poll loop to the current reactive owner.
fn stop_on_cleanup(handle: PollHandle) {
    leptos::on_cleanup(move || handle.abort());
}
