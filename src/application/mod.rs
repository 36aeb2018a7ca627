//! Application layer: fetch cycles, poll loops and view state.

pub mod poller;
pub mod use_cases;
pub mod view_state;

pub use poller::{MountGuard, PollHandle, Poller};
pub use view_state::{ApiStatus, ChartCache, IntelligenceView, MarketView, PortfolioView};
