//! Browser-backed implementations of the domain logging and clock traits,
//! plus startup config discovery.

use crate::config::{CONFIG_ELEMENT_ID, DashboardConfig};
use crate::domain::errors::ApiResult;
use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};

/// Console logger for the WASM environment
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let line = entry.render(&BrowserTimeProvider.format_timestamp(entry.timestamp));
        match entry.level {
            LogLevel::Trace | LogLevel::Debug => gloo::console::debug!(line),
            LogLevel::Info => gloo::console::info!(line),
            LogLevel::Warn => gloo::console::warn!(line),
            LogLevel::Error => gloo::console::error!(line),
        }
    }
}

/// Clock backed by `js_sys::Date`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    /// Local `HH:MM:SS.mmm`
    fn format_timestamp(&self, timestamp: u64) -> String {
        let date = js_sys::Date::new(&(timestamp as f64).into());
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds(),
            date.get_milliseconds()
        )
    }
}

/// Read the embedded config element. A missing or blank element yields
/// the defaults; malformed JSON is an error for the caller to report.
pub fn load_config() -> ApiResult<DashboardConfig> {
    let text = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());

    match text.filter(|t| !t.trim().is_empty()) {
        Some(text) => DashboardConfig::from_json(&text),
        None => Ok(DashboardConfig::default()),
    }
}
