use wasm_bindgen::prelude::*;

use crate::config::CONFIG_ELEMENT_ID;
use crate::domain::logging::LogComponent;
use crate::infrastructure::services::{BrowserTimeProvider, ConsoleLogger, load_config};
use crate::presentation::App;

pub mod application;
pub mod config;
pub mod domain;
pub mod formatting;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;

/// Wire the browser logger and clock, read the host config and mount the dashboard.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let loaded = load_config();
    let config = loaded.clone().unwrap_or_default();
    domain::logging::init_time_provider(Box::new(BrowserTimeProvider::new()));
    domain::logging::init_logger(Box::new(ConsoleLogger::new(config.log_level)));

    if let Err(err) = loaded {
        crate::log_warn!(LogComponent::Infrastructure("Config"), "ignoring #{CONFIG_ELEMENT_ID}: {err}");
    }
    crate::log_info!(
        LogComponent::Presentation("Initialize"),
        "mounting dashboard against {}",
        config.api_base
    );
    leptos::mount_to_body(move || leptos::view! { <App config=config/> });
}

