#![cfg(target_arch = "wasm32")]

use gloo_timers::future::sleep;
use market_dashboard_wasm::application::Poller;
use market_dashboard_wasm::domain::state::RetryPolicy;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn dropping_the_handle_stops_polling() {
    let cycles = Rc::new(Cell::new(0u32));
    let counter = cycles.clone();
    let handle = Poller::spawn(
        "test",
        move |_guard| {
            counter.set(counter.get() + 1);
            async { 0 }
        },
        RetryPolicy::new(10, 10),
    );
    let guard = handle.guard();

    sleep(Duration::from_millis(45)).await;
    let seen = cycles.get();
    assert!(seen >= 1);
    assert!(handle.is_active());

    drop(handle);
    assert!(!guard.is_mounted());
    sleep(Duration::from_millis(50)).await;
    assert_eq!(cycles.get(), seen);
}

#[wasm_bindgen_test]
async fn aborted_cycle_discards_its_write() {
    let written = Rc::new(Cell::new(false));
    let flag = written.clone();
    let handle = Poller::spawn(
        "slow",
        move |guard| {
            let flag = flag.clone();
            async move {
                sleep(Duration::from_millis(30)).await;
                guard.apply(|| flag.set(true));
                0
            }
        },
        RetryPolicy::new(1_000, 1_000),
    );

    handle.abort();
    sleep(Duration::from_millis(60)).await;
    assert!(!written.get());
}
