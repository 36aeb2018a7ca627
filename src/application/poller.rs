//! Periodic best-effort polling tied to a view's lifetime.
//!
//! A view spawns one `Poller` per refresh loop and keeps the returned
//! `PollHandle`. Dropping or aborting the handle stops the loop and flips the
//! shared `MountGuard`, so a response that lands after unmount is discarded
//! instead of written into torn-down state.

use crate::domain::logging::{LogComponent, LogEntry, LogLevel, get_logger};
use crate::domain::state::RetryPolicy;
use futures::future::{AbortHandle, Abortable};
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Shared "is the owning view still mounted" flag
#[derive(Debug, Clone)]
pub struct MountGuard(Rc<Cell<bool>>);

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl MountGuard {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_mounted(&self) -> bool {
        self.0.get()
    }

    pub fn unmount(&self) {
        self.0.set(false);
    }

    /// Run `apply` only while mounted. Returns whether it ran.
    pub fn apply(&self, apply: impl FnOnce()) -> bool {
        if self.is_mounted() {
            apply();
        }
        self.is_mounted()
    }
}

/// Owner side of a running poll loop
#[derive(Debug)]
pub struct PollHandle {
    abort: AbortHandle,
    guard: MountGuard,
}

impl PollHandle {
    pub fn guard(&self) -> MountGuard {
        self.guard.clone()
    }

    pub fn is_active(&self) -> bool {
        self.guard.is_mounted() && !self.abort.is_aborted()
    }

    /// Stop the loop and cancel the in-flight request.
    pub fn abort(&self) {
        self.guard.unmount();
        self.abort.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

pub struct Poller;

impl Poller {
    /// Run `cycle` now and then again after each policy delay until the
    /// handle is dropped. `cycle` resolves to the current consecutive-failure
    /// count, which drives the backoff.
    pub fn spawn<F, Fut>(name: &'static str, cycle: F, policy: RetryPolicy) -> PollHandle
    where
        F: FnMut(MountGuard) -> Fut + 'static,
        Fut: Future<Output = u32> + 'static,
    {
        let guard = MountGuard::new();
        let (abort, registration) = AbortHandle::new_pair();
        let task = Abortable::new(
            Self::run(name, guard.clone(), cycle, policy, |delay| {
                gloo_timers::future::sleep(delay)
            }),
            registration,
        );
        wasm_bindgen_futures::spawn_local(async move {
            if task.await.is_err() {
                crate::log_debug!(LogComponent::Application("Poller"), "{name}: aborted");
            }
        });
        PollHandle { abort, guard }
    }

    /// Poll loop with an injectable sleep, so it can be driven natively.
    pub async fn run<F, Fut, S, SFut>(
        name: &'static str,
        guard: MountGuard,
        mut cycle: F,
        policy: RetryPolicy,
        sleep: S,
    ) where
        F: FnMut(MountGuard) -> Fut,
        Fut: Future<Output = u32>,
        S: Fn(Duration) -> SFut,
        SFut: Future<Output = ()>,
    {
        while guard.is_mounted() {
            let failures = cycle(guard.clone()).await;
            if !guard.is_mounted() {
                break;
            }
            let delay = policy.delay_after(failures);
            if failures > 0 {
                get_logger().log(
                    LogEntry::new(
                        LogLevel::Warn,
                        LogComponent::Application("Poller"),
                        &format!("{name}: cycle failed, backing off"),
                    )
                    .with_metadata(&format!("failures={failures} delay_ms={delay}")),
                );
            }
            sleep(Duration::from_millis(delay)).await;
        }
    }
}
