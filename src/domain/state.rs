//! Per-source polling state machine.
//!
//! Each backend endpoint a view depends on owns one `SourceState`. A failed
//! fetch never clears data: the last successful payload stays visible and is
//! marked stale until the next success replaces it wholesale.

use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum FetchPhase {
    #[default]
    Idle,
    Fetching,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceState<T> {
    phase: FetchPhase,
    data: Option<T>,
    last_error: Option<String>,
    /// Milliseconds timestamp of the last success
    updated_at: Option<u64>,
    consecutive_failures: u32,
}

impl<T> Default for SourceState<T> {
    fn default() -> Self {
        Self {
            phase: FetchPhase::Idle,
            data: None,
            last_error: None,
            updated_at: None,
            consecutive_failures: 0,
        }
    }
}

impl<T> SourceState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded with data already on hand (e.g. a cached series).
    pub fn seeded(data: T, now: u64) -> Self {
        Self { phase: FetchPhase::Success, data: Some(data), updated_at: Some(now), ..Self::default() }
    }

    /// Enter `Fetching`. Returns `false` if a fetch is already in flight so
    /// the caller can skip an overlapping tick.
    pub fn begin(&mut self) -> bool {
        if self.phase == FetchPhase::Fetching {
            return false;
        }
        self.phase = FetchPhase::Fetching;
        true
    }

    /// Abandon an in-flight fetch whose poll loop was aborted, so the next
    /// `begin` is not refused.
    pub fn cancel(&mut self) {
        if self.phase == FetchPhase::Fetching {
            self.phase = FetchPhase::Idle;
        }
    }

    pub fn succeed(&mut self, data: T, now: u64) {
        self.phase = FetchPhase::Success;
        self.data = Some(data);
        self.last_error = None;
        self.updated_at = Some(now);
        self.consecutive_failures = 0;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.phase = FetchPhase::Error;
        self.last_error = Some(error.into());
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    /// Apply one fetch outcome.
    pub fn settle<E: std::fmt::Display>(&mut self, outcome: Result<T, E>, now: u64) {
        match outcome {
            Ok(data) => self.succeed(data, now),
            Err(err) => self.fail(err.to_string()),
        }
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn updated_at(&self) -> Option<u64> {
        self.updated_at
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Data is on screen but the latest attempt failed.
    pub fn is_stale(&self) -> bool {
        self.phase == FetchPhase::Error && self.data.is_some()
    }

    /// Nothing to show yet and nothing failed.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && matches!(self.phase, FetchPhase::Idle | FetchPhase::Fetching)
    }
}

/// Poll cadence with exponential backoff after failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval_ms: u64,
    pub max_backoff_ms: u64,
}

impl RetryPolicy {
    pub fn new(interval_ms: u64, max_backoff_ms: u64) -> Self {
        Self { interval_ms, max_backoff_ms: max_backoff_ms.max(interval_ms) }
    }

    /// Delay before the next tick given how many polls in a row have failed.
    pub fn delay_after(&self, consecutive_failures: u32) -> u64 {
        if consecutive_failures == 0 {
            return self.interval_ms;
        }
        let factor = 1u64.checked_shl(consecutive_failures.min(16)).unwrap_or(u64::MAX);
        self.interval_ms.saturating_mul(factor).min(self.max_backoff_ms)
    }
}
