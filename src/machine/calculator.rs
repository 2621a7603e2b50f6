//! The async calculator shell.

use crate::core::{CalculatorState, HistoryEntry, Phase};
use crate::machine::key::{Key, UnknownKey};
use crate::machine::transition::{ComputeRequest, Step};
use crate::ledger::HistoryLedger;
use crate::provider::{dispatch, ArithmeticProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How long an error stays on the display before the state resets.
pub const DEFAULT_ERROR_CLEAR_AFTER: Duration = Duration::from_secs(5);

/// Drives a `CalculatorState` with an arithmetic provider and a ledger.
///
/// `press` takes `&mut self` and awaits any provider call it starts, so
/// at most one request is outstanding per calculator.
///
/// Once the error deadline passes, `state` and `phase` report the reset
/// state even if nothing has touched the calculator since.
pub struct Calculator {
    state: CalculatorState,
    cleared: CalculatorState,
    arithmetic: Arc<dyn ArithmeticProvider>,
    ledger: HistoryLedger,
    error_clear_after: Duration,
    error_deadline: Option<Instant>,
}

impl Calculator {
    pub fn new(arithmetic: Arc<dyn ArithmeticProvider>, ledger: HistoryLedger) -> Self {
        Self {
            state: CalculatorState::new(),
            cleared: CalculatorState::new(),
            arithmetic,
            ledger,
            error_clear_after: DEFAULT_ERROR_CLEAR_AFTER,
            error_deadline: None,
        }
    }

    pub fn with_error_clear_after(mut self, delay: Duration) -> Self {
        self.error_clear_after = delay;
        self
    }

    pub fn state(&self) -> &CalculatorState {
        if self.error_expired() {
            &self.cleared
        } else {
            &self.state
        }
    }

    pub fn phase(&self) -> Phase {
        self.state().phase()
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    /// When the current error will be cleared, if one is shown.
    pub fn error_deadline(&self) -> Option<Instant> {
        self.error_deadline.filter(|_| !self.error_expired())
    }

    fn error_expired(&self) -> bool {
        self.error_deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Apply one key, resolving any computation it starts.
    pub async fn press(&mut self, key: Key) -> Phase {
        self.expire_error();
        self.error_deadline = None;

        match self.state.press(key) {
            Step::Updated => debug!(%key, display = self.state.display(), "key applied"),
            Step::Ignored => debug!(%key, phase = self.state.phase().name(), "key ignored"),
            Step::Compute(request) => self.compute(request).await,
            Step::Rejected(violation) => debug!(%key, %violation, "operation rejected locally"),
        }

        if self.state.phase().is_error() {
            self.error_deadline = Some(Instant::now() + self.error_clear_after);
        }
        self.state.phase()
    }

    /// Parse a button label and apply it.
    pub async fn press_label(&mut self, label: &str) -> Result<Phase, UnknownKey> {
        let key = Key::from_label(label)?;
        Ok(self.press(key).await)
    }

    /// Load a history entry's result as the current operand.
    pub fn recall(&mut self, entry: &HistoryEntry) {
        self.expire_error();
        if self.state.is_busy() {
            return;
        }
        self.error_deadline = None;
        self.state.recall(entry.result);
        debug!(id = entry.id, result = entry.result, "history entry recalled");
    }

    /// Commit the reset if the error timeout has elapsed. Returns whether it did.
    pub fn expire_error(&mut self) -> bool {
        if !self.error_expired() {
            return false;
        }
        self.error_deadline = None;
        self.state.clear();
        debug!("error cleared after timeout");
        true
    }

    /// Wait out the error timeout, if an error is shown, then reset.
    pub async fn settle_error(&mut self) {
        if let Some(deadline) = self.error_deadline {
            tokio::time::sleep_until(deadline).await;
            self.expire_error();
        }
    }

    async fn compute(&mut self, request: ComputeRequest) {
        let rhs = request.operand2.unwrap_or(0.0);
        let outcome =
            dispatch(self.arithmetic.as_ref(), request.operator, request.operand1, rhs).await;

        match outcome {
            Ok(computation) => {
                let entry = self.ledger.append(
                    request.operator,
                    request.operand1,
                    request.operand2,
                    computation.result,
                );
                info!(expression = %entry.expression, "operation completed");
                self.state.apply_result(&request, Ok(computation.result));
            }
            Err(e) => {
                warn!(operator = request.operator.name(), error = %e, "operation failed");
                self.state.apply_result(&request, Err(e.user_message()));
            }
        }
    }
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("state", self.state())
            .field("ledger", &self.ledger)
            .field("error_clear_after", &self.error_clear_after)
            .finish()
    }
}
