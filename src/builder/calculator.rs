//! Builder for assembling a calculator.

use crate::builder::error::BuildError;
use crate::config::Settings;
use crate::ledger::{FileSnapshotStore, HistoryLedger};
use crate::machine::{Calculator, DEFAULT_ERROR_CLEAR_AFTER};
use crate::provider::{ArithmeticProvider, HttpCalculatorApi};
use std::sync::Arc;
use std::time::Duration;

/// Builder for a `Calculator` with a fluent API.
pub struct CalculatorBuilder {
    arithmetic: Option<Arc<dyn ArithmeticProvider>>,
    ledger: Option<HistoryLedger>,
    error_clear_after: Duration,
}

impl CalculatorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            arithmetic: None,
            ledger: None,
            error_clear_after: DEFAULT_ERROR_CLEAR_AFTER,
        }
    }

    /// Wire the remote API for both arithmetic and history, with the
    /// snapshot file from `settings` as the local fallback.
    pub fn from_settings(settings: &Settings) -> Self {
        let api = Arc::new(HttpCalculatorApi::from_settings(settings));
        let store = Arc::new(FileSnapshotStore::new(settings.snapshot_path.clone()));
        let ledger = HistoryLedger::new(settings.history_limit, store).with_remote(api.clone());

        Self::new()
            .arithmetic(api)
            .ledger(ledger)
            .error_clear_after(settings.error_clear_after())
    }

    /// Set the arithmetic provider (required).
    pub fn arithmetic(mut self, provider: Arc<dyn ArithmeticProvider>) -> Self {
        self.arithmetic = Some(provider);
        self
    }

    /// Set the history ledger (required).
    pub fn ledger(mut self, ledger: HistoryLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn error_clear_after(mut self, delay: Duration) -> Self {
        self.error_clear_after = delay;
        self
    }

    /// Build the calculator.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Calculator, BuildError> {
        let arithmetic = self.arithmetic.ok_or(BuildError::MissingArithmetic)?;
        let ledger = self.ledger.ok_or(BuildError::MissingLedger)?;

        Ok(Calculator::new(arithmetic, ledger).with_error_clear_after(self.error_clear_after))
    }
}

impl Default for CalculatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
