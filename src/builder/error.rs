//! Errors raised while assembling a calculator.

use thiserror::Error;

/// Errors that can occur when building a `Calculator`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Arithmetic provider not specified. Call .arithmetic(provider) before .build()")]
    MissingArithmetic,

    #[error("History ledger not specified. Call .ledger(ledger) before .build()")]
    MissingLedger,
}
