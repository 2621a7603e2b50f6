//! Input violations detected before any provider is contacted.

use thiserror::Error;

/// Errors caught locally; these never reach the arithmetic provider.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Cannot take the square root of a negative number")]
    NegativeSquareRoot { operand: f64 },

    #[error("Operand is not a finite number")]
    NonFiniteOperand { operand: f64 },

    #[error("Operator needs a second operand")]
    MissingOperand,
}
