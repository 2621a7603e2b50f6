//! Local validation of operations before they are dispatched.
//!
//! Checks use Stillwater's `Validation` type so every violation is
//! collected in one pass. The calculator reports the first one; the
//! rest are available to callers that want them all.
//!
//! # Example
//!
//! ```rust
//! use keycalc::core::Operator;
//! use keycalc::validation::{first_violation, validate_operation, InputError};
//!
//! let check = validate_operation(Operator::Divide, 5.0, Some(0.0));
//! assert!(check.is_failure());
//! assert_eq!(first_violation(&check), Some(InputError::DivisionByZero));
//! ```

pub mod rules;
pub mod violations;

pub use rules::{first_violation, validate_operation, OperandCheck};
pub use violations::InputError;
