//! Keypad input handling.
//!
//! Keys are applied to `CalculatorState` by a pure step function that
//! returns a `ComputeRequest` whenever a provider call is needed. The
//! `Calculator` shell runs that request, appends successful results to
//! the history ledger and resets the state once an error has been shown
//! for long enough.
//!
//! # Example
//!
//! ```rust
//! use keycalc::core::{CalculatorState, Operator};
//! use keycalc::machine::{Key, Step};
//!
//! let mut state = CalculatorState::new();
//! state.press(Key::Digit(5));
//! state.press(Key::Operator(Operator::Add));
//! state.press(Key::Digit(3));
//!
//! let Step::Compute(request) = state.press(Key::Equals) else {
//!     panic!("equals with two operands starts a computation");
//! };
//! state.apply_result(&request, Ok(8.0));
//! assert_eq!(state.display(), "8");
//! ```

mod calculator;
mod key;
mod transition;

pub use calculator::{Calculator, DEFAULT_ERROR_CLEAR_AFTER};
pub use key::{Key, UnknownKey, KEYPAD};
pub use transition::{ComputeRequest, Step};
