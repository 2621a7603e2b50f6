//! Guard predicates for controlling keypad transitions.
//!
//! Guards are pure boolean functions over the calculator state. The key
//! dispatcher consults them before any transition handler runs.

use super::state::CalculatorState;
use std::marker::PhantomData;

/// Pure predicate that decides whether a transition may run.
///
/// # Example
///
/// ```rust
/// use keycalc::core::{CalculatorState, Guard};
///
/// let accepts = Guard::accepts_input();
/// assert!(accepts.check(&CalculatorState::default()));
/// ```
pub struct Guard<S = CalculatorState> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S> Guard<S> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Evaluate the predicate.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }

    /// Combine two guards; both must pass.
    pub fn and(self, other: Guard<S>) -> Guard<S>
    where
        S: Send + Sync + 'static,
    {
        Guard::new(move |s: &S| self.check(s) && other.check(s))
    }
}

impl Guard<CalculatorState> {
    /// Passes unless a result request is outstanding.
    pub fn accepts_input() -> Self {
        Guard::new(|s: &CalculatorState| !s.is_busy())
    }

    /// Passes when an operator is pending and its right operand has been typed.
    pub fn has_right_operand() -> Self {
        Guard::new(|s: &CalculatorState| {
            s.pending_operator().is_some() && !s.is_awaiting_operand()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operator;

    #[test]
    fn idle_state_accepts_input() {
        let state = CalculatorState::default();
        assert!(Guard::accepts_input().check(&state));
    }

    #[test]
    fn busy_state_rejects_input() {
        let mut state = CalculatorState::default();
        state.begin_request("1 + 1".to_string());

        assert!(!Guard::accepts_input().check(&state));
    }

    #[test]
    fn right_operand_requires_typed_digits() {
        let mut state = CalculatorState::default();
        state.input_digit(5);
        state.choose_operator(Operator::Add);
        assert!(!Guard::has_right_operand().check(&state));

        state.input_digit(3);
        assert!(Guard::has_right_operand().check(&state));
    }

    #[test]
    fn combined_guard_requires_both() {
        let guard = Guard::accepts_input().and(Guard::has_right_operand());
        let mut state = CalculatorState::default();
        state.input_digit(2);
        state.choose_operator(Operator::Multiply);
        state.input_digit(4);
        assert!(guard.check(&state));

        state.begin_request("2 × 4".to_string());
        assert!(!guard.check(&state));
    }

    #[test]
    fn guard_is_deterministic() {
        let state = CalculatorState::default();
        let guard = Guard::new(|s: &CalculatorState| s.display() == "0");

        assert_eq!(guard.check(&state), guard.check(&state));
    }
}
