//! Pure keystroke transitions.
//!
//! `press` applies one key to the state and says what, if anything, the
//! caller must do next. When it returns `Step::Compute` the state is
//! already `Busy`; the caller resolves the request with a provider and
//! hands the outcome to `apply_result`. Neither function performs I/O.

use crate::core::{format_display, CalculatorState, Guard, Operator};
use crate::machine::key::Key;
use crate::validation::{first_violation, validate_operation, InputError};

/// An operation the caller must resolve before the machine can continue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputeRequest {
    pub operator: Operator,
    pub operand1: f64,
    /// Absent for square root
    pub operand2: Option<f64>,
    /// Operator to adopt against the result, when an operator key
    /// resolved a pending computation
    pub then: Option<Operator>,
}

impl ComputeRequest {
    /// Text shown on the operation line while the request is outstanding.
    pub fn expression(&self) -> String {
        match self.operand2 {
            Some(rhs) if self.operator.is_binary() => format!(
                "{} {} {}",
                format_display(self.operand1),
                self.operator.symbol(),
                format_display(rhs)
            ),
            _ => format!("√{}", format_display(self.operand1)),
        }
    }
}

/// What a single key press did.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// The state changed; nothing else to do
    Updated,
    /// The key had no effect
    Ignored,
    /// The state is now `Busy` until this request is resolved
    Compute(ComputeRequest),
    /// Local validation failed; the state is now `Error`
    Rejected(InputError),
}

impl CalculatorState {
    /// Apply one key.
    ///
    /// Any key pressed while an error is shown first resets the state,
    /// then takes effect. Keys pressed while `Busy` are ignored.
    pub fn press(&mut self, key: Key) -> Step {
        if self.phase().is_error() {
            self.clear();
            if key == Key::Clear {
                return Step::Updated;
            }
        }

        if !Guard::accepts_input().check(self) {
            return Step::Ignored;
        }

        match key {
            Key::Digit(digit) if digit <= 9 => self.input_digit(digit),
            Key::Digit(_) => return Step::Ignored,
            Key::Decimal => self.input_decimal(),
            Key::Backspace => self.backspace(),
            Key::ToggleSign => self.toggle_sign(),
            Key::Clear => self.clear(),
            Key::ClearEntry => self.clear_entry(),
            Key::SquareRoot | Key::Operator(Operator::Sqrt) => {
                return self.request(Operator::Sqrt, self.current_operand(), None, None);
            }
            Key::Operator(operator) => {
                if let Some(pending) = self.resolvable_operator() {
                    return self.request(
                        pending,
                        self.pending_operand(),
                        Some(self.current_operand()),
                        Some(operator),
                    );
                }
                self.choose_operator(operator);
            }
            Key::Equals => match self.resolvable_operator() {
                Some(pending) => {
                    return self.request(
                        pending,
                        self.pending_operand(),
                        Some(self.current_operand()),
                        None,
                    );
                }
                None => return Step::Ignored,
            },
        }
        Step::Updated
    }

    /// Resolve an outstanding request with the provider's outcome.
    pub fn apply_result(&mut self, request: &ComputeRequest, outcome: Result<f64, String>) {
        match outcome {
            Ok(result) => self.complete(result, request.then),
            Err(message) => self.fail(message),
        }
    }

    fn resolvable_operator(&self) -> Option<Operator> {
        let ready = Guard::accepts_input().and(Guard::has_right_operand());
        if ready.check(self) {
            self.pending_operator()
        } else {
            None
        }
    }

    fn request(
        &mut self,
        operator: Operator,
        operand1: f64,
        operand2: Option<f64>,
        then: Option<Operator>,
    ) -> Step {
        let check = validate_operation(operator, operand1, operand2);
        if let Some(violation) = first_violation(&check) {
            self.fail(violation.to_string());
            return Step::Rejected(violation);
        }

        let request = ComputeRequest {
            operator,
            operand1,
            operand2,
            then,
        };
        self.begin_request(request.expression());
        Step::Compute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Phase, CALCULATING_DISPLAY, DEFAULT_DISPLAY, ERROR_DISPLAY};

    fn press_all(state: &mut CalculatorState, labels: &[&str]) -> Step {
        let mut last = Step::Ignored;
        for label in labels {
            last = state.press(Key::from_label(label).unwrap());
        }
        last
    }

    #[test]
    fn equals_requests_pending_operation() {
        let mut state = CalculatorState::new();
        let step = press_all(&mut state, &["5", "+", "3", "="]);

        let expected = ComputeRequest {
            operator: Operator::Add,
            operand1: 5.0,
            operand2: Some(3.0),
            then: None,
        };
        assert_eq!(step, Step::Compute(expected));
        assert_eq!(state.phase(), Phase::Busy);
        assert_eq!(state.display(), CALCULATING_DISPLAY);
        assert_eq!(state.operation_display(), "5 + 3");
    }

    #[test]
    fn result_is_shown_and_operator_cleared() {
        let mut state = CalculatorState::new();
        let Step::Compute(request) = press_all(&mut state, &["5", "+", "3", "="]) else {
            panic!("expected a compute request");
        };

        state.apply_result(&request, Ok(8.0));
        assert_eq!(state.display(), "8");
        assert_eq!(state.current_operand(), 8.0);
        assert_eq!(state.pending_operator(), None);
        assert!(state.is_awaiting_operand());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn equals_without_right_operand_is_ignored() {
        let mut state = CalculatorState::new();
        assert_eq!(press_all(&mut state, &["="]), Step::Ignored);
        assert_eq!(press_all(&mut state, &["5", "+", "="]), Step::Ignored);
        assert_eq!(state.phase(), Phase::OperatorPending);
    }

    #[test]
    fn keys_are_ignored_while_busy() {
        let mut state = CalculatorState::new();
        press_all(&mut state, &["2", "^", "8", "="]);

        for label in ["1", ".", "←", "±", "+", "=", "√", "CE"] {
            assert_eq!(state.press(Key::from_label(label).unwrap()), Step::Ignored);
        }
        assert_eq!(state.display(), CALCULATING_DISPLAY);
    }

    #[test]
    fn outstanding_request_has_nothing_to_resolve() {
        let mut state = CalculatorState::new();
        press_all(&mut state, &["5", "+", "3"]);
        assert_eq!(state.resolvable_operator(), Some(Operator::Add));

        press_all(&mut state, &["="]);
        assert!(state.is_busy());
        assert_eq!(state.pending_operator(), Some(Operator::Add));
        assert_eq!(state.resolvable_operator(), None);
    }

    #[test]
    fn second_operator_resolves_pending_then_chains() {
        let mut state = CalculatorState::new();
        let Step::Compute(request) = press_all(&mut state, &["5", "+", "3", "×"]) else {
            panic!("expected a compute request");
        };
        assert_eq!(request.operator, Operator::Add);
        assert_eq!(request.then, Some(Operator::Multiply));

        state.apply_result(&request, Ok(8.0));
        assert_eq!(state.pending_operator(), Some(Operator::Multiply));
        assert_eq!(state.pending_operand(), 8.0);
        assert_eq!(state.operation_display(), "8 ×");
    }

    #[test]
    fn operator_while_awaiting_replaces_it() {
        let mut state = CalculatorState::new();
        let step = press_all(&mut state, &["5", "+", "−"]);
        assert_eq!(step, Step::Updated);
        assert_eq!(state.pending_operator(), Some(Operator::Subtract));
        assert_eq!(state.pending_operand(), 5.0);
    }

    #[test]
    fn square_root_requests_unary_operation() {
        let mut state = CalculatorState::new();
        let step = press_all(&mut state, &["9", "√"]);

        let Step::Compute(request) = step else {
            panic!("expected a compute request");
        };
        assert_eq!(request.operator, Operator::Sqrt);
        assert_eq!(request.operand2, None);
        assert_eq!(state.operation_display(), "√9");
    }

    #[test]
    fn division_by_zero_is_rejected_locally() {
        let mut state = CalculatorState::new();
        let step = press_all(&mut state, &["5", "÷", "0", "="]);

        assert_eq!(step, Step::Rejected(InputError::DivisionByZero));
        assert_eq!(state.display(), ERROR_DISPLAY);
        assert_eq!(state.error(), Some("Division by zero"));
    }

    #[test]
    fn negative_square_root_is_rejected_locally() {
        let mut state = CalculatorState::new();
        let step = press_all(&mut state, &["4", "±", "√"]);
        assert!(matches!(step, Step::Rejected(InputError::NegativeSquareRoot { .. })));
        assert_eq!(state.phase(), Phase::Error);
    }

    #[test]
    fn provider_failure_enters_error() {
        let mut state = CalculatorState::new();
        let Step::Compute(request) = press_all(&mut state, &["7", "−", "2", "="]) else {
            panic!("expected a compute request");
        };

        state.apply_result(&request, Err("Unauthorized".to_string()));
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(state.display(), ERROR_DISPLAY);
    }

    #[test]
    fn key_after_error_starts_fresh() {
        let mut state = CalculatorState::new();
        press_all(&mut state, &["5", "÷", "0", "="]);

        assert_eq!(state.press(Key::Digit(7)), Step::Updated);
        assert_eq!(state.display(), "7");
        assert_eq!(state.pending_operator(), None);
        assert_eq!(state.error(), None);

        press_all(&mut state, &["÷", "0", "="]);
        assert_eq!(state.press(Key::Clear), Step::Updated);
        assert_eq!(state.display(), DEFAULT_DISPLAY);
    }

    #[test]
    fn clear_entry_keeps_pending_operator() {
        let mut state = CalculatorState::new();
        press_all(&mut state, &["1", "2", "+", "4", "CE", "6"]);

        assert_eq!(state.display(), "6");
        assert_eq!(state.pending_operator(), Some(Operator::Add));
        assert_eq!(state.operation_display(), "12 + 6");
    }

    #[test]
    fn out_of_range_digit_is_ignored() {
        let mut state = CalculatorState::new();
        assert_eq!(state.press(Key::Digit(12)), Step::Ignored);
        assert_eq!(state.display(), DEFAULT_DISPLAY);
    }
}
