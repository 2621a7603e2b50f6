//! Validation rules for operations about to be dispatched.

use crate::core::Operator;
use crate::validation::violations::InputError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of validating one operation; failures carry every violation.
pub type OperandCheck = Validation<(), NonEmptyVec<InputError>>;

/// Check an operation, accumulating ALL violations.
///
/// Returns `Validation::Success(())` if the operation may be sent to a
/// provider, otherwise `Validation::Failure` with every problem found.
pub fn validate_operation(
    operator: Operator,
    operand1: f64,
    operand2: Option<f64>,
) -> OperandCheck {
    let mut checks: Vec<OperandCheck> = vec![finite(operand1)];

    if operator.is_binary() {
        match operand2 {
            Some(rhs) => {
                checks.push(finite(rhs));
                if operator == Operator::Divide && rhs == 0.0 {
                    checks.push(Validation::fail(InputError::DivisionByZero));
                }
            }
            None => checks.push(Validation::fail(InputError::MissingOperand)),
        }
    } else if operand1 < 0.0 {
        checks.push(Validation::fail(InputError::NegativeSquareRoot { operand: operand1 }));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// The violation reported to the user: the first one found.
pub fn first_violation(check: &OperandCheck) -> Option<InputError> {
    match check {
        Validation::Success(_) => None,
        Validation::Failure(errors) => errors.iter().next().cloned(),
    }
}

fn finite(operand: f64) -> OperandCheck {
    if operand.is_finite() {
        Validation::success(())
    } else {
        Validation::fail(InputError::NonFiniteOperand { operand })
    }
}
