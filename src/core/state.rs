//! Calculator state and the pure edits that move it between phases.
//!
//! `CalculatorState` is owned by a single calculator. Its fields are
//! private; the keypad dispatcher in [`crate::machine`] is the only code
//! that drives the crate-visible edit methods below.

use super::format::{format_display, parse_display};
use super::operator::Operator;
use serde::{Deserialize, Serialize};

/// Display text when nothing has been entered.
pub const DEFAULT_DISPLAY: &str = "0";

/// Display text while a result request is outstanding.
pub const CALCULATING_DISPLAY: &str = "Calculating...";

/// Display text while an error is shown.
pub const ERROR_DISPLAY: &str = "Error";

/// Coarse phase of the calculator, derived from its state.
///
/// # Example
///
/// ```rust
/// use keycalc::core::{CalculatorState, Phase};
///
/// let state = CalculatorState::default();
/// assert_eq!(state.phase(), Phase::Idle);
/// assert_eq!(state.phase().name(), "Idle");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Phase {
    /// No operator pending, no error, not busy
    Idle,
    /// An operator was chosen; the right operand is awaited or being typed
    OperatorPending,
    /// A result request is outstanding
    Busy,
    /// The last operation failed; cleared by timeout or the next key
    Error,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::OperatorPending => "OperatorPending",
            Self::Busy => "Busy",
            Self::Error => "Error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Whether keypad input is processed in this phase.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Self::Busy)
    }
}

/// Display, operand and operator state between keystrokes.
///
/// Invariant: `display` never holds more than one decimal point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculatorState {
    display: String,
    operation_display: String,
    current_operand: f64,
    pending_operand: f64,
    pending_operator: Option<Operator>,
    awaiting_operand: bool,
    busy: bool,
    error: Option<String>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: DEFAULT_DISPLAY.to_string(),
            operation_display: String::new(),
            current_operand: 0.0,
            pending_operand: 0.0,
            pending_operator: None,
            awaiting_operand: false,
            busy: false,
            error: None,
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Main display text.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Secondary line showing the operation being built, e.g. `"5 +"` or `"5 + 3"`.
    pub fn operation_display(&self) -> &str {
        &self.operation_display
    }

    pub fn current_operand(&self) -> f64 {
        self.current_operand
    }

    pub fn pending_operand(&self) -> f64 {
        self.pending_operand
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    /// True right after an operator or a result: the next digit starts a new number.
    pub fn is_awaiting_operand(&self) -> bool {
        self.awaiting_operand
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Message of the failure currently shown, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        if self.error.is_some() {
            Phase::Error
        } else if self.busy {
            Phase::Busy
        } else if self.pending_operator.is_some() {
            Phase::OperatorPending
        } else {
            Phase::Idle
        }
    }

    pub(crate) fn input_digit(&mut self, digit: u8) {
        let digit = char::from(b'0' + digit.min(9));
        if self.awaiting_operand || self.display == DEFAULT_DISPLAY {
            self.display = digit.to_string();
            self.awaiting_operand = false;
        } else {
            self.display.push(digit);
        }
        self.sync_operand();
    }

    pub(crate) fn input_decimal(&mut self) {
        if self.awaiting_operand {
            self.display = "0.".to_string();
            self.awaiting_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
        self.sync_operand();
    }

    pub(crate) fn backspace(&mut self) {
        self.display.pop();
        if self.display.is_empty() || self.display == "-" {
            self.display = DEFAULT_DISPLAY.to_string();
        }
        self.sync_operand();
    }

    pub(crate) fn toggle_sign(&mut self) {
        if self.display == DEFAULT_DISPLAY || self.shows_sentinel() {
            return;
        }
        match self.display.strip_prefix('-') {
            Some(unsigned) => self.display = unsigned.to_string(),
            None => self.display.insert(0, '-'),
        }
        self.sync_operand();
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Reset the current entry only; a pending operator survives.
    pub(crate) fn clear_entry(&mut self) {
        self.display = DEFAULT_DISPLAY.to_string();
        self.current_operand = 0.0;
        self.error = None;
        self.refresh_operation_display();
    }

    /// Adopt `operator` against the current operand.
    pub(crate) fn choose_operator(&mut self, operator: Operator) {
        self.pending_operand = self.current_operand;
        self.pending_operator = Some(operator);
        self.awaiting_operand = true;
        self.operation_display = format!(
            "{} {}",
            format_display(self.pending_operand),
            operator.symbol()
        );
    }

    pub(crate) fn begin_request(&mut self, expression: String) {
        self.busy = true;
        self.display = CALCULATING_DISPLAY.to_string();
        self.operation_display = expression;
    }

    /// Show `result`; if `then` is set, chain it as the next pending operator.
    pub(crate) fn complete(&mut self, result: f64, then: Option<Operator>) {
        self.display = format_display(result);
        self.current_operand = result;
        self.pending_operand = 0.0;
        self.pending_operator = None;
        self.awaiting_operand = true;
        self.operation_display.clear();
        self.busy = false;

        if let Some(operator) = then {
            self.choose_operator(operator);
        }
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.display = ERROR_DISPLAY.to_string();
        self.busy = false;
        self.pending_operator = None;
        self.operation_display.clear();
    }

    /// Load a previous result as the current operand.
    pub(crate) fn recall(&mut self, value: f64) {
        self.display = format_display(value);
        self.current_operand = value;
        self.awaiting_operand = true;
        self.pending_operator = None;
        self.operation_display.clear();
    }

    fn shows_sentinel(&self) -> bool {
        self.display == CALCULATING_DISPLAY || self.display == ERROR_DISPLAY
    }

    fn sync_operand(&mut self) {
        self.current_operand = parse_display(&self.display);
        self.refresh_operation_display();
    }

    fn refresh_operation_display(&mut self) {
        if let Some(operator) = self.pending_operator {
            self.operation_display = format!(
                "{} {} {}",
                format_display(self.pending_operand),
                operator.symbol(),
                self.display
            );
        }
    }
}
