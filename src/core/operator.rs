//! Arithmetic operators understood by the calculator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic operator code shared by the keypad, the ledger and providers.
///
/// `Sqrt` is the only unary operator. It is never held as a pending
/// operator; it resolves immediately against the current operand.
///
/// # Example
///
/// ```rust
/// use keycalc::core::Operator;
///
/// assert_eq!(Operator::Subtract.symbol(), "−");
/// assert!(Operator::Power.is_binary());
/// assert!(!Operator::Sqrt.is_binary());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Sqrt,
}

impl Operator {
    /// All operators, binary ones first.
    pub const ALL: [Operator; 6] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Power,
        Operator::Sqrt,
    ];

    /// Display symbol used in expressions and on the keypad.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "−",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Power => "^",
            Self::Sqrt => "√",
        }
    }

    /// Stable lowercase name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Power => "power",
            Self::Sqrt => "sqrt",
        }
    }

    /// True for operators that take a right-hand operand.
    pub fn is_binary(&self) -> bool {
        !matches!(self, Self::Sqrt)
    }

    /// Parse a keypad symbol. Both the typographic minus and ASCII `-` are accepted.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "−" | "-" => Some(Self::Subtract),
            "×" | "*" => Some(Self::Multiply),
            "÷" | "/" => Some(Self::Divide),
            "^" => Some(Self::Power),
            "√" => Some(Self::Sqrt),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
