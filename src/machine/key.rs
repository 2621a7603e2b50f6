//! Keypad tokens and the button layout.

use crate::core::Operator;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Button labels as laid out on the keypad, row by row.
pub const KEYPAD: [[&str; 4]; 5] = [
    ["C", "←", "√", "÷"],
    ["7", "8", "9", "×"],
    ["4", "5", "6", "−"],
    ["1", "2", "3", "+"],
    ["0", ".", "^", "="],
];

/// One input token delivered to the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A decimal digit, 0 to 9
    Digit(u8),
    Decimal,
    /// One of the binary operators
    Operator(Operator),
    Equals,
    SquareRoot,
    Clear,
    ClearEntry,
    Backspace,
    ToggleSign,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown key: {label}")]
pub struct UnknownKey {
    pub label: String,
}

impl Key {
    /// Parse a button label. `"-"`, `"*"` and `"/"` are accepted as
    /// aliases for the typographic operator symbols.
    pub fn from_label(label: &str) -> Result<Self, UnknownKey> {
        let key = match label {
            "." => Key::Decimal,
            "=" => Key::Equals,
            "√" => Key::SquareRoot,
            "C" => Key::Clear,
            "CE" => Key::ClearEntry,
            "←" => Key::Backspace,
            "±" => Key::ToggleSign,
            _ => {
                if let Some(digit) = single_digit(label) {
                    Key::Digit(digit)
                } else {
                    match Operator::from_symbol(label) {
                        Some(operator) if operator.is_binary() => Key::Operator(operator),
                        _ => {
                            return Err(UnknownKey {
                                label: label.to_string(),
                            })
                        }
                    }
                }
            }
        };
        Ok(key)
    }

    /// Label shown on the button for this key.
    pub fn label(&self) -> String {
        match self {
            Key::Digit(digit) => digit.to_string(),
            Key::Decimal => ".".to_string(),
            Key::Operator(operator) => operator.symbol().to_string(),
            Key::Equals => "=".to_string(),
            Key::SquareRoot => "√".to_string(),
            Key::Clear => "C".to_string(),
            Key::ClearEntry => "CE".to_string(),
            Key::Backspace => "←".to_string(),
            Key::ToggleSign => "±".to_string(),
        }
    }
}

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::from_label(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn single_digit(label: &str) -> Option<u8> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_digit(10).map(|d| d as u8),
        _ => None,
    }
}
