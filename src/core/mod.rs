//! Core calculator types and logic.
//!
//! This module contains the pure core of the calculator:
//! - Operators and their symbols
//! - Calculator state with its keystroke edits and phases
//! - Guard predicates for transition control
//! - Immutable, bounded history of completed operations
//! - Number and expression formatting
//!
//! Nothing in this module performs I/O.

mod format;
mod guard;
mod history;
mod operator;
mod state;

pub use format::{format_display, format_expression, format_operand, parse_display, relative_time};
pub use guard::Guard;
pub use history::{EntryList, HistoryEntry, DEFAULT_HISTORY_LIMIT};
pub use operator::Operator;
pub use state::{CalculatorState, Phase, CALCULATING_DISPLAY, DEFAULT_DISPLAY, ERROR_DISPLAY};
