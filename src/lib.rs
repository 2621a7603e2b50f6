//! Keycalc: a keypad calculator with a bounded operation ledger
//!
//! Keycalc follows a "pure core, imperative shell" layout. Keystroke
//! handling, formatting and history bookkeeping are pure functions over
//! plain data; provider calls, persistence and timers live in a thin
//! async shell around them.
//!
//! # Core Concepts
//!
//! - **State**: `CalculatorState` plus the `press`/`apply_result` step API
//! - **Guards**: Pure predicates deciding which keys take effect
//! - **Providers**: Pluggable arithmetic and history capabilities, local or HTTP
//! - **Ledger**: Process-wide history of the last five operations, snapshotted locally
//!
//! # Example
//!
//! ```rust
//! use keycalc::builder::CalculatorBuilder;
//! use keycalc::ledger::{HistoryLedger, MemorySnapshotStore};
//! use keycalc::provider::LocalArithmetic;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let ledger = HistoryLedger::new(5, Arc::new(MemorySnapshotStore::new()));
//! let mut calculator = CalculatorBuilder::new()
//!     .arithmetic(Arc::new(LocalArithmetic))
//!     .ledger(ledger)
//!     .build()
//!     .unwrap();
//!
//! for label in ["5", "+", "3", "="] {
//!     calculator.press_label(label).await.unwrap();
//! }
//!
//! assert_eq!(calculator.state().display(), "8");
//! assert_eq!(calculator.ledger().last().unwrap().expression, "5 + 3 = 8");
//! # });
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod feed;
pub mod ledger;
pub mod machine;
pub mod provider;
pub mod validation;

// Re-export commonly used types
pub use builder::CalculatorBuilder;
pub use config::Settings;
pub use crate::core::{CalculatorState, Guard, HistoryEntry, Operator, Phase};
pub use ledger::HistoryLedger;
pub use machine::{Calculator, Key, Step};
