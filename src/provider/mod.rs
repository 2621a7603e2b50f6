//! Arithmetic and history providers.
//!
//! The calculator and the ledger depend only on the two capability
//! traits defined here. `LocalArithmetic` computes in-process;
//! `HttpCalculatorApi` implements both traits against the remote API.

mod arithmetic;
mod error;
mod history;
mod http;

pub use arithmetic::{dispatch, ArithmeticProvider, Computation, LocalArithmetic};
pub use error::ApiError;
pub use history::{ApiOperation, HistoryProvider, RemoteRecord};
pub use http::HttpCalculatorApi;
