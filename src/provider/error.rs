//! Provider error types.

use thiserror::Error;

/// Failures reported by the arithmetic or history provider.
///
/// Each class carries one fixed user-facing message, which is also its
/// `Display` output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Cannot reach the calculator service")]
    Connectivity,

    #[error("Authorization failed")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("API endpoint not found")]
    NotFound,

    #[error("Server error")]
    Server { status: u16 },

    #[error("Unknown error")]
    Unknown { status: u16 },

    #[error("Unexpected response from the calculator service")]
    Decode(String),
}

impl ApiError {
    /// Classify an HTTP status. Status 0 stands for "no response at all".
    pub fn from_status(status: u16) -> Self {
        match status {
            0 => Self::Connectivity,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            s if s >= 500 => Self::Server { status: s },
            s => Self::Unknown { status: s },
        }
    }

    /// The message shown to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
