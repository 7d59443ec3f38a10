//! Response definitions
//!
//! Outcome of one executed shell command.

use std::fmt;

/// Response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
}

/// A response to print for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,

    /// Optional text (command output for OK, error message for ERROR)
    pub message: Option<String>,
}

impl Response {
    /// Create an OK response with optional output
    pub fn ok(message: Option<String>) -> Self {
        Self {
            status: Status::Ok,
            message,
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.message) {
            (Status::Ok, Some(message)) => write!(f, "{}", message),
            (Status::Ok, None) => write!(f, "ok"),
            (Status::Error, Some(message)) => write!(f, "error: {}", message),
            (Status::Error, None) => write!(f, "error"),
        }
    }
}
